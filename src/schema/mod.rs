//! Schema subsystem: rule model, declaration binding and registry
//!
//! # Design Principles
//!
//! - Schemas are built once and never mutated
//! - Misconfiguration fails at construction, never per request
//! - Field order is declaration order
//! - Schemas are acyclic by construction

mod declaration;
mod errors;
mod loader;
mod openapi;
mod types;

pub use declaration::{bind_fields, DeclaredKind, FieldDef, RecordDef};
pub use errors::{SchemaError, SchemaResult};
pub use loader::SchemaLoader;
pub use openapi::record_from_openapi;
pub use types::{FieldKind, FieldRule, LengthBounds, Schema, SchemaBuilder};
