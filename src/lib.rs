//! unitcheck - declarative field validation for request and response DTOs
//!
//! Schemas describe each record's fields (kind, requiredness, bounds,
//! pattern class). The validator walks a JSON value against a schema and
//! returns every violation it finds, then runs an optional cross-field
//! hook when the per-field pass is clean.

pub mod cli;
pub mod pattern;
pub mod schema;
pub mod validation;
