//! Validation engine for request and response values
//!
//! Validation semantics:
//! - Every declared field is checked, in declaration order
//! - Missing or null required fields yield exactly one `Required`
//! - All checks on a present field are reported together
//! - Nested objects and array elements are walked recursively
//! - Caller hooks run only after a clean per-field pass
//!
//! Violations are data. `validate` never fails; only a caller hook can.

mod fields;
mod session;
mod violation;
mod walker;

pub use session::{Check, CheckError, CheckResult, Direction, ValidationFailure, Validator};
pub use violation::{FieldPath, PathSegment, ValidationResult, ValidationViolation, ViolationCode};
pub use walker::Walker;
