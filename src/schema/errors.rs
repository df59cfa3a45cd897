//! Schema construction errors
//!
//! Every error here is raised while a schema is built or loaded, never
//! while a value is validated. Error codes:
//! - UNITCHECK_SCHEMA_INVALID_BOUNDS
//! - UNITCHECK_SCHEMA_BOUNDS_NOT_ALLOWED
//! - UNITCHECK_SCHEMA_UNEXPECTED_ATTRIBUTE
//! - UNITCHECK_SCHEMA_EMPTY_ENUM
//! - UNITCHECK_SCHEMA_DUPLICATE_FIELD
//! - UNITCHECK_SCHEMA_EMPTY_FIELD_NAME
//! - UNITCHECK_SCHEMA_UNKNOWN_PATTERN
//! - UNITCHECK_SCHEMA_MISSING_SUB_SCHEMA
//! - UNITCHECK_SCHEMA_UNKNOWN_RECORD
//! - UNITCHECK_SCHEMA_DUPLICATE_RECORD
//! - UNITCHECK_SCHEMA_CYCLIC_REFERENCE
//! - UNITCHECK_SCHEMA_MALFORMED

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema misconfiguration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("field '{field}': minLength {min} exceeds maxLength {max}")]
    InvalidBounds { field: String, min: usize, max: usize },

    #[error("field '{field}': length bounds are not allowed on {kind} fields")]
    BoundsNotAllowed { field: String, kind: &'static str },

    #[error("field '{field}': attribute '{attribute}' is not allowed on {kind} fields")]
    UnexpectedAttribute {
        field: String,
        attribute: &'static str,
        kind: &'static str,
    },

    #[error("field '{field}': enum must declare at least one value")]
    EmptyEnum { field: String },

    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },

    #[error("empty field name under '{parent}'")]
    EmptyFieldName { parent: String },

    #[error("field '{field}': unknown pattern '{pattern}'")]
    UnknownPattern { field: String, pattern: String },

    #[error("field '{field}': {kind} field requires nested fields")]
    MissingSubSchema { field: String, kind: &'static str },

    #[error("record '{0}' not found")]
    UnknownRecord(String),

    #[error("record '{0}' is already registered")]
    DuplicateRecord(String),

    #[error("cyclic reference through '{0}'")]
    CyclicReference(String),

    #[error("malformed schema source '{source_name}': {reason}")]
    Malformed { source_name: String, reason: String },
}

impl SchemaError {
    /// Create an error for an unreadable or unparsable schema source
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::InvalidBounds { .. } => "UNITCHECK_SCHEMA_INVALID_BOUNDS",
            SchemaError::BoundsNotAllowed { .. } => "UNITCHECK_SCHEMA_BOUNDS_NOT_ALLOWED",
            SchemaError::UnexpectedAttribute { .. } => "UNITCHECK_SCHEMA_UNEXPECTED_ATTRIBUTE",
            SchemaError::EmptyEnum { .. } => "UNITCHECK_SCHEMA_EMPTY_ENUM",
            SchemaError::DuplicateField { .. } => "UNITCHECK_SCHEMA_DUPLICATE_FIELD",
            SchemaError::EmptyFieldName { .. } => "UNITCHECK_SCHEMA_EMPTY_FIELD_NAME",
            SchemaError::UnknownPattern { .. } => "UNITCHECK_SCHEMA_UNKNOWN_PATTERN",
            SchemaError::MissingSubSchema { .. } => "UNITCHECK_SCHEMA_MISSING_SUB_SCHEMA",
            SchemaError::UnknownRecord(_) => "UNITCHECK_SCHEMA_UNKNOWN_RECORD",
            SchemaError::DuplicateRecord(_) => "UNITCHECK_SCHEMA_DUPLICATE_RECORD",
            SchemaError::CyclicReference(_) => "UNITCHECK_SCHEMA_CYCLIC_REFERENCE",
            SchemaError::Malformed { .. } => "UNITCHECK_SCHEMA_MALFORMED",
        }
    }
}
