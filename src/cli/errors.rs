//! CLI-specific error types
//!
//! Every CLI error terminates the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::pattern::RepertoireError;
use crate::schema::SchemaError;
use crate::validation::{CheckError, ValidationFailure};

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdin/stdout)
    IoError,
    /// Schema declarations could not be loaded
    SchemaError,
    /// Document failed validation
    ValidationFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "UNITCHECK_CLI_CONFIG_ERROR",
            Self::IoError => "UNITCHECK_CLI_IO_ERROR",
            Self::SchemaError => "UNITCHECK_CLI_SCHEMA_ERROR",
            Self::ValidationFailed => "UNITCHECK_CLI_VALIDATION_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::SchemaError, format!("{}: {}", e.code(), e))
    }
}

impl From<RepertoireError> for CliError {
    fn from(e: RepertoireError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<CheckError> for CliError {
    fn from(e: CheckError) -> Self {
        Self::new(CliErrorCode::ValidationFailed, e.to_string())
    }
}

impl From<ValidationFailure> for CliError {
    fn from(e: ValidationFailure) -> Self {
        Self::new(
            CliErrorCode::ValidationFailed,
            format!("{} (status {})", e, e.status_code()),
        )
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
