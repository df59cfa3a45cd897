//! Validation sessions over request and response values
//!
//! One session = one full walk, then at most one hook call:
//! 1. Every field is checked; nothing short-circuits across fields.
//! 2. The hook (combine check on requests, invariant check on responses)
//!    runs only when the walk found nothing. Cross-field rules over
//!    partially invalid data are meaningless.
//! 3. Hook violations are appended; a hook error is returned unchanged.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace};

use super::violation::{FieldPath, ValidationResult, ValidationViolation};
use super::walker::Walker;
use crate::pattern::{PatternMatcher, Repertoire};
use crate::schema::Schema;

/// Result of a caller-supplied check
pub type CheckResult = Result<Vec<ValidationViolation>, CheckError>;

/// Caller-supplied cross-field or invariant check.
///
/// Any `Fn(&Value) -> CheckResult` closure is a check.
pub trait Check: Send + Sync {
    fn check(&self, value: &Value) -> CheckResult;
}

impl<F> Check for F
where
    F: Fn(&Value) -> CheckResult + Send + Sync,
{
    fn check(&self, value: &Value) -> CheckResult {
        self(value)
    }
}

/// Failure raised by a check itself, as opposed to a violation it reports.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CheckError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl CheckError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying error
    pub fn with_source(message: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Which side of a handler produced the value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Inbound request; failures are client errors
    Request,
    /// Outbound response; failures are contract breaches
    Response,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Request => "request",
            Direction::Response => "response",
        }
    }

    /// HTTP status class a failure on this side maps to
    pub fn status_code(&self) -> u16 {
        match self {
            Direction::Request => 400,
            Direction::Response => 500,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failed result tagged with the side it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{direction} validation failed with {} violation(s)", .result.len())]
pub struct ValidationFailure {
    direction: Direction,
    result: ValidationResult,
}

impl ValidationFailure {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn result(&self) -> &ValidationResult {
        &self.result
    }

    pub fn status_code(&self) -> u16 {
        self.direction.status_code()
    }
}

impl ValidationResult {
    /// Converts an invalid result into a [`ValidationFailure`].
    pub fn ensure_valid(self, direction: Direction) -> Result<(), ValidationFailure> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationFailure {
                direction,
                result: self,
            })
        }
    }
}

/// Validation engine.
///
/// Holds only immutable configuration; one instance can serve any number
/// of concurrent sessions.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    matcher: PatternMatcher,
}

impl Validator {
    pub fn new(matcher: PatternMatcher) -> Self {
        Self { matcher }
    }

    /// Engine whose extended-script pattern uses `repertoire`
    pub fn with_repertoire(repertoire: Arc<Repertoire>) -> Self {
        Self::new(PatternMatcher::new(repertoire))
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    /// Per-field pass only. Never fails.
    pub fn validate(&self, schema: &Schema, value: &Value) -> ValidationResult {
        ValidationResult::new(Walker::new(&self.matcher).walk(schema, value, &FieldPath::root()))
    }

    /// Validates an inbound value, then runs the combine check.
    pub fn validate_request(
        &self,
        schema: &Schema,
        value: &Value,
        combine: Option<&dyn Check>,
    ) -> Result<ValidationResult, CheckError> {
        self.run(Direction::Request, schema, value, combine)
    }

    /// Validates an outbound value, then runs the invariant check.
    pub fn validate_response(
        &self,
        schema: &Schema,
        value: &Value,
        invariant: Option<&dyn Check>,
    ) -> Result<ValidationResult, CheckError> {
        self.run(Direction::Response, schema, value, invariant)
    }

    /// Runs one session: full walk, then the hook if nothing failed.
    pub fn run(
        &self,
        direction: Direction,
        schema: &Schema,
        value: &Value,
        hook: Option<&dyn Check>,
    ) -> Result<ValidationResult, CheckError> {
        let mut result = self.validate(schema, value);

        match hook {
            Some(hook) if result.is_valid() => {
                let extra = hook.check(value)?;
                trace!(%direction, violations = extra.len(), "check hook ran");
                result.extend(extra);
            }
            Some(_) => {
                trace!(%direction, "check hook skipped after field violations");
            }
            None => {}
        }

        debug!(
            %direction,
            valid = result.is_valid(),
            violations = result.len(),
            "validation complete"
        );
        Ok(result)
    }
}
