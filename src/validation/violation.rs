//! Violations, field paths and validation results
//!
//! Violations are plain data. A result keeps them in discovery order, so
//! two runs over the same schema and value compare equal.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// One step of a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location of a value inside a document, e.g. `list[1].arrayName`.
///
/// The empty path is the document root and renders as `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The document root
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns this path extended by a field name
    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.to_string()));
        Self { segments }
    }

    /// Returns this path extended by an array index
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "$");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Violation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    /// Required value absent
    Required,
    /// Length, digit count or element count below the minimum
    TooShort,
    /// Length, digit count or element count above the maximum
    TooLong,
    /// Character outside the pattern class
    PatternMismatch,
    /// Reserved for numeric value ranges
    OutOfRange,
    /// Value has the wrong shape or is not a declared enum value
    TypeMismatch,
}

impl ViolationCode {
    /// Returns the wire code
    pub fn code(&self) -> &'static str {
        match self {
            ViolationCode::Required => "REQUIRED",
            ViolationCode::TooShort => "TOO_SHORT",
            ViolationCode::TooLong => "TOO_LONG",
            ViolationCode::PatternMismatch => "PATTERN_MISMATCH",
            ViolationCode::OutOfRange => "OUT_OF_RANGE",
            ViolationCode::TypeMismatch => "TYPE_MISMATCH",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationViolation {
    field_path: FieldPath,
    code: ViolationCode,
    message: String,
}

impl ValidationViolation {
    pub fn new(field_path: FieldPath, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field_path,
            code,
            message: message.into(),
        }
    }

    pub fn required(field_path: FieldPath) -> Self {
        Self::new(field_path, ViolationCode::Required, "value is required")
    }

    pub fn too_short(field_path: FieldPath, actual: usize, min: usize, unit: &str) -> Self {
        Self::new(
            field_path,
            ViolationCode::TooShort,
            format!("{} {} is below the minimum of {}", actual, unit, min),
        )
    }

    pub fn too_long(field_path: FieldPath, actual: usize, max: usize, unit: &str) -> Self {
        Self::new(
            field_path,
            ViolationCode::TooLong,
            format!("{} {} exceeds the maximum of {}", actual, unit, max),
        )
    }

    pub fn pattern_mismatch(field_path: FieldPath, pattern: impl fmt::Display) -> Self {
        Self::new(
            field_path,
            ViolationCode::PatternMismatch,
            format!("value contains characters outside pattern '{}'", pattern),
        )
    }

    pub fn type_mismatch(field_path: FieldPath, expected: &str, actual: &str) -> Self {
        Self::new(
            field_path,
            ViolationCode::TypeMismatch,
            format!("expected {}, got {}", expected, actual),
        )
    }

    pub fn field_path(&self) -> &FieldPath {
        &self.field_path
    }

    pub fn code(&self) -> ViolationCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.field_path, self.code, self.message)
    }
}

/// Outcome of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn new(violations: Vec<ValidationViolation>) -> Self {
        Self { violations }
    }

    /// True iff there are no violations
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[ValidationViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<ValidationViolation> {
        self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations recorded at exactly `path`
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationViolation> + 'a {
        self.violations
            .iter()
            .filter(move |v| v.field_path.to_string() == path)
    }

    pub(crate) fn extend(&mut self, violations: impl IntoIterator<Item = ValidationViolation>) {
        self.violations.extend(violations);
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 2)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("violations", &self.violations)?;
        state.end()
    }
}
