//! Schema type definitions
//!
//! Supported field kinds:
//! - string: character-count bounds and a pattern class
//! - number: digit-count bounds
//! - object: nested record with its own schema
//! - array: element-count bounds, elements validated by an element schema
//! - timestamp: presence only
//! - enum: presence plus membership in a declared value set
//!
//! Schemas are immutable once built. The only way to obtain one is
//! through [`SchemaBuilder::build`] or a declaration binder, both of which
//! reject misconfiguration up front.

use std::collections::HashSet;
use std::fmt;

use super::errors::{SchemaError, SchemaResult};
use crate::pattern::Pattern;

/// Optional lower and upper bound on a length.
///
/// The unit depends on the field kind: characters for strings, decimal
/// digits for numbers, elements for arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl LengthBounds {
    /// No bound on either side.
    pub const UNBOUNDED: LengthBounds = LengthBounds { min: None, max: None };

    /// Creates bounds from optional sides.
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Returns true when neither side is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    fn check(&self, field: &str) -> SchemaResult<()> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(SchemaError::InvalidBounds {
                    field: field.to_string(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for LengthBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{}..={}", min, max),
            (Some(min), None) => write!(f, "{}..", min),
            (None, Some(max)) => write!(f, "..={}", max),
            (None, None) => write!(f, ".."),
        }
    }
}

/// Structural category of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// String with a pattern class
    String(Pattern),
    /// Integer or decimal number
    Number,
    /// Nested object validated by its own schema
    Object(Schema),
    /// Array whose elements are validated by the element schema
    Array(Schema),
    /// Already-decoded instant
    Timestamp,
    /// One of the declared values
    Enum(Vec<String>),
}

impl FieldKind {
    /// Returns the kind name for messages
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String(_) => "string",
            FieldKind::Number => "number",
            FieldKind::Object(_) => "object",
            FieldKind::Array(_) => "array",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Enum(_) => "enum",
        }
    }

    /// Returns true if this kind accepts length bounds
    pub fn accepts_bounds(&self) -> bool {
        matches!(
            self,
            FieldKind::String(_) | FieldKind::Number | FieldKind::Array(_)
        )
    }
}

/// Validation rule attached to one field.
///
/// Fields are required unless [`FieldRule::optional`] is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    kind: FieldKind,
    required: bool,
    bounds: LengthBounds,
}

impl FieldRule {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
            bounds: LengthBounds::UNBOUNDED,
        }
    }

    /// Required string field with the given pattern
    pub fn string(pattern: Pattern) -> Self {
        Self::of(FieldKind::String(pattern))
    }

    /// Required number field
    pub fn number() -> Self {
        Self::of(FieldKind::Number)
    }

    /// Required nested object field
    pub fn object(schema: Schema) -> Self {
        Self::of(FieldKind::Object(schema))
    }

    /// Required array field whose elements follow `element`
    pub fn array(element: Schema) -> Self {
        Self::of(FieldKind::Array(element))
    }

    /// Required timestamp field
    pub fn timestamp() -> Self {
        Self::of(FieldKind::Timestamp)
    }

    /// Required enum field over the given values
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::of(FieldKind::Enum(values.into_iter().map(Into::into).collect()))
    }

    /// Marks the field optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets whether the field is required
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the lower length bound
    pub fn min_length(mut self, min: usize) -> Self {
        self.bounds.min = Some(min);
        self
    }

    /// Sets the upper length bound
    pub fn max_length(mut self, max: usize) -> Self {
        self.bounds.max = Some(max);
        self
    }

    /// Sets both length bounds
    pub fn with_bounds(mut self, bounds: LengthBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn bounds(&self) -> LengthBounds {
        self.bounds
    }

    /// Checks the rule's own configuration. `field` is used in errors.
    pub(crate) fn check(&self, field: &str) -> SchemaResult<()> {
        if !self.bounds.is_unbounded() && !self.kind.accepts_bounds() {
            return Err(SchemaError::BoundsNotAllowed {
                field: field.to_string(),
                kind: self.kind.name(),
            });
        }
        self.bounds.check(field)?;

        if let FieldKind::Enum(values) = &self.kind {
            if values.is_empty() {
                return Err(SchemaError::EmptyEnum {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Ordered field rules for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<(String, FieldRule)>,
}

impl Schema {
    /// Starts a new schema declaration
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Iterates fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Looks up a field rule by name
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rule)| rule)
    }

    /// Returns the number of top-level fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the nesting depth (1 for a flat record)
    pub fn depth(&self) -> usize {
        1 + self
            .fields
            .iter()
            .map(|(_, rule)| match rule.kind() {
                FieldKind::Object(child) | FieldKind::Array(child) => child.depth(),
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }
}

/// Collects field rules and validates them on [`build`](SchemaBuilder::build).
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<(String, FieldRule)>,
    parent: String,
}

impl SchemaBuilder {
    /// Prefixes field names in errors with `parent`.
    pub(crate) fn under(parent: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            parent: parent.into(),
        }
    }

    /// Appends a field; declaration order is validation order.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.push((name.into(), rule));
        self
    }

    /// Validates every rule and freezes the schema.
    pub fn build(self) -> SchemaResult<Schema> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for (name, rule) in &self.fields {
            if name.is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    parent: if self.parent.is_empty() {
                        "$".to_string()
                    } else {
                        self.parent.clone()
                    },
                });
            }
            let path = join_path(&self.parent, name);
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateField { field: path });
            }
            rule.check(&path)?;
        }
        Ok(Schema {
            fields: self.fields,
        })
    }
}

/// Joins a parent path and a field name with a dot.
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}
