//! Structural walker over nested request/response values
//!
//! Fields are visited in declaration order and every violation is
//! prefixed with the path of the field that produced it. The walk never
//! stops early; recursion depth equals schema depth.

use serde_json::{Map, Value};

use super::fields::{json_type_name, validate_field};
use super::violation::{FieldPath, ValidationViolation};
use crate::pattern::PatternMatcher;
use crate::schema::Schema;

/// Walks a value against a schema.
pub struct Walker<'a> {
    matcher: &'a PatternMatcher,
}

impl<'a> Walker<'a> {
    pub fn new(matcher: &'a PatternMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &PatternMatcher {
        self.matcher
    }

    /// Validates `value` against `schema`, reporting paths under `prefix`.
    ///
    /// A non-object value yields a single type mismatch at `prefix`.
    pub fn walk(&self, schema: &Schema, value: &Value, prefix: &FieldPath) -> Vec<ValidationViolation> {
        let mut out = Vec::new();
        match value.as_object() {
            Some(object) => self.walk_object(schema, object, prefix, &mut out),
            None => out.push(ValidationViolation::type_mismatch(
                prefix.clone(),
                "object",
                json_type_name(value),
            )),
        }
        out
    }

    /// Visits each declared field of `object`. Undeclared keys are ignored.
    pub(crate) fn walk_object(
        &self,
        schema: &Schema,
        object: &Map<String, Value>,
        prefix: &FieldPath,
        out: &mut Vec<ValidationViolation>,
    ) {
        for (name, rule) in schema.fields() {
            validate_field(self, rule, object.get(name), prefix.field(name), out);
        }
    }
}
