//! Static field declarations and the binder that turns them into schemas
//!
//! Declarations are the flat, serializable form of a rule:
//!
//! ```json
//! {
//!   "record": "V1InDto",
//!   "fields": [
//!     { "name": "name", "kind": "string", "pattern": "jisX0213withAlphaNumericSymbol" },
//!     { "name": "minMaxValue", "kind": "number", "minLength": 5, "maxLength": 10 },
//!     { "name": "inner", "kind": "object", "fields": [ ... ] },
//!     { "name": "list", "kind": "array", "minLength": 2, "fields": [ ... ] },
//!     { "name": "exampleEnum", "kind": "enum", "values": ["A", "B"] }
//!   ]
//! }
//! ```
//!
//! Binding checks everything a declaration can get wrong: attributes that
//! do not belong to the kind, unknown patterns, missing nested fields and
//! the bound invariants enforced by [`SchemaBuilder`].

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::types::{join_path, FieldRule, LengthBounds, Schema, SchemaBuilder};
use crate::pattern::Pattern;

/// Declared field kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredKind {
    String,
    Number,
    Object,
    Array,
    #[serde(alias = "instant")]
    Timestamp,
    Enum,
}

impl DeclaredKind {
    pub fn name(&self) -> &'static str {
        match self {
            DeclaredKind::String => "string",
            DeclaredKind::Number => "number",
            DeclaredKind::Object => "object",
            DeclaredKind::Array => "array",
            DeclaredKind::Timestamp => "timestamp",
            DeclaredKind::Enum => "enum",
        }
    }
}

fn default_required() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// One field declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub name: String,
    pub kind: DeclaredKind,
    #[serde(default = "default_required", alias = "isRequired", skip_serializing_if = "is_true")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Nested fields of an object, or of each array element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDef>>,
    /// Enum values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl FieldDef {
    /// Required field of the given kind with no other attributes
    pub fn new(name: impl Into<String>, kind: DeclaredKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            pattern: None,
            min_length: None,
            max_length: None,
            fields: None,
            values: None,
        }
    }

    /// Binds this declaration into a rule. `path` is used in errors.
    fn bind(&self, path: &str) -> SchemaResult<FieldRule> {
        let kind = self.kind.name();
        let unexpected = |attribute: &'static str| SchemaError::UnexpectedAttribute {
            field: path.to_string(),
            attribute,
            kind,
        };

        if self.pattern.is_some() && self.kind != DeclaredKind::String {
            return Err(unexpected("pattern"));
        }
        if self.values.is_some() && self.kind != DeclaredKind::Enum {
            return Err(unexpected("values"));
        }
        if self.fields.is_some()
            && !matches!(self.kind, DeclaredKind::Object | DeclaredKind::Array)
        {
            return Err(unexpected("fields"));
        }

        let rule = match self.kind {
            DeclaredKind::String => {
                let pattern = match self.pattern.as_deref() {
                    None => Pattern::Unrestricted,
                    Some(name) => {
                        Pattern::from_name(name).ok_or_else(|| SchemaError::UnknownPattern {
                            field: path.to_string(),
                            pattern: name.to_string(),
                        })?
                    }
                };
                FieldRule::string(pattern)
            }
            DeclaredKind::Number => FieldRule::number(),
            DeclaredKind::Object => FieldRule::object(self.bind_children(path)?),
            DeclaredKind::Array => FieldRule::array(self.bind_children(path)?),
            DeclaredKind::Timestamp => FieldRule::timestamp(),
            DeclaredKind::Enum => {
                FieldRule::enumeration(self.values.clone().unwrap_or_default())
            }
        };

        Ok(rule
            .with_required(self.required)
            .with_bounds(LengthBounds::new(self.min_length, self.max_length)))
    }

    fn bind_children(&self, path: &str) -> SchemaResult<Schema> {
        let children = self.fields.as_ref().ok_or(SchemaError::MissingSubSchema {
            field: path.to_string(),
            kind: self.kind.name(),
        })?;
        bind_fields(children, path)
    }
}

/// Binds a list of declarations into a schema.
///
/// `parent` is the dotted path of the enclosing field, empty at the root.
pub fn bind_fields(defs: &[FieldDef], parent: &str) -> SchemaResult<Schema> {
    let mut builder = SchemaBuilder::under(parent);
    for def in defs {
        let rule = def.bind(&join_path(parent, &def.name))?;
        builder = builder.field(def.name.clone(), rule);
    }
    builder.build()
}

/// A named record declaration, one per schema file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDef {
    pub record: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldDef>,
}

impl RecordDef {
    pub fn new(record: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            record: record.into(),
            description: None,
            fields,
        }
    }

    /// Binds the record into an immutable schema
    pub fn bind(&self) -> SchemaResult<Schema> {
        if self.record.trim().is_empty() {
            return Err(SchemaError::malformed("<record>", "record name is empty"));
        }
        bind_fields(&self.fields, "")
    }
}
