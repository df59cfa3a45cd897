//! Record declarations from OpenAPI component schemas
//!
//! API definitions mark validated properties with vendor extensions:
//! - `x-unitCheckString`: pattern name (`"all"` when unrestricted) or an
//!   object `{ "value": ..., "isRequired": ... }`; bounds come from
//!   `minLength` / `maxLength`
//! - `x-unitCheckNumber`: `true` or `{ "minLength": .., "maxLength": .. }`;
//!   `minimum` / `maximum` are read as digit counts when the object form
//!   gives no bounds
//! - `x-unitCheckObject`: nested `$ref` or inline `properties`
//! - `x-unitCheckArray`: `minItems` / `maxItems`, element from `items`
//! - `x-unitCheckInstant`: timestamp
//! - `x-unitCheckEnum`: values from `enum`, on the property or its `$ref`
//!
//! Properties without an extension are not validated and are skipped.
//! Requiredness is the `isRequired` attribute when given, otherwise
//! membership in the component's `required` list. Property order is
//! preserved. `$ref` cycles are rejected.

use serde_json::Value;

use super::declaration::{DeclaredKind, FieldDef, RecordDef};
use super::errors::{SchemaError, SchemaResult};

const COMPONENT_PREFIX: &str = "#/components/schemas/";

/// Builds a record declaration from `components.schemas.<component>`.
pub fn record_from_openapi(document: &Value, component: &str) -> SchemaResult<RecordDef> {
    let mut importer = Importer {
        document,
        stack: vec![component.to_string()],
    };
    let schema = importer.component(component)?;
    let fields = importer.properties(schema, component)?;
    let mut record = RecordDef::new(component, fields);
    record.description = schema
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(record)
}

struct Importer<'a> {
    document: &'a Value,
    /// Components currently being expanded
    stack: Vec<String>,
}

impl<'a> Importer<'a> {
    fn component(&self, name: &str) -> SchemaResult<&'a Value> {
        self.document
            .pointer(&format!("/components/schemas/{}", name))
            .ok_or_else(|| SchemaError::UnknownRecord(name.to_string()))
    }

    fn resolve(&self, schema: &'a Value) -> SchemaResult<(Option<String>, &'a Value)> {
        let reference = schema.get("$ref").or_else(|| {
            schema
                .get("allOf")
                .and_then(Value::as_array)
                .and_then(|all| all.first())
                .and_then(|first| first.get("$ref"))
        });

        match reference.and_then(Value::as_str) {
            None => Ok((None, schema)),
            Some(r) => {
                let name = r.strip_prefix(COMPONENT_PREFIX).ok_or_else(|| {
                    SchemaError::malformed(r, "only local component references are supported")
                })?;
                Ok((Some(name.to_string()), self.component(name)?))
            }
        }
    }

    fn properties(&mut self, schema: &'a Value, owner: &str) -> SchemaResult<Vec<FieldDef>> {
        let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
            return Ok(Vec::new());
        };
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut fields = Vec::new();
        for (name, property) in properties {
            if let Some(mut def) = self.property(name, property, owner)? {
                def.required = explicit_required(property).unwrap_or(required.contains(&name.as_str()));
                fields.push(def);
            }
        }
        Ok(fields)
    }

    fn property(&mut self, name: &str, property: &'a Value, owner: &str) -> SchemaResult<Option<FieldDef>> {
        if let Some(ext) = property.get("x-unitCheckString") {
            let mut def = FieldDef::new(name, DeclaredKind::String);
            def.pattern = string_pattern(ext, name, owner)?.filter(|p| p != "all");
            def.min_length = usize_field(property, "minLength", owner)?;
            def.max_length = usize_field(property, "maxLength", owner)?;
            return Ok(Some(def));
        }

        if let Some(ext) = property.get("x-unitCheckNumber") {
            let mut def = FieldDef::new(name, DeclaredKind::Number);
            def.min_length = usize_field(ext, "minLength", owner)?;
            def.max_length = usize_field(ext, "maxLength", owner)?;
            if def.min_length.is_none() && def.max_length.is_none() {
                def.min_length = usize_field(property, "minimum", owner)?;
                def.max_length = usize_field(property, "maximum", owner)?;
            }
            return Ok(Some(def));
        }

        if property.get("x-unitCheckObject").is_some() {
            let mut def = FieldDef::new(name, DeclaredKind::Object);
            def.fields = Some(self.nested(property, owner)?);
            return Ok(Some(def));
        }

        if property.get("x-unitCheckArray").is_some() {
            let mut def = FieldDef::new(name, DeclaredKind::Array);
            def.min_length = usize_field(property, "minItems", owner)?;
            def.max_length = usize_field(property, "maxItems", owner)?;
            let items = property.get("items").ok_or_else(|| {
                SchemaError::malformed(owner, format!("array property '{}' has no items", name))
            })?;
            // Elements are validated as records; scalar items cannot be expressed.
            let (_, element) = self.resolve(items)?;
            if element.get("properties").and_then(Value::as_object).is_none() {
                return Err(SchemaError::MissingSubSchema {
                    field: name.to_string(),
                    kind: "array",
                });
            }
            def.fields = Some(self.nested(items, owner)?);
            return Ok(Some(def));
        }

        if property.get("x-unitCheckInstant").is_some() {
            return Ok(Some(FieldDef::new(name, DeclaredKind::Timestamp)));
        }

        if property.get("x-unitCheckEnum").is_some() {
            let mut def = FieldDef::new(name, DeclaredKind::Enum);
            let (_, target) = self.resolve(property)?;
            let values = target
                .get("enum")
                .or_else(|| property.get("enum"))
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    SchemaError::malformed(owner, format!("enum property '{}' declares no values", name))
                })?;
            def.values = Some(
                values
                    .iter()
                    .map(|value| enum_value(value, name, owner))
                    .collect::<SchemaResult<_>>()?,
            );
            return Ok(Some(def));
        }

        Ok(None)
    }

    /// Expands an object schema, following at most one `$ref` hop per level.
    fn nested(&mut self, schema: &'a Value, owner: &str) -> SchemaResult<Vec<FieldDef>> {
        let (reference, target) = self.resolve(schema)?;
        match reference {
            None => self.properties(target, owner),
            Some(name) => {
                if self.stack.contains(&name) {
                    return Err(SchemaError::CyclicReference(name));
                }
                self.stack.push(name.clone());
                let fields = self.properties(target, &name);
                self.stack.pop();
                fields
            }
        }
    }
}

fn explicit_required(property: &Value) -> Option<bool> {
    [
        "x-unitCheckString",
        "x-unitCheckNumber",
        "x-unitCheckObject",
        "x-unitCheckArray",
        "x-unitCheckInstant",
        "x-unitCheckEnum",
    ]
    .iter()
    .filter_map(|ext| property.get(*ext))
    .find_map(|ext| ext.get("isRequired").and_then(Value::as_bool))
}

fn usize_field(schema: &Value, key: &str, owner: &str) -> SchemaResult<Option<usize>> {
    match schema.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                SchemaError::malformed(owner, format!("'{}' must be a non-negative integer", key))
            }),
    }
}

/// Pattern name of a string extension: the bare string form, or `value`
/// (`pattern` accepted too) in the object form.
fn string_pattern(ext: &Value, name: &str, owner: &str) -> SchemaResult<Option<String>> {
    let declared = match ext {
        Value::Object(o) => o.get("value").or_else(|| o.get("pattern")),
        other => Some(other),
    };
    match declared {
        None | Some(Value::Null) | Some(Value::Bool(true)) => Ok(None),
        Some(Value::String(p)) => Ok(Some(p.clone())),
        Some(_) => Err(SchemaError::malformed(
            owner,
            format!("string property '{}' has a non-string pattern", name),
        )),
    }
}

/// Enum members are matched against JSON strings only.
fn enum_value(value: &Value, name: &str, owner: &str) -> SchemaResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(SchemaError::malformed(
            owner,
            format!("enum property '{}' has non-string value {}", name, other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use crate::schema::FieldKind;
    use crate::validation::{Validator, ViolationCode};
    use serde_json::json;

    fn document() -> Value {
        json!({
            "openapi": "3.0.0",
            "components": { "schemas": {
                "V1InDto": {
                    "description": "example input",
                    "required": ["name", "minMaxValue", "inDtoInnerObject", "inDtoArrayObjectList", "instantValue", "exampleEnum"],
                    "properties": {
                        "name": { "type": "string", "x-unitCheckString": "jisX0213withAlphaNumericSymbol" },
                        "nullableValue": { "type": "string", "x-unitCheckString": "all" },
                        "maxLengthValue": { "type": "string", "maxLength": 20, "x-unitCheckString": { "value": "all", "isRequired": true } },
                        "minMaxValue": { "type": "integer", "minimum": 5, "maximum": 10, "x-unitCheckNumber": true },
                        "inDtoInnerObject": { "$ref": "#/components/schemas/Inner", "x-unitCheckObject": true },
                        "inDtoArrayObjectList": {
                            "type": "array", "minItems": 2, "maxItems": 10,
                            "items": { "$ref": "#/components/schemas/Item" },
                            "x-unitCheckArray": true
                        },
                        "instantValue": { "type": "string", "format": "date-time", "x-unitCheckInstant": true },
                        "exampleEnum": { "$ref": "#/components/schemas/ExampleEnum", "x-unitCheckEnum": true },
                        "untouched": { "type": "string" }
                    }
                },
                "Inner": {
                    "required": ["innerName"],
                    "properties": {
                        "innerName": { "type": "string", "x-unitCheckString": "all" },
                        "innerLong": { "type": "integer", "x-unitCheckNumber": { "isRequired": true } }
                    }
                },
                "Item": {
                    "required": ["arrayName"],
                    "properties": { "arrayName": { "type": "string", "x-unitCheckString": "alphanumericPattern" } }
                },
                "ExampleEnum": { "type": "string", "enum": ["A001", "B002"] },
                "Loop": {
                    "properties": { "self": { "$ref": "#/components/schemas/Loop", "x-unitCheckObject": true } }
                }
            }}
        })
    }

    #[test]
    fn test_import_example_component() {
        let record = record_from_openapi(&document(), "V1InDto").unwrap();
        assert_eq!(record.description.as_deref(), Some("example input"));

        let names: Vec<_> = record.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "name",
                "nullableValue",
                "maxLengthValue",
                "minMaxValue",
                "inDtoInnerObject",
                "inDtoArrayObjectList",
                "instantValue",
                "exampleEnum"
            ]
        );

        let schema = record.bind().unwrap();
        assert!(!schema.field("nullableValue").unwrap().is_required());
        assert!(schema.field("maxLengthValue").unwrap().is_required());
        assert_eq!(
            schema.field("name").unwrap().kind(),
            &FieldKind::String(Pattern::ExtendedScriptWithAlphanumericAndSymbols)
        );

        let digits = schema.field("minMaxValue").unwrap().bounds();
        assert_eq!((digits.min, digits.max), (Some(5), Some(10)));

        let list = schema.field("inDtoArrayObjectList").unwrap();
        assert_eq!((list.bounds().min, list.bounds().max), (Some(2), Some(10)));

        assert_eq!(
            schema.field("exampleEnum").unwrap().kind(),
            &FieldKind::Enum(vec!["A001".into(), "B002".into()])
        );
    }

    #[test]
    fn test_nested_required_from_extension() {
        let record = record_from_openapi(&document(), "Inner").unwrap();
        let inner_long = record.fields.iter().find(|f| f.name == "innerLong").unwrap();
        assert!(inner_long.required);
    }

    #[test]
    fn test_cycle_rejected() {
        let err = record_from_openapi(&document(), "Loop").unwrap_err();
        assert_eq!(err, SchemaError::CyclicReference("Loop".into()));
    }

    #[test]
    fn test_unknown_component() {
        let err = record_from_openapi(&document(), "Missing").unwrap_err();
        assert_eq!(err.code(), "UNITCHECK_SCHEMA_UNKNOWN_RECORD");
    }

    #[test]
    fn test_string_object_form_reads_value() {
        let doc = json!({ "components": { "schemas": { "A": {
            "required": ["code", "legacy"],
            "properties": {
                "code": { "type": "string", "x-unitCheckString": { "value": "alphanumericPattern" } },
                "legacy": { "type": "string", "x-unitCheckString": { "pattern": "jisX0213withAlphaNumericSymbol" } }
            }
        }}}});
        let schema = record_from_openapi(&doc, "A").unwrap().bind().unwrap();
        assert_eq!(
            schema.field("code").unwrap().kind(),
            &FieldKind::String(Pattern::AlphanumericOnly)
        );
        assert_eq!(
            schema.field("legacy").unwrap().kind(),
            &FieldKind::String(Pattern::ExtendedScriptWithAlphanumericAndSymbols)
        );

        let result = Validator::default().validate(&schema, &json!({ "code": "ab!", "legacy": "x" }));
        assert_eq!(result.len(), 1);
        assert_eq!(result.violations()[0].code(), ViolationCode::PatternMismatch);
    }

    #[test]
    fn test_string_non_string_pattern_rejected() {
        let doc = json!({ "components": { "schemas": { "A": { "properties": {
            "code": { "type": "string", "x-unitCheckString": { "value": 3 } }
        }}}}});
        let err = record_from_openapi(&doc, "A").unwrap_err();
        assert_eq!(err.code(), "UNITCHECK_SCHEMA_MALFORMED");
    }

    #[test]
    fn test_scalar_array_items_rejected() {
        let doc = json!({ "components": { "schemas": { "A": { "properties": {
            "tags": { "type": "array", "items": { "type": "string" }, "x-unitCheckArray": true }
        }}}}});
        let err = record_from_openapi(&doc, "A").unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingSubSchema {
                field: "tags".into(),
                kind: "array"
            }
        );
    }

    #[test]
    fn test_non_string_enum_rejected() {
        let doc = json!({ "components": { "schemas": { "A": { "properties": {
            "level": { "type": "integer", "enum": [1, 2], "x-unitCheckEnum": true }
        }}}}});
        let err = record_from_openapi(&doc, "A").unwrap_err();
        assert_eq!(err.code(), "UNITCHECK_SCHEMA_MALFORMED");
    }

    #[test]
    fn test_remote_reference_rejected() {
        let doc = json!({ "components": { "schemas": { "A": { "properties": {
            "b": { "$ref": "https://example.com/B.json", "x-unitCheckObject": true }
        }}}}});
        let err = record_from_openapi(&doc, "A").unwrap_err();
        assert_eq!(err.code(), "UNITCHECK_SCHEMA_MALFORMED");
    }
}
