//! Schema Declaration Tests
//!
//! - Misconfigured rules fail when the schema is built, never during validation
//! - Declaration files load from a directory in sorted order
//! - OpenAPI components convert into equivalent declarations
//! - Loaded and hand-built schemas validate identically

use std::fs;

use serde_json::json;
use tempfile::TempDir;
use unitcheck::pattern::Pattern;
use unitcheck::schema::{
    record_from_openapi, DeclaredKind, FieldDef, FieldKind, FieldRule, LengthBounds, RecordDef,
    Schema, SchemaError, SchemaLoader,
};
use unitcheck::validation::{Validator, ViolationCode};

// =============================================================================
// Helper Functions
// =============================================================================

const ORDER_RECORD: &str = r#"{
    "record": "Order",
    "description": "purchase order",
    "fields": [
        { "name": "code", "kind": "string", "pattern": "alphanumericPattern", "minLength": 4, "maxLength": 4 },
        { "name": "quantity", "kind": "number", "maxLength": 3 },
        { "name": "note", "kind": "string", "required": false },
        { "name": "lines", "kind": "array", "minLength": 1, "fields": [
            { "name": "sku", "kind": "string", "pattern": "alphanumericPattern" }
        ]},
        { "name": "placedAt", "kind": "instant" },
        { "name": "channel", "kind": "enum", "values": ["WEB", "STORE"] }
    ]
}"#;

fn setup_schema_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("order.json"), ORDER_RECORD).unwrap();
    fs::write(
        tmp.path().join("customer.json"),
        r#"{"record":"Customer","fields":[{"name":"name","kind":"string","pattern":"jisX0213withAlphaNumericSymbol","maxLength":20}]}"#,
    )
    .unwrap();
    fs::write(tmp.path().join("README.txt"), "not a declaration").unwrap();
    tmp
}

fn openapi_document() -> serde_json::Value {
    json!({
        "openapi": "3.0.1",
        "components": { "schemas": {
            "OrderDto": {
                "required": ["code", "lines"],
                "properties": {
                    "code": {
                        "type": "string", "minLength": 4, "maxLength": 4,
                        "x-unitCheckString": "alphanumericPattern"
                    },
                    "quantity": {
                        "type": "integer",
                        "x-unitCheckNumber": { "maxLength": 3, "isRequired": true }
                    },
                    "lines": {
                        "type": "array", "minItems": 1,
                        "items": { "$ref": "#/components/schemas/LineDto" },
                        "x-unitCheckArray": true
                    },
                    "channel": {
                        "allOf": [{ "$ref": "#/components/schemas/Channel" }],
                        "x-unitCheckEnum": true
                    },
                    "untracked": { "type": "string" }
                }
            },
            "LineDto": {
                "required": ["sku"],
                "properties": {
                    "sku": { "type": "string", "x-unitCheckString": "alphanumericPattern" }
                }
            },
            "Channel": { "type": "string", "enum": ["WEB", "STORE"] },
            "Node": {
                "properties": {
                    "next": { "$ref": "#/components/schemas/Node", "x-unitCheckObject": true }
                }
            }
        }}
    })
}

// =============================================================================
// Construction Failure Tests
// =============================================================================

#[test]
fn test_min_greater_than_max_rejected() {
    let err = Schema::builder()
        .field("code", FieldRule::string(Pattern::Unrestricted).min_length(5).max_length(2))
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidBounds { min: 5, max: 2, .. }));
    assert_eq!(err.code(), "UNITCHECK_SCHEMA_INVALID_BOUNDS");
}

#[test]
fn test_bounds_rejected_on_unbounded_kinds() {
    for rule in [
        FieldRule::timestamp().max_length(3),
        FieldRule::enumeration(["A"]).min_length(1),
        FieldRule::object(Schema::default()).max_length(1),
    ] {
        let err = Schema::builder().field("f", rule).build().unwrap_err();
        assert!(matches!(err, SchemaError::BoundsNotAllowed { .. }), "{:?}", err);
    }
}

#[test]
fn test_empty_enum_rejected() {
    let err = Schema::builder()
        .field("e", FieldRule::enumeration(Vec::<String>::new()))
        .build()
        .unwrap_err();
    assert_eq!(err, SchemaError::EmptyEnum { field: "e".into() });
}

#[test]
fn test_duplicate_field_rejected() {
    let err = Schema::builder()
        .field("a", FieldRule::number())
        .field("a", FieldRule::timestamp())
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateField { .. }));
}

#[test]
fn test_nested_declaration_error_names_full_path() {
    let mut inner = FieldDef::new("name", DeclaredKind::String);
    inner.pattern = Some("katakanaOnly".into());
    let mut outer = FieldDef::new("inner", DeclaredKind::Object);
    outer.fields = Some(vec![inner]);

    let err = RecordDef::new("Broken", vec![outer]).bind().unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownPattern {
            field: "inner.name".into(),
            pattern: "katakanaOnly".into()
        }
    );
}

#[test]
fn test_object_without_fields_rejected() {
    let err = RecordDef::new("Broken", vec![FieldDef::new("inner", DeclaredKind::Object)])
        .bind()
        .unwrap_err();
    assert!(matches!(err, SchemaError::MissingSubSchema { .. }));
}

#[test]
fn test_pattern_on_number_rejected() {
    let mut def = FieldDef::new("n", DeclaredKind::Number);
    def.pattern = Some("all".into());
    let err = RecordDef::new("Broken", vec![def]).bind().unwrap_err();
    assert!(matches!(err, SchemaError::UnexpectedAttribute { attribute: "pattern", .. }));
}

// =============================================================================
// Loader Tests
// =============================================================================

#[test]
fn test_loader_reads_directory() {
    let tmp = setup_schema_dir();
    let mut loader = SchemaLoader::new(tmp.path());
    loader.load_all().unwrap();

    assert_eq!(loader.schema_count(), 2);
    let names: Vec<&str> = loader.record_names().collect();
    assert_eq!(names, vec!["Customer", "Order"]);

    let order = loader.require("Order").unwrap();
    assert_eq!(order.len(), 6);
    assert_eq!(order.depth(), 2);
    assert!(!order.field("note").unwrap().is_required());
    assert_eq!(
        order.field("quantity").unwrap().bounds(),
        LengthBounds::new(None, Some(3))
    );
    assert!(matches!(order.field("placedAt").unwrap().kind(), FieldKind::Timestamp));
}

#[test]
fn test_loader_missing_directory_is_empty() {
    let tmp = TempDir::new().unwrap();
    let mut loader = SchemaLoader::new(&tmp.path().join("absent"));
    loader.load_all().unwrap();
    assert_eq!(loader.schema_count(), 0);
    assert!(matches!(loader.require("Order"), Err(SchemaError::UnknownRecord(_))));
}

#[test]
fn test_loader_rejects_duplicate_record() {
    let tmp = setup_schema_dir();
    fs::write(tmp.path().join("order_copy.json"), ORDER_RECORD).unwrap();

    let mut loader = SchemaLoader::new(tmp.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err, SchemaError::DuplicateRecord("Order".into()));
}

#[test]
fn test_loader_rejects_invalid_declaration_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("bad.json"),
        r#"{"record":"Bad","fields":[{"name":"n","kind":"number","minLength":4,"maxLength":1}]}"#,
    )
    .unwrap();

    let mut loader = SchemaLoader::new(tmp.path());
    assert!(matches!(loader.load_all(), Err(SchemaError::InvalidBounds { .. })));
}

#[test]
fn test_loaded_schema_validates() {
    let tmp = setup_schema_dir();
    let mut loader = SchemaLoader::new(tmp.path());
    loader.load_all().unwrap();
    let order = loader.require("Order").unwrap();

    let doc = json!({
        "code": "AB-1",
        "quantity": -1000,
        "lines": [],
        "placedAt": "2024-05-05T00:00:00Z",
        "channel": "WEB"
    });
    let result = Validator::default().validate(&order, &doc);

    let codes: Vec<(String, ViolationCode)> = result
        .violations()
        .iter()
        .map(|v| (v.field_path().to_string(), v.code()))
        .collect();
    assert_eq!(
        codes,
        vec![
            ("code".to_string(), ViolationCode::PatternMismatch),
            ("quantity".to_string(), ViolationCode::TooLong),
            ("lines".to_string(), ViolationCode::TooShort),
        ]
    );
}

// =============================================================================
// OpenAPI Import Tests
// =============================================================================

#[test]
fn test_openapi_component_converts() {
    let record = record_from_openapi(&openapi_document(), "OrderDto").unwrap();
    assert_eq!(record.record, "OrderDto");

    let names: Vec<&str> = record.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["code", "quantity", "lines", "channel"]);

    let quantity = &record.fields[1];
    assert!(quantity.required);
    assert_eq!(quantity.max_length, Some(3));

    let channel = &record.fields[3];
    assert!(!channel.required);
    assert_eq!(channel.values, Some(vec!["WEB".to_string(), "STORE".to_string()]));

    let schema = record.bind().unwrap();
    match schema.field("lines").unwrap().kind() {
        FieldKind::Array(element) => assert!(element.field("sku").unwrap().is_required()),
        other => panic!("expected array, got {}", other.name()),
    }
}

#[test]
fn test_openapi_cycle_rejected() {
    let err = record_from_openapi(&openapi_document(), "Node").unwrap_err();
    assert_eq!(err, SchemaError::CyclicReference("Node".into()));
}

#[test]
fn test_openapi_unknown_component() {
    let err = record_from_openapi(&openapi_document(), "Nope").unwrap_err();
    assert_eq!(err.code(), "UNITCHECK_SCHEMA_UNKNOWN_RECORD");
}

#[test]
fn test_imported_record_round_trips_through_loader() {
    let tmp = TempDir::new().unwrap();
    let record = record_from_openapi(&openapi_document(), "OrderDto").unwrap();

    let writer = SchemaLoader::new(tmp.path());
    let path = writer.save_record(&record).unwrap();
    assert!(path.ends_with("OrderDto.json"));
    assert!(matches!(writer.save_record(&record), Err(SchemaError::DuplicateRecord(_))));

    let mut loader = SchemaLoader::new(tmp.path());
    loader.load_all().unwrap();
    assert_eq!(*loader.require("OrderDto").unwrap(), record.bind().unwrap());
}
