//! Field validators, one per field kind
//!
//! Absence (missing key or JSON null) is decided before dispatch: a
//! required field yields exactly one `Required` and nothing else, an
//! optional one yields nothing. Present values run every applicable check
//! for their kind; checks on one field are not short-circuited.

use chrono::DateTime;
use serde_json::{Number, Value};

use super::violation::{FieldPath, ValidationViolation};
use super::walker::Walker;
use crate::pattern::Pattern;
use crate::schema::{FieldKind, FieldRule, LengthBounds, Schema};

/// Validates one field value against its rule, appending to `out`.
pub(crate) fn validate_field(
    walker: &Walker<'_>,
    rule: &FieldRule,
    value: Option<&Value>,
    path: FieldPath,
    out: &mut Vec<ValidationViolation>,
) {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        if rule.is_required() {
            out.push(ValidationViolation::required(path));
        }
        return;
    };

    match rule.kind() {
        FieldKind::String(pattern) => validate_string(walker, *pattern, rule.bounds(), value, path, out),
        FieldKind::Number => validate_number(rule.bounds(), value, path, out),
        FieldKind::Object(schema) => validate_object(walker, schema, value, path, out),
        FieldKind::Array(element) => validate_array(walker, element, rule.bounds(), value, path, out),
        FieldKind::Timestamp => validate_timestamp(value, path, out),
        FieldKind::Enum(values) => validate_enum(values, value, path, out),
    }
}

fn validate_string(
    walker: &Walker<'_>,
    pattern: Pattern,
    bounds: LengthBounds,
    value: &Value,
    path: FieldPath,
    out: &mut Vec<ValidationViolation>,
) {
    let Some(s) = value.as_str() else {
        out.push(ValidationViolation::type_mismatch(path, "string", json_type_name(value)));
        return;
    };

    check_bounds(bounds, s.chars().count(), "characters", &path, out);

    if !walker.matcher().matches(pattern, s) {
        out.push(ValidationViolation::pattern_mismatch(path, pattern));
    }
}

fn validate_number(bounds: LengthBounds, value: &Value, path: FieldPath, out: &mut Vec<ValidationViolation>) {
    let Value::Number(n) = value else {
        out.push(ValidationViolation::type_mismatch(path, "number", json_type_name(value)));
        return;
    };
    check_bounds(bounds, digit_length(n), "digits", &path, out);
}

fn validate_object(
    walker: &Walker<'_>,
    schema: &Schema,
    value: &Value,
    path: FieldPath,
    out: &mut Vec<ValidationViolation>,
) {
    match value.as_object() {
        Some(object) => walker.walk_object(schema, object, &path, out),
        None => out.push(ValidationViolation::type_mismatch(path, "object", json_type_name(value))),
    }
}

fn validate_array(
    walker: &Walker<'_>,
    element: &Schema,
    bounds: LengthBounds,
    value: &Value,
    path: FieldPath,
    out: &mut Vec<ValidationViolation>,
) {
    let Some(items) = value.as_array() else {
        out.push(ValidationViolation::type_mismatch(path, "array", json_type_name(value)));
        return;
    };

    check_bounds(bounds, items.len(), "elements", &path, out);

    for (i, item) in items.iter().enumerate() {
        let item_path = path.index(i);
        match item {
            Value::Null => out.push(ValidationViolation::required(item_path)),
            Value::Object(object) => walker.walk_object(element, object, &item_path, out),
            other => out.push(ValidationViolation::type_mismatch(
                item_path,
                "object",
                json_type_name(other),
            )),
        }
    }
}

/// Instants arrive as RFC 3339 strings; anything else was not decodable.
fn validate_timestamp(value: &Value, path: FieldPath, out: &mut Vec<ValidationViolation>) {
    let decoded = value
        .as_str()
        .map_or(false, |s| DateTime::parse_from_rfc3339(s).is_ok());
    if !decoded {
        out.push(ValidationViolation::type_mismatch(
            path,
            "RFC 3339 timestamp",
            json_type_name(value),
        ));
    }
}

fn validate_enum(values: &[String], value: &Value, path: FieldPath, out: &mut Vec<ValidationViolation>) {
    let member = value.as_str().map_or(false, |s| values.iter().any(|v| v == s));
    if !member {
        out.push(ValidationViolation::type_mismatch(
            path,
            &format!("one of [{}]", values.join(", ")),
            &describe(value),
        ));
    }
}

fn check_bounds(
    bounds: LengthBounds,
    actual: usize,
    unit: &str,
    path: &FieldPath,
    out: &mut Vec<ValidationViolation>,
) {
    if let Some(min) = bounds.min {
        if actual < min {
            out.push(ValidationViolation::too_short(path.clone(), actual, min, unit));
        }
    }
    if let Some(max) = bounds.max {
        if actual > max {
            out.push(ValidationViolation::too_long(path.clone(), actual, max, unit));
        }
    }
}

/// Counts decimal digits of the absolute value; sign and decimal point
/// are not digits. Zero has one digit.
pub(crate) fn digit_length(n: &Number) -> usize {
    if let Some(u) = n.as_u64() {
        count_digits(u)
    } else if let Some(i) = n.as_i64() {
        count_digits(i.unsigned_abs())
    } else {
        // f64 Display never switches to exponent notation
        n.as_f64()
            .map(|f| format!("{}", f.abs()).bytes().filter(u8::is_ascii_digit).count())
            .unwrap_or(0)
    }
}

fn count_digits(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => json_type_name(other).to_string(),
    }
}
