//! Structural validation of values against Schema Documents.
//!
//! Validation semantics:
//! - Checks are pure and deterministic; the value is never mutated.
//! - Composite documents recurse into children with path tracking
//!   (`address.tags[2]`).
//! - `anyOf` passes when any operand passes; when none does, the
//!   operand failures are aggregated into one union failure.
//! - Positional `items` (tuple mode) require the exact declared length.
//! - `default` is a construction-time concern and is not checked here.

use regex::Regex;
use serde_json::Value;

use super::document::{AdditionalProperties, Items, SchemaDocument, TypeName};
use super::errors::{field_path, item_path, ValidationFailure};
use super::formats::check_format;

/// Returns the JSON kind name of a value for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validates a value against a schema document at the root path.
pub fn validate(value: &Value, schema: &SchemaDocument) -> Result<(), ValidationFailure> {
    validate_at(value, schema, "")
}

/// Validates a value against a schema document at the given path.
pub fn validate_at(
    value: &Value,
    schema: &SchemaDocument,
    path: &str,
) -> Result<(), ValidationFailure> {
    // Native predicate first: it classifies opaque values the keyword
    // vocabulary cannot.
    if let Some(check) = &schema.instance {
        if !check.accepts(value) {
            return Err(ValidationFailure::type_mismatch(
                path,
                format!("instance of {}", check.name()),
                kind_of(value),
            ));
        }
    }

    if let Some(operands) = &schema.any_of {
        let mut causes = Vec::new();
        let mut matched = false;
        for operand in operands {
            match validate_at(value, operand, path) {
                Ok(()) => {
                    matched = true;
                    break;
                }
                Err(failure) => causes.push(failure),
            }
        }
        if !matched {
            return Err(ValidationFailure::no_alternative(
                path,
                kind_of(value),
                causes,
            ));
        }
    }

    if let Some(ty) = schema.ty {
        check_type(value, ty, path)?;
    }

    match value {
        Value::Object(fields) => validate_object(fields, schema, path),
        Value::Array(items) => validate_array(items, schema, path),
        Value::String(s) => validate_string(s, schema, path),
        Value::Number(_) => validate_number(value, schema, path),
        _ => Ok(()),
    }
}

fn check_type(value: &Value, expected: TypeName, path: &str) -> Result<(), ValidationFailure> {
    let ok = match expected {
        TypeName::Object => value.is_object(),
        TypeName::Array => value.is_array(),
        TypeName::String => value.is_string(),
        // An integer must be an integer; a number accepts integers too.
        TypeName::Integer => value.is_i64() || value.is_u64(),
        TypeName::Number => value.is_number(),
        TypeName::Boolean => value.is_boolean(),
        TypeName::Null => value.is_null(),
    };
    if ok {
        Ok(())
    } else {
        Err(ValidationFailure::type_mismatch(
            path,
            expected.as_str(),
            kind_of(value),
        ))
    }
}

fn validate_object(
    fields: &serde_json::Map<String, Value>,
    schema: &SchemaDocument,
    path: &str,
) -> Result<(), ValidationFailure> {
    if let Some(required) = &schema.required {
        for name in required {
            if !fields.contains_key(name) {
                return Err(ValidationFailure::missing_field(field_path(path, name)));
            }
        }
    }

    let empty = std::collections::BTreeMap::new();
    let properties = schema.properties.as_ref().unwrap_or(&empty);

    for (name, value) in fields {
        let child_path = field_path(path, name);
        match properties.get(name) {
            Some(child_schema) => validate_at(value, child_schema, &child_path)?,
            None => match &schema.additional_properties {
                // Absent or `true`: unknown fields accepted as-is
                None | Some(AdditionalProperties::Allowed(true)) => {}
                Some(AdditionalProperties::Allowed(false)) => {
                    return Err(ValidationFailure::extra_field(child_path));
                }
                Some(AdditionalProperties::Schema(extra_schema)) => {
                    validate_at(value, extra_schema, &child_path)?;
                }
            },
        }
    }

    Ok(())
}

fn validate_array(
    items: &[Value],
    schema: &SchemaDocument,
    path: &str,
) -> Result<(), ValidationFailure> {
    if let Some(min) = schema.min_items {
        if items.len() < min {
            return Err(ValidationFailure::item_count(
                path,
                format!("at least {} items", min),
                items.len(),
            ));
        }
    }
    if let Some(max) = schema.max_items {
        if items.len() > max {
            return Err(ValidationFailure::item_count(
                path,
                format!("at most {} items", max),
                items.len(),
            ));
        }
    }

    match &schema.items {
        None => Ok(()),
        Some(Items::Single(item_schema)) => {
            for (i, item) in items.iter().enumerate() {
                validate_at(item, item_schema, &item_path(path, i))?;
            }
            Ok(())
        }
        Some(Items::Positional(slots)) => {
            if items.len() != slots.len() {
                return Err(ValidationFailure::item_count(
                    path,
                    format!("exactly {} items", slots.len()),
                    items.len(),
                ));
            }
            for (i, (item, slot)) in items.iter().zip(slots).enumerate() {
                validate_at(item, slot, &item_path(path, i))?;
            }
            Ok(())
        }
    }
}

fn validate_string(s: &str, schema: &SchemaDocument, path: &str) -> Result<(), ValidationFailure> {
    if let Some(min) = schema.min_length {
        let len = s.chars().count();
        if len < min {
            return Err(ValidationFailure::length(
                path,
                format!("at least {} characters", min),
                len,
            ));
        }
    }
    if let Some(max) = schema.max_length {
        let len = s.chars().count();
        if len > max {
            return Err(ValidationFailure::length(
                path,
                format!("at most {} characters", max),
                len,
            ));
        }
    }
    if let Some(pattern) = &schema.pattern {
        // Constraint construction rejects bad patterns up front; a
        // hand-built document can still carry one, so fail closed.
        match Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(s) {
                    return Err(ValidationFailure::pattern_mismatch(path, pattern, s));
                }
            }
            Err(_) => {
                return Err(ValidationFailure::new(
                    path,
                    format!("a compilable pattern '{}'", pattern),
                    "uncompilable pattern",
                ));
            }
        }
    }
    if let Some(format) = &schema.format {
        if !check_format(format, s) {
            return Err(ValidationFailure::format_mismatch(path, format, s));
        }
    }
    Ok(())
}

fn validate_number(
    value: &Value,
    schema: &SchemaDocument,
    path: &str,
) -> Result<(), ValidationFailure> {
    let n = match value.as_f64() {
        Some(n) => n,
        None => return Ok(()),
    };
    if let Some(min) = schema.minimum {
        if n < min {
            return Err(ValidationFailure::out_of_bounds(
                path,
                format!("minimum {}", min),
                n,
            ));
        }
    }
    if let Some(max) = schema.maximum {
        if n > max {
            return Err(ValidationFailure::out_of_bounds(
                path,
                format!("maximum {}", max),
                n,
            ));
        }
    }
    Ok(())
}
