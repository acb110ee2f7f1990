//! Argument validation and coercion against an [`ObjectSchema`]
//!
//! Models routinely send `"5"` for an integer or `"true"` for a boolean, so
//! scalar values are coerced where the intent is unambiguous. Everything else
//! is rejected with a message naming the offending field by its dotted path
//! (`edits[1].old_string`).

use super::schema::{FieldKind, ObjectSchema};
use serde_json::{Map, Number, Value};

impl ObjectSchema {
    /// Validate raw tool arguments, returning the coerced argument object.
    ///
    /// A `null` or absent argument object is treated as `{}`. Unknown
    /// top-level fields are rejected; nested objects keep extra keys as-is.
    pub fn validate(&self, value: &Value) -> Result<Map<String, Value>, String> {
        match value {
            Value::Null => validate_object(self, &Map::new(), "", true),
            Value::Object(map) => validate_object(self, map, "", true),
            other => Err(format!(
                "parameters must be an object, got {}",
                json_type(other)
            )),
        }
    }
}

fn validate_object(
    schema: &ObjectSchema,
    map: &Map<String, Value>,
    path: &str,
    reject_unknown: bool,
) -> Result<Map<String, Value>, String> {
    if reject_unknown {
        if let Some(unknown) = map.keys().find(|key| schema.get(key).is_none()) {
            return Err(format!("unknown parameter '{}'", join(path, unknown)));
        }
    }

    let mut out = if reject_unknown {
        Map::new()
    } else {
        map.clone()
    };

    for field in &schema.fields {
        let field_path = join(path, &field.name);
        match map.get(&field.name) {
            None | Some(Value::Null) if field.kind.is_optional() => {
                out.remove(&field.name);
            }
            None | Some(Value::Null) => {
                return Err(format!("missing required parameter '{}'", field_path));
            }
            Some(raw) => {
                let coerced = validate_value(field.kind.unwrap_optional(), raw, &field_path)?;
                out.insert(field.name.clone(), coerced);
            }
        }
    }

    Ok(out)
}

fn validate_value(kind: &FieldKind, value: &Value, path: &str) -> Result<Value, String> {
    match kind {
        FieldKind::String => match value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            other => Err(mismatch(path, "string", other)),
        },
        FieldKind::Number => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => parse_number(s.trim()).ok_or_else(|| mismatch(path, "number", value)),
            other => Err(mismatch(path, "number", other)),
        },
        FieldKind::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    Ok(Value::from(f as i64))
                }
                _ => Err(mismatch(path, "integer", value)),
            },
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| mismatch(path, "integer", value)),
            other => Err(mismatch(path, "integer", other)),
        },
        FieldKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            other => Err(mismatch(path, "boolean", other)),
        },
        FieldKind::Enum(allowed) => match value {
            Value::String(s) if allowed.iter().any(|a| a == s) => Ok(value.clone()),
            Value::String(s) => Err(format!(
                "parameter '{}' must be one of [{}], got '{}'",
                path,
                allowed.join(", "),
                s
            )),
            other => Err(mismatch(path, "string", other)),
        },
        FieldKind::Array(items) => match value {
            Value::Array(values) => values
                .iter()
                .enumerate()
                .map(|(i, v)| validate_value(items, v, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(mismatch(path, "array", other)),
        },
        FieldKind::Object(schema) => match value {
            Value::Object(map) => validate_object(schema, map, path, false).map(Value::Object),
            other => Err(mismatch(path, "object", other)),
        },
        FieldKind::Optional(inner) => match value {
            Value::Null => Ok(Value::Null),
            other => validate_value(inner, other, path),
        },
        FieldKind::Other(_) => Ok(value.clone()),
    }
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn mismatch(path: &str, expected: &str, got: &Value) -> String {
    format!(
        "parameter '{}' must be {}, got {}",
        path,
        expected,
        json_type(got)
    )
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
