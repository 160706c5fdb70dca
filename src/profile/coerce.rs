//! Permissive coercion of loosely typed JSON values

use crate::InputError;
use serde_json::Value;

/// Read a numeric field. Missing, null, empty and falsy values are 0.
pub fn number(field: &'static str, value: Option<&Value>) -> Result<f64, InputError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(0.0),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| not_numeric(field, value))?,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| not_numeric(field, value))?
        }
        Some(Value::Array(a)) if a.is_empty() => return Ok(0.0),
        Some(Value::Object(o)) if o.is_empty() => return Ok(0.0),
        Some(_) => return Err(not_numeric(field, value)),
    };

    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(InputError::NotFinite { field })
    }
}

/// Read an optional numeric value: null and unreadable values are absent.
pub fn optional_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Read a text field, trimmed and lower-cased. A missing key uses `default`;
/// an explicit null is empty.
pub fn text(value: Option<&Value>, default: &str) -> String {
    match value {
        None => normalize(default),
        Some(Value::Null) => String::new(),
        Some(v) => normalize(&raw_text(v)),
    }
}

/// Read a sequence of text tags; a scalar becomes a one-element sequence.
pub fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => normalize(&raw_text(other)),
            })
            .collect(),
        Some(other) => vec![normalize(&raw_text(other))],
    }
}

/// Trim and lower-case
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn not_numeric(field: &'static str, value: Option<&Value>) -> InputError {
    InputError::NotNumeric {
        field,
        value: value.map(|v| v.to_string()).unwrap_or_default(),
    }
}
