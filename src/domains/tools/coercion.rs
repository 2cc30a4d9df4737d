//! Parameter validation and type coercion.
//!
//! [`validate`] checks raw arguments against a schema in two passes: first
//! every supplied key must be declared and coercible, then every required
//! parameter must be present. An unknown key therefore wins over a missing
//! one when both are wrong.

use serde_json::{Number, Value};

use super::args::{RawArgs, ToolArgs};
use super::error::ToolError;
use super::schema::{ParamType, Schema};

/// Strings accepted as boolean true (compared case-insensitively).
const TRUTHY: &[&str] = &["true", "1", "yes", "on"];

/// Validate `raw` against `schema` and coerce each supplied value.
///
/// Only supplied keys end up in the result; defaults are never injected.
pub fn validate(raw: &RawArgs, schema: &Schema) -> Result<ToolArgs, ToolError> {
    let mut typed = ToolArgs::new();

    for (name, value) in raw {
        let spec = schema
            .get(name)
            .ok_or_else(|| ToolError::unknown_parameter(name))?;
        typed.insert(name.clone(), coerce(name, value, spec.param_type)?);
    }

    for (name, spec) in schema.iter() {
        if spec.required && !typed.contains(name) {
            return Err(ToolError::missing_required(name));
        }
    }

    Ok(typed)
}

/// Coerce one value to `expected`.
pub fn coerce(name: &str, value: &Value, expected: ParamType) -> Result<Value, ToolError> {
    let mismatch = || ToolError::type_coercion(name, display_value(value), expected);

    match expected {
        ParamType::String => match value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(mismatch()),
        },
        ParamType::Int => match value {
            Value::String(s) => s.parse::<i64>().map(Value::from).map_err(|_| mismatch()),
            Value::Number(n) => integral(n).map(Value::from).ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        ParamType::Float => {
            let parsed = match value {
                Value::String(s) => s.parse::<f64>().ok(),
                Value::Number(n) => n.as_f64(),
                _ => None,
            };
            parsed
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(mismatch)
        }
        ParamType::Bool => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) => Ok(Value::Bool(is_truthy(s))),
            Value::Number(n) => Ok(Value::Bool(is_truthy(&n.to_string()))),
            _ => Err(mismatch()),
        },
    }
}

/// Membership test for the boolean true set. Anything else is false.
pub fn is_truthy(raw: &str) -> bool {
    TRUTHY.iter().any(|t| raw.eq_ignore_ascii_case(t))
}

fn integral(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f as i64)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
