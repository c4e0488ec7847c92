//! Scalar coercion table
//!
//! | target    | accepted sources                                                  |
//! |-----------|-------------------------------------------------------------------|
//! | `boolean` | null (`false`), number (`n != 0`)                                 |
//! | `string`  | null (`""`), boolean, number, binary (base64), date (RFC 3339)    |
//! | `integer` | number (rounded), numeric string, boolean, null (`0`), date (ms)  |
//! | `float`   | same as `integer`, without rounding                               |
//! | `date`    | ISO 8601 string, number (Unix epoch milliseconds)                 |
//! | `binary`  | base64 string                                                     |
//!
//! Anything else does not coerce. Dates convert to and from Unix epoch milliseconds.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use spartan_value::{Timestamp, Value};
use tracing::trace;

use crate::schema::ScalarType;

/// Convert `value` to `target`, or `None` if the table has no rule for it.
///
/// Values that already match `target` are returned unchanged.
pub fn coerce_scalar(target: ScalarType, value: &Value) -> Option<Value> {
    if target.matches(value) {
        return Some(value.clone());
    }
    let coerced = match target {
        ScalarType::Null => None,
        ScalarType::Boolean => to_boolean(value),
        ScalarType::Integer => to_number(value).map(|n| Value::Number(n.round())),
        ScalarType::Float => to_number(value).map(Value::Number),
        ScalarType::String => to_string(value),
        ScalarType::Date => to_timestamp(value).map(Value::Timestamp),
        ScalarType::Binary => match value {
            Value::String(s) => STANDARD.decode(s.trim()).ok().map(Value::Bytes),
            _ => None,
        },
    };
    if let Some(coerced) = &coerced {
        trace!(scalar = target.name(), from = %value.kind(), to = ?coerced, "coerced scalar");
    }
    coerced
}

fn to_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::Null => Some(Value::Bool(false)),
        Value::Number(n) if !n.is_nan() => Some(Value::Bool(*n != 0.0)),
        _ => None,
    }
}

fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => *n,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::Timestamp(t) => t.timestamp_millis() as f64,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn to_string(value: &Value) -> Option<Value> {
    let text = match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::Bytes(bytes) => STANDARD.encode(bytes),
        Value::Timestamp(t) => t.to_rfc3339_opts(SecondsFormat::Millis, true),
        _ => return None,
    };
    Some(Value::String(text))
}

/// Integral numbers print without a fractional part.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

fn to_timestamp(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => parse_timestamp(s.trim()),
        Value::Number(n) if n.is_finite() => DateTime::from_timestamp_millis(n.round() as i64),
        _ => None,
    }
}

/// Accepts RFC 3339, a bare date, or a date-time without offset (read as UTC).
fn parse_timestamp(text: &str) -> Option<Timestamp> {
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(t.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}
