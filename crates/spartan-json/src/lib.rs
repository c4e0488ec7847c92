#![doc = include_str!("../README.md")]

mod config;
mod error;

pub use config::{Config, TimestampFormat};
pub use error::ValueToJsonError;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::SecondsFormat;
use serde_json::Value as JsonValue;
use spartan_value::{Map, Value};

/// Convert a JSON value into a Spartan value.
///
/// Every JSON number becomes a `Value::Number`; integers outside the `f64`
/// mantissa lose precision the same way they would in JavaScript.
pub fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::Sequence(items.iter().map(json_to_value).collect()),
        JsonValue::Object(object) => Value::Mapping(
            object
                .iter()
                .map(|(k, v)| (k.clone(), json_to_value(v)))
                .collect::<Map>(),
        ),
    }
}

/// Convert a Spartan value into JSON.
///
/// Byte sequences become standard base64 text and timestamps are written
/// according to [`Config::timestamp_format`].
pub fn value_to_json(value: &Value, config: &Config) -> Result<JsonValue, ValueToJsonError> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => Ok(JsonValue::String(s.clone())),
        Value::Bytes(bytes) => Ok(JsonValue::String(STANDARD.encode(bytes))),
        Value::Timestamp(t) => match config.timestamp_format {
            TimestampFormat::Rfc3339 => Ok(JsonValue::String(
                t.to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            TimestampFormat::EpochMillis => Ok(JsonValue::from(t.timestamp_millis())),
        },
        Value::Sequence(items) => {
            let mut result = Vec::with_capacity(items.len());
            for item in items {
                result.push(value_to_json(item, config)?);
            }
            Ok(JsonValue::Array(result))
        }
        Value::Mapping(map) => {
            let mut result = serde_json::Map::new();
            for (key, item) in map {
                result.insert(key.clone(), value_to_json(item, config)?);
            }
            Ok(JsonValue::Object(result))
        }
    }
}

fn number_to_json(n: f64) -> Result<JsonValue, ValueToJsonError> {
    if !n.is_finite() {
        return Err(ValueToJsonError::NonFiniteNumber(n));
    }
    // Integral numbers are written without a fractional part.
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Ok(JsonValue::from(n as i64));
    }
    serde_json::Number::from_f64(n)
        .map(JsonValue::Number)
        .ok_or(ValueToJsonError::NonFiniteNumber(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_json_to_value_nested() {
        let value = json_to_value(&json!({
            "name": "Adam",
            "age": 31,
            "tags": ["a", null, true],
        }));
        let map = value.as_mapping().unwrap();
        assert_eq!(map.get("name"), Some(&Value::from("Adam")));
        assert_eq!(map.get("age"), Some(&Value::from(31)));
        assert_eq!(
            map.get("tags"),
            Some(&Value::Sequence(vec![
                Value::from("a"),
                Value::Null,
                Value::from(true)
            ]))
        );
    }

    #[test]
    fn test_round_trip_plain_json() {
        let json = json!({"a": [1, 2.5, "x"], "b": {"c": null}});
        let value = json_to_value(&json);
        assert_eq!(value_to_json(&value, &Config::default()).unwrap(), json);
    }

    #[test]
    fn test_integral_numbers_have_no_fraction() {
        let json = value_to_json(&Value::from(3.0), &Config::default()).unwrap();
        assert_eq!(json.to_string(), "3");
    }

    #[test]
    fn test_bytes_become_base64() {
        let json = value_to_json(&Value::Bytes(b"hello".to_vec()), &Config::default()).unwrap();
        assert_eq!(json, json!("aGVsbG8="));
    }

    #[test]
    fn test_timestamp_formats() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let value = Value::Timestamp(t);
        assert_eq!(
            value_to_json(&value, &Config::default()).unwrap(),
            json!("2024-01-02T03:04:05.000Z")
        );
        let config = Config::default().with_timestamp_format(TimestampFormat::EpochMillis);
        assert_eq!(
            value_to_json(&value, &config).unwrap(),
            json!(1_704_164_645_000_i64)
        );
    }

    #[test]
    fn test_non_finite_number_error() {
        let result = value_to_json(&Value::from(f64::NAN), &Config::default());
        assert!(matches!(result, Err(ValueToJsonError::NonFiniteNumber(_))));
        let result = value_to_json(&Value::from(f64::INFINITY), &Config::default());
        assert_eq!(
            result,
            Err(ValueToJsonError::NonFiniteNumber(f64::INFINITY))
        );
    }
}
