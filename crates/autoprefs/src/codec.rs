//! Translation between bound Rust types and stored values.
//!
//! [`Native`] maps `String`, `i32` and `bool` onto the store's own scalar
//! kinds. [`Json`] maps any serde type onto a JSON string.

use autoprefs_store::{StoreError, Value, ValueKind};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PrefsError, Result};

/// Encodes and decodes values of `T` for one key.
pub trait Codec<T> {
    /// Turn `value` into what gets stored under `key`.
    fn encode(key: &str, value: &T) -> Result<Value>;

    /// Turn what is stored under `key` back into a `T`.
    fn decode(key: &str, value: Value) -> Result<T>;
}

/// Store-native scalars.
#[derive(Debug, Clone, Copy, Default)]
pub struct Native;

/// JSON text stored as a string value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

fn mismatch(key: &str, expected: ValueKind, found: &Value) -> PrefsError {
    StoreError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
    .into()
}

impl Codec<String> for Native {
    fn encode(_key: &str, value: &String) -> Result<Value> {
        Ok(Value::String(value.clone()))
    }

    fn decode(key: &str, value: Value) -> Result<String> {
        value
            .into_string()
            .map_err(|other| mismatch(key, ValueKind::String, &other))
    }
}

impl Codec<i32> for Native {
    fn encode(_key: &str, value: &i32) -> Result<Value> {
        Ok(Value::Int(*value))
    }

    fn decode(key: &str, value: Value) -> Result<i32> {
        value
            .as_int()
            .ok_or_else(|| mismatch(key, ValueKind::Int, &value))
    }
}

impl Codec<bool> for Native {
    fn encode(_key: &str, value: &bool) -> Result<Value> {
        Ok(Value::Bool(*value))
    }

    fn decode(key: &str, value: Value) -> Result<bool> {
        value
            .as_bool()
            .ok_or_else(|| mismatch(key, ValueKind::Bool, &value))
    }
}

impl<T> Codec<T> for Json
where
    T: Serialize + DeserializeOwned,
{
    fn encode(key: &str, value: &T) -> Result<Value> {
        serde_json::to_string(value)
            .map(Value::String)
            .map_err(|source| PrefsError::Encode {
                key: key.to_string(),
                source,
            })
    }

    fn decode(key: &str, value: Value) -> Result<T> {
        let text = value
            .into_string()
            .map_err(|other| mismatch(key, ValueKind::String, &other))?;
        serde_json::from_str(&text).map_err(|source| PrefsError::Decode {
            key: key.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_native_rejects_other_kinds() {
        let err = <Native as Codec<i32>>::decode("n", Value::from("12")).unwrap_err();
        assert!(matches!(
            err,
            PrefsError::Store(StoreError::TypeMismatch {
                expected: ValueKind::Int,
                found: ValueKind::String,
                ..
            })
        ));

        assert!(<Native as Codec<bool>>::decode("b", Value::from(1)).is_err());
        assert!(<Native as Codec<String>>::decode("s", Value::from(false)).is_err());
    }

    #[test]
    fn test_json_encodes_to_string_value() {
        let value = <Json as Codec<Point>>::encode("p", &Point { x: 1, y: -2 }).unwrap();
        assert_eq!(value, Value::from(r#"{"x":1,"y":-2}"#));
    }

    #[test]
    fn test_json_decode_errors_name_the_key() {
        let err = <Json as Codec<Point>>::decode("point", Value::from("{oops")).unwrap_err();
        match err {
            PrefsError::Decode { key, .. } => assert_eq!(key, "point"),
            other => panic!("unexpected error: {other}"),
        }

        // Valid JSON, wrong shape.
        let err = <Json as Codec<Point>>::decode("point", Value::from(r#"{"x":1}"#)).unwrap_err();
        assert!(matches!(err, PrefsError::Decode { .. }));
    }

    #[test]
    fn test_json_encode_error_is_reported() {
        // JSON object keys must be strings.
        let mut bad: BTreeMap<Vec<u8>, i32> = BTreeMap::new();
        bad.insert(vec![1, 2], 3);
        let err = <Json as Codec<BTreeMap<Vec<u8>, i32>>>::encode("m", &bad).unwrap_err();
        assert!(matches!(err, PrefsError::Encode { .. }));
    }
}
