//! # Dynamic Values
//!
//! This module defines the tagged representation of a parsed backend response.
//!
//! `serde_json` produces a `serde_json::Value` out of the wire bytes. That value is converted
//! once into a [`DynamicValue`], whose three shapes (`Scalar`, `Mapping`, `Sequence`) are the
//! only ones the decoder needs to tell apart. Every branch of the decoder is an exhaustive
//! `match` on this enum.
//!
//! Going the other way, [`convert`] re-encodes a [`DynamicValue`] into `serde_json::Value`
//! and lets serde decode it into the caller's record type.
use crate::error::DecodeError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// A leaf of a [`DynamicValue`] tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// A parsed response value, prior to being decoded into a caller-specified type.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    Scalar(Scalar),
    Mapping(BTreeMap<String, DynamicValue>),
    Sequence(Vec<DynamicValue>),
}

impl DynamicValue {
    /// Returns `true` for the `null` scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, DynamicValue::Scalar(Scalar::Null))
    }

    /// A short, human readable name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DynamicValue::Scalar(Scalar::Null) => "null",
            DynamicValue::Scalar(Scalar::Bool(_)) => "a boolean",
            DynamicValue::Scalar(Scalar::Number(_)) => "a number",
            DynamicValue::Scalar(Scalar::String(_)) => "a string",
            DynamicValue::Mapping(_) => "an object",
            DynamicValue::Sequence(_) => "an array",
        }
    }
}

impl From<Value> for DynamicValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DynamicValue::Scalar(Scalar::Null),
            Value::Bool(b) => DynamicValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => DynamicValue::Scalar(Scalar::Number(n)),
            Value::String(s) => DynamicValue::Scalar(Scalar::String(s)),
            Value::Array(items) => {
                DynamicValue::Sequence(items.into_iter().map(DynamicValue::from).collect())
            }
            Value::Object(map) => DynamicValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, DynamicValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<DynamicValue> for Value {
    fn from(value: DynamicValue) -> Self {
        match value {
            DynamicValue::Scalar(Scalar::Null) => Value::Null,
            DynamicValue::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            DynamicValue::Scalar(Scalar::Number(n)) => Value::Number(n),
            DynamicValue::Scalar(Scalar::String(s)) => Value::String(s),
            DynamicValue::Sequence(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            DynamicValue::Mapping(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

/// Converts a single dynamic value into the record type `T`.
///
/// Fields are matched by their serde name. No coercion is performed beyond what
/// `serde_json` does natively, so a string where `T` expects a number is an error.
///
/// # Returns
///
/// * `Ok(T)` - The decoded record.
/// * `Err(DecodeError::Conversion)` - If the shape of `value` cannot be represented by `T`.
pub fn convert<T>(value: DynamicValue) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(Value::from(value)).map_err(DecodeError::Conversion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        name: String,
        #[serde(rename = "id")]
        record_id: Option<String>,
    }

    #[test]
    fn converts_mapping_by_external_field_name() {
        let value = DynamicValue::from(json!({ "name": "John", "id": "user:john" }));

        let user: User = convert(value).unwrap();

        assert_eq!(
            user,
            User {
                name: "John".to_string(),
                record_id: Some("user:john".to_string()),
            }
        );
    }

    #[test]
    fn rejects_type_clash() {
        let value = DynamicValue::from(json!({ "name": 42 }));

        let err = convert::<User>(value).unwrap_err();

        assert!(matches!(err, DecodeError::Conversion(_)));
    }

    #[test]
    fn rejects_missing_required_field() {
        let value = DynamicValue::from(json!({ "id": "user:john" }));

        assert!(convert::<User>(value).is_err());
    }

    #[test]
    fn scalars_convert_through_serde() {
        let value = DynamicValue::from(json!("plain"));

        let s: String = convert(value).unwrap();

        assert_eq!(s, "plain");
    }

    #[test]
    fn shapes_are_tagged() {
        let value = DynamicValue::from(json!([{ "a": null }, 1, "x", true]));

        let DynamicValue::Sequence(items) = value else {
            panic!("Expected a sequence");
        };

        assert_eq!(items[0].kind(), "an object");
        assert_eq!(items[1].kind(), "a number");
        assert_eq!(items[2].kind(), "a string");
        assert_eq!(items[3].kind(), "a boolean");
        assert!(DynamicValue::from(json!(null)).is_null());
    }

    #[test]
    fn reencodes_back_into_the_same_json() {
        let original = json!({ "nested": [1, { "deep": [null, false] }], "s": "v" });

        let back = Value::from(DynamicValue::from(original.clone()));

        assert_eq!(back, original);
    }
}
