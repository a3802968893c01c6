//! Conversions between Value and the serde_json / bson trees.

use base64::Engine;
use bson::spec::BinarySubtype;
use bson::{Binary, Bson, Document};
use serde::de::DeserializeOwned;
use serde::Serialize;
use pathdb_core::{Error, Format, Map, Value};

/// Convert a Value to a Rust type via serde.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    let json = value_to_json(value);
    serde_json::from_value(json).map_err(|e| Error::decode(Format::JSON, e.to_string()))
}

/// Convert a Rust type to a Value via serde.
pub fn to_value<T: Serialize>(data: &T) -> Result<Value, Error> {
    let json =
        serde_json::to_value(data).map_err(|e| Error::encode(Format::JSON, e.to_string()))?;
    Ok(json_to_value(json))
}

/// Convert our Value to serde_json::Value.
pub fn value_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Integer(i) => serde_json::Value::Number(i.into()),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        // Text encodings carry binary data as base64
        Value::Bytes(b) => {
            serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
        }
        Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(value_to_json).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, value_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert serde_json::Value to our Value.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| (k, json_to_value(v)))
                .collect(),
        ),
    }
}

/// Convert our Value to a BSON value.
pub fn value_to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Integer(i) => match i32::try_from(i) {
            Ok(small) => Bson::Int32(small),
            Err(_) => Bson::Int64(i),
        },
        Value::Float(f) => Bson::Double(f),
        Value::String(s) => Bson::String(s),
        Value::Bytes(bytes) => Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes,
        }),
        Value::Array(arr) => Bson::Array(arr.into_iter().map(value_to_bson).collect()),
        Value::Map(map) => Bson::Document(map_to_document(map)),
    }
}

/// Convert a map into a BSON document, keeping key order.
pub fn map_to_document(map: Map) -> Document {
    map.into_iter()
        .map(|(k, v)| (k, value_to_bson(v)))
        .collect()
}

/// Convert a BSON value to our Value.
///
/// BSON-only types without a counterpart are flattened: object ids become
/// their hex string and datetimes their epoch milliseconds; anything else
/// exotic keeps its display text.
pub fn bson_to_value(bson: Bson) -> Value {
    match bson {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::Integer(i64::from(i)),
        Bson::Int64(i) => Value::Integer(i),
        Bson::Double(f) => Value::Float(f),
        Bson::String(s) => Value::String(s),
        Bson::Binary(binary) => Value::Bytes(binary.bytes),
        Bson::Array(arr) => Value::Array(arr.into_iter().map(bson_to_value).collect()),
        Bson::Document(doc) => Value::Map(document_to_map(doc)),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::Integer(dt.timestamp_millis()),
        other => Value::String(other.to_string()),
    }
}

/// Convert a BSON document into a map, keeping key order.
pub fn document_to_map(doc: Document) -> Map {
    doc.into_iter()
        .map(|(k, v)| (k, bson_to_value(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        age: u32,
        tags: Vec<String>,
    }

    #[test]
    fn roundtrip_struct() {
        let original = User {
            name: "Alice".to_string(),
            age: 30,
            tags: vec!["admin".to_string()],
        };

        let value = to_value(&original).unwrap();
        assert!(value.is_map());
        let recovered: User = from_value(value).unwrap();
        assert_eq!(original, recovered);
    }

    #[test]
    fn from_value_error() {
        let result: Result<User, _> = from_value(Value::from("not a struct"));
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn json_numbers() {
        let value = json_to_value(json!({"integer": 42, "float": 2.75, "negative": -100}));
        let map = value.as_map().unwrap();
        assert_eq!(map.get("integer"), Some(&Value::Integer(42)));
        assert_eq!(map.get("negative"), Some(&Value::Integer(-100)));
        assert_eq!(map.get("float"), Some(&Value::Float(2.75)));
    }

    #[test]
    fn json_keeps_key_order() {
        let value = json_to_value(json!({"z": 1, "a": 2, "m": 3}));
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);

        let back = value_to_json(value);
        let keys: Vec<_> = back.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn nan_becomes_null() {
        assert_eq!(value_to_json(Value::Float(f64::NAN)), serde_json::Value::Null);
    }

    #[test]
    fn bytes_become_base64_in_json() {
        let json = value_to_json(Value::Bytes(vec![1, 2, 3, 4]));
        let encoded = json.as_str().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decoded, vec![1, 2, 3, 4]);
    }

    #[test]
    fn bson_integers_pick_width() {
        assert_eq!(value_to_bson(Value::Integer(7)), Bson::Int32(7));
        assert_eq!(
            value_to_bson(Value::Integer(i64::from(i32::MAX) + 1)),
            Bson::Int64(i64::from(i32::MAX) + 1)
        );
        assert_eq!(bson_to_value(Bson::Int32(7)), Value::Integer(7));
    }

    #[test]
    fn bson_tree_roundtrip() {
        let value = json_to_value(json!({
            "name": "Alice",
            "score": 9.5,
            "tags": ["a", "b"],
            "nested": {"deep": {"ok": true, "none": null}},
        }));

        let bson = value_to_bson(value.clone());
        assert_eq!(bson_to_value(bson), value);
    }

    #[test]
    fn bson_binary_stays_binary() {
        let bson = value_to_bson(Value::Bytes(vec![9, 8, 7]));
        assert!(matches!(bson, Bson::Binary(_)));
        assert_eq!(bson_to_value(bson), Value::Bytes(vec![9, 8, 7]));
    }

    #[test]
    fn bson_object_id_becomes_hex() {
        let oid = bson::oid::ObjectId::new();
        assert_eq!(bson_to_value(Bson::ObjectId(oid)), Value::String(oid.to_hex()));
    }
}
