//! Codec implementations for JSON, YAML and BSON files.

use bytes::Bytes;
use pathdb_core::{Codec, Error, Format, Value};

use crate::convert::{document_to_map, json_to_value, map_to_document, value_to_json};

/// A codec that handles JSON encoding/decoding.
///
/// Compact output by default; pretty output uses a two-space indent.
///
/// # Example
///
/// ```rust
/// use pathdb_codec::JsonCodec;
/// use pathdb_core::{Codec, Value};
///
/// let codec = JsonCodec;
/// let value: Value = [("hello", "world")].into_iter().collect();
///
/// let bytes = codec.encode(&value, false).unwrap();
/// assert_eq!(&bytes[..], br#"{"hello":"world"}"#);
/// assert_eq!(codec.decode(&bytes).unwrap(), value);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn format(&self) -> Format {
        Format::JSON
    }

    fn decode(&self, bytes: &Bytes) -> Result<Value, Error> {
        let json: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| Error::decode(Format::JSON, e.to_string()))?;

        Ok(json_to_value(json))
    }

    fn encode(&self, value: &Value, pretty: bool) -> Result<Bytes, Error> {
        let json = value_to_json(value.clone());
        let bytes = if pretty {
            serde_json::to_vec_pretty(&json)
        } else {
            serde_json::to_vec(&json)
        }
        .map_err(|e| Error::encode(Format::JSON, e.to_string()))?;

        Ok(Bytes::from(bytes))
    }
}

/// A codec for YAML documents.
///
/// YAML output is always block style, so `pretty` has no effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn format(&self) -> Format {
        Format::YAML
    }

    fn decode(&self, bytes: &Bytes) -> Result<Value, Error> {
        serde_yaml::from_slice::<Value>(bytes).map_err(|e| Error::decode(Format::YAML, e.to_string()))
    }

    fn encode(&self, value: &Value, _pretty: bool) -> Result<Bytes, Error> {
        let json = value_to_json(value.clone());
        let text =
            serde_yaml::to_string(&json).map_err(|e| Error::encode(Format::YAML, e.to_string()))?;

        Ok(Bytes::from(text))
    }
}

/// A codec for BSON documents.
///
/// BSON files hold exactly one top-level document, so only maps can be
/// encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct BsonCodec;

impl Codec for BsonCodec {
    fn format(&self) -> Format {
        Format::BSON
    }

    fn decode(&self, bytes: &Bytes) -> Result<Value, Error> {
        let doc = bson::Document::from_reader(&bytes[..])
            .map_err(|e| Error::decode(Format::BSON, e.to_string()))?;

        Ok(Value::Map(document_to_map(doc)))
    }

    fn encode(&self, value: &Value, _pretty: bool) -> Result<Bytes, Error> {
        let Value::Map(map) = value else {
            return Err(Error::encode(
                Format::BSON,
                format!("top-level value must be an object, got {}", value.kind()),
            ));
        };

        let doc = map_to_document(map.clone());
        let mut buf = Vec::new();
        doc.to_writer(&mut buf)
            .map_err(|e| Error::encode(Format::BSON, e.to_string()))?;

        Ok(Bytes::from(buf))
    }
}
