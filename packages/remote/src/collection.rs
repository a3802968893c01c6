//! The remote collection a `RemoteDocStore` keeps its records in.

use async_trait::async_trait;
use pathdb_codec::{json_to_value, value_to_json};
use pathdb_core::{Result, Value};

use crate::error::Error;

/// One entry of a collection: a top-level key and everything under it.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub key: String,
    pub value: Value,
}

impl Record {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Record {
            key: key.into(),
            value,
        }
    }

    /// The `{"key": ..., "value": ...}` wire form.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "key": self.key,
            "value": value_to_json(self.value.clone()),
        })
    }

    pub fn from_json(json: serde_json::Value) -> Result<Self, Error> {
        let serde_json::Value::Object(mut fields) = json else {
            return Err(Error::MalformedRecord {
                message: "expected an object".to_string(),
            });
        };

        let key = match fields.remove("key") {
            Some(serde_json::Value::String(key)) => key,
            _ => {
                return Err(Error::MalformedRecord {
                    message: "missing string field `key`".to_string(),
                })
            }
        };
        let value = fields.remove("value").map(json_to_value).unwrap_or_default();

        Ok(Record { key, value })
    }
}

/// A collection of records, at most one per key.
///
/// This is the only thing a `RemoteDocStore` needs from the remote side.
/// Every call is its own round trip; nothing is batched or retried.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Arc<dyn DocumentCollection>`.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Establish (or verify) the connection.
    async fn connect(&self) -> Result<()>;

    async fn disconnect(&self) -> Result<()>;

    async fn find_one(&self, key: &str) -> Result<Option<Record>>;

    async fn find_all(&self) -> Result<Vec<Record>>;

    /// Insert the record, replacing any record with the same key.
    async fn upsert(&self, record: &Record) -> Result<()>;

    /// Delete the record for `key`; false if there was none.
    async fn delete_one(&self, key: &str) -> Result<bool>;

    /// Delete every record, returning how many went.
    async fn delete_many(&self) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_wire_form() {
        let record = Record::new("a", Value::from_iter([("b", 1)]));
        assert_eq!(record.to_json(), json!({"key": "a", "value": {"b": 1}}));
        assert_eq!(Record::from_json(record.to_json()).unwrap(), record);
    }

    #[test]
    fn malformed_records() {
        assert!(Record::from_json(json!([1])).is_err());
        assert!(Record::from_json(json!({"value": 1})).is_err());
        assert!(Record::from_json(json!({"key": 3, "value": 1})).is_err());

        let missing_value = Record::from_json(json!({"key": "k"})).unwrap();
        assert_eq!(missing_value.value, Value::Null);
    }
}
