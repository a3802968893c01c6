//! An in-process collection.

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use pathdb_core::{Result, Value};

use crate::collection::{DocumentCollection, Record};

/// A collection held in memory, in insertion order.
///
/// Useful for embedding a remote-shaped database in one process and for
/// tests. Connecting and disconnecting always succeed.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use pathdb_remote::{MemoryCollection, RemoteDocStore, RemoteOptions};
/// use pathdb_core::Value;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let collection = Arc::new(MemoryCollection::new());
/// let store = RemoteDocStore::new(collection.clone(), RemoteOptions::default());
/// store.connect().await.unwrap();
///
/// store.set("a.b.c", Value::from(1)).await.unwrap();
/// assert_eq!(collection.len(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryCollection {
    records: Mutex<IndexMap<String, Value>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collection pre-filled with records.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        MemoryCollection {
            records: Mutex::new(records.into_iter().map(|r| (r.key, r.value)).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// A copy of every record.
    pub fn snapshot(&self) -> Vec<Record> {
        self.records
            .lock()
            .iter()
            .map(|(key, value)| Record::new(key.clone(), value.clone()))
            .collect()
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }

    async fn find_one(&self, key: &str) -> Result<Option<Record>> {
        Ok(self
            .records
            .lock()
            .get(key)
            .map(|value| Record::new(key, value.clone())))
    }

    async fn find_all(&self) -> Result<Vec<Record>> {
        Ok(self.snapshot())
    }

    async fn upsert(&self, record: &Record) -> Result<()> {
        self.records
            .lock()
            .insert(record.key.clone(), record.value.clone());
        Ok(())
    }

    async fn delete_one(&self, key: &str) -> Result<bool> {
        Ok(self.records.lock().shift_remove(key).is_some())
    }

    async fn delete_many(&self) -> Result<usize> {
        let mut records = self.records.lock();
        let count = records.len();
        records.clear();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_replaces_by_key() {
        let collection = MemoryCollection::new();
        collection.upsert(&Record::new("a", Value::from(1))).await.unwrap();
        collection.upsert(&Record::new("b", Value::from(2))).await.unwrap();
        collection.upsert(&Record::new("a", Value::from(3))).await.unwrap();

        assert_eq!(
            collection.find_all().await.unwrap(),
            vec![Record::new("a", Value::from(3)), Record::new("b", Value::from(2))]
        );
    }

    #[tokio::test]
    async fn delete_one_and_many() {
        let collection = MemoryCollection::with_records([
            Record::new("a", Value::from(1)),
            Record::new("b", Value::from(2)),
            Record::new("c", Value::from(3)),
        ]);

        assert!(collection.delete_one("b").await.unwrap());
        assert!(!collection.delete_one("b").await.unwrap());
        assert_eq!(collection.find_one("b").await.unwrap(), None);
        assert_eq!(
            collection.find_one("c").await.unwrap(),
            Some(Record::new("c", Value::from(3)))
        );

        assert_eq!(collection.delete_many().await.unwrap(), 2);
        assert!(collection.is_empty());
    }
}
