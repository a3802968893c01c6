//! `KeyValueStore` for remote stores.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use pathdb_core::{
    AllMode, ConnectionState, Entry, Error, KeyValueStore, LengthMode, Map, PingReport, Result,
    UpdatedDocument, Value, ValueKind,
};

use crate::store::{RemoteDocStore, BACKEND};

#[async_trait]
impl KeyValueStore for RemoteDocStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn set(&self, key: &str, value: Value) -> Result<Value> {
        RemoteDocStore::set(self, key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        RemoteDocStore::get(self, key).await
    }

    async fn has(&self, key: &str) -> Result<bool> {
        RemoteDocStore::has(self, key).await
    }

    async fn type_of(&self, key: &str) -> Result<Option<ValueKind>> {
        RemoteDocStore::type_of(self, key).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        RemoteDocStore::delete(self, key).await
    }

    async fn add(&self, key: &str, amount: Value) -> Result<Value> {
        RemoteDocStore::add(self, key, amount).await
    }

    async fn subtract(&self, key: &str, amount: Value) -> Result<Value> {
        RemoteDocStore::subtract(self, key, amount).await
    }

    async fn push(&self, key: &str, value: Value) -> Result<Vec<Value>> {
        RemoteDocStore::push(self, key, value).await
    }

    async fn unpush(&self, key: &str, value: Value) -> Result<Vec<Value>> {
        RemoteDocStore::unpush(self, key, value).await
    }

    async fn set_by_priority(
        &self,
        key: &str,
        value: Value,
        priority: usize,
    ) -> Result<Option<Vec<Value>>> {
        RemoteDocStore::set_by_priority(self, key, value, priority).await
    }

    async fn del_by_priority(&self, key: &str, priority: usize) -> Result<Option<Vec<Value>>> {
        RemoteDocStore::del_by_priority(self, key, priority).await
    }

    async fn all(&self, mode: AllMode) -> Result<Value> {
        RemoteDocStore::all(self, mode).await
    }

    async fn delete_all(&self) -> Result<()> {
        RemoteDocStore::delete_all(self).await
    }

    async fn backup(&self, name: &str) -> Result<PathBuf> {
        RemoteDocStore::export(self, name).await
    }

    async fn load_backup(&self, _path: &Path) -> Result<()> {
        Err(Error::unsupported("load_backup", BACKEND))
    }

    async fn starts_with(&self, _pattern: &str) -> Result<Vec<Entry>> {
        Err(Error::unsupported("starts_with", BACKEND))
    }

    async fn ends_with(&self, _pattern: &str) -> Result<Vec<Entry>> {
        Err(Error::unsupported("ends_with", BACKEND))
    }

    async fn includes(&self, _pattern: &str) -> Result<Vec<Entry>> {
        Err(Error::unsupported("includes", BACKEND))
    }

    async fn find(&self, key: &str, query: &Map) -> Result<Vec<Value>> {
        RemoteDocStore::find(self, key, query).await
    }

    async fn find_one(&self, key: &str, query: &Map) -> Result<Option<Value>> {
        RemoteDocStore::find_one(self, key, query).await
    }

    async fn find_and_update(
        &self,
        key: &str,
        query: &Map,
        update: &Map,
    ) -> Result<Vec<UpdatedDocument>> {
        RemoteDocStore::find_and_update(self, key, query, update).await
    }

    async fn find_and_delete(&self, key: &str, query: &Map) -> Result<Vec<Value>> {
        RemoteDocStore::find_and_delete(self, key, query).await
    }

    async fn find_one_and_update(
        &self,
        key: &str,
        query: &Map,
        update: &Map,
    ) -> Result<UpdatedDocument> {
        RemoteDocStore::find_one_and_update(self, key, query, update).await
    }

    async fn find_one_and_delete(&self, key: &str, query: &Map) -> Result<Value> {
        RemoteDocStore::find_one_and_delete(self, key, query).await
    }

    /// Record count; the mode only matters for files.
    async fn length(&self, _mode: LengthMode) -> Result<usize> {
        RemoteDocStore::length(self).await
    }

    async fn size(&self) -> Result<String> {
        Err(Error::unsupported("size", BACKEND))
    }

    async fn ping(&self) -> Result<PingReport> {
        RemoteDocStore::ping(self).await
    }

    async fn destroy(&self) -> Result<()> {
        RemoteDocStore::destroy(self).await
    }

    async fn uptime(&self) -> Result<Duration> {
        Ok(RemoteDocStore::uptime(self))
    }

    async fn connection_state(&self) -> Result<ConnectionState> {
        Ok(RemoteDocStore::connection_state(self))
    }

    async fn disconnect(&self) -> Result<()> {
        RemoteDocStore::disconnect(self).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{MemoryCollection, RemoteOptions};

    fn boxed() -> Box<dyn KeyValueStore> {
        Box::new(RemoteDocStore::new(
            Arc::new(MemoryCollection::new()),
            RemoteOptions::default(),
        ))
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let store = boxed();
        assert_eq!(store.backend(), "remote");

        store.set("a.b", Value::from(1)).await.unwrap();
        assert_eq!(store.fetch("a.b").await.unwrap(), Some(Value::from(1)));
        assert_eq!(store.length(LengthMode::Raw).await.unwrap(), 1);
        assert!(store.del("a.b").await.unwrap());
        assert_eq!(store.length(LengthMode::Object).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn file_only_operations_are_unsupported() {
        let store = boxed();

        for result in [
            store.starts_with("a").await.map(|_| ()),
            store.ends_with("a").await.map(|_| ()),
            store.includes("a").await.map(|_| ()),
            store.size().await.map(|_| ()),
            store.load_backup(Path::new("x.json")).await,
        ] {
            assert!(matches!(result, Err(Error::Unsupported { backend: "remote", .. })));
        }
    }

    #[tokio::test]
    async fn connection_state_through_trait() {
        let store = boxed();
        assert_eq!(
            store.connection_state().await.unwrap(),
            ConnectionState::Disconnected
        );
        assert_eq!(store.uptime().await.unwrap(), Duration::ZERO);
        store.disconnect().await.unwrap();
    }
}
