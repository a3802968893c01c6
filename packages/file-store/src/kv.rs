//! `KeyValueStore` for file stores.
//!
//! File I/O is blocking; these methods run the synchronous operation
//! inline and never yield.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use pathdb_core::{
    AllMode, Codec, ConnectionState, Entry, Error, KeyValueStore, LengthMode, Map, PingReport,
    Result, UpdatedDocument, Value, ValueKind,
};

use crate::local_disk::FileStore;

#[async_trait]
impl<C: Codec> KeyValueStore for FileStore<C> {
    fn backend(&self) -> &'static str {
        self.codec().extension()
    }

    async fn set(&self, key: &str, value: Value) -> Result<Value> {
        FileStore::set(self, key, value)
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        FileStore::get(self, key)
    }

    async fn has(&self, key: &str) -> Result<bool> {
        FileStore::has(self, key)
    }

    async fn type_of(&self, key: &str) -> Result<Option<ValueKind>> {
        FileStore::type_of(self, key)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        FileStore::delete(self, key)
    }

    async fn add(&self, key: &str, amount: Value) -> Result<Value> {
        FileStore::add(self, key, amount)
    }

    async fn subtract(&self, key: &str, amount: Value) -> Result<Value> {
        FileStore::subtract(self, key, amount)
    }

    async fn push(&self, key: &str, value: Value) -> Result<Vec<Value>> {
        FileStore::push(self, key, value)
    }

    async fn unpush(&self, key: &str, value: Value) -> Result<Vec<Value>> {
        FileStore::unpush(self, key, value)
    }

    async fn set_by_priority(
        &self,
        key: &str,
        value: Value,
        priority: usize,
    ) -> Result<Option<Vec<Value>>> {
        FileStore::set_by_priority(self, key, value, priority)
    }

    async fn del_by_priority(&self, key: &str, priority: usize) -> Result<Option<Vec<Value>>> {
        FileStore::del_by_priority(self, key, priority)
    }

    async fn all(&self, mode: AllMode) -> Result<Value> {
        FileStore::all(self, mode)
    }

    async fn delete_all(&self) -> Result<()> {
        FileStore::delete_all(self)
    }

    async fn backup(&self, name: &str) -> Result<PathBuf> {
        FileStore::backup(self, name)
    }

    async fn load_backup(&self, path: &Path) -> Result<()> {
        FileStore::load_backup(self, path)
    }

    async fn starts_with(&self, pattern: &str) -> Result<Vec<Entry>> {
        FileStore::starts_with(self, pattern)
    }

    async fn ends_with(&self, pattern: &str) -> Result<Vec<Entry>> {
        FileStore::ends_with(self, pattern)
    }

    async fn includes(&self, pattern: &str) -> Result<Vec<Entry>> {
        FileStore::includes(self, pattern)
    }

    async fn find(&self, key: &str, query: &Map) -> Result<Vec<Value>> {
        FileStore::find(self, key, query)
    }

    async fn find_one(&self, key: &str, query: &Map) -> Result<Option<Value>> {
        FileStore::find_one(self, key, query)
    }

    async fn find_and_update(
        &self,
        key: &str,
        query: &Map,
        update: &Map,
    ) -> Result<Vec<UpdatedDocument>> {
        FileStore::find_and_update(self, key, query, update)
    }

    async fn find_and_delete(&self, key: &str, query: &Map) -> Result<Vec<Value>> {
        FileStore::find_and_delete(self, key, query)
    }

    async fn find_one_and_update(
        &self,
        key: &str,
        query: &Map,
        update: &Map,
    ) -> Result<UpdatedDocument> {
        FileStore::find_one_and_update(self, key, query, update)
    }

    async fn find_one_and_delete(&self, key: &str, query: &Map) -> Result<Value> {
        FileStore::find_one_and_delete(self, key, query)
    }

    async fn length(&self, mode: LengthMode) -> Result<usize> {
        FileStore::length(self, mode)
    }

    async fn size(&self) -> Result<String> {
        FileStore::size(self)
    }

    async fn ping(&self) -> Result<PingReport> {
        FileStore::ping(self)
    }

    async fn destroy(&self) -> Result<()> {
        FileStore::destroy(self)
    }

    async fn uptime(&self) -> Result<Duration> {
        Err(Error::unsupported("uptime", self.backend()))
    }

    async fn connection_state(&self) -> Result<ConnectionState> {
        Err(Error::unsupported("connection_state", self.backend()))
    }

    async fn disconnect(&self) -> Result<()> {
        Err(Error::unsupported("disconnect", self.backend()))
    }
}
