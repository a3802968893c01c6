//! A key-value store over a remote collection of records.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use pathdb_codec::JsonCodec;
use pathdb_core::{
    addressing, ops, query, shape_all, AllMode, ArgumentError, Codec, ConnectionState, Error,
    KeyPath, Map, PingReport, Result, UpdatedDocument, Value, ValueKind, DEFAULT_SEPARATOR,
};

use crate::collection::{DocumentCollection, Record};

pub(crate) const BACKEND: &str = "remote";

const PING_KEY: &str = "pathdb_ping";

/// Record keys are split on this when exporting.
pub const EXPORT_SEPARATOR: char = '-';

/// Options for a remote store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteOptions {
    /// Character splitting keys into path segments.
    pub separator: char,
    /// Directory that exports are written to.
    pub folder: PathBuf,
}

impl Default for RemoteOptions {
    fn default() -> Self {
        RemoteOptions {
            separator: DEFAULT_SEPARATOR,
            folder: PathBuf::from("pathdb"),
        }
    }
}

impl RemoteOptions {
    #[must_use]
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    #[must_use]
    pub fn folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder = folder.into();
        self
    }
}

#[derive(Debug, Default)]
struct Connection {
    state: ConnectionState,
    since: Option<Instant>,
}

/// A store keeping one record per top-level key.
///
/// The first segment of a key names the record; the rest of the path
/// addresses into the record's value. Records whose value becomes an empty
/// map are deleted rather than kept.
pub struct RemoteDocStore {
    collection: Arc<dyn DocumentCollection>,
    options: RemoteOptions,
    connection: Mutex<Connection>,
}

impl RemoteDocStore {
    pub fn new(collection: Arc<dyn DocumentCollection>, options: RemoteOptions) -> Self {
        RemoteDocStore {
            collection,
            options,
            connection: Mutex::new(Connection::default()),
        }
    }

    pub fn options(&self) -> &RemoteOptions {
        &self.options
    }

    fn set_state(&self, state: ConnectionState) {
        self.connection.lock().state = state;
    }

    // ==================== connection ====================

    pub async fn connect(&self) -> Result<()> {
        self.set_state(ConnectionState::Connecting);
        match self.collection.connect().await {
            Ok(()) => {
                let mut connection = self.connection.lock();
                connection.state = ConnectionState::Connected;
                connection.since = Some(Instant::now());
                Ok(())
            }
            Err(e) => {
                self.set_state(ConnectionState::Disconnected);
                Err(e)
            }
        }
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.set_state(ConnectionState::Disconnecting);
        let result = self.collection.disconnect().await;

        let mut connection = self.connection.lock();
        connection.state = ConnectionState::Disconnected;
        connection.since = None;
        result
    }

    /// Time since the last successful connect; zero when disconnected.
    pub fn uptime(&self) -> Duration {
        self.connection
            .lock()
            .since
            .map(|since| since.elapsed())
            .unwrap_or_default()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.lock().state
    }

    // ==================== records ====================

    /// Parse `key`; the first segment names a record and must not be empty.
    fn key(&self, key: &str) -> Result<KeyPath> {
        let path = KeyPath::parse(key, self.options.separator)?;
        if path.head().is_empty() {
            return Err(ArgumentError::BlankKey.into());
        }
        Ok(path)
    }

    async fn record_value(&self, head: &str) -> Result<Option<Value>> {
        Ok(self.collection.find_one(head).await?.map(|r| r.value))
    }

    async fn store_record(&self, head: &str, value: Value) -> Result<()> {
        if value.is_empty_map() {
            log::debug!("Deleting emptied record {}", head);
            self.collection.delete_one(head).await?;
            return Ok(());
        }
        self.collection.upsert(&Record::new(head, value)).await
    }

    // ==================== basic operations ====================

    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.key(key)?;
        let Some(value) = self.record_value(path.head()).await? else {
            return Ok(None);
        };

        Ok(match path.rest() {
            None => Some(value),
            Some(rest) => addressing::get(&value, &rest).cloned(),
        })
    }

    pub async fn fetch(&self, key: &str) -> Result<Option<Value>> {
        self.get(key).await
    }

    /// Store `data` at `key`, creating or updating the record for the first
    /// segment.
    pub async fn set(&self, key: &str, data: Value) -> Result<Value> {
        let path = self.key(key)?;
        ops::storable(&data)?;

        let Some(rest) = path.rest() else {
            self.store_record(path.head(), data.clone()).await?;
            return Ok(data);
        };

        let mut value = self
            .record_value(path.head())
            .await?
            .unwrap_or_else(Value::map);
        addressing::set(&mut value, &rest, data);
        let stored = addressing::get(&value, &rest).cloned().unwrap_or_default();

        self.store_record(path.head(), value).await?;
        Ok(stored)
    }

    pub async fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some_and(|v| !v.is_null()))
    }

    pub async fn type_of(&self, key: &str) -> Result<Option<ValueKind>> {
        Ok(self.get(key).await?.map(|v| v.kind()))
    }

    /// Remove `key`; false if it was absent.
    ///
    /// Parents left as empty maps are removed on the way up, and a record
    /// left empty is deleted. All of this finishes before returning.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let path = self.key(key)?;
        let head = path.head();

        let Some(rest) = path.rest() else {
            return self.collection.delete_one(head).await;
        };

        let Some(mut value) = self.record_value(head).await? else {
            return Ok(false);
        };
        if addressing::delete(&mut value, &rest).is_none() {
            return Ok(false);
        }

        let mut parent = rest.parent();
        while let Some(current) = parent {
            if !addressing::get(&value, &current).is_some_and(Value::is_empty_map) {
                break;
            }
            addressing::delete(&mut value, &current);
            log::debug!("Pruned empty {}{}{}", head, self.options.separator, current);
            parent = current.parent();
        }

        self.store_record(head, value).await?;
        Ok(true)
    }

    pub async fn del(&self, key: &str) -> Result<bool> {
        self.delete(key).await
    }

    // ==================== arithmetic ====================

    pub async fn add(&self, key: &str, amount: Value) -> Result<Value> {
        self.key(key)?;
        let amount = ops::amount(&amount)?;

        let result = ops::added(self.get(key).await?.as_ref(), amount);
        self.set(key, result.clone()).await?;
        Ok(result)
    }

    pub async fn subtract(&self, key: &str, amount: Value) -> Result<Value> {
        self.key(key)?;
        let amount = ops::amount(&amount)?;

        let current = self.get(key).await?;
        match ops::subtracted(current.as_ref(), amount) {
            ops::SubtractOutcome::Delete => {
                if current.is_some() {
                    self.delete(key).await?;
                }
                Ok(Value::Integer(0))
            }
            ops::SubtractOutcome::Store(value) => {
                self.set(key, value.clone()).await?;
                Ok(value)
            }
        }
    }

    pub async fn sub(&self, key: &str, amount: Value) -> Result<Value> {
        self.subtract(key, amount).await
    }

    // ==================== arrays ====================

    pub async fn push(&self, key: &str, value: Value) -> Result<Vec<Value>> {
        self.key(key)?;
        ops::storable(&value)?;

        let arr = ops::pushed(self.get(key).await?.as_ref(), value);
        self.set(key, Value::Array(arr.clone())).await?;
        Ok(arr)
    }

    pub async fn unpush(&self, key: &str, value: Value) -> Result<Vec<Value>> {
        self.key(key)?;
        ops::storable(&value)?;

        let arr = ops::unpushed(self.get(key).await?.as_ref(), &value);
        self.set(key, Value::Array(arr.clone())).await?;
        Ok(arr)
    }

    /// Replace the element at 1-based `priority`.
    pub async fn set_by_priority(
        &self,
        key: &str,
        value: Value,
        priority: usize,
    ) -> Result<Option<Vec<Value>>> {
        self.key(key)?;
        ops::storable(&value)?;
        let index = ops::priority_index(priority)?;

        let Some(arr) = ops::replaced_at(self.get(key).await?.as_ref(), index, value) else {
            return Ok(None);
        };
        self.set(key, Value::Array(arr.clone())).await?;
        Ok(Some(arr))
    }

    /// Remove the element at 1-based `priority`.
    pub async fn del_by_priority(&self, key: &str, priority: usize) -> Result<Option<Vec<Value>>> {
        self.key(key)?;
        let index = ops::priority_index(priority)?;

        let Some(arr) = ops::removed_at(self.get(key).await?.as_ref(), index) else {
            return Ok(None);
        };
        self.set(key, Value::Array(arr.clone())).await?;
        Ok(Some(arr))
    }

    // ==================== whole collection ====================

    /// Records as stored: `All` lists `{key, value}` maps.
    pub async fn all(&self, mode: AllMode) -> Result<Value> {
        let records = self.collection.find_all().await?;
        if mode == AllMode::All {
            return Ok(Value::Array(
                records
                    .into_iter()
                    .map(|r| Value::from_iter([("key", Value::String(r.key)), ("value", r.value)]))
                    .collect(),
            ));
        }

        let data: Map = records.into_iter().map(|r| (r.key, r.value)).collect();
        Ok(shape_all(&data, mode))
    }

    pub async fn delete_all(&self) -> Result<()> {
        let deleted = self.collection.delete_many().await?;
        log::debug!("Deleted {} records", deleted);
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.delete_all().await
    }

    /// Write every record into `<folder>/<name>.json` as one tree.
    ///
    /// Record keys are split on `-` to rebuild nesting.
    pub async fn export(&self, name: &str) -> Result<PathBuf> {
        if name.trim().is_empty() {
            return Err(ArgumentError::BlankBackupName.into());
        }
        if name.contains(self.options.separator) {
            return Err(ArgumentError::SeparatorInName {
                separator: self.options.separator,
            }
            .into());
        }

        let tree = nest_records(self.collection.find_all().await?);
        let bytes = JsonCodec.encode(&Value::Map(tree), false)?;

        let folder = &self.options.folder;
        std::fs::create_dir_all(folder).map_err(|e| Error::io(folder, e))?;
        let target = folder.join(format!("{}.json", name));
        log::debug!("Writing {}...", target.display());
        std::fs::write(&target, &bytes).map_err(|e| Error::io(&target, e))?;

        log::info!("Exported collection to {}", target.display());
        Ok(target)
    }

    pub async fn backup(&self, name: &str) -> Result<PathBuf> {
        self.export(name).await
    }

    // ==================== documents ====================

    pub async fn find(&self, key: &str, query: &Map) -> Result<Vec<Value>> {
        self.key(key)?;
        let docs = query::documents(self.get(key).await?.as_ref())?;
        Ok(query::find(&docs, query))
    }

    pub async fn find_one(&self, key: &str, query: &Map) -> Result<Option<Value>> {
        self.key(key)?;
        let docs = query::documents(self.get(key).await?.as_ref())?;
        Ok(query::find_one(&docs, query))
    }

    pub async fn find_and_update(
        &self,
        key: &str,
        query: &Map,
        update: &Map,
    ) -> Result<Vec<UpdatedDocument>> {
        self.key(key)?;
        let mut docs = query::documents(self.get(key).await?.as_ref())?;
        let updated = query::update_matching(&mut docs, query, update, false);
        if !updated.is_empty() {
            self.set(key, Value::Array(docs)).await?;
        }
        Ok(updated)
    }

    pub async fn find_and_delete(&self, key: &str, query: &Map) -> Result<Vec<Value>> {
        self.key(key)?;
        let mut docs = query::documents(self.get(key).await?.as_ref())?;
        let removed = query::delete_matching(&mut docs, query, false);
        if !removed.is_empty() {
            self.set(key, Value::Array(docs)).await?;
        }
        Ok(removed)
    }

    pub async fn find_one_and_update(
        &self,
        key: &str,
        query: &Map,
        update: &Map,
    ) -> Result<UpdatedDocument> {
        self.key(key)?;
        let mut docs = query::documents(self.get(key).await?.as_ref())?;
        let updated = query::update_matching(&mut docs, query, update, true)
            .into_iter()
            .next()
            .ok_or(Error::NoMatch)?;
        self.set(key, Value::Array(docs)).await?;
        Ok(updated)
    }

    pub async fn find_one_and_delete(&self, key: &str, query: &Map) -> Result<Value> {
        self.key(key)?;
        let mut docs = query::documents(self.get(key).await?.as_ref())?;
        let removed = query::delete_matching(&mut docs, query, true)
            .into_iter()
            .next()
            .ok_or(Error::NoMatch)?;
        self.set(key, Value::Array(docs)).await?;
        Ok(removed)
    }

    // ==================== reporting ====================

    /// Number of records.
    pub async fn length(&self) -> Result<usize> {
        Ok(self.collection.find_all().await?.len())
    }

    /// Time one read and one write of a reserved record, putting back
    /// whatever it held.
    pub async fn ping(&self) -> Result<PingReport> {
        let started = Instant::now();
        let previous = self.collection.find_one(PING_KEY).await?;
        let read = started.elapsed();

        let started = Instant::now();
        self.collection
            .upsert(&Record::new(PING_KEY, Value::from("ping")))
            .await?;
        let write = started.elapsed();

        match previous {
            Some(previous) => self.collection.upsert(&previous).await?,
            None => {
                self.collection.delete_one(PING_KEY).await?;
            }
        }
        Ok(PingReport::new(read, write))
    }

    /// Delete every record.
    pub async fn destroy(&self) -> Result<()> {
        self.delete_all().await?;
        log::info!("Destroyed remote collection");
        Ok(())
    }
}

/// Rebuild one tree from records, splitting keys on `-`.
///
/// A path that already holds something is left alone, so the first record
/// to claim a path wins.
pub fn nest_records(records: Vec<Record>) -> Map {
    let mut tree = Map::new();
    'records: for record in records {
        let segments: Vec<&str> = record.key.split(EXPORT_SEPARATOR).collect();
        let Some((last, parents)) = segments.split_last() else {
            continue;
        };

        let mut cursor = &mut tree;
        for segment in parents {
            let child = cursor
                .entry(segment.to_string())
                .or_insert_with(Value::map);
            let Some(map) = child.as_map_mut() else {
                continue 'records;
            };
            cursor = map;
        }
        cursor.entry(last.to_string()).or_insert(record.value);
    }
    tree
}
