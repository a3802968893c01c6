//! The `Database` facade.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pathdb_core::{
    parse_separator, AllMode, ArgumentError, ConnectionState, Entry, Error, KeyValueStore,
    Language, LengthMode, Map, PingReport, Result, UpdatedDocument, Value, ValueKind,
};
use pathdb_file_store::{BsonStore, JsonStore, YamlStore};
use pathdb_remote::{DocumentCollection, HttpCollection, RemoteDocStore};

use crate::config::{Adapter, Config};

/// A database on one backend, fixed by its [`Config`].
///
/// Every operation goes through [`KeyValueStore`]. The `set_*` methods
/// consume the database and open a new one from the changed configuration;
/// on failure the [`ReconfigureError`] gives the original back.
///
/// # Example
///
/// ```rust
/// use pathdb::{Config, Database, KeyValueStore, Value};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let dir = tempfile::tempdir().unwrap();
/// let db = Database::open(Config::default().folder(dir.path())).await.unwrap();
///
/// db.set("user.name", Value::from("Ada")).await.unwrap();
/// assert_eq!(db.get("user.name").await.unwrap(), Some(Value::from("Ada")));
/// # });
/// ```
pub struct Database {
    config: Config,
    store: Box<dyn KeyValueStore>,
    collection: Option<Arc<dyn DocumentCollection>>,
}

impl Database {
    /// Open the backend named by `config.adapter`.
    ///
    /// The remote adapter needs `remote_url`; it connects before returning.
    pub async fn open(config: Config) -> Result<Self> {
        Self::build(config, None).await
    }

    /// Open with a caller-supplied collection for the remote adapter.
    ///
    /// The collection is kept across reconfiguration, so switching back to
    /// the remote adapter later reuses it.
    pub async fn with_collection(
        config: Config,
        collection: Arc<dyn DocumentCollection>,
    ) -> Result<Self> {
        Self::build(config, Some(collection)).await
    }

    async fn build(
        config: Config,
        collection: Option<Arc<dyn DocumentCollection>>,
    ) -> Result<Self> {
        let store: Box<dyn KeyValueStore> = match config.adapter {
            Adapter::Json => Box::new(JsonStore::open(config.file_options())),
            Adapter::Yaml => Box::new(YamlStore::open(config.file_options())),
            Adapter::Bson => Box::new(BsonStore::open(config.file_options())),
            Adapter::Remote => {
                let remote: Arc<dyn DocumentCollection> = match &collection {
                    Some(collection) => collection.clone(),
                    None => {
                        let url = config
                            .remote_url
                            .as_deref()
                            .ok_or(ArgumentError::MissingRemoteUrl)?;
                        Arc::new(HttpCollection::new(url, &config.collection)?)
                    }
                };
                let store = RemoteDocStore::new(remote, config.remote_options());
                store.connect().await?;
                Box::new(store)
            }
        };

        log::debug!("Opened {} database", config.adapter);
        Ok(Database {
            config,
            store,
            collection,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn adapter(&self) -> Adapter {
        self.config.adapter
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    /// The error's text in the configured language.
    pub fn message(&self, error: &Error) -> String {
        error.message(self.config.language)
    }

    /// Open a new database from `f(config)` and close this one.
    ///
    /// The new backend is opened first; if that fails the error comes back
    /// with this database untouched. A remote backend is disconnected once
    /// its replacement is open.
    pub async fn reconfigure(self, f: impl FnOnce(Config) -> Config) -> Reconfigured {
        let next = f(self.config.clone());
        let opened = match Self::build(next, self.collection.clone()).await {
            Ok(opened) => opened,
            Err(error) => return Err(ReconfigureError::new(error, self)),
        };

        self.close(opened.adapter()).await;
        Ok(opened)
    }

    async fn close(self, next: Adapter) {
        if self.config.adapter != Adapter::Remote {
            return;
        }

        if next != Adapter::Remote
            && matches!(
                self.store.connection_state().await,
                Ok(ConnectionState::Connected)
            )
        {
            log::warn!("Dropping connected remote database for the {} adapter", next);
        }
        if let Err(e) = self.store.disconnect().await {
            log::warn!("Disconnecting the previous remote database failed: {}", e);
        }
    }

    pub async fn set_adapter(self, adapter: Adapter) -> Reconfigured {
        self.reconfigure(|c| c.adapter(adapter)).await
    }

    pub async fn set_folder(self, folder: impl Into<PathBuf>) -> Reconfigured {
        let folder = folder.into();
        self.reconfigure(|c| c.folder(folder)).await
    }

    pub async fn set_file(self, file: impl Into<String>) -> Reconfigured {
        let file = file.into();
        self.reconfigure(|c| c.file(file)).await
    }

    /// Change the key separator; it must be one non-whitespace character.
    pub async fn set_separator(self, separator: &str) -> Reconfigured {
        let separator = match parse_separator(separator) {
            Ok(separator) => separator,
            Err(error) => return Err(ReconfigureError::new(error, self)),
        };
        self.reconfigure(|c| c.separator(separator)).await
    }

    /// Pretty-print JSON files. Fails on the remote adapter.
    pub async fn set_readable(self, readable: bool) -> Reconfigured {
        if let Err(error) = self.file_only("set_readable") {
            return Err(ReconfigureError::new(error, self));
        }
        self.reconfigure(|c| c.readable(readable)).await
    }

    /// Prune empty parents after deletes. Fails on the remote adapter.
    pub async fn set_no_blank_data(self, no_blank_data: bool) -> Reconfigured {
        if let Err(error) = self.file_only("set_no_blank_data") {
            return Err(ReconfigureError::new(error, self));
        }
        self.reconfigure(|c| c.no_blank_data(no_blank_data)).await
    }

    /// Language codes other than `en` and `tr` fall back to English.
    pub async fn set_language(self, code: &str) -> Reconfigured {
        let language = Language::from_code(code);
        self.reconfigure(|c| c.language(language)).await
    }

    fn file_only(&self, operation: &'static str) -> Result<()> {
        if self.config.adapter.is_file() {
            Ok(())
        } else {
            Err(Error::unsupported(operation, self.store.backend()))
        }
    }
}

/// The outcome of a setter: the new database, or the old one with the error.
pub type Reconfigured = std::result::Result<Database, ReconfigureError>;

/// A failed reconfiguration, holding the database it started from.
///
/// Converts into [`Error`] with `?`, dropping the database.
#[derive(thiserror::Error, Debug)]
#[error("{error}")]
pub struct ReconfigureError {
    #[source]
    error: Error,
    database: Database,
}

impl ReconfigureError {
    fn new(error: Error, database: Database) -> Self {
        ReconfigureError { error, database }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    /// The database as it was before the failed change.
    pub fn into_database(self) -> Database {
        self.database
    }

    pub fn into_parts(self) -> (Error, Database) {
        (self.error, self.database)
    }
}

impl From<ReconfigureError> for Error {
    fn from(e: ReconfigureError) -> Self {
        e.error
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("config", &self.config)
            .field("backend", &self.store.backend())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyValueStore for Database {
    fn backend(&self) -> &'static str {
        self.store.backend()
    }

    async fn set(&self, key: &str, value: Value) -> Result<Value> {
        self.store.set(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.store.get(key).await
    }

    async fn has(&self, key: &str) -> Result<bool> {
        self.store.has(key).await
    }

    async fn type_of(&self, key: &str) -> Result<Option<ValueKind>> {
        self.store.type_of(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.store.delete(key).await
    }

    async fn add(&self, key: &str, amount: Value) -> Result<Value> {
        self.store.add(key, amount).await
    }

    async fn subtract(&self, key: &str, amount: Value) -> Result<Value> {
        self.store.subtract(key, amount).await
    }

    async fn push(&self, key: &str, value: Value) -> Result<Vec<Value>> {
        self.store.push(key, value).await
    }

    async fn unpush(&self, key: &str, value: Value) -> Result<Vec<Value>> {
        self.store.unpush(key, value).await
    }

    async fn set_by_priority(
        &self,
        key: &str,
        value: Value,
        priority: usize,
    ) -> Result<Option<Vec<Value>>> {
        self.store.set_by_priority(key, value, priority).await
    }

    async fn del_by_priority(&self, key: &str, priority: usize) -> Result<Option<Vec<Value>>> {
        self.store.del_by_priority(key, priority).await
    }

    async fn all(&self, mode: AllMode) -> Result<Value> {
        self.store.all(mode).await
    }

    async fn delete_all(&self) -> Result<()> {
        self.store.delete_all().await
    }

    async fn backup(&self, name: &str) -> Result<PathBuf> {
        self.store.backup(name).await
    }

    async fn load_backup(&self, path: &Path) -> Result<()> {
        self.store.load_backup(path).await
    }

    async fn starts_with(&self, pattern: &str) -> Result<Vec<Entry>> {
        self.store.starts_with(pattern).await
    }

    async fn ends_with(&self, pattern: &str) -> Result<Vec<Entry>> {
        self.store.ends_with(pattern).await
    }

    async fn includes(&self, pattern: &str) -> Result<Vec<Entry>> {
        self.store.includes(pattern).await
    }

    async fn find(&self, key: &str, query: &Map) -> Result<Vec<Value>> {
        self.store.find(key, query).await
    }

    async fn find_one(&self, key: &str, query: &Map) -> Result<Option<Value>> {
        self.store.find_one(key, query).await
    }

    async fn find_and_update(
        &self,
        key: &str,
        query: &Map,
        update: &Map,
    ) -> Result<Vec<UpdatedDocument>> {
        self.store.find_and_update(key, query, update).await
    }

    async fn find_and_delete(&self, key: &str, query: &Map) -> Result<Vec<Value>> {
        self.store.find_and_delete(key, query).await
    }

    async fn find_one_and_update(
        &self,
        key: &str,
        query: &Map,
        update: &Map,
    ) -> Result<UpdatedDocument> {
        self.store.find_one_and_update(key, query, update).await
    }

    async fn find_one_and_delete(&self, key: &str, query: &Map) -> Result<Value> {
        self.store.find_one_and_delete(key, query).await
    }

    async fn length(&self, mode: LengthMode) -> Result<usize> {
        self.store.length(mode).await
    }

    async fn size(&self) -> Result<String> {
        self.store.size().await
    }

    async fn ping(&self) -> Result<PingReport> {
        self.store.ping().await
    }

    async fn destroy(&self) -> Result<()> {
        self.store.destroy().await
    }

    async fn uptime(&self) -> Result<Duration> {
        self.store.uptime().await
    }

    async fn connection_state(&self) -> Result<ConnectionState> {
        self.store.connection_state().await
    }

    async fn disconnect(&self) -> Result<()> {
        self.store.disconnect().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathdb_remote::MemoryCollection;

    #[tokio::test]
    async fn remote_needs_a_url() {
        let result = Database::open(Config::default().adapter(Adapter::Remote)).await;
        assert!(matches!(
            result,
            Err(Error::InvalidArgument(ArgumentError::MissingRemoteUrl))
        ));
    }

    #[tokio::test]
    async fn file_options_fail_on_remote() {
        let db = Database::with_collection(
            Config::default().adapter(Adapter::Remote),
            Arc::new(MemoryCollection::new()),
        )
        .await
        .unwrap();
        assert_eq!(db.connection_state().await.unwrap(), ConnectionState::Connected);

        let (error, db) = db.set_readable(true).await.unwrap_err().into_parts();
        match error {
            Error::Unsupported { operation, backend } => {
                assert_eq!(operation, "set_readable");
                assert_eq!(backend, "remote");
            }
            other => panic!("expected unsupported, got {:?}", other),
        }

        db.set("still.here", Value::from(1)).await.unwrap();
        assert_eq!(db.get("still.here").await.unwrap(), Some(Value::from(1)));
        assert!(db.set_no_blank_data(true).await.is_err());
    }

    #[tokio::test]
    async fn failed_switch_keeps_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(Config::default().folder(dir.path()))
            .await
            .unwrap();
        db.set("a", Value::from(1)).await.unwrap();

        let failed = db.set_adapter(Adapter::Remote).await.unwrap_err();
        assert!(matches!(
            failed.error(),
            Error::InvalidArgument(ArgumentError::MissingRemoteUrl)
        ));

        let db = failed.into_database();
        assert_eq!(db.adapter(), Adapter::Json);
        assert_eq!(db.get("a").await.unwrap(), Some(Value::from(1)));

        let error: Error = db.set_separator("").await.unwrap_err().into();
        assert!(matches!(
            error,
            Error::InvalidArgument(ArgumentError::InvalidSeparator { .. })
        ));
    }

    #[tokio::test]
    async fn localized_messages() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(Config::default().folder(dir.path()))
            .await
            .unwrap()
            .set_language("tr")
            .await
            .unwrap();

        assert_eq!(db.language(), Language::Turkish);
        let error = db.get("").await.unwrap_err();
        assert_eq!(db.message(&error), "Lütfen bir anahtar belirtin.");
    }
}
