//! pathdb: path-addressed key-value databases.
//!
//! A database is one nested value tree addressed by separator-delimited
//! keys like `"guild.1.prefix"`. The tree lives in a JSON, YAML or BSON
//! file, or in a remote collection with one record per top-level key.
//!
//! ```rust
//! use pathdb::{Adapter, Config, Database, KeyValueStore, Value};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let dir = tempfile::tempdir().unwrap();
//! let db = Database::open(Config::default().adapter(Adapter::Yaml).folder(dir.path()))
//!     .await
//!     .unwrap();
//!
//! db.set("stats.visits", Value::from(1)).await.unwrap();
//! assert_eq!(db.add("stats.visits", Value::from(2)).await.unwrap(), Value::from(3));
//! # });
//! ```

mod config;
mod database;

pub use config::{Adapter, Config};
pub use database::{Database, ReconfigureError, Reconfigured};

pub use pathdb_core::{
    AllMode, ArgumentError, ConnectionState, Entry, Error, KeyValueStore, Language, LengthMode,
    Map, Number, PingReport, Result, UpdatedDocument, Value, ValueKind,
};
pub use pathdb_file_store::{BsonStore, FileStore, FileStoreOptions, JsonStore, YamlStore};
pub use pathdb_remote::{
    DocumentCollection, HttpCollection, MemoryCollection, Record, RemoteDocStore, RemoteOptions,
};
