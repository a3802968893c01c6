//! File-backed pathdb stores.
//!
//! One database is one file, `<folder>/<name>.<ext>`, fully loaded and
//! fully rewritten by every operation. The encoding is chosen by the codec:
//! `JsonStore`, `YamlStore` and `BsonStore` cover the built-in ones.

mod kv;
pub mod local_disk;
mod options;

pub use local_disk::FileStore;
pub use options::FileStoreOptions;

use pathdb_codec::{BsonCodec, JsonCodec, YamlCodec};

/// A database in a `.json` file.
pub type JsonStore = FileStore<JsonCodec>;

/// A database in a `.yaml` file.
pub type YamlStore = FileStore<YamlCodec>;

/// A database in a `.bson` file.
pub type BsonStore = FileStore<BsonCodec>;
