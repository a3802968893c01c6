//! Core pathdb: the shared data layer
//!
//! Everything the backends have in common lives here:
//! - `Value`: the nested value tree stored in every database
//! - `KeyPath`: a key split into path segments on a separator
//! - `addressing`: get/set/delete/prune at a path inside a tree
//! - `ops` and `query`: pure helpers behind arithmetic, array and
//!   document operations
//! - `Codec`: the seam between file stores and encodings
//! - `KeyValueStore`: the async interface every backend implements
//!
//! # Example
//!
//! ```rust
//! use pathdb_core::{addressing, key, Value};
//!
//! let mut tree = Value::map();
//! addressing::set(&mut tree, &key!("users.123.name"), Value::from("Alice"));
//! assert_eq!(
//!     addressing::get(&tree, &key!("users.123.name")),
//!     Some(&Value::from("Alice"))
//! );
//! ```

pub use bytes::Bytes;

pub mod addressing;
mod error;
mod format;
mod lang;
pub mod ops;
mod path;
pub mod query;
mod store;
mod traits;
mod value;

pub use error::{ArgumentError, Error, Result};
pub use format::Format;
pub use lang::Language;
pub use path::{parse_separator, KeyPath, DEFAULT_SEPARATOR};
pub use query::UpdatedDocument;
pub use store::{
    format_size, shape_all, AllMode, ConnectionState, Entry, KeyValueStore, Latency, LengthMode,
    PingReport,
};
pub use traits::Codec;
pub use value::{Map, Number, Value, ValueKind};
