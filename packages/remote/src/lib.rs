//! Remote pathdb stores.
//!
//! A remote database is a collection of `{key, value}` records. The first
//! segment of every key picks a record and the rest addresses into its
//! value, so `set("guild.1.prefix", "!")` touches only the `guild` record.
//!
//! The collection itself sits behind [`DocumentCollection`]:
//! [`HttpCollection`] talks to a small REST API and [`MemoryCollection`]
//! keeps everything in process.

mod collection;
mod error;
mod http;
mod kv;
mod memory;
mod store;

pub use collection::{DocumentCollection, Record};
pub use error::Error;
pub use http::HttpCollection;
pub use memory::MemoryCollection;
pub use store::{nest_records, RemoteDocStore, RemoteOptions, EXPORT_SEPARATOR};
