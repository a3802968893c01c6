//! File encodings for pathdb
//!
//! This layer turns whole database trees into file bytes and back:
//! - `JsonCodec`, `YamlCodec`, `BsonCodec`: the three file encodings
//! - Value <-> serde_json / BSON conversions
//! - `to_value` / `from_value` for typed access through serde
//!
//! # Example
//!
//! ```rust
//! use pathdb_codec::{from_value, to_value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! let user = User { name: "Alice".into(), age: 30 };
//! let value = to_value(&user).unwrap();
//! assert_eq!(from_value::<User>(value).unwrap(), user);
//! ```

mod codec;
mod convert;

pub use codec::{BsonCodec, JsonCodec, YamlCodec};
pub use convert::{
    bson_to_value, document_to_map, from_value, json_to_value, map_to_document, to_value,
    value_to_bson, value_to_json,
};

// Re-export core types for convenience
pub use pathdb_core::{Codec, Error, Format, Value};
