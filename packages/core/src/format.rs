//! Encodings of a backing file.

use std::borrow::Cow;
use std::fmt;

/// The encoding of a backing store.
///
/// This uses MIME-type-like strings for familiarity; each known format also
/// carries the file extension its stores use.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Format(pub Cow<'static, str>);

impl Format {
    /// JSON format (`application/json`)
    pub const JSON: Format = Format(Cow::Borrowed("application/json"));

    /// YAML format (`application/yaml`)
    pub const YAML: Format = Format(Cow::Borrowed("application/yaml"));

    /// BSON format (`application/bson`)
    pub const BSON: Format = Format(Cow::Borrowed("application/bson"));

    /// Create a format from a static string.
    pub const fn from_static(s: &'static str) -> Self {
        Format(Cow::Borrowed(s))
    }

    /// Create a format from an owned string.
    pub fn new(s: impl Into<String>) -> Self {
        Format(Cow::Owned(s.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File extension used for this format, without the leading dot.
    pub fn extension(&self) -> Option<&'static str> {
        if self == &Self::JSON {
            Some("json")
        } else if self == &Self::YAML {
            Some("yaml")
        } else if self == &Self::BSON {
            Some("bson")
        } else {
            None
        }
    }

    /// Binary formats report their length in bytes rather than characters.
    pub fn is_binary(&self) -> bool {
        self == &Self::BSON
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&'static str> for Format {
    fn from(s: &'static str) -> Self {
        Format(Cow::Borrowed(s))
    }
}

impl AsRef<str> for Format {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
