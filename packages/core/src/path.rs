//! Key paths: separator-delimited keys split into segments.

use std::fmt;

use crate::error::{ArgumentError, Error};

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: char = '.';

/// A key split into path segments.
///
/// Segments are not validated against any grammar and the separator cannot
/// be escaped, so `"a.b"` always means two segments under the `.` separator.
/// A path always has at least one segment.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
    separator: char,
}

impl KeyPath {
    /// Split a key on `separator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pathdb_core::KeyPath;
    ///
    /// let path = KeyPath::parse("users.123.name", '.').unwrap();
    /// assert_eq!(path.len(), 3);
    /// assert_eq!(path.head(), "users");
    ///
    /// // Blank keys are rejected.
    /// assert!(KeyPath::parse("  ", '.').is_err());
    /// ```
    pub fn parse(key: &str, separator: char) -> Result<Self, Error> {
        if key.trim().is_empty() {
            return Err(ArgumentError::BlankKey.into());
        }

        Ok(KeyPath {
            segments: key.split(separator).map(str::to_string).collect(),
            separator,
        })
    }

    /// Build a path from segments that were already split.
    pub fn from_segments(segments: Vec<String>, separator: char) -> Result<Self, Error> {
        if segments.is_empty() {
            return Err(ArgumentError::BlankKey.into());
        }
        Ok(KeyPath {
            segments,
            separator,
        })
    }

    /// Number of segments (always at least one).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Paths are never empty; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.segments.iter()
    }

    /// The top-level segment.
    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    /// The last segment.
    pub fn last(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Everything below the top-level segment, if anything.
    pub fn rest(&self) -> Option<KeyPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(KeyPath {
            segments: self.segments[1..].to_vec(),
            separator: self.separator,
        })
    }

    /// The path without its last segment, if it has more than one.
    pub fn parent(&self) -> Option<KeyPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(KeyPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
            separator: self.separator,
        })
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = [0u8; 4];
        let sep: &str = self.separator.encode_utf8(&mut sep);
        write!(f, "{}", self.segments.join(sep))
    }
}

impl std::ops::Index<usize> for KeyPath {
    type Output = String;

    fn index(&self, i: usize) -> &Self::Output {
        &self.segments[i]
    }
}

/// Parse a single-character separator from configuration text.
pub fn parse_separator(s: &str) -> Result<char, Error> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Ok(c),
        _ => Err(ArgumentError::InvalidSeparator {
            separator: s.to_string(),
        }
        .into()),
    }
}

/// Macro for creating `.`-separated paths in tests and examples.
///
/// # Example
///
/// ```rust
/// use pathdb_core::key;
///
/// let p = key!("users.123.name");
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! key {
    ($s:expr) => {
        $crate::KeyPath::parse($s, $crate::DEFAULT_SEPARATOR).expect("invalid key literal")
    };
}
