//! The key-value store interface every backend implements.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::query::UpdatedDocument;
use crate::value::{Map, Value, ValueKind};

/// Shape of the result of `all`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AllMode {
    /// The data as stored.
    #[default]
    All,
    /// `[key, value]` pairs.
    Object,
    /// Top-level keys only.
    Keys,
    /// Top-level values only.
    Values,
}

impl AllMode {
    /// Case-insensitive; unknown names mean `All`.
    pub fn parse(mode: &str) -> Self {
        match mode.trim().to_ascii_lowercase().as_str() {
            "object" => AllMode::Object,
            "keys" => AllMode::Keys,
            "values" => AllMode::Values,
            _ => AllMode::All,
        }
    }
}

impl FromStr for AllMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AllMode::parse(s))
    }
}

/// What `length` counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LengthMode {
    /// Number of top-level entries.
    Object,
    /// Raw length of the backing file.
    #[default]
    Raw,
}

impl LengthMode {
    /// Any mode mentioning "object" counts entries.
    pub fn parse(mode: &str) -> Self {
        if mode.to_ascii_lowercase().contains("object") {
            LengthMode::Object
        } else {
            LengthMode::Raw
        }
    }
}

impl FromStr for LengthMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LengthMode::parse(s))
    }
}

/// A top-level key and its data, as returned by key scans.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub key: String,
    pub data: Value,
}

/// Lifecycle state of a remote connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnecting => "disconnecting",
        })
    }
}

/// A duration shown in milliseconds, e.g. `1.25ms`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Latency(pub Duration);

impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}ms", self.0.as_secs_f64() * 1000.0)
    }
}

/// Timings from one read and one write round trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PingReport {
    pub read: Latency,
    pub write: Latency,
    pub average: Latency,
}

impl PingReport {
    pub fn new(read: Duration, write: Duration) -> Self {
        PingReport {
            read: Latency(read),
            write: Latency(write),
            average: Latency((read + write) / 2),
        }
    }
}

impl fmt::Display for PingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read: {}, write: {}, average: {}",
            self.read, self.write, self.average
        )
    }
}

/// Format a byte count as `N Bytes`, `x.xx Kb`, `x.xx Mb` or `x.xx Gb`.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} Bytes", bytes)
    } else if b < KB * KB {
        format!("{:.2} Kb", b / KB)
    } else if b < KB * KB * KB {
        format!("{:.2} Mb", b / (KB * KB))
    } else {
        format!("{:.2} Gb", b / (KB * KB * KB))
    }
}

/// Reshape a top-level map according to `mode`.
pub fn shape_all(data: &Map, mode: AllMode) -> Value {
    match mode {
        AllMode::All => Value::Map(data.clone()),
        AllMode::Object => Value::Array(
            data.iter()
                .map(|(k, v)| Value::Array(vec![Value::from(k.as_str()), v.clone()]))
                .collect(),
        ),
        AllMode::Keys => Value::Array(data.keys().map(|k| Value::from(k.as_str())).collect()),
        AllMode::Values => Value::Array(data.values().cloned().collect()),
    }
}

/// A key-value store over a nested value tree.
///
/// Keys are split into path segments on the store's separator. Absence is
/// never an error: lookups report it as `None` or `false`.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn KeyValueStore>`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Short name of the backend, used in error messages.
    fn backend(&self) -> &'static str;

    /// Store `value` at `key` and return what was stored.
    async fn set(&self, key: &str, value: Value) -> Result<Value>;

    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Present and not null.
    async fn has(&self, key: &str) -> Result<bool>;

    async fn type_of(&self, key: &str) -> Result<Option<ValueKind>>;

    /// Remove `key`; false if it was absent.
    async fn delete(&self, key: &str) -> Result<bool>;

    async fn add(&self, key: &str, amount: Value) -> Result<Value>;

    /// Subtract, deleting the key once it would drop below 1.
    async fn subtract(&self, key: &str, amount: Value) -> Result<Value>;

    async fn push(&self, key: &str, value: Value) -> Result<Vec<Value>>;

    async fn unpush(&self, key: &str, value: Value) -> Result<Vec<Value>>;

    /// Replace the element at 1-based `priority`.
    async fn set_by_priority(
        &self,
        key: &str,
        value: Value,
        priority: usize,
    ) -> Result<Option<Vec<Value>>>;

    /// Remove the element at 1-based `priority`.
    async fn del_by_priority(&self, key: &str, priority: usize) -> Result<Option<Vec<Value>>>;

    async fn all(&self, mode: AllMode) -> Result<Value>;

    async fn delete_all(&self) -> Result<()>;

    /// Write a copy of the data and return where it went.
    async fn backup(&self, name: &str) -> Result<PathBuf>;

    async fn load_backup(&self, path: &Path) -> Result<()>;

    async fn starts_with(&self, pattern: &str) -> Result<Vec<Entry>>;

    async fn ends_with(&self, pattern: &str) -> Result<Vec<Entry>>;

    async fn includes(&self, pattern: &str) -> Result<Vec<Entry>>;

    async fn find(&self, key: &str, query: &Map) -> Result<Vec<Value>>;

    async fn find_one(&self, key: &str, query: &Map) -> Result<Option<Value>>;

    async fn find_and_update(
        &self,
        key: &str,
        query: &Map,
        update: &Map,
    ) -> Result<Vec<UpdatedDocument>>;

    async fn find_and_delete(&self, key: &str, query: &Map) -> Result<Vec<Value>>;

    async fn find_one_and_update(
        &self,
        key: &str,
        query: &Map,
        update: &Map,
    ) -> Result<UpdatedDocument>;

    async fn find_one_and_delete(&self, key: &str, query: &Map) -> Result<Value>;

    async fn length(&self, mode: LengthMode) -> Result<usize>;

    async fn size(&self) -> Result<String>;

    async fn ping(&self) -> Result<PingReport>;

    /// Remove the backing data entirely.
    async fn destroy(&self) -> Result<()>;

    async fn uptime(&self) -> Result<Duration>;

    async fn connection_state(&self) -> Result<ConnectionState>;

    async fn disconnect(&self) -> Result<()>;

    // Aliases

    async fn fetch(&self, key: &str) -> Result<Option<Value>> {
        self.get(key).await
    }

    async fn del(&self, key: &str) -> Result<bool> {
        self.delete(key).await
    }

    async fn sub(&self, key: &str, amount: Value) -> Result<Value> {
        self.subtract(key, amount).await
    }

    async fn get_all(&self) -> Result<Value> {
        self.all(AllMode::All).await
    }

    async fn fetch_all(&self) -> Result<Value> {
        self.all(AllMode::All).await
    }

    async fn clear(&self) -> Result<()> {
        self.delete_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_mode_parsing() {
        assert_eq!(AllMode::parse("KEYS"), AllMode::Keys);
        assert_eq!(AllMode::parse("Object"), AllMode::Object);
        assert_eq!(AllMode::parse("values"), AllMode::Values);
        assert_eq!(AllMode::parse("whatever"), AllMode::All);
        assert_eq!("all".parse::<AllMode>().unwrap(), AllMode::All);
    }

    #[test]
    fn length_mode_parsing() {
        assert_eq!(LengthMode::parse("object"), LengthMode::Object);
        assert_eq!(LengthMode::parse("as-object"), LengthMode::Object);
        assert_eq!(LengthMode::parse("raw"), LengthMode::Raw);
        assert_eq!(LengthMode::parse(""), LengthMode::Raw);
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(1024), "1.00 Kb");
        assert_eq!(format_size(1536), "1.50 Kb");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 Mb");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 Gb");
    }

    #[test]
    fn ping_report_display() {
        let report = PingReport::new(Duration::from_millis(2), Duration::from_millis(4));
        assert_eq!(report.average, Latency(Duration::from_millis(3)));
        assert_eq!(report.read.to_string(), "2.00ms");
        assert_eq!(
            report.to_string(),
            "read: 2.00ms, write: 4.00ms, average: 3.00ms"
        );
    }

    #[test]
    fn shaping() {
        let data: Map = [
            ("a".to_string(), Value::from(1)),
            ("b".to_string(), Value::from("x")),
        ]
        .into_iter()
        .collect();

        assert_eq!(shape_all(&data, AllMode::All), Value::Map(data.clone()));
        assert_eq!(
            shape_all(&data, AllMode::Keys),
            Value::from(vec!["a", "b"])
        );
        assert_eq!(
            shape_all(&data, AllMode::Values),
            Value::Array(vec![Value::from(1), Value::from("x")])
        );
        assert_eq!(
            shape_all(&data, AllMode::Object),
            Value::Array(vec![
                Value::Array(vec![Value::from("a"), Value::from(1)]),
                Value::Array(vec![Value::from("b"), Value::from("x")]),
            ])
        );
    }

    #[test]
    fn connection_state_display() {
        assert_eq!(ConnectionState::default().to_string(), "disconnected");
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
    }
}
