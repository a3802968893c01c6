//! Database configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use pathdb_core::{ArgumentError, Error, Language, DEFAULT_SEPARATOR};
use pathdb_file_store::FileStoreOptions;
use pathdb_remote::RemoteOptions;

/// The backend a database is built on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Adapter {
    #[default]
    Json,
    Yaml,
    Bson,
    Remote,
}

impl Adapter {
    /// Parse an adapter name, ignoring case.
    pub fn parse(name: &str) -> Result<Self, Error> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" | "jsondb" => Ok(Adapter::Json),
            "yaml" | "yamldb" => Ok(Adapter::Yaml),
            "bson" | "bsondb" => Ok(Adapter::Bson),
            "mongo" | "mongodb" | "remote" => Ok(Adapter::Remote),
            _ => Err(ArgumentError::UnknownAdapter {
                name: name.to_string(),
            }
            .into()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Adapter::Json => "json",
            Adapter::Yaml => "yaml",
            Adapter::Bson => "bson",
            Adapter::Remote => "remote",
        }
    }

    pub fn is_file(&self) -> bool {
        !matches!(self, Adapter::Remote)
    }
}

impl FromStr for Adapter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Adapter::parse(s)
    }
}

impl fmt::Display for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to open a [`Database`](crate::Database).
///
/// # Example
///
/// ```rust
/// use pathdb::{Adapter, Config};
///
/// let config = Config::default()
///     .adapter(Adapter::Yaml)
///     .folder("data")
///     .file("settings")
///     .separator('/');
///
/// assert_eq!(config.file_options().separator, '/');
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub adapter: Adapter,
    /// Directory for database files, backups and exports.
    pub folder: PathBuf,
    /// Database file name without extension.
    pub file: String,
    pub separator: char,
    pub language: Language,
    /// Pretty-print JSON files.
    pub readable: bool,
    /// Prune empty parents after deletes in files.
    pub no_blank_data: bool,
    /// Base URL of the remote collection service.
    pub remote_url: Option<String>,
    /// Remote collection name.
    pub collection: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            adapter: Adapter::default(),
            folder: PathBuf::from("pathdb"),
            file: "pathdb".to_string(),
            separator: DEFAULT_SEPARATOR,
            language: Language::default(),
            readable: false,
            no_blank_data: false,
            remote_url: None,
            collection: "pathdb".to_string(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn adapter(mut self, adapter: Adapter) -> Self {
        self.adapter = adapter;
        self
    }

    #[must_use]
    pub fn folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder = folder.into();
        self
    }

    #[must_use]
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    #[must_use]
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    #[must_use]
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    #[must_use]
    pub fn readable(mut self, readable: bool) -> Self {
        self.readable = readable;
        self
    }

    #[must_use]
    pub fn no_blank_data(mut self, no_blank_data: bool) -> Self {
        self.no_blank_data = no_blank_data;
        self
    }

    #[must_use]
    pub fn remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn file_options(&self) -> FileStoreOptions {
        FileStoreOptions::default()
            .folder(self.folder.clone())
            .name(self.file.clone())
            .separator(self.separator)
            .readable(self.readable)
            .no_blank_data(self.no_blank_data)
    }

    pub fn remote_options(&self) -> RemoteOptions {
        RemoteOptions::default()
            .folder(self.folder.clone())
            .separator(self.separator)
    }
}
