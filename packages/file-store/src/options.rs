//! Options for file-backed stores.

use std::path::PathBuf;

use pathdb_core::DEFAULT_SEPARATOR;

/// Where a file store lives and how it writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStoreOptions {
    /// Directory holding the database file and its backups.
    pub folder: PathBuf,
    /// File name without extension.
    pub name: String,
    /// Character splitting keys into path segments.
    pub separator: char,
    /// Pretty-print text encodings.
    pub readable: bool,
    /// Prune blank entries after every delete.
    pub no_blank_data: bool,
}

impl Default for FileStoreOptions {
    fn default() -> Self {
        FileStoreOptions {
            folder: PathBuf::from("pathdb"),
            name: "pathdb".to_string(),
            separator: DEFAULT_SEPARATOR,
            readable: false,
            no_blank_data: false,
        }
    }
}

impl FileStoreOptions {
    #[must_use]
    pub fn folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder = folder.into();
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
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
}
