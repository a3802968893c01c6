//! Error types shared by every backend.

use std::path::PathBuf;

use crate::format::Format;
use crate::lang::Language;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by stores.
///
/// Absence of data is never an error: lookups report it as `None`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A caller-supplied argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),

    /// The active backend cannot perform this operation.
    #[error("`{operation}` is not supported by the {backend} backend")]
    Unsupported {
        operation: &'static str,
        backend: &'static str,
    },

    /// A singular find-and-modify found nothing to act on.
    #[error("no document matched the query")]
    NoMatch,

    /// Stored bytes could not be decoded.
    #[error("decode error ({format}): {message}")]
    Decode { format: Format, message: String },

    /// A value could not be encoded.
    #[error("encode error ({format}): {message}")]
    Encode { format: Format, message: String },

    /// File I/O failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote collection failed or answered with something unusable.
    #[error("remote error: {message}")]
    Remote { message: String },
}

impl Error {
    pub fn decode(format: Format, message: impl Into<String>) -> Self {
        Error::Decode {
            format,
            message: message.into(),
        }
    }

    pub fn encode(format: Format, message: impl Into<String>) -> Self {
        Error::Encode {
            format,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Error::Remote {
            message: message.into(),
        }
    }

    pub fn unsupported(operation: &'static str, backend: &'static str) -> Self {
        Error::Unsupported { operation, backend }
    }

    /// Failures of the underlying file or remote collection.
    pub fn is_backing_store(&self) -> bool {
        matches!(
            self,
            Error::Decode { .. } | Error::Encode { .. } | Error::Io { .. } | Error::Remote { .. }
        )
    }

    /// Render this error for end users in `language`.
    pub fn message(&self, language: Language) -> String {
        match (self, language) {
            (Error::InvalidArgument(arg), _) => arg.message(language),
            (Error::Unsupported { operation, backend }, Language::Turkish) => {
                format!("`{}` özelliği {} veritabanında kullanılamaz.", operation, backend)
            }
            (Error::NoMatch, Language::Turkish) => {
                "Sorguyla eşleşen bir belge bulunamadı.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Why an argument was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("key must not be blank")]
    BlankKey,

    #[error("value must not be blank")]
    BlankValue,

    #[error("value must be a number")]
    NotNumeric,

    #[error("priority must be a positive, 1-based index")]
    ZeroPriority,

    #[error("data stored under the key must be an array")]
    NotArray,

    #[error("search text must not be blank")]
    BlankPattern,

    #[error("backup name must not be blank")]
    BlankBackupName,

    #[error("backup name must not carry the .{extension} extension")]
    BackupHasExtension { extension: &'static str },

    #[error("backup name must differ from the database name")]
    BackupNameIsDatabase,

    #[error("export name must not contain the separator `{separator}`")]
    SeparatorInName { separator: char },

    #[error("backup file {} is not a .{extension} file", .path.display())]
    WrongBackupExtension {
        path: PathBuf,
        extension: &'static str,
    },

    #[error("backup file {} does not exist", .path.display())]
    BackupMissing { path: PathBuf },

    #[error("separator must be a single non-whitespace character, got `{separator}`")]
    InvalidSeparator { separator: String },

    #[error("unknown adapter `{name}` (expected json, yaml, bson or mongodb)")]
    UnknownAdapter { name: String },

    #[error("the remote adapter needs a connection url")]
    MissingRemoteUrl,
}

impl ArgumentError {
    /// Localized text for this error.
    pub fn message(&self, language: Language) -> String {
        if language == Language::English {
            return self.to_string();
        }

        match self {
            ArgumentError::BlankKey => "Lütfen bir anahtar belirtin.".to_string(),
            ArgumentError::BlankValue => "Lütfen bir veri belirtin.".to_string(),
            ArgumentError::NotNumeric => "Lütfen bir sayı belirtin.".to_string(),
            ArgumentError::ZeroPriority => {
                "Sıra numarası 1 veya daha büyük olmalıdır.".to_string()
            }
            ArgumentError::NotArray => "Anahtardaki veri bir dizi olmalıdır.".to_string(),
            ArgumentError::BlankPattern => "Aranacak metin boş olamaz.".to_string(),
            ArgumentError::BlankBackupName => "Lütfen yedek dosyası için bir ad belirtin.".to_string(),
            ArgumentError::BackupHasExtension { extension } => {
                format!("Dosya adına .{} uzantısı yazılmamalıdır.", extension)
            }
            ArgumentError::BackupNameIsDatabase => {
                "Yedek adı veritabanı adıyla aynı olamaz.".to_string()
            }
            ArgumentError::SeparatorInName { separator } => {
                format!("Ad `{}` ayıracını içermemelidir.", separator)
            }
            ArgumentError::WrongBackupExtension { path, extension } => {
                format!("{} bir .{} dosyası değil.", path.display(), extension)
            }
            ArgumentError::BackupMissing { path } => {
                format!("{} dosyası bulunamadı.", path.display())
            }
            ArgumentError::InvalidSeparator { separator } => {
                format!("Ayıraç tek bir karakter olmalıdır: `{}`", separator)
            }
            ArgumentError::UnknownAdapter { name } => {
                format!("`{}` desteklenen bir adaptör değil (json, yaml, bson, mongodb).", name)
            }
            ArgumentError::MissingRemoteUrl => {
                "Uzak adaptör için bir bağlantı adresi gereklidir.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn argument_error_display() {
        let e: Error = ArgumentError::BlankKey.into();
        assert_eq!(e.to_string(), "invalid argument: key must not be blank");

        let e: Error = ArgumentError::BackupHasExtension { extension: "json" }.into();
        assert!(e.to_string().contains(".json"));
    }

    #[test]
    fn unsupported_display() {
        let e = Error::unsupported("starts_with", "remote");
        assert_eq!(
            e.to_string(),
            "`starts_with` is not supported by the remote backend"
        );
    }

    #[test]
    fn decode_error_display() {
        let e = Error::decode(Format::YAML, "unexpected token");
        let display = e.to_string();
        assert!(display.contains("decode error"));
        assert!(display.contains("yaml"));
        assert!(display.contains("unexpected token"));
    }

    #[test]
    fn io_error_has_source() {
        let e = Error::io(
            "db/pathdb.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(e.to_string().contains("db/pathdb.json"));
        assert!(StdError::source(&e).is_some());
        assert!(e.is_backing_store());
    }

    #[test]
    fn backing_store_grouping() {
        assert!(Error::remote("timeout").is_backing_store());
        assert!(Error::encode(Format::BSON, "bad").is_backing_store());
        assert!(!Error::NoMatch.is_backing_store());
        assert!(!Error::from(ArgumentError::NotNumeric).is_backing_store());
    }

    #[test]
    fn localized_messages() {
        let e: Error = ArgumentError::BlankKey.into();
        assert_eq!(e.message(Language::English), "key must not be blank");
        assert_eq!(e.message(Language::Turkish), "Lütfen bir anahtar belirtin.");

        assert_eq!(
            Error::NoMatch.message(Language::English),
            "no document matched the query"
        );
        assert_ne!(
            Error::NoMatch.message(Language::Turkish),
            Error::NoMatch.message(Language::English)
        );
    }
}
