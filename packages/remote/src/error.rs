use pathdb_core::Error as StoreError;

/// Failures talking to a remote collection.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },

    #[error("{method} {url} answered {status}")]
    Status {
        method: http::Method,
        url: url::Url,
        status: http::StatusCode,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record: {message}")]
    MalformedRecord { message: String },
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        StoreError::remote(error.to_string())
    }
}
