//! A collection behind a small REST API.
//!
//! ## Protocol
//!
//! Relative to `<url>/<collection>/`:
//!
//! - `GET /` → JSON array of records (also the connect check)
//! - `DELETE /` → `{"deleted": n}`
//! - `GET /{key}` → the record, or 404
//! - `PUT /{key}` with the record as JSON body → upsert
//! - `DELETE /{key}` → 2xx if deleted, 404 if there was nothing
//!
//! Records travel as `{"key": ..., "value": ...}`. Keys are percent-encoded
//! as a single path segment.

use async_trait::async_trait;
use http::{Method, StatusCode};
use pathdb_core::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use url::Url;

use crate::collection::{DocumentCollection, Record};
use crate::error::Error;

/// A `DocumentCollection` reached over HTTP.
pub struct HttpCollection {
    client: Client,
    base_url: Url,
}

impl HttpCollection {
    /// Create a client for `collection` under `url`.
    ///
    /// No request is made until `connect` or the first operation.
    pub fn new(url: &str, collection: &str) -> Result<Self, Error> {
        let mut base_url = Url::parse(url)?;
        base_url
            .path_segments_mut()
            .map_err(|_| Error::InvalidUrl {
                message: format!("{} cannot be a base URL", url),
            })?
            .pop_if_empty()
            .push(collection)
            .push("");

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, base_url })
    }

    /// The collection URL, ending in a slash.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the full URL for a record.
    fn record_url(&self, key: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl {
                message: format!("{} cannot be a base URL", self.base_url),
            })?
            .pop_if_empty()
            .push(key);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<Response, Error> {
        log::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        Ok(request.send().await?)
    }

    fn check(method: Method, url: Url, response: Response) -> Result<Response, Error> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Error::Status {
                method,
                url,
                status: response.status(),
            })
        }
    }

    async fn list(&self) -> Result<Vec<Record>, Error> {
        let url = self.base_url.clone();
        let response = self.send(Method::GET, url.clone(), None).await?;
        let response = Self::check(Method::GET, url, response)?;

        let body: serde_json::Value = response.json().await?;
        let serde_json::Value::Array(items) = body else {
            return Err(Error::MalformedRecord {
                message: "expected an array of records".to_string(),
            });
        };
        items.into_iter().map(Record::from_json).collect()
    }

    async fn fetch(&self, key: &str) -> Result<Option<Record>, Error> {
        let url = self.record_url(key)?;
        let response = self.send(Method::GET, url.clone(), None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(Method::GET, url, response)?;

        let body: serde_json::Value = response.json().await?;
        Record::from_json(body).map(Some)
    }

    async fn put(&self, record: &Record) -> Result<(), Error> {
        let url = self.record_url(&record.key)?;
        let response = self
            .send(Method::PUT, url.clone(), Some(record.to_json()))
            .await?;
        Self::check(Method::PUT, url, response)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, Error> {
        let url = self.record_url(key)?;
        let response = self.send(Method::DELETE, url.clone(), None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::check(Method::DELETE, url, response)?;
        Ok(true)
    }

    async fn remove_all(&self) -> Result<usize, Error> {
        let url = self.base_url.clone();
        let response = self.send(Method::DELETE, url.clone(), None).await?;
        let response = Self::check(Method::DELETE, url, response)?;

        let body: serde_json::Value = response.json().await?;
        body.get("deleted")
            .and_then(serde_json::Value::as_u64)
            .map(|n| n as usize)
            .ok_or_else(|| Error::MalformedRecord {
                message: "expected {\"deleted\": n}".to_string(),
            })
    }
}

#[async_trait]
impl DocumentCollection for HttpCollection {
    async fn connect(&self) -> Result<()> {
        self.list().await?;
        log::info!("Connected to {}", self.base_url);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        log::info!("Disconnected from {}", self.base_url);
        Ok(())
    }

    async fn find_one(&self, key: &str) -> Result<Option<Record>> {
        Ok(self.fetch(key).await?)
    }

    async fn find_all(&self) -> Result<Vec<Record>> {
        Ok(self.list().await?)
    }

    async fn upsert(&self, record: &Record) -> Result<()> {
        Ok(self.put(record).await?)
    }

    async fn delete_one(&self, key: &str) -> Result<bool> {
        Ok(self.remove(key).await?)
    }

    async fn delete_many(&self) -> Result<usize> {
        Ok(self.remove_all().await?)
    }
}
