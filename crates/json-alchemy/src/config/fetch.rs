//! Fetching remote schema documents for `$ref` resolution.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Timeout for a single schema request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for URL: {url}")]
    Status { status: u16, url: String },

    #[error("{0}")]
    Other(String),
}

/// Loads the JSON document behind a remote `$ref`.
pub trait SchemaFetcher {
    fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}

impl<F> SchemaFetcher for F
where
    F: Fn(&str) -> Result<Value, FetchError>,
{
    fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        self(url)
    }
}

/// Blocking HTTP(S) fetcher. Any non-2xx status is a failure.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let response = client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json::<Value>()?)
    }
}
