//! HTTP transport for metadata documents and artefact payloads.
//!
//! Provides a trait-based abstraction over blocking GET requests so that the
//! resolvers and fetcher can be exercised without network access.

use std::io::Read;
use std::time::Duration;

/// Trait for fetching documents and payloads over HTTP.
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient {
    /// Fetch `url` and return the body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not UTF-8.
    fn get_text(&self, url: &str) -> Result<String, DownloadError>;

    /// Fetch `url` and return the full body in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or body read fails.
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// Errors arising from HTTP requests.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested resource does not exist (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error reading the response body.
    #[error("I/O error reading {url}: {source}")]
    Io {
        /// The URL whose body was being read.
        url: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Blocking HTTP client backed by a `ureq` agent.
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Create a client whose requests time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }

    fn get(&self, url: &str) -> Result<ureq::http::Response<ureq::Body>, DownloadError> {
        log::debug!("GET {url}");
        self.agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))
    }
}

impl HttpClient for UreqClient {
    fn get_text(&self, url: &str) -> Result<String, DownloadError> {
        self.get(url)?
            .into_body()
            .read_to_string()
            .map_err(|e| DownloadError::HttpError {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.get(url)?;
        let mut data = Vec::new();
        response
            .into_body()
            .into_reader()
            .read_to_end(&mut data)
            .map_err(|source| DownloadError::Io {
                url: url.to_owned(),
                source,
            })?;
        log::debug!("received {} bytes from {url}", data.len());
        Ok(data)
    }
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
