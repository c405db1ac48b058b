//! oEmbed metadata lookup
//!
//! Resolves a media URL to a [`VideoInfo`] through an oEmbed endpoint. The
//! client distinguishes failure kinds in [`MetadataError`] for logging; callers
//! that only need "info or nothing" should use [`lookup`].

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Title used when the endpoint omits one
pub const UNKNOWN_TITLE: &str = "Unknown title";

/// Errors that can occur during a metadata lookup
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Connection failure or timeout
    #[error("oEmbed request failed: {0}")]
    Request(#[source] reqwest::Error),
    /// Endpoint answered with a non-success status
    #[error("oEmbed endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),
    /// Body was not the expected JSON object
    #[error("oEmbed response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Media description returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    /// Media title
    pub title: String,
    /// Author / channel name, possibly empty
    pub author: String,
    /// Thumbnail image URL, possibly empty
    pub thumbnail_url: String,
}

impl VideoInfo {
    /// Returns `true` if a thumbnail URL is present.
    #[must_use]
    pub fn has_thumbnail(&self) -> bool {
        !self.thumbnail_url.trim().is_empty()
    }
}

/// Wire shape of an oEmbed JSON response; every field is optional.
#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
    author_name: Option<String>,
    thumbnail_url: Option<String>,
}

impl From<OEmbedResponse> for VideoInfo {
    fn from(resp: OEmbedResponse) -> Self {
        Self {
            title: resp.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            author: resp.author_name.unwrap_or_default(),
            thumbnail_url: resp.thumbnail_url.unwrap_or_default(),
        }
    }
}

/// Interface for metadata sources
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for `url`
    ///
    /// `url` is the link exactly as it appeared in the message.
    async fn fetch(&self, url: &str) -> Result<VideoInfo, MetadataError>;
}

/// Fetch metadata, collapsing every failure into `None`.
///
/// The failure is logged; the caller only learns that no info is available.
pub async fn lookup(provider: &dyn MetadataProvider, url: &str) -> Option<VideoInfo> {
    match provider.fetch(url).await {
        Ok(info) => Some(info),
        Err(e) => {
            warn!(url, error = %e, "Metadata lookup failed");
            None
        }
    }
}

/// oEmbed HTTP client.
pub struct OEmbedClient {
    endpoint: Url,
    client: reqwest::Client,
    timeout: Duration,
}

impl OEmbedClient {
    /// Create a client for `endpoint` with a per-request `timeout`.
    #[must_use]
    pub fn new(endpoint: Url, timeout: Duration) -> Self {
        let client = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(_) => reqwest::Client::new(),
        };

        Self {
            endpoint,
            client,
            timeout,
        }
    }

    /// Endpoint URL with the target URL and format encoded into the query.
    fn request_url(&self, target: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("url", target)
            .append_pair("format", "json");
        url
    }
}

#[async_trait]
impl MetadataProvider for OEmbedClient {
    async fn fetch(&self, url: &str) -> Result<VideoInfo, MetadataError> {
        let request_url = self.request_url(url);
        debug!(url = %request_url, timeout_secs = self.timeout.as_secs(), "oEmbed request");

        let response = self
            .client
            .get(request_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(MetadataError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::Status(status));
        }

        let body: OEmbedResponse = response.json().await.map_err(MetadataError::Decode)?;
        Ok(body.into())
    }
}
