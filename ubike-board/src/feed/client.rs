//! YouBike immediate-availability feed client.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::domain::StationRecord;

use super::convert::convert_feed;
use super::error::FetchError;

/// Default endpoint for the Taipei YouBike 2.0 feed.
pub const DEFAULT_FEED_URL: &str =
    "https://tcgbusfs.blob.core.windows.net/dotapp/youbike/v2/youbike_immediate.json";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can produce the current station list.
///
/// This abstraction allows the session to be tested without the network.
pub trait StationFeed: Send + Sync + 'static {
    /// Fetch and normalize the full station list, in upstream order.
    fn fetch_stations(
        &self,
    ) -> impl Future<Output = Result<Vec<StationRecord>, FetchError>> + Send;
}

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Feed URL
    pub url: String,
    /// Request timeout, enforced by the transport
    pub timeout: Duration,
}

impl FeedConfig {
    /// Create a config for the given feed URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom URL (for testing).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_URL)
    }
}

/// HTTP client for the station feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
}

impl FeedClient {
    /// Create a new feed client.
    pub fn new(config: FeedConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }
}

impl StationFeed for FeedClient {
    /// One GET, no retries.
    async fn fetch_stations(&self) -> Result<Vec<StationRecord>, FetchError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;

        let doc: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
                message: e.to_string(),
            })?;

        let stations = convert_feed(&doc)?;
        debug!(count = stations.len(), "fetched station feed");

        Ok(stations)
    }
}
