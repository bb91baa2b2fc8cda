// Feed HTTP client
//
// Fetches the single feed document and decodes it into wire types.
// There is no retry or caching here: one call, one request.

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::FeedResponse;

/// HTTP client for the content feed endpoint.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    feed_url: Url,
    timeout_secs: u64,
}

impl FeedClient {
    /// Create a client for `feed_url` using the given transport settings.
    pub fn new(feed_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            feed_url,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn from_reqwest(feed_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            feed_url: Url::parse(feed_url)?,
            timeout_secs: TransportConfig::default().timeout.as_secs(),
        })
    }

    /// The feed document URL.
    pub fn feed_url(&self) -> &Url {
        &self.feed_url
    }

    /// Fetch and decode the feed document.
    pub async fn fetch_feed(&self) -> Result<FeedResponse, Error> {
        debug!("GET {}", self.feed_url);

        let resp = self
            .http
            .get(self.feed_url.clone())
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: self.feed_url.to_string(),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}
