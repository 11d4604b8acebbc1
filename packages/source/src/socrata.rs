//! Socrata SODA fetcher for the active-business dataset.
//!
//! Issues one plain `GET` against the dataset resource URL. There is no
//! paging and no retry: the endpoint is expected to return everything the
//! server needs in a single response.

use std::time::Duration;

use async_trait::async_trait;
use la_business_models::Dataset;

use crate::{RemoteFetcher, SourceError};

/// Listing of active businesses published by the City of LA.
pub const DEFAULT_API_URL: &str = "https://data.lacity.org/resource/6rrh-rzua.json";

/// Default upper bound for a single fetch, connection through body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Configuration for a [`SocrataFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocrataConfig {
    /// Resource URL (e.g., `"https://data.lacity.org/resource/6rrh-rzua.json"`).
    pub api_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for SocrataConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Fetches the dataset from a Socrata resource endpoint.
#[derive(Debug, Clone)]
pub struct SocrataFetcher {
    client: reqwest::Client,
    api_url: String,
}

impl SocrataFetcher {
    /// Builds a fetcher with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: &SocrataConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self::with_client(client, config.api_url.clone()))
    }

    /// Builds a fetcher around an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// Returns the URL this fetcher requests.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl RemoteFetcher for SocrataFetcher {
    async fn fetch(&self) -> Result<Dataset, SourceError> {
        log::info!("Fetching business list from {}", self.api_url);

        let response = self.client.get(&self.api_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status,
                url: self.api_url.clone(),
            });
        }

        let body = response.text().await?;
        let dataset = parse_dataset(&body)?;

        log::info!(
            "Downloaded {} business records ({} bytes)",
            dataset.len(),
            body.len()
        );
        Ok(dataset)
    }
}

/// Decodes a response body into a [`Dataset`].
///
/// # Errors
///
/// Returns [`SourceError::Malformed`] if the body is not a JSON array of
/// records.
pub fn parse_dataset(body: &str) -> Result<Dataset, SourceError> {
    serde_json::from_str(body).map_err(|e| {
        log::error!(
            "Business list did not decode: {e}\n  received: {} bytes\n  body preview: {}",
            body.len(),
            preview(body)
        );
        SourceError::Malformed(e)
    })
}

fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
