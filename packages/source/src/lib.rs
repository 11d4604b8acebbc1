#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Remote fetcher for the LA active-business dataset.
//!
//! The [`RemoteFetcher`] trait is the seam the dataset provider depends on,
//! so tests can swap the network out. [`socrata::SocrataFetcher`] is the
//! production implementation talking to the City of LA's Socrata API.

pub mod socrata;

use async_trait::async_trait;
use la_business_models::Dataset;

/// Errors that can occur while fetching the remote dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Status code returned by the upstream.
        status: reqwest::StatusCode,
        /// Requested URL.
        url: String,
    },

    /// The response body was not a JSON array of business records.
    #[error("Malformed response body: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Retrieves the complete business dataset from its source of truth.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Fetches the whole dataset in a single request.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on network failure, a non-2xx status, or a
    /// body that does not decode into a [`Dataset`].
    async fn fetch(&self) -> Result<Dataset, SourceError>;
}
