#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the LA business stats server.
//!
//! These are the JSON bodies the HTTP layer writes. Field names are part of
//! the public contract and use `snake_case` to match the upstream dataset.
//! `GET /oldest` is not listed here: it returns the raw business record.

use la_business_analytics::LocationCount;
use serde::{Deserialize, Serialize};

/// `GET /total` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiTotal {
    /// Number of distinct business names.
    pub total: usize,
}

/// `GET /most-locations` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMostLocations {
    /// Business name.
    pub business_name: String,
    /// Number of location rows for that name.
    pub locations_count: usize,
}

impl From<LocationCount> for ApiMostLocations {
    fn from(count: LocationCount) -> Self {
        Self {
            business_name: count.business_name,
            locations_count: count.locations_count,
        }
    }
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
