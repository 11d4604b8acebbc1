#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cache-aside access to the business dataset.
//!
//! [`DatasetProvider::get_list`] serves the dataset from the local cache
//! when a cached document exists. Otherwise it fetches from the remote
//! source, tries to persist the result, and returns it. Persisting is best
//! effort: a failed cache write is logged and the freshly fetched dataset is
//! still returned. There is no freshness policy; deleting the cache file is
//! the only way to force a refetch.

use std::path::PathBuf;
use std::sync::Arc;

use la_business_cache::{CacheError, CacheStore, JsonFileCache};
use la_business_models::Dataset;
use la_business_source::socrata::{SocrataConfig, SocrataFetcher};
use la_business_source::{RemoteFetcher, SourceError};

/// What went wrong underneath a [`DataUnavailableError`].
#[derive(Debug, thiserror::Error)]
pub enum UnavailableCause {
    /// The remote fetch failed on a cache miss.
    #[error(transparent)]
    Remote(#[from] SourceError),

    /// The cached document could not be read or decoded.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// The dataset could not be obtained.
///
/// This is the one failure kind callers of [`DatasetProvider::get_list`]
/// branch on. The specific cause is available through [`Self::cause`] and
/// the standard `source()` chain.
#[derive(Debug, thiserror::Error)]
#[error("Error while requesting data")]
pub struct DataUnavailableError {
    #[source]
    cause: UnavailableCause,
}

impl DataUnavailableError {
    /// Returns the underlying cause.
    #[must_use]
    pub const fn cause(&self) -> &UnavailableCause {
        &self.cause
    }

    /// Returns `true` if a cached document exists but is corrupt.
    #[must_use]
    pub const fn is_cache_corrupt(&self) -> bool {
        matches!(self.cause, UnavailableCause::Cache(CacheError::Corrupt { .. }))
    }

    /// Returns `true` if the remote fetch failed.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self.cause, UnavailableCause::Remote(_))
    }
}

impl From<SourceError> for DataUnavailableError {
    fn from(e: SourceError) -> Self {
        Self { cause: e.into() }
    }
}

impl From<CacheError> for DataUnavailableError {
    fn from(e: CacheError) -> Self {
        Self { cause: e.into() }
    }
}

/// Settings for the production provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Directory holding the cache file. Must exist before the first miss.
    pub cache_dir: PathBuf,
    /// Remote endpoint settings.
    pub source: SocrataConfig,
}

/// Cache-aside orchestrator over a [`RemoteFetcher`] and a [`CacheStore`].
#[derive(Clone)]
pub struct DatasetProvider {
    fetcher: Arc<dyn RemoteFetcher>,
    cache: Arc<dyn CacheStore>,
}

impl std::fmt::Debug for DatasetProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetProvider").finish_non_exhaustive()
    }
}

impl DatasetProvider {
    /// Creates a provider over the given fetcher and cache.
    #[must_use]
    pub fn new(fetcher: Arc<dyn RemoteFetcher>, cache: Arc<dyn CacheStore>) -> Self {
        Self { fetcher, cache }
    }

    /// Creates the production provider: Socrata fetcher plus a JSON file
    /// cache in `config.cache_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the HTTP client cannot be built.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, SourceError> {
        let fetcher = SocrataFetcher::new(&config.source)?;
        let cache = JsonFileCache::in_dir(&config.cache_dir);

        Ok(Self::new(Arc::new(fetcher), Arc::new(cache)))
    }

    /// Returns the business dataset, from cache when present.
    ///
    /// On a miss the dataset is fetched, written to the cache, and returned
    /// unchanged. A cache write failure does not fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`DataUnavailableError`] if the cached document cannot be
    /// read or decoded, or if the remote fetch fails on a miss. A corrupt
    /// cache is never treated as a miss.
    pub async fn get_list(&self) -> Result<Dataset, DataUnavailableError> {
        self.load()
            .await
            .inspect_err(|e| log::error!("Failed to load business list: {}", e.cause()))
    }

    async fn load(&self) -> Result<Dataset, DataUnavailableError> {
        if self.cache.exists().await {
            return Ok(self.cache.read().await?);
        }

        let dataset = self.fetcher.fetch().await?;

        if let Err(e) = self.cache.write(&dataset).await {
            log::warn!("Serving fetched business list without caching it: {e}");
        }

        Ok(dataset)
    }
}
