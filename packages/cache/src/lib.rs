#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Local persistence for the business dataset.
//!
//! The dataset is stored as a single JSON array. There is no expiry: once
//! the document exists it is served until someone deletes the file. Every
//! write replaces the whole document through a temp file and a rename, so a
//! concurrent reader sees either the previous document or the new one.

pub mod paths;

use std::io::Write as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use la_business_models::Dataset;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache document exists but does not decode into a dataset.
    #[error("Cache file {} is corrupt: {source}", path.display())]
    Corrupt {
        /// Cache file path.
        path: PathBuf,
        /// Decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The cache document exists but could not be read.
    #[error("Failed to read cache file {}: {source}", path.display())]
    Read {
        /// Cache file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The dataset could not be persisted.
    #[error("Failed to write cache file {}: {source}", path.display())]
    Write {
        /// Cache file path.
        path: PathBuf,
        /// Underlying I/O or encode error.
        #[source]
        source: std::io::Error,
    },
}

/// Storage for one persisted [`Dataset`].
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns `true` if a cached document is present.
    ///
    /// Never fails: anything that prevents inspecting the file counts as
    /// absent.
    async fn exists(&self) -> bool;

    /// Reads and decodes the cached document.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Read`] if the file cannot be read and
    /// [`CacheError::Corrupt`] if its content is not a dataset.
    async fn read(&self) -> Result<Dataset, CacheError>;

    /// Replaces the cached document with `dataset`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Write`] if the document cannot be encoded or
    /// persisted.
    async fn write(&self, dataset: &Dataset) -> Result<(), CacheError>;
}

/// A [`CacheStore`] backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    /// Creates a cache stored at exactly `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a cache stored as [`paths::CACHE_FILE_NAME`] inside
    /// `cache_dir`. The directory itself must already exist.
    #[must_use]
    pub fn in_dir(cache_dir: &Path) -> Self {
        Self::new(paths::cache_file_path(cache_dir))
    }

    /// Returns the cache file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: impl Into<std::io::Error>) -> CacheError {
        CacheError::Write {
            path: self.path.clone(),
            source: source.into(),
        }
    }
}

#[async_trait]
impl CacheStore for JsonFileCache {
    async fn exists(&self) -> bool {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() => true,
            Ok(_) => {
                log::warn!("Cache path {} is not a file", self.path.display());
                false
            }
            Err(e) => {
                log::debug!("Cache does not exist {}: {e}", self.path.display());
                false
            }
        }
    }

    async fn read(&self) -> Result<Dataset, CacheError> {
        let contents =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| CacheError::Read {
                    path: self.path.clone(),
                    source,
                })?;

        let dataset: Dataset =
            serde_json::from_str(&contents).map_err(|source| CacheError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        log::debug!(
            "Read {} business records from {}",
            dataset.len(),
            self.path.display()
        );
        Ok(dataset)
    }

    async fn write(&self, dataset: &Dataset) -> Result<(), CacheError> {
        log::info!(
            "Caching list of {} records to {}",
            dataset.len(),
            self.path.display()
        );

        let json = serde_json::to_vec(dataset).map_err(|e| self.write_error(e))?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || persist_atomically(&path, &json))
            .await
            .map_err(|e| self.write_error(std::io::Error::other(e)))?
            .map_err(|e| self.write_error(e))
    }
}

/// Writes `contents` to a uniquely named sibling of `path` and renames it
/// over `path`.
///
/// Every call gets its own scratch file, so concurrent writers never share
/// one and readers only ever observe a complete document.
fn persist_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::Builder::new()
        .prefix(&paths::temp_prefix(path))
        .suffix(paths::TEMP_SUFFIX)
        .tempfile_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;

    if let Err(e) = temp.persist(path) {
        let temp_path = e.file.path().to_path_buf();
        if let Err(cleanup) = e.file.close() {
            log::debug!(
                "Failed to remove temp cache file {}: {cleanup}",
                temp_path.display()
            );
        }
        return Err(e.error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use la_business_models::BusinessRecord;

    use super::*;

    fn sample() -> Dataset {
        vec![
            BusinessRecord::named("A").with_start_date("2001-01-01T00:00:00.000"),
            BusinessRecord::named("B"),
        ]
    }

    #[tokio::test]
    async fn missing_file_does_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::in_dir(dir.path());

        assert!(!cache.exists().await);
    }

    #[tokio::test]
    async fn directory_at_cache_path_does_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(paths::CACHE_FILE_NAME)).unwrap();
        let cache = JsonFileCache::in_dir(dir.path());

        assert!(!cache.exists().await);
    }

    #[tokio::test]
    async fn write_then_read_returns_same_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::in_dir(dir.path());

        cache.write(&sample()).await.unwrap();

        assert!(cache.exists().await);
        assert_eq!(cache.read().await.unwrap(), sample());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn write_replaces_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::in_dir(dir.path());
        let big: Dataset = (0..100)
            .map(|i| BusinessRecord::named(format!("business {i}")))
            .collect();

        cache.write(&big).await.unwrap();
        cache.write(&sample()).await.unwrap();

        assert_eq!(cache.read().await.unwrap(), sample());
    }

    #[tokio::test]
    async fn invalid_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::in_dir(dir.path());
        std::fs::write(cache.path(), "[{\"business_name\":").unwrap();

        let err = cache.read().await.unwrap_err();
        assert!(matches!(err, CacheError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn wrong_shape_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::in_dir(dir.path());
        std::fs::write(cache.path(), r#"{"business_name":"A"}"#).unwrap();

        let err = cache.read().await.unwrap_err();
        assert!(matches!(err, CacheError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::in_dir(&dir.path().join("missing"));

        let err = cache.write(&sample()).await.unwrap_err();
        assert!(matches!(err, CacheError::Write { .. }));
        assert!(!cache.exists().await);
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::in_dir(dir.path());
        std::fs::create_dir(cache.path()).unwrap();
        std::fs::write(cache.path().join("occupied"), "x").unwrap();

        let err = cache.write(&sample()).await.unwrap_err();

        assert!(matches!(err, CacheError::Write { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_never_expose_partial_documents() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(JsonFileCache::in_dir(dir.path()));
        let sizes = [1_usize, 500, 50, 2_000];

        for _ in 0..20 {
            let mut tasks = tokio::task::JoinSet::new();
            for size in sizes {
                let writer = cache.clone();
                tasks.spawn(async move {
                    let dataset: Dataset = (0..size)
                        .map(|i| BusinessRecord::named(format!("business {i}")))
                        .collect();
                    writer.write(&dataset).await.map(|()| None)
                });
                let reader = cache.clone();
                tasks.spawn(async move {
                    if reader.exists().await {
                        reader.read().await.map(Some)
                    } else {
                        Ok(None)
                    }
                });
            }

            while let Some(result) = tasks.join_next().await {
                if let Some(dataset) = result.unwrap().unwrap() {
                    assert!(sizes.contains(&dataset.len()));
                }
            }
        }

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(files, vec![std::ffi::OsString::from(paths::CACHE_FILE_NAME)]);
    }
}
