#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the cache directory.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// File name of the cached dataset inside the cache directory.
pub const CACHE_FILE_NAME: &str = "businesses.json";

/// Returns the path of the cached dataset inside `cache_dir`.
#[must_use]
pub fn cache_file_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(CACHE_FILE_NAME)
}

/// Suffix of the scratch files a new cache document is written to before
/// it is renamed into place.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Returns the scratch file name prefix for writes to `path`, e.g.
/// `.businesses.json.` for `cache/businesses.json`. A random part follows
/// it so every write gets its own file.
#[must_use]
pub fn temp_prefix(path: &Path) -> OsString {
    let mut prefix = OsString::from(".");
    prefix.push(path.file_name().unwrap_or_else(|| OsStr::new(CACHE_FILE_NAME)));
    prefix.push(".");
    prefix
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub async fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !tokio::fs::try_exists(path).await? {
        log::info!("Creating cache directory {}", path.display());
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_file_lives_in_cache_dir() {
        assert_eq!(
            cache_file_path(Path::new("cache")),
            PathBuf::from("cache/businesses.json")
        );
    }

    #[test]
    fn temp_prefix_is_hidden_and_named_after_target() {
        assert_eq!(
            temp_prefix(Path::new("cache/businesses.json")),
            OsString::from(".businesses.json.")
        );
    }

    #[tokio::test]
    async fn ensure_dir_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_dir(&nested).await.unwrap();
        ensure_dir(&nested).await.unwrap();

        assert!(nested.is_dir());
    }
}
