//! Server configuration.
//!
//! Values come from environment variables with defaults, and any of them
//! can be overridden by command-line flags on the server binary.

use std::path::PathBuf;
use std::time::Duration;

use la_business_dataset::ProviderConfig;
use la_business_source::socrata::{DEFAULT_API_URL, DEFAULT_TIMEOUT, SocrataConfig};
use regex::Regex;

use crate::ServerError;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "cache";
/// Default CORS origin pattern (any origin).
pub const DEFAULT_CORS_ORIGIN: &str = ".*";

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
    /// Directory holding `businesses.json` (`CACHE_DIR`).
    pub cache_dir: PathBuf,
    /// Remote dataset URL (`REMOTE_URL`).
    pub remote_url: String,
    /// Remote fetch timeout (`FETCH_TIMEOUT_SECS`).
    pub fetch_timeout: Duration,
    /// Regex matched against the `Origin` header (`CORS_ORIGIN`).
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            remote_url: DEFAULT_API_URL.to_string(),
            fetch_timeout: DEFAULT_TIMEOUT,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

/// Command-line overrides for [`ServerConfig`].
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigOverrides {
    /// Address to bind (overrides `BIND_ADDR`)
    #[arg(long)]
    pub bind_addr: Option<String>,
    /// Port to listen on (overrides `PORT`)
    #[arg(long)]
    pub port: Option<u16>,
    /// Directory for the dataset cache file (overrides `CACHE_DIR`)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
    /// Remote dataset URL (overrides `REMOTE_URL`)
    #[arg(long)]
    pub remote_url: Option<String>,
    /// Remote fetch timeout in seconds (overrides `FETCH_TIMEOUT_SECS`)
    #[arg(long)]
    pub fetch_timeout_secs: Option<u64>,
    /// Allowed CORS origin regex (overrides `CORS_ORIGIN`)
    #[arg(long)]
    pub cors_origin: Option<String>,
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    /// for unset or empty variables.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: var("PORT")
                .map(|v| parse_var("PORT", &v))
                .transpose()?
                .unwrap_or(defaults.port),
            cache_dir: var("CACHE_DIR").map_or(defaults.cache_dir, PathBuf::from),
            remote_url: var("REMOTE_URL").unwrap_or(defaults.remote_url),
            fetch_timeout: var("FETCH_TIMEOUT_SECS")
                .map(|v| parse_var("FETCH_TIMEOUT_SECS", &v))
                .transpose()?
                .map_or(defaults.fetch_timeout, Duration::from_secs),
            cors_origin: var("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
        })
    }

    /// Applies command-line overrides on top of this configuration.
    #[must_use]
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        Self {
            bind_addr: overrides.bind_addr.unwrap_or(self.bind_addr),
            port: overrides.port.unwrap_or(self.port),
            cache_dir: overrides.cache_dir.unwrap_or(self.cache_dir),
            remote_url: overrides.remote_url.unwrap_or(self.remote_url),
            fetch_timeout: overrides
                .fetch_timeout_secs
                .map_or(self.fetch_timeout, Duration::from_secs),
            cors_origin: overrides.cors_origin.unwrap_or(self.cors_origin),
        }
    }

    /// Compiles the CORS origin pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if the pattern is not a valid regex.
    pub fn cors_regex(&self) -> Result<Regex, ServerError> {
        Regex::new(&self.cors_origin).map_err(|e| ServerError::Config {
            message: format!("Invalid CORS_ORIGIN pattern '{}': {e}", self.cors_origin),
        })
    }

    /// Returns the dataset provider settings.
    #[must_use]
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            cache_dir: self.cache_dir.clone(),
            source: SocrataConfig {
                api_url: self.remote_url.clone(),
                timeout: self.fetch_timeout,
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ServerError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| ServerError::Config {
        message: format!("Invalid {key} '{value}': {e}"),
    })
}
