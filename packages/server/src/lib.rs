#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for LA business statistics.
//!
//! Serves three read-only aggregates over the City of LA active-business
//! dataset: the number of unique businesses, the oldest business, and the
//! business with the most locations. The dataset is loaded per request
//! through the cache-aside [`DatasetProvider`], so only the first request
//! after the cache file is removed reaches the remote API.

pub mod config;
pub mod error;
mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use la_business_dataset::DatasetProvider;
use la_business_source::SourceError;

pub use config::{ConfigOverrides, ServerConfig};

/// Seconds the server waits for in-flight requests (and the cache writes
/// they trigger) after a shutdown signal.
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Errors that can stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Binding, serving, or cache directory creation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote fetcher could not be built.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Invalid configuration value.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Shared application state.
pub struct AppState {
    /// Cache-aside access to the business dataset.
    pub provider: DatasetProvider,
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health))
        .route("/total", web::get().to(handlers::total))
        .route("/oldest", web::get().to(handlers::oldest))
        .route("/most-locations", web::get().to(handlers::most_locations))
        .default_service(web::to(handlers::not_found));
}

/// Starts the business stats API server.
///
/// Creates the cache directory if needed, builds the dataset provider from
/// `config`, and serves until a shutdown signal arrives. Actix traps
/// `SIGINT`/`SIGTERM` and drains in-flight requests for up to
/// [`SHUTDOWN_TIMEOUT_SECS`] before returning. The caller provides the
/// async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if the cache directory cannot be created, the
/// CORS pattern is invalid, the HTTP client cannot be built, or the HTTP
/// server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    la_business_cache::paths::ensure_dir(&config.cache_dir).await?;

    let cors_origin = config.cors_regex()?;
    let provider = DatasetProvider::from_config(&config.provider_config())?;
    let state = web::Data::new(AppState { provider });

    log::info!(
        "Serving business stats from {} (cache dir {})",
        config.remote_url,
        config.cache_dir.display()
    );
    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors_origin = cors_origin.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req| {
                origin.to_str().is_ok_and(|o| cors_origin.is_match(o))
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .shutdown_timeout(SHUTDOWN_TIMEOUT_SECS)
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    log::info!("Server stopped");
    Ok(())
}
