#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the LA business stats server.

use clap::Parser;
use la_business_server::{ConfigOverrides, ServerConfig, ServerError, run_server};

#[derive(Parser)]
#[command(
    name = "la_business_server",
    about = "LA active-business statistics API",
    version
)]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();
    let config = ServerConfig::from_env()?.with_overrides(cli.overrides);

    run_server(config).await.inspect_err(|e| {
        log::error!("Server exited with error: {e}");
    })
}
