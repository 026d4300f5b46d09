//! Weather Alert Service - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Weather Alert Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().context("loading configuration")?;
    run_server(settings).await
}
