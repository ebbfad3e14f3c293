//! Used-Car Price Service - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    info!("=== Car Price Service v{} ===", env!("CARGO_PKG_VERSION"));
    info!(artifacts = %config.artifacts.dir.display(), "Starting price service...");

    run_server(config).await.context("Price service failed")?;

    Ok(())
}
