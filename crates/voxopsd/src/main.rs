//! VoxOps Daemon - voice command HTTP service
//!
//! Accepts transcribed commands over HTTP, runs them against kubectl/docker
//! and answers with display and spoken text.

use anyhow::{Context, Result};
use tracing::info;
use voxops_common::{speaker_from_config, Config, Pipeline};
use voxopsd::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("[BOOT] VoxOps daemon v{} starting...", voxops_common::VERSION);

    // $VOXOPS_CONFIG or the well-known locations
    let config = Config::load(None).context("Failed to load configuration")?;
    info!(
        "[BOOT] Backends: {} / {} (mutations {})",
        config.executor.orchestrator_bin,
        config.executor.runtime_bin,
        if config.executor.allow_mutations { "enabled" } else { "disabled" }
    );

    let state = AppState::new(Pipeline::from_config(&config), speaker_from_config(&config.speech));
    server::run(state, &config.server.bind).await
}
