//! dpe-survey - Drum Pattern Evaluation listening survey
//!
//! Serves the survey page, tracks per-session rating state, and persists
//! each submission to object storage.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

use dpe_survey::catalog::Catalog;
use dpe_survey::storage::StorageClient;
use dpe_survey::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "dpe-survey", about = "Drum pattern evaluation listening survey")]
struct Args {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP bind address, e.g. 127.0.0.1:5780
    #[arg(long)]
    bind: Option<String>,

    /// Audio catalog root directory
    #[arg(long)]
    audio_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting DPE Survey (dpe-survey) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = dpe_common::config::load(
        args.bind.as_deref(),
        args.audio_root.as_deref(),
        args.config.as_deref(),
    )?;

    let catalog = match Catalog::scan(&config.audio_root) {
        Ok(catalog) => {
            info!(
                "✓ Audio catalog: {} samples under {}",
                catalog.len(),
                config.audio_root.display()
            );
            catalog
        }
        Err(e) => {
            error!("Failed to scan audio catalog: {}", e);
            return Err(e.into());
        }
    };
    if catalog.is_empty() {
        warn!("Audio catalog is empty; raters will see no samples");
    }

    let storage = StorageClient::new(config.storage.clone());
    info!(
        "✓ Storage target: bucket {} (prefix {})",
        config.storage.bucket, config.storage.key_prefix
    );

    let state = AppState::new(catalog, storage);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("dpe-survey listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
