//! Reviva server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), layers
//! `REVIVA_*` environment variables over it, and serves the JSON API under
//! `/api`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use reviva_core::clock::SystemClock;
use reviva_server::{ServerConfig, app, build_campaign};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Reviva birthday re-engagement server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load the demo customers at startup.
  #[arg(long)]
  seed_demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut server_cfg = ServerConfig::load(&cli.config)?;
  server_cfg.seed_demo |= cli.seed_demo;

  let campaign = build_campaign(&server_cfg, Arc::new(SystemClock)).await?;
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app(campaign)).await.context("server error")?;

  Ok(())
}
