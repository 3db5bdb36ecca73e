//! `pharmacy-api`: the pharmacy HTTP server.
//!
//! Usage:
//!   pharmacy-api [--db-path <file>] [--listen <addr>] [--log-json]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use pharmacy_core::PharmacyCore;

/// Pharmacy catalog and stock ledger server.
#[derive(Parser, Debug)]
#[command(name = "pharmacy-api", about = "Pharmacy catalog and stock ledger server")]
struct Cli {
    /// SQLite database file (created if missing).
    #[arg(long = "db-path", env = "PHARMACY_DB_PATH", default_value = "pharmacy.db")]
    db_path: PathBuf,

    /// Listen address.
    #[arg(long = "listen", env = "PHARMACY_LISTEN", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Emit logs as JSON lines.
    #[arg(long = "log-json", env = "PHARMACY_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    pharmacy_api::telemetry::init(cli.log_json);

    info!("Opening database at {}", cli.db_path.display());
    let core = PharmacyCore::open(&cli.db_path)
        .with_context(|| format!("failed to open database {}", cli.db_path.display()))?;

    let app = pharmacy_api::build_app(Arc::new(core));

    let listener = tokio::net::TcpListener::bind(&cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
