//! Terapias Complementarias site backend entry point.

use std::net::SocketAddr;
use std::path::Path;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use terapias_site::api::{create_router, AppState};
use terapias_site::config::Config;
use terapias_site::store::SettingsStore;
use terapias_site::utils::shutdown_signal;

/// Terapias Complementarias site backend.
#[derive(Parser, Debug)]
#[command(name = "terapias-site")]
#[command(about = "API and static server for the Terapias Complementarias site")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the server (default).
    Run {
        /// HTTP listen port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("terapias_site=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Run { port }) => cmd_run(port).await,
        None => cmd_run(args.port).await,
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    println!("Configuration OK");
    println!("  Port: {}", config.port);
    println!("  Static dir: {}", config.static_dir);
    println!("  Production: {}", config.production);
    println!(
        "  Database: {}",
        if config.database_configured() {
            "configured"
        } else {
            "not configured (defaults-only mode)"
        }
    );

    Ok(())
}

/// Run the HTTP server.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(port) = port_override {
        config.port = port;
    }
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let store = SettingsStore::connect(&config)?;
    if !store.is_configured() {
        warn!("DATABASE_URL not set - API will run without database");
    }

    let state = AppState::new(store);
    let router = create_router(state, Path::new(&config.static_dir));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server running on port {}", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
