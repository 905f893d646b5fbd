//! taskpad
//!
//! A personal task manager: an HTTP API over a per-user SQLite task store,
//! plus a command-line report.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use taskpad::cli::report::run_report;
use taskpad::cli::{Cli, Command};
use taskpad::config::{Config, ConfigLoader};
use taskpad::db::Database;
use taskpad::logging::{LogTarget, init_logging};
use taskpad::server::{AppState, start_server};
use taskpad::views::SystemClock;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let target: LogTarget = cli.log.parse()?;
    init_logging(&target, cli.verbose)?;

    let mut loader = ConfigLoader::load(cli.config.as_deref())?;
    for source in loader.sources() {
        debug!(path = %source.display(), "Using config file");
    }

    let config = loader.config_mut();
    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.clone();
    }
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let config = loader.into_config();

    let db = open_database(&config)?;

    match cli.command {
        Some(Command::Report(args)) => {
            let output = run_report(&db, &config, &SystemClock, &args)?;
            println!("{}", output);
        }
        Some(Command::Serve) | None => {
            run_server(db, config).await?;
        }
    }

    Ok(())
}

fn open_database(config: &Config) -> Result<Database> {
    let db_path = &config.server.db_path;
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {}", parent.display()))?;
    }
    Database::open(db_path).with_context(|| format!("opening database {}", db_path.display()))
}

async fn run_server(db: Database, config: Config) -> Result<()> {
    let addr = config.server.socket_addr();
    info!(db = %config.server.db_path.display(), "Starting taskpad");

    let state = AppState::new(Arc::new(db), Arc::new(config));
    let handle = start_server(state, addr).await?;

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C");
    handle.shutdown().await;

    Ok(())
}
