mod api;
mod cli;
mod config;
mod db;
mod error;
mod models;
mod scoring;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::Ledger;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    let db_path = match cli.db {
        Some(path) => path,
        None => config.db_path()?,
    };

    if let Commands::Config { init } = cli.command {
        return handlers::handle_config(&config, &db_path, init);
    }

    AppConfig::ensure_db_dir(&db_path)?;
    let ledger = Ledger::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("{} donations on record", ledger.count()?);
    }

    let outcome = match cli.command {
        Commands::Donate {
            username,
            kg,
            date,
            json,
        } => handlers::handle_donate(&ledger, &username, &kg, date, json),
        Commands::Stats { username, json } => handlers::handle_stats(&ledger, &username, json),
        Commands::Leaderboard { limit, json } => {
            handlers::handle_leaderboard(&ledger, &config, limit, json)
        }
        Commands::History { username } => handlers::handle_history(&ledger, &username),
        Commands::Export => handlers::handle_export(&ledger),
        Commands::Config { .. } => unreachable!(),
    };

    // Close on every path, then report the command's own error first
    let closed = ledger.close().context("Closing database");
    outcome?;
    closed
}
