use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "harvest", version, about = "Track food donations, streaks, badges and the leaderboard")]
pub struct Cli {
    /// Use this database file instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a donation
    Donate {
        /// Donor username (case-sensitive)
        username: String,
        /// Kilograms donated
        kg: String,
        /// Donation date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Print the JSON response instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Show XP, streak and badges for a user
    Stats {
        username: String,
        #[arg(long)]
        json: bool,
    },
    /// Show the top donors
    Leaderboard {
        /// Number of entries (defaults to the configured size)
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// List every donation a user has made
    History { username: String },
    /// Dump the whole ledger as JSON to stdout
    Export,
    /// Show the effective configuration
    Config {
        /// Write the current configuration to the config file
        #[arg(long)]
        init: bool,
    },
}
