use anyhow::Result;
use serde::Serialize;

use crate::api::{
    self, ErrorResponse, LeaderboardRequest, StatsRequest, SubmitDonationRequest,
};
use crate::config::AppConfig;
use crate::db::Ledger;
use crate::error::HarvestError;
use crate::scoring::StatsFacade;
use crate::scoring::badges::next_quantity_badge;
use crate::utils::format::{format_date, format_kg, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// In JSON mode a failure is also printed as `{success: false, error}` before
/// it propagates.
fn checked<T>(result: crate::error::Result<T>, json: bool) -> Result<T> {
    result.map_err(|err: HarvestError| {
        if !err.is_validation() {
            log::error!("{}", err);
        }
        if json {
            if let Ok(body) = serde_json::to_string_pretty(&ErrorResponse::from_error(&err)) {
                println!("{}", body);
            }
        }
        anyhow::Error::from(err)
    })
}

// ─── Donate ──────────────────────────────────────────────────────────────────

pub fn handle_donate(
    ledger: &Ledger,
    username: &str,
    kg: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let request = SubmitDonationRequest {
        username: username.to_string(),
        quantity: Some(api::QuantityInput::Text(kg.to_string())),
        date,
    };
    let response = checked(api::submit_donation(ledger, request), json)?;

    if json {
        return print_json(&response);
    }
    println_colored!(
        GREEN,
        "  ✓ Donation #{} recorded for {}",
        response.id,
        username
    );
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats(ledger: &Ledger, username: &str, json: bool) -> Result<()> {
    let request = StatsRequest {
        username: username.to_string(),
    };
    let response = checked(api::get_stats(ledger, &request), json)?;
    if json {
        return print_json(&response);
    }

    let stats = &response.stats;
    println!();
    println_colored!(GOLD, "  Donation stats for {}", username);
    println!();
    println_colored!(BOLD, "  Total:       {}", format_kg(stats.total_quantity));
    println!("  XP:          {}", stats.experience_points);
    if stats.streak > 0 {
        println_colored!(GREEN, "  Streak:      {} days", stats.streak);
    } else {
        println_colored!(DIM, "  Streak:      0 days (donate today to start one)");
    }
    println!("  Last:        {}", format_date(stats.last_donation_date));

    println!();
    if stats.badges.is_empty() {
        println_colored!(DIM, "  No badges yet");
    } else {
        for badge in &stats.badges {
            println_colored!(AMBER, "  {} {}", badge.icon(), badge.label());
        }
    }

    if let Some((badge, target)) = next_quantity_badge(stats.total_quantity) {
        println!();
        println_colored!(
            DIM,
            "  Next: {} {}  {}  {} / {}",
            badge.icon(),
            badge.label(),
            progress_bar(stats.total_quantity, target, 12),
            format_kg(stats.total_quantity),
            format_kg(target)
        );
    }
    println!();
    Ok(())
}

// ─── Leaderboard ─────────────────────────────────────────────────────────────

pub fn handle_leaderboard(
    ledger: &Ledger,
    config: &AppConfig,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let request = LeaderboardRequest { limit };
    let board = checked(
        api::get_leaderboard(ledger, &request, config.leaderboard.size),
        json,
    )?;
    if json {
        return print_json(&board);
    }

    println!();
    println_colored!(GOLD, "  Leaderboard");
    println!();
    if board.is_empty() {
        println_colored!(DIM, "  No donations recorded yet");
    }
    for (rank, entry) in board.iter().enumerate() {
        let line = format!(
            "  {:>2}. {:<20}  {:>12}  {:>8} XP",
            rank + 1,
            entry.username,
            format_kg(entry.total_quantity),
            entry.experience_points
        );
        if rank == 0 {
            println_colored!(BOLD, "{}", line);
        } else {
            println!("{}", line);
        }
    }
    println!();
    Ok(())
}

// ─── History ─────────────────────────────────────────────────────────────────

pub fn handle_history(ledger: &Ledger, username: &str) -> Result<()> {
    let history = StatsFacade::new(ledger).history(username)?;

    println!();
    println_colored!(GOLD, "  Donations by {}", username);
    println!();
    if history.records.is_empty() {
        println_colored!(DIM, "  Nothing recorded yet");
        println!();
        return Ok(());
    }
    for record in &history.records {
        println!(
            "  #{:<6} {}  {:>12}",
            record.id,
            record.date.format("%Y-%m-%d"),
            format_kg(record.quantity)
        );
    }
    println!();
    println_colored!(
        DIM,
        "  {} donations  ·  best streak {} days",
        history.records.len(),
        history.best_streak
    );
    println!();
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

pub fn handle_export(ledger: &Ledger) -> Result<()> {
    let records = ledger.all_records()?;
    log::debug!("exporting {} records", records.len());
    print_json(&records)
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(config: &AppConfig, db_path: &std::path::Path, init: bool) -> Result<()> {
    if init {
        let path = config.save()?;
        println_colored!(GREEN, "  ✓ Wrote {}", path.display());
        return Ok(());
    }

    println!("# config file: {}", AppConfig::config_path()?.display());
    println!("# database:    {}", db_path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
