use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Badge;

/// Per-user figures derived from the ledger on every read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_quantity: f64,
    pub experience_points: u64,
    pub streak: u32,
    pub last_donation_date: Option<NaiveDate>,
    pub badges: Vec<Badge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub username: String,
    pub total_quantity: f64,
    pub experience_points: u64,
}
