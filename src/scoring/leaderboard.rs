use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::LeaderboardEntry;
use crate::scoring::badges::experience_points;

pub const DEFAULT_LEADERBOARD_SIZE: usize = 5;

/// Ranks per-user totals, highest first. Equal totals fall back to username
/// ascending so the order is stable between calls.
pub fn top_entries(totals: &BTreeMap<String, f64>, n: usize) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<(&String, f64)> = totals.iter().map(|(u, q)| (u, *q)).collect();
    ranked.sort_by(|(ua, qa), (ub, qb)| match qb.total_cmp(qa) {
        Ordering::Equal => ua.cmp(ub),
        other => other,
    });

    ranked
        .into_iter()
        .take(n)
        .map(|(username, total)| LeaderboardEntry {
            username: username.clone(),
            total_quantity: total,
            experience_points: experience_points(total),
        })
        .collect()
}
