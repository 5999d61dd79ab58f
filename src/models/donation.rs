use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{HarvestError, Result};

pub type RecordId = i64;

/// One immutable donation fact as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationRecord {
    pub id: RecordId,
    pub username: String,
    /// Kilograms, never negative.
    pub quantity: f64,
    pub date: NaiveDate,
}

/// Accepts finite, non-negative kilogram amounts.
pub fn check_quantity(quantity: f64) -> Result<f64> {
    if !quantity.is_finite() {
        return Err(HarvestError::validation(format!(
            "quantity must be a number, got {}",
            quantity
        )));
    }
    if quantity < 0.0 {
        return Err(HarvestError::validation(format!(
            "quantity must not be negative, got {}",
            quantity
        )));
    }
    Ok(quantity)
}

/// Sum of quantities in ledger order. Snapshot and leaderboard totals must
/// both come from here; they have to match bit for bit.
pub fn total_quantity<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a DonationRecord>,
{
    records.into_iter().fold(0.0, |acc, r| acc + r.quantity)
}
