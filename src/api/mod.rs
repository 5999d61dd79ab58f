//! Request and response shapes for the three boundary operations.
//!
//! Requests are validated into core types before anything reaches the
//! ledger; responses serialize with the camelCase keys clients expect.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::Ledger;
use crate::error::{HarvestError, Result};
use crate::models::{LeaderboardEntry, RecordId, UserStats, check_quantity};
use crate::scoring::StatsFacade;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepts `12.5` as well as `"12.5"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(f64),
    Text(String),
}

impl QuantityInput {
    fn parse(&self) -> Result<f64> {
        match self {
            QuantityInput::Number(n) => Ok(*n),
            QuantityInput::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                HarvestError::validation(format!("quantity '{}' is not a number", s))
            }),
        }
    }
}

/// Strict `YYYY-MM-DD`: the parsed date must format back to the exact input.
fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .filter(|d| d.format(DATE_FORMAT).to_string() == raw)
        .ok_or_else(|| {
            HarvestError::validation(format!("date '{}' is not in YYYY-MM-DD form", raw))
        })
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitDonationRequest {
    #[serde(default)]
    pub username: String,
    /// Missing quantity counts as zero kilograms.
    #[serde(default, alias = "kg")]
    pub quantity: Option<QuantityInput>,
    #[serde(default)]
    pub date: Option<String>,
}

/// A submission that passed validation and can be appended as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDonation {
    pub username: String,
    pub quantity: f64,
    pub date: Option<NaiveDate>,
}

impl SubmitDonationRequest {
    pub fn validate(self) -> Result<ValidDonation> {
        if self.username.is_empty() {
            return Err(HarvestError::validation("username must not be empty"));
        }

        let quantity = match &self.quantity {
            Some(q) => q.parse()?,
            None => 0.0,
        };
        let quantity = check_quantity(quantity)?;
        let date = self.date.as_deref().map(parse_date).transpose()?;

        Ok(ValidDonation {
            username: self.username,
            quantity,
            date,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsRequest {
    pub username: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardRequest {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(skip)]
    pub id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: UserStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn from_error(err: &HarvestError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
        }
    }
}

pub fn submit_donation(ledger: &Ledger, request: SubmitDonationRequest) -> Result<SubmitResponse> {
    let donation = request.validate().inspect_err(|e| {
        log::warn!("rejected donation: {}", e);
    })?;
    let id = ledger.append(&donation.username, donation.quantity, donation.date)?;
    Ok(SubmitResponse { success: true, id })
}

pub fn get_stats(ledger: &Ledger, request: &StatsRequest) -> Result<StatsResponse> {
    let stats = StatsFacade::new(ledger).snapshot(&request.username)?;
    Ok(StatsResponse {
        success: true,
        stats,
    })
}

pub fn get_leaderboard(
    ledger: &Ledger,
    request: &LeaderboardRequest,
    default_size: usize,
) -> Result<Vec<LeaderboardEntry>> {
    StatsFacade::new(ledger).leaderboard(request.limit.unwrap_or(default_size))
}
