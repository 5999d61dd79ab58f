//! Error types raised by the ledger and the scoring core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarvestError {
    /// Input rejected before touching the store.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("storage error: ledger lock was poisoned")]
    LockPoisoned,
}

impl HarvestError {
    pub fn validation(message: impl Into<String>) -> Self {
        HarvestError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, HarvestError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
