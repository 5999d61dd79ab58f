pub mod badge;
pub mod donation;
pub mod stats;

pub use badge::Badge;
pub use donation::{DonationRecord, RecordId, check_quantity, total_quantity};
pub use stats::{LeaderboardEntry, UserStats};
