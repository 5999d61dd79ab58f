pub mod badges;
pub mod facade;
pub mod leaderboard;
pub mod streak;

pub use facade::StatsFacade;
pub use leaderboard::DEFAULT_LEADERBOARD_SIZE;
