use chrono::{Local, NaiveDate};

use crate::db::Ledger;
use crate::error::Result;
use crate::models::{DonationRecord, LeaderboardEntry, UserStats, total_quantity};
use crate::scoring::badges::{badges, experience_points};
use crate::scoring::leaderboard::top_entries;
use crate::scoring::streak::{best_streak, current_streak};

/// Read side of the ledger: per-user snapshots and the leaderboard.
///
/// Nothing is cached. Every call reads the ledger once and derives the
/// result from that single read.
pub struct StatsFacade<'a> {
    ledger: &'a Ledger,
}

/// A user's records alongside their longest-ever run.
#[derive(Debug, Clone)]
pub struct History {
    pub records: Vec<DonationRecord>,
    pub best_streak: u32,
}

impl<'a> StatsFacade<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    pub fn snapshot(&self, username: &str) -> Result<UserStats> {
        self.snapshot_on(username, Local::now().date_naive())
    }

    /// Unknown users are not an error; they get an all-zero snapshot.
    pub fn snapshot_on(&self, username: &str, today: NaiveDate) -> Result<UserStats> {
        let records = self.ledger.records_for(username)?;
        Ok(summarize(&records, today))
    }

    pub fn leaderboard(&self, n: usize) -> Result<Vec<LeaderboardEntry>> {
        let totals = self.ledger.aggregate_by_user()?;
        Ok(top_entries(&totals, n))
    }

    pub fn history(&self, username: &str) -> Result<History> {
        let records = self.ledger.records_for(username)?;
        let best_streak = best_streak(records.iter().map(|r| r.date));
        Ok(History {
            records,
            best_streak,
        })
    }
}

fn summarize(records: &[DonationRecord], today: NaiveDate) -> UserStats {
    let total_quantity = total_quantity(records);
    let streak = current_streak(records.iter().map(|r| r.date), today);

    UserStats {
        total_quantity,
        experience_points: experience_points(total_quantity),
        streak,
        last_donation_date: records.iter().map(|r| r.date).max(),
        badges: badges(total_quantity, streak),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Badge;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn ago(days: i64) -> Option<NaiveDate> {
        Some(today() - Duration::days(days))
    }

    #[test]
    fn unknown_user_gets_zero_snapshot() {
        let ledger = Ledger::open_in_memory().unwrap();
        let stats = StatsFacade::new(&ledger).snapshot_on("ghost", today()).unwrap();
        assert_eq!(stats, UserStats::default());
        assert_eq!(stats.last_donation_date, None);
    }

    #[test]
    fn snapshot_combines_totals_streak_and_badges() {
        let ledger = Ledger::open_in_memory().unwrap();
        ledger.append("amy", 30.0, ago(0)).unwrap();
        ledger.append("amy", 20.0, ago(1)).unwrap();
        ledger.append("amy", 12.5, ago(2)).unwrap();
        ledger.append("amy", 1.0, ago(2)).unwrap();
        ledger.append("bob", 500.0, ago(0)).unwrap();

        let stats = StatsFacade::new(&ledger).snapshot_on("amy", today()).unwrap();
        assert_eq!(stats.total_quantity, 63.5);
        assert_eq!(stats.experience_points, 635);
        assert_eq!(stats.streak, 3);
        assert_eq!(stats.last_donation_date, ago(0));
        assert_eq!(stats.badges, vec![Badge::BronzeSaver, Badge::ThreeDayStreak]);
    }

    #[test]
    fn last_donation_date_is_latest_not_last_inserted() {
        let ledger = Ledger::open_in_memory().unwrap();
        ledger.append("amy", 1.0, ago(2)).unwrap();
        ledger.append("amy", 1.0, ago(10)).unwrap();

        let stats = StatsFacade::new(&ledger).snapshot_on("amy", today()).unwrap();
        assert_eq!(stats.last_donation_date, ago(2));
        assert_eq!(stats.streak, 0);
    }

    #[test]
    fn snapshot_is_repeatable_and_reflects_new_writes() {
        let ledger = Ledger::open_in_memory().unwrap();
        ledger.append("amy", 5.0, ago(0)).unwrap();
        let facade = StatsFacade::new(&ledger);

        let first = facade.snapshot_on("amy", today()).unwrap();
        let second = facade.snapshot_on("amy", today()).unwrap();
        assert_eq!(first, second);

        ledger.append("amy", 5.0, ago(1)).unwrap();
        let third = facade.snapshot_on("amy", today()).unwrap();
        assert_eq!(third.total_quantity, 10.0);
        assert_eq!(third.streak, 2);
    }

    #[test]
    fn leaderboard_reads_whole_ledger() {
        let ledger = Ledger::open_in_memory().unwrap();
        ledger.append("A", 100.0, ago(0)).unwrap();
        ledger.append("A", 50.0, ago(3)).unwrap();
        ledger.append("B", 300.0, ago(1)).unwrap();
        ledger.append("C", 50.0, ago(2)).unwrap();

        let board = StatsFacade::new(&ledger).leaderboard(5).unwrap();
        let rows: Vec<_> = board
            .iter()
            .map(|e| (e.username.as_str(), e.total_quantity, e.experience_points))
            .collect();
        assert_eq!(
            rows,
            vec![("B", 300.0, 3000), ("A", 150.0, 1500), ("C", 50.0, 500)]
        );
    }

    #[test]
    fn snapshot_and_leaderboard_agree_on_inexact_sums() {
        let ledger = Ledger::open_in_memory().unwrap();
        for _ in 0..10 {
            ledger.append("amy", 0.1, ago(0)).unwrap();
        }
        ledger.append("bob", 0.7, ago(1)).unwrap();
        ledger.append("amy", 0.2, ago(1)).unwrap();

        let facade = StatsFacade::new(&ledger);
        let stats = facade.snapshot_on("amy", today()).unwrap();
        let board = facade.leaderboard(5).unwrap();
        let entry = board.iter().find(|e| e.username == "amy").unwrap();

        assert_eq!(stats.total_quantity, entry.total_quantity);
        assert_eq!(stats.experience_points, entry.experience_points);
    }

    #[test]
    fn history_reports_best_streak() {
        let ledger = Ledger::open_in_memory().unwrap();
        for d in [9, 8, 7, 6, 2, 0] {
            ledger.append("amy", 1.0, ago(d)).unwrap();
        }
        let history = StatsFacade::new(&ledger).history("amy").unwrap();
        assert_eq!(history.records.len(), 6);
        assert_eq!(history.best_streak, 4);
    }
}
