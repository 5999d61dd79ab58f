use chrono::{Local, NaiveDate};
use rusqlite::{Connection, Row, params};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use crate::db::migrations::run_migrations;
use crate::error::{HarvestError, Result};
use crate::models::{DonationRecord, RecordId, check_quantity, total_quantity};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Append-only store of donation facts.
///
/// All access goes through [`Ledger::with_conn`], which holds the connection
/// lock for exactly one operation. Every write is a single statement and every
/// read a single `SELECT`, so callers never observe a half-written record.
pub struct Ledger {
    conn: Mutex<Connection>,
}

impl Ledger {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        // WAL lets readers proceed while another process is appending
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        log::debug!("opened ledger at {:?}", path);
        Self::from_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Flushes and releases the underlying connection.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| HarvestError::LockPoisoned)?;
        conn.close().map_err(|(_, e)| HarvestError::from(e))?;
        log::debug!("ledger closed");
        Ok(())
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.conn.lock().map_err(|_| HarvestError::LockPoisoned)?;
        f(&conn)
    }

    /// Records a donation. `date` defaults to today in local time.
    pub fn append(
        &self,
        username: &str,
        quantity: f64,
        date: Option<NaiveDate>,
    ) -> Result<RecordId> {
        if username.is_empty() {
            return Err(HarvestError::validation("username must not be empty"));
        }
        let quantity = check_quantity(quantity)?;
        let date = date.unwrap_or_else(|| Local::now().date_naive());

        let id = self.with_conn(|conn| {
            conn.query_row(
                "INSERT INTO donations (username, quantity, date) VALUES (?1, ?2, ?3)
                 RETURNING id",
                params![username, quantity, date],
                |row| row.get::<_, i64>(0),
            )
            .map_err(HarvestError::from)
        })?;

        log::info!(
            "recorded donation #{} for {}: {} kg on {}",
            id,
            username,
            quantity,
            date
        );
        Ok(id)
    }

    pub fn all_records(&self) -> Result<Vec<DonationRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, quantity, date FROM donations ORDER BY date, id",
            )?;
            let rows = stmt.query_map([], map_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(HarvestError::from)
        })
    }

    pub fn records_for(&self, username: &str) -> Result<Vec<DonationRecord>> {
        log::debug!("loading records for {}", username);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, quantity, date FROM donations
                 WHERE username = ?1 ORDER BY date, id",
            )?;
            let rows = stmt.query_map(params![username], map_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(HarvestError::from)
        })
    }

    /// Total quantity per user, summed in the same order as `records_for`.
    pub fn aggregate_by_user(&self) -> Result<BTreeMap<String, f64>> {
        let mut grouped: BTreeMap<String, Vec<DonationRecord>> = BTreeMap::new();
        for record in self.all_records()? {
            grouped.entry(record.username.clone()).or_default().push(record);
        }
        Ok(grouped
            .into_iter()
            .map(|(username, records)| (username, total_quantity(&records)))
            .collect())
    }

    pub fn count(&self) -> Result<i64> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM donations", [], |row| row.get(0))
                .map_err(HarvestError::from)
        })
    }
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<DonationRecord> {
    Ok(DonationRecord {
        id: row.get(0)?,
        username: row.get(1)?,
        quantity: row.get(2)?,
        date: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn append_assigns_increasing_ids() {
        let ledger = Ledger::open_in_memory().unwrap();
        let a = ledger.append("amy", 2.0, Some(day("2024-03-01"))).unwrap();
        let b = ledger.append("amy", 3.0, Some(day("2024-03-02"))).unwrap();
        assert!(b > a);
        assert_eq!(ledger.count().unwrap(), 2);
    }

    #[test]
    fn append_rejects_invalid_input() {
        let ledger = Ledger::open_in_memory().unwrap();

        let err = ledger.append("", 1.0, None).unwrap_err();
        assert!(err.is_validation());
        let err = ledger.append("amy", -0.5, None).unwrap_err();
        assert!(err.is_validation());
        let err = ledger.append("amy", f64::NAN, None).unwrap_err();
        assert!(err.is_validation());

        assert_eq!(ledger.count().unwrap(), 0);
    }

    #[test]
    fn zero_quantity_is_accepted() {
        let ledger = Ledger::open_in_memory().unwrap();
        ledger.append("amy", 0.0, Some(day("2024-03-01"))).unwrap();
        assert_eq!(ledger.records_for("amy").unwrap()[0].quantity, 0.0);
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let ledger = Ledger::open_in_memory().unwrap();
        ledger.append("amy", 1.0, None).unwrap();
        let records = ledger.records_for("amy").unwrap();
        assert_eq!(records[0].date, Local::now().date_naive());
    }

    #[test]
    fn records_for_is_case_sensitive_and_date_ordered() {
        let ledger = Ledger::open_in_memory().unwrap();
        ledger.append("amy", 1.0, Some(day("2024-03-05"))).unwrap();
        ledger.append("Amy", 4.0, Some(day("2024-03-01"))).unwrap();
        ledger.append("amy", 2.0, Some(day("2024-03-02"))).unwrap();

        let records = ledger.records_for("amy").unwrap();
        let dates: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day("2024-03-02"), day("2024-03-05")]);
        assert!(ledger.records_for("nobody").unwrap().is_empty());
        assert_eq!(ledger.all_records().unwrap().len(), 3);
    }

    #[test]
    fn aggregate_matches_sum_of_appends() {
        let ledger = Ledger::open_in_memory().unwrap();
        let amy = [1.5, 2.25, 0.25, 10.0];
        let bob = [4.0, 0.5];
        for (i, q) in amy.iter().enumerate() {
            let date = day("2024-01-01") + chrono::Duration::days(i as i64);
            ledger.append("amy", *q, Some(date)).unwrap();
        }
        for q in bob.iter().rev() {
            ledger.append("bob", *q, Some(day("2024-02-01"))).unwrap();
        }

        let totals = ledger.aggregate_by_user().unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["amy"], amy.iter().sum::<f64>());
        assert_eq!(totals["bob"], bob.iter().sum::<f64>());
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.db");

        let ledger = Ledger::open(&path).unwrap();
        let id = ledger.append("amy", 7.5, Some(day("2024-03-01"))).unwrap();
        ledger.close().unwrap();

        let ledger = Ledger::open(&path).unwrap();
        let records = ledger.records_for("amy").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].quantity, 7.5);
        assert_eq!(records[0].date, day("2024-03-01"));
    }

    #[test]
    fn concurrent_appends_on_shared_handle_all_persist() {
        let ledger = Arc::new(Ledger::open_in_memory().unwrap());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for _ in 0..50 {
                        ledger.append("amy", 1.0, Some(day("2024-03-01"))).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(ledger.count().unwrap(), 100);
        assert_eq!(ledger.aggregate_by_user().unwrap()["amy"], 100.0);
    }

    #[test]
    fn concurrent_appends_from_separate_connections_all_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.db");
        Ledger::open(&path).unwrap().close().unwrap();

        let handles: Vec<_> = [2.0, 3.0]
            .into_iter()
            .map(|q| {
                let path = path.clone();
                thread::spawn(move || {
                    let ledger = Ledger::open(&path).unwrap();
                    for _ in 0..20 {
                        ledger.append("amy", q, Some(day("2024-03-01"))).unwrap();
                    }
                    ledger.close().unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let ledger = Ledger::open(&path).unwrap();
        assert_eq!(ledger.count().unwrap(), 40);
        assert_eq!(ledger.aggregate_by_user().unwrap()["amy"], 100.0);
    }
}
