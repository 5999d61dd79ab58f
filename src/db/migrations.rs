use rusqlite::Connection;

use crate::error::Result;

/// Creates the donation table on first open. Safe to call on every startup.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS donations (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL CHECK(username <> ''),
            quantity    REAL NOT NULL CHECK(quantity >= 0),
            date        TEXT NOT NULL,
            created_at  TEXT DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_donations_username ON donations(username);
    ",
    )?;
    log::debug!("donations schema ready");
    Ok(())
}
