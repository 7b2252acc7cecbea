use rusqlite::Connection;

use crate::error::Result;

/// Initialise the schedules schema in `conn`.
///
/// Safe to call on every startup — uses `IF NOT EXISTS` throughout.
/// Durations are stored as integral milliseconds, instants as ISO-8601
/// text so the per-user expiry filter can compare lexically.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schedules (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id      INTEGER NOT NULL,
            medication   TEXT    NOT NULL,
            frequency_ms INTEGER NOT NULL,
            duration_ms  INTEGER NOT NULL,
            start_time   TEXT    NOT NULL,   -- ISO-8601
            end_time     TEXT    NOT NULL    -- ISO-8601, far-future sentinel when perpetual
        ) STRICT;

        CREATE INDEX IF NOT EXISTS idx_schedules_user ON schedules (user_id);
        ",
    )?;
    Ok(())
}
