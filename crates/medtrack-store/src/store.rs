use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use tracing::{debug, instrument};

use medtrack_engine::Schedule;

use crate::error::{Result, StoreError};

const SCHEDULE_COLUMNS: &str =
    "id, user_id, medication, frequency_ms, duration_ms, start_time, end_time";

/// Thread-safe store for persisted schedules.
///
/// Wraps a single SQLite connection in a `Mutex`. For high-concurrency
/// deployments consider a connection pool, but a Mutex is sufficient for
/// the single-node target.
pub struct ScheduleStore {
    db: Mutex<Connection>,
}

impl ScheduleStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Insert a new schedule and return its assigned row id.
    ///
    /// Validation and validity stamping happen in the service layer before
    /// this runs; the store persists the record as given.
    #[instrument(skip(self, schedule), fields(user_id = schedule.user_id))]
    pub fn create(&self, schedule: &Schedule) -> Result<i64> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO schedules
             (user_id, medication, frequency_ms, duration_ms, start_time, end_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                schedule.user_id,
                schedule.medication,
                schedule.frequency.num_milliseconds(),
                schedule.duration.num_milliseconds(),
                schedule.start_time.to_rfc3339(),
                schedule.end_time.to_rfc3339(),
            ],
        )?;
        let id = db.last_insert_rowid();
        debug!(schedule_id = id, "schedule created");
        Ok(id)
    }

    /// Fetch one schedule by owner + identifier.
    #[instrument(skip(self))]
    pub fn get_by_ids(&self, user_id: i64, schedule_id: i64) -> Result<Schedule> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            &format!(
                "SELECT {SCHEDULE_COLUMNS} FROM schedules
                 WHERE user_id = ?1 AND id = ?2"
            ),
            rusqlite::params![user_id, schedule_id],
            row_to_schedule,
        ) {
            Ok(s) => Ok(s),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::ScheduleNotFound {
                user_id,
                schedule_id,
            }),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    /// All of a user's schedules that have not yet expired at `now`
    /// (perpetual schedules always qualify), in creation order.
    #[instrument(skip(self))]
    pub fn list_for_user(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<Schedule>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules
             WHERE user_id = ?1 AND (duration_ms = 0 OR end_time > ?2)
             ORDER BY id"
        ))?;
        let rows = stmt.query_map(
            rusqlite::params![user_id, now.to_rfc3339()],
            row_to_schedule,
        )?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Permanently delete a schedule record.
    #[instrument(skip(self))]
    pub fn delete(&self, user_id: i64, schedule_id: i64) -> Result<()> {
        let db = self.db.lock().unwrap();
        let rows_changed = db.execute(
            "DELETE FROM schedules WHERE user_id = ?1 AND id = ?2",
            rusqlite::params![user_id, schedule_id],
        )?;
        if rows_changed == 0 {
            return Err(StoreError::ScheduleNotFound {
                user_id,
                schedule_id,
            });
        }
        Ok(())
    }
}

/// Map a SQLite row to a `Schedule`. The transient `takings` payload is
/// never stored, so it comes back empty.
fn row_to_schedule(row: &rusqlite::Row<'_>) -> rusqlite::Result<Schedule> {
    Ok(Schedule {
        id: row.get(0)?,
        user_id: row.get(1)?,
        medication: row.get(2)?,
        frequency: Duration::milliseconds(row.get::<_, i64>(3)?),
        duration: Duration::milliseconds(row.get::<_, i64>(4)?),
        start_time: parse_instant(row, 5)?,
        end_time: parse_instant(row, 6)?,
        takings: Vec::new(),
    })
}

fn parse_instant(row: &rusqlite::Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(index)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                index,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn open_store() -> ScheduleStore {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_db(&conn).unwrap();
        ScheduleStore::new(conn)
    }

    fn sample(user_id: i64, duration: Duration, now: DateTime<Utc>) -> Schedule {
        let mut s = Schedule::new(user_id, "Aspirin", Duration::minutes(30), duration);
        s.stamp_validity(now);
        s
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let store = open_store();
        let first = store.create(&sample(1, Duration::zero(), noon())).unwrap();
        let second = store.create(&sample(1, Duration::zero(), noon())).unwrap();
        assert!(first > 0);
        assert_eq!(second, first + 1);
    }

    #[test]
    fn round_trips_all_fields() {
        let store = open_store();
        let schedule = sample(7, Duration::hours(24), noon());
        let id = store.create(&schedule).unwrap();

        let loaded = store.get_by_ids(7, id).unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.user_id, 7);
        assert_eq!(loaded.medication, "Aspirin");
        assert_eq!(loaded.frequency, Duration::minutes(30));
        assert_eq!(loaded.duration, Duration::hours(24));
        assert_eq!(loaded.start_time, schedule.start_time);
        assert_eq!(loaded.end_time, schedule.end_time);
        assert!(loaded.takings.is_empty());
    }

    #[test]
    fn get_by_ids_scopes_to_owner() {
        let store = open_store();
        let id = store.create(&sample(1, Duration::zero(), noon())).unwrap();
        assert!(matches!(
            store.get_by_ids(2, id),
            Err(StoreError::ScheduleNotFound { .. })
        ));
    }

    #[test]
    fn list_excludes_expired_schedules() {
        let store = open_store();
        let now = noon();
        // Perpetual, still-running, and expired an hour ago.
        store.create(&sample(1, Duration::zero(), now)).unwrap();
        store.create(&sample(1, Duration::hours(24), now)).unwrap();
        store
            .create(&sample(1, Duration::hours(1), now - Duration::hours(2)))
            .unwrap();

        let listed = store.list_for_user(1, now).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|s| s.user_id == 1));
    }

    #[test]
    fn delete_removes_the_row() {
        let store = open_store();
        let id = store.create(&sample(1, Duration::zero(), noon())).unwrap();
        store.delete(1, id).unwrap();
        assert!(matches!(
            store.delete(1, id),
            Err(StoreError::ScheduleNotFound { .. })
        ));
    }
}
