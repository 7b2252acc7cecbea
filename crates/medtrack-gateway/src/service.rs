use chrono::{DateTime, Duration, Utc};
use tracing::info;

use medtrack_engine::{next_takings, DosingWindow, Schedule};
use medtrack_store::ScheduleStore;

use crate::error::{ApiError, Result};

/// Composes the store and the dosing engine behind the HTTP handlers.
///
/// Every method takes the current instant explicitly so the whole layer
/// stays deterministic under test; handlers pass `Utc::now()`.
pub struct ScheduleService {
    store: ScheduleStore,
    window: DosingWindow,
    /// Lookahead for the next-takings search (config `takings.next_takings_period`).
    period: Duration,
}

impl ScheduleService {
    pub fn new(store: ScheduleStore, period: Duration) -> Self {
        Self {
            store,
            window: DosingWindow::default(),
            period,
        }
    }

    /// Validate, stamp the validity window, and persist a new schedule.
    /// Returns the assigned id.
    pub fn create_schedule(&self, mut schedule: Schedule, now: DateTime<Utc>) -> Result<i64> {
        if schedule.user_id <= 0 {
            return Err(ApiError::InvalidUserId);
        }
        if schedule.medication.trim().is_empty() {
            return Err(ApiError::InvalidMedication);
        }
        schedule.validate()?;

        schedule.stamp_validity(now);
        let id = self.store.create(&schedule)?;
        info!(
            schedule_id = id,
            user_id = schedule.user_id,
            medication = %schedule.medication,
            "schedule created"
        );
        Ok(id)
    }

    /// One schedule with today's dose instants recomputed and attached.
    pub fn schedule_by_ids(
        &self,
        user_id: i64,
        schedule_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Schedule> {
        let mut schedule = self.store.get_by_ids(user_id, schedule_id)?;
        schedule.takings = schedule.day_takings(&self.window, now);
        Ok(schedule)
    }

    /// A user's unexpired schedules, takings not computed.
    pub fn schedules_by_user(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<Schedule>> {
        Ok(self.store.list_for_user(user_id, now)?)
    }

    /// For each of the user's active schedules, the single next dose inside
    /// `[now, now + period]`; schedules with no upcoming dose are omitted.
    pub fn next_takings(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<Schedule>> {
        let schedules = self.store.list_for_user(user_id, now)?;
        Ok(next_takings(schedules, &self.window, now, self.period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use medtrack_engine::ScheduleError;
    use medtrack_store::StoreError;

    fn service(period: Duration) -> ScheduleService {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        medtrack_store::db::init_db(&conn).unwrap();
        ScheduleService::new(ScheduleStore::new(conn), period)
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn create_stamps_validity_and_persists() {
        let svc = service(Duration::hours(1));
        let schedule = Schedule::new(1, "Aspirin", Duration::minutes(30), Duration::hours(24));
        let id = svc.create_schedule(schedule, noon()).unwrap();

        let loaded = svc.schedule_by_ids(1, id, noon() + Duration::hours(1)).unwrap();
        assert_eq!(loaded.start_time, noon());
        assert_eq!(loaded.end_time, noon() + Duration::hours(24));
        assert!(!loaded.takings.is_empty());
    }

    #[test]
    fn create_rejects_invalid_input_before_persisting() {
        let svc = service(Duration::hours(1));

        let bad_freq = Schedule::new(1, "Aspirin", Duration::minutes(10), Duration::zero());
        assert!(matches!(
            svc.create_schedule(bad_freq, noon()),
            Err(ApiError::Validation(ScheduleError::InvalidFrequency))
        ));

        let no_user = Schedule::new(0, "Aspirin", Duration::hours(1), Duration::zero());
        assert!(matches!(
            svc.create_schedule(no_user, noon()),
            Err(ApiError::InvalidUserId)
        ));

        let unnamed = Schedule::new(1, "  ", Duration::hours(1), Duration::zero());
        assert!(matches!(
            svc.create_schedule(unnamed, noon()),
            Err(ApiError::InvalidMedication)
        ));

        assert!(svc.schedules_by_user(1, noon()).unwrap().is_empty());
    }

    #[test]
    fn missing_schedule_is_not_found() {
        let svc = service(Duration::hours(1));
        assert!(matches!(
            svc.schedule_by_ids(1, 42, noon()),
            Err(ApiError::Store(StoreError::ScheduleNotFound { .. }))
        ));
    }

    #[test]
    fn next_takings_returns_single_upcoming_dose() {
        let svc = service(Duration::hours(2));
        let schedule = Schedule::new(1, "Aspirin", Duration::hours(2), Duration::zero());
        svc.create_schedule(schedule, noon()).unwrap();

        // 12:15 with a 2h lookahead: next dose on the 2h grid is 14:00.
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 15, 0).unwrap();
        let result = svc.next_takings(1, now).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result[0].takings,
            vec![Utc.with_ymd_and_hms(2025, 1, 1, 14, 0, 0).unwrap()]
        );
    }

    #[test]
    fn next_takings_omits_schedules_with_no_match() {
        let svc = service(Duration::minutes(30));
        let schedule = Schedule::new(1, "Aspirin", Duration::hours(2), Duration::zero());
        svc.create_schedule(schedule, noon()).unwrap();

        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 15, 0).unwrap();
        assert!(svc.next_takings(1, now).unwrap().is_empty());
    }
}
