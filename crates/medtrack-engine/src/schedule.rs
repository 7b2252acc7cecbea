use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::{Result, ScheduleError};
use crate::round::round_up;
use crate::window::DosingWindow;

/// Sentinel end instant for perpetual schedules ("never expires").
pub fn far_future() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// A medication dosing schedule.
///
/// `start_time` and `end_time` are stamped exactly once, at creation, via
/// [`Schedule::stamp_validity`]; there is no reschedule operation.
/// `takings` is a transient response payload — recomputed on every read,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Assigned by persistence on creation; 0 before that.
    pub id: i64,
    pub user_id: i64,
    pub medication: String,
    /// Time between nominal doses. Must be >= 15 minutes.
    pub frequency: Duration,
    /// Validity span from creation. Zero means perpetual.
    pub duration: Duration,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub takings: Vec<DateTime<Utc>>,
}

impl Schedule {
    /// A not-yet-persisted schedule. Validity instants are placeholders
    /// until [`stamp_validity`](Self::stamp_validity) runs at creation.
    pub fn new(user_id: i64, medication: impl Into<String>, frequency: Duration, duration: Duration) -> Self {
        Self {
            id: 0,
            user_id,
            medication: medication.into(),
            frequency,
            duration,
            start_time: DateTime::<Utc>::UNIX_EPOCH,
            end_time: DateTime::<Utc>::UNIX_EPOCH,
            takings: Vec::new(),
        }
    }

    /// Check the creation-time invariants. Runs before persistence; the
    /// dosing-time computations below assume these hold and do not
    /// re-validate.
    pub fn validate(&self) -> Result<()> {
        if self.frequency < Duration::minutes(15) {
            return Err(ScheduleError::InvalidFrequency);
        }
        if self.duration < Duration::zero() {
            return Err(ScheduleError::InvalidDuration);
        }
        Ok(())
    }

    /// Set `start_time = now` and derive `end_time`: `start + duration`
    /// for bounded schedules, the far-future sentinel for perpetual ones.
    pub fn stamp_validity(&mut self, now: DateTime<Utc>) {
        self.start_time = now;
        self.end_time = if self.duration > Duration::zero() {
            self.start_time + self.duration
        } else {
            far_future()
        };
    }

    /// Whether the schedule is in effect at `now`.
    ///
    /// Perpetual schedules are always active. Bounded schedules are active
    /// strictly between their start and end instants — equality at either
    /// boundary counts as inactive.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        if self.duration == Duration::zero() {
            return true;
        }
        now > self.start_time && now < self.end_time
    }

    /// The ordered, deduplicated dose instants inside `reference`'s dosing
    /// window, regardless of whether the schedule is active then.
    ///
    /// The cursor advances by the raw frequency each step and is rounded to
    /// the grid afterwards, so rounding error never compounds beyond one
    /// grid step. Two raw steps can round to the same grid slot when the
    /// frequency is not a grid multiple; equal values are collapsed.
    pub fn day_grid(&self, window: &DosingWindow, reference: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        // A non-positive frequency would never advance the cursor.
        if self.frequency <= Duration::zero() {
            return Vec::new();
        }

        let day_start = window.day_start(reference);
        let day_end = window.day_end(reference);

        let mut grid = Vec::new();
        let mut cursor = day_start;

        while cursor < day_end {
            let rounded = round_up(cursor, window.grid_step_min);
            if rounded > day_end {
                break;
            }
            if grid.last().map_or(true, |last| rounded > *last) {
                grid.push(rounded);
            }
            cursor += self.frequency;
        }
        grid
    }

    /// Today's dose instants, or an empty list when the schedule is not
    /// active at `now`.
    pub fn day_takings(&self, window: &DosingWindow, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        if !self.is_active(now) {
            return Vec::new();
        }
        self.day_grid(window, now)
    }

    /// The earliest dose strictly after `now` and strictly before
    /// `period_end`, searching day by day while the lookahead window still
    /// overlaps a dosing day.
    ///
    /// Callers are expected to have filtered to schedules active at `now`;
    /// bounded schedules additionally never yield a dose at or after their
    /// `end_time`, so a schedule expiring tonight cannot report tomorrow's
    /// grid.
    pub fn find_next_taking(
        &self,
        window: &DosingWindow,
        now: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let bounded = self.duration > Duration::zero();
        let mut anchor = now;

        loop {
            if window.day_start(anchor) > period_end {
                return None;
            }
            for t in self.day_grid(window, anchor) {
                if t <= now {
                    continue;
                }
                if t >= period_end {
                    return None;
                }
                if bounded && t >= self.end_time {
                    return None;
                }
                return Some(t);
            }
            anchor = window.day_start(anchor) + Duration::days(1);
        }
    }
}

/// Batch "next takings" orchestration: for each active schedule, find its
/// single next dose within `[now, now + period]`; schedules with no match
/// are omitted. Input order is preserved and the computation for each
/// schedule is independent of the others.
pub fn next_takings(
    schedules: Vec<Schedule>,
    window: &DosingWindow,
    now: DateTime<Utc>,
    period: Duration,
) -> Vec<Schedule> {
    let period_end = now + period;
    let mut result = Vec::new();

    for mut schedule in schedules {
        if !schedule.is_active(now) {
            continue;
        }
        if let Some(taking) = schedule.find_next_taking(window, now, period_end) {
            schedule.takings = vec![taking];
            result.push(schedule);
        }
    }
    result
}
