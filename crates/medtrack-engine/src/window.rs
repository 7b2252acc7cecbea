use chrono::{DateTime, Duration, NaiveTime, Utc};

/// The daily dosing window and rounding grid, carried explicitly so tests
/// can construct alternate windows without process-wide state.
///
/// The default window runs 08:00–22:00 with a 15-minute grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DosingWindow {
    /// Local start-of-window time on the reference instant's calendar day.
    pub start: NaiveTime,
    /// Length of the window; the window end is `start + span`.
    pub span: Duration,
    /// Rounding grid resolution in minutes.
    pub grid_step_min: u32,
}

impl Default for DosingWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            span: Duration::hours(14),
            grid_step_min: 15,
        }
    }
}

impl DosingWindow {
    /// Start of the dosing window on `reference`'s calendar day.
    pub fn day_start(&self, reference: DateTime<Utc>) -> DateTime<Utc> {
        reference.date_naive().and_time(self.start).and_utc()
    }

    /// End of the dosing window on `reference`'s calendar day.
    pub fn day_end(&self, reference: DateTime<Utc>) -> DateTime<Utc> {
        self.day_start(reference) + self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_window_is_eight_to_twenty_two() {
        let window = DosingWindow::default();
        let reference = Utc.with_ymd_and_hms(2025, 3, 10, 13, 42, 7).unwrap();
        assert_eq!(
            window.day_start(reference),
            Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()
        );
        assert_eq!(
            window.day_end(reference),
            Utc.with_ymd_and_hms(2025, 3, 10, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn window_anchors_to_the_reference_day() {
        let window = DosingWindow::default();
        let just_after_midnight = Utc.with_ymd_and_hms(2025, 3, 11, 0, 5, 0).unwrap();
        assert_eq!(
            window.day_start(just_after_midnight),
            Utc.with_ymd_and_hms(2025, 3, 11, 8, 0, 0).unwrap()
        );
    }
}
