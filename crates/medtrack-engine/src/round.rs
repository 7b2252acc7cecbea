use chrono::{DateTime, Duration, Timelike, Utc};

/// Round `t` up to the next multiple of `step_min` minutes within the hour,
/// dropping seconds and sub-second components. Instants already on the grid
/// pass through unchanged (after truncation to the minute), so the function
/// is idempotent: `round_up(round_up(t)) == round_up(t)`.
pub fn round_up(t: DateTime<Utc>, step_min: u32) -> DateTime<Utc> {
    let truncated = t
        - Duration::seconds(t.second() as i64)
        - Duration::nanoseconds(t.nanosecond() as i64);

    if step_min == 0 {
        return truncated;
    }
    let remainder = truncated.minute() % step_min;
    if remainder == 0 {
        truncated
    } else {
        truncated + Duration::minutes((step_min - remainder) as i64)
    }
}

/// Round `t` up to the next quarter-hour boundary.
pub fn round_up_15(t: DateTime<Utc>) -> DateTime<Utc> {
    round_up(t, 15)
}
