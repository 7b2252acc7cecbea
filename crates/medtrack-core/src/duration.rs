//! Human-readable duration strings, as they appear in the config file and
//! in schedule creation requests: one or more `<number><unit>` groups with
//! units `s`, `m`, `h`, `d` (e.g. `"30m"`, `"1h30m"`). A bare `"0"` is
//! accepted and means a zero duration.

use chrono::Duration;

use crate::error::{MedtrackError, Result};

/// Parse a duration string into a `chrono::Duration`.
///
/// Negative values cannot be expressed; the result is always `>= 0`.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let s = input.trim();
    if s.is_empty() {
        return Err(invalid(input, "empty string"));
    }
    // Perpetual schedules are created with a plain zero.
    if s == "0" {
        return Ok(Duration::zero());
    }

    let mut total = Duration::zero();
    let mut digits = String::new();
    let mut seen_group = false;

    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return Err(invalid(input, "unit with no preceding number"));
        }
        let value: i64 = digits
            .parse()
            .map_err(|_| invalid(input, "number too large"))?;
        let group = match c {
            's' => Duration::try_seconds(value),
            'm' => Duration::try_minutes(value),
            'h' => Duration::try_hours(value),
            'd' => Duration::try_days(value),
            other => return Err(invalid(input, &format!("unknown unit {other:?}"))),
        };
        total = group
            .and_then(|g| total.checked_add(&g))
            .ok_or_else(|| invalid(input, "value out of range"))?;
        digits.clear();
        seen_group = true;
    }

    if !digits.is_empty() {
        return Err(invalid(input, "trailing number without a unit"));
    }
    if !seen_group {
        return Err(invalid(input, "no duration groups found"));
    }
    Ok(total)
}

/// Render a duration back into the compound string form accepted by
/// [`parse_duration`]. Zero renders as `"0"` (perpetual).
pub fn format_duration(d: Duration) -> String {
    if d <= Duration::zero() {
        return "0".to_string();
    }
    let mut secs = d.num_seconds();
    let mut out = String::new();
    for (unit, size) in [('d', 86_400), ('h', 3_600), ('m', 60), ('s', 1)] {
        let count = secs / size;
        if count > 0 {
            out.push_str(&format!("{count}{unit}"));
            secs -= count * size;
        }
    }
    out
}

fn invalid(input: &str, reason: &str) -> MedtrackError {
    MedtrackError::InvalidDuration {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
