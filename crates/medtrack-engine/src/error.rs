use thiserror::Error;

/// Validation failures detected before a schedule ever reaches the
/// dosing-time computations. The computations themselves are total over
/// valid schedules and have no failure mode of their own.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("frequency must be at least 15 minutes")]
    InvalidFrequency,

    #[error("duration must be positive or zero for perpetual")]
    InvalidDuration,
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
