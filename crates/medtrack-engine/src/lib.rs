//! `medtrack-engine` — the dosing-time calculation engine.
//!
//! # Overview
//!
//! Pure functions only: no I/O, no shared state. Given a [`Schedule`]'s
//! abstract parameters (dose frequency, validity span) and a reference
//! instant, the engine answers three questions:
//!
//! | Question                                    | Entry point                    |
//! |---------------------------------------------|--------------------------------|
//! | Which clock-times is a dose due today?      | [`Schedule::day_takings`]          |
//! | Is the schedule in effect right now?        | [`Schedule::is_active`]        |
//! | When is the next dose within a lookahead?   | [`Schedule::find_next_taking`] |
//!
//! All administration times are constrained to a daily dosing window
//! (08:00–22:00 by default) and rounded up to a quarter-hour grid; both
//! are carried explicitly by [`DosingWindow`] so tests can construct
//! alternate windows.

pub mod error;
pub mod round;
pub mod schedule;
pub mod window;

pub use error::{Result, ScheduleError};
pub use round::{round_up, round_up_15};
pub use schedule::{next_takings, Schedule};
pub use window::DosingWindow;
