//! `medtrack-store` — SQLite persistence for medication schedules.
//!
//! Schedules are stored in a single `schedules` table; the computed
//! `takings` payload is never persisted. [`ScheduleStore`] wraps one
//! connection behind a mutex, matching the single-node deployment target.

pub mod db;
pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::ScheduleStore;
