//! `medtrack-core` — configuration and shared plumbing for the medtrack
//! workspace: config loading (TOML + env overrides), the crate-spanning
//! error type, and human-readable duration parsing ("30m", "1h", "0").

pub mod config;
pub mod duration;
pub mod error;

pub use config::MedtrackConfig;
pub use duration::{format_duration, parse_duration};
pub use error::{MedtrackError, Result};
