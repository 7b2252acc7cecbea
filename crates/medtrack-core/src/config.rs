use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::duration::parse_duration;
use crate::error::Result;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_NEXT_TAKINGS_PERIOD: &str = "1h";

/// Top-level config (medtrack.toml + MEDTRACK_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedtrackConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub takings: TakingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Next-takings lookahead settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakingsConfig {
    /// How far ahead of "now" the next-takings endpoint searches,
    /// as a human duration string ("1h", "30m").
    #[serde(default = "default_period")]
    pub next_takings_period: String,
}

impl Default for TakingsConfig {
    fn default() -> Self {
        Self {
            next_takings_period: default_period(),
        }
    }
}

impl TakingsConfig {
    /// The lookahead period parsed into a concrete duration.
    pub fn period(&self) -> Result<chrono::Duration> {
        parse_duration(&self.next_takings_period)
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_period() -> String {
    DEFAULT_NEXT_TAKINGS_PERIOD.to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.medtrack/medtrack.db", home)
}

impl MedtrackConfig {
    /// Load config from a TOML file with MEDTRACK_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.medtrack/medtrack.toml
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: MedtrackConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("MEDTRACK_").split("_"))
            .extract()
            .map_err(|e| crate::error::MedtrackError::Config(e.to_string()))?;

        // Surface a bad period string at load time, not on the first request.
        config.takings.period()?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.medtrack/medtrack.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = MedtrackConfig::default();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(
            config.takings.period().unwrap(),
            chrono::Duration::hours(1)
        );
    }

    #[test]
    fn period_string_parses() {
        let takings = TakingsConfig {
            next_takings_period: "90m".to_string(),
        };
        assert_eq!(takings.period().unwrap(), chrono::Duration::minutes(90));
    }
}
