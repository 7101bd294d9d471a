//! # Config - Roster Settings
//!
//! All settings come from environment variables with defaults:
//!
//! ```text
//! ROSTER_DB_PATH   table file                     (default: "db/user.json")
//! ROSTER_ADDR      listen address                 (default: "127.0.0.1:3000")
//! ROSTER_ENV       "production" hides error text  (default: "development")
//! ROSTER_LOG       default log level              (default: "info", RUST_LOG wins)
//! ROSTER_LOG_JSON  JSON log lines                 (default: "false")
//! ```
//!
//! [`Config::from_lookup`] takes the variable source as a closure so tests
//! never have to mutate the process environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DB_PATH: &str = "db/user.json";
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised for environment values that cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON file holding the user table.
    pub db_path: PathBuf,
    /// Address the HTTP server binds to.
    pub addr: SocketAddr,
    /// When `true`, internal error messages are not sent to clients.
    pub production: bool,
    /// Default tracing level when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            addr: DEFAULT_ADDR.parse().unwrap_or_else(|_| ([127, 0, 0, 1], 3000).into()),
            production: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `ROSTER_ADDR` or `ROSTER_LOG_JSON`
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let env_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let db_path = lookup("ROSTER_DB_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let addr_raw = env_or("ROSTER_ADDR", DEFAULT_ADDR);
        let addr = addr_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            var: "ROSTER_ADDR",
            value: addr_raw.clone(),
            reason: e.to_string(),
        })?;

        let production = env_or("ROSTER_ENV", "development").eq_ignore_ascii_case("production");

        let json_raw = env_or("ROSTER_LOG_JSON", "false");
        let log_json = parse_bool(&json_raw).ok_or_else(|| ConfigError::Invalid {
            var: "ROSTER_LOG_JSON",
            value: json_raw.clone(),
            reason: "expected true/false".to_string(),
        })?;

        Ok(Self {
            db_path,
            addr,
            production,
            log_level: env_or("ROSTER_LOG", DEFAULT_LOG_LEVEL),
            log_json,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = from_pairs(&[]).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.addr.port(), 3000);
        assert_eq!(cfg.db_path, PathBuf::from("db/user.json"));
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = from_pairs(&[
            ("ROSTER_DB_PATH", "/tmp/users.json"),
            ("ROSTER_ADDR", "0.0.0.0:8080"),
            ("ROSTER_ENV", "Production"),
            ("ROSTER_LOG", "debug"),
            ("ROSTER_LOG_JSON", "yes"),
        ])
        .unwrap();

        assert_eq!(cfg.db_path, PathBuf::from("/tmp/users.json"));
        assert_eq!(cfg.addr, "0.0.0.0:8080".parse().unwrap());
        assert!(cfg.production);
        assert_eq!(cfg.log_level, "debug");
        assert!(cfg.log_json);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = from_pairs(&[("ROSTER_DB_PATH", "  "), ("ROSTER_LOG", "")]).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(cfg.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn bad_address_is_an_error() {
        let err = from_pairs(&[("ROSTER_ADDR", "not-an-addr")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "ROSTER_ADDR", .. }));
    }

    #[test]
    fn bad_bool_is_an_error() {
        let err = from_pairs(&[("ROSTER_LOG_JSON", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("ROSTER_LOG_JSON"));
    }

    #[test]
    fn any_other_env_is_not_production() {
        let cfg = from_pairs(&[("ROSTER_ENV", "staging")]).unwrap();
        assert!(!cfg.production);
    }
}
