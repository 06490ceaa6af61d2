//! Configuration loading and representation.
//!
//! Everything comes from environment variables with development defaults.

use std::net::SocketAddr;

use thiserror::Error;

use stockroom_observability::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://stockroom.db?mode=rwc";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Seed the default categories into an empty `category` table on startup.
    pub seed_categories: bool,
}

impl DatabaseConfig {
    /// Private in-memory database, used by tests.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            seed_categories: false,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database: DatabaseConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or(&lookup, "STOCKROOM_BIND_ADDR", DEFAULT_BIND_ADDR, |v| {
            v.parse::<SocketAddr>().map_err(|e| e.to_string())
        })?;

        let url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_connections = parse_or(&lookup, "STOCKROOM_DB_MAX_CONNECTIONS", &DEFAULT_MAX_CONNECTIONS.to_string(), |v| {
            match v.parse::<u32>() {
                Ok(0) => Err("must be at least 1".to_string()),
                Ok(n) => Ok(n),
                Err(e) => Err(e.to_string()),
            }
        })?;

        let seed_categories = parse_or(&lookup, "STOCKROOM_SEED_CATEGORIES", "false", parse_bool)?;

        let log_format = parse_or(&lookup, "STOCKROOM_LOG_FORMAT", "json", |v| {
            v.parse::<LogFormat>()
        })?;

        Ok(Self {
            bind_addr,
            database: DatabaseConfig {
                url,
                max_connections,
                seed_categories,
            },
            log_format,
        })
    }
}

fn parse_or<F, T, P>(lookup: &F, key: &'static str, default: &str, parse: P) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T, String>,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    parse(value.trim()).map_err(|reason| ConfigError::Invalid { key, value, reason })
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.database.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(!cfg.database.seed_categories);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("STOCKROOM_BIND_ADDR", "127.0.0.1:3000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("STOCKROOM_DB_MAX_CONNECTIONS", "2"),
            ("STOCKROOM_SEED_CATEGORIES", "yes"),
            ("STOCKROOM_LOG_FORMAT", "pretty"),
        ]))
        .unwrap();

        assert_eq!(cfg.bind_addr.port(), 3000);
        assert!(cfg.database.is_in_memory());
        assert_eq!(cfg.database.max_connections, 2);
        assert!(cfg.database.seed_categories);
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn rejects_zero_connections() {
        let err = AppConfig::from_lookup(lookup(&[("STOCKROOM_DB_MAX_CONNECTIONS", "0")])).unwrap_err();
        match err {
            ConfigError::Invalid { key, .. } => assert_eq!(key, "STOCKROOM_DB_MAX_CONNECTIONS"),
        }
    }

    #[test]
    fn rejects_unparsable_bind_addr() {
        assert!(AppConfig::from_lookup(lookup(&[("STOCKROOM_BIND_ADDR", "localhost")])).is_err());
    }
}
