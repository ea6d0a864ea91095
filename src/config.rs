use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::db::transaction::ReadConsistency;

/// Configuration errors reported at start-up
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set in environment or .env file")]
    Missing(&'static str),
    #[error("Invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub max_page_size: i64,
    pub query_timeout: Duration,
    pub read_consistency: ReadConsistency,
    pub user_id_header: String,
    pub rate_limit_per_second: usize,
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_page_size: i64 = parse_or(&lookup, "MAX_PAGE_SIZE", 100)?;
        if max_page_size < 1 {
            return Err(ConfigError::Invalid {
                name: "MAX_PAGE_SIZE",
                value: max_page_size.to_string(),
            });
        }

        let snapshot: bool = parse_or(&lookup, "LISTING_SNAPSHOT", false)?;

        Ok(Config {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            max_page_size,
            query_timeout: Duration::from_secs(parse_or(&lookup, "QUERY_TIMEOUT_SECS", 10)?),
            read_consistency: if snapshot {
                ReadConsistency::Snapshot
            } else {
                ReadConsistency::Independent
            },
            user_id_header: lookup("USER_ID_HEADER")
                .unwrap_or_else(|| "x-user-id".to_string())
                .to_lowercase(),
            rate_limit_per_second: parse_or(&lookup, "RATE_LIMIT_PER_SECOND", 20)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/ewallet")]))
                .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.query_timeout, Duration::from_secs(10));
        assert_eq!(config.read_consistency, ReadConsistency::Independent);
        assert_eq!(config.user_id_header, "x-user-id");
        assert_eq!(config.rate_limit_per_second, 20);
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/ewallet"),
            ("HOST", "127.0.0.1"),
            ("SERVER_PORT", "3000"),
            ("MAX_PAGE_SIZE", "50"),
            ("LISTING_SNAPSHOT", "true"),
            ("USER_ID_HEADER", "X-Authenticated-User"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.max_page_size, 50);
        assert_eq!(config.read_consistency, ReadConsistency::Snapshot);
        assert_eq!(config.user_id_header, "x-authenticated-user");
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/ewallet"),
            ("SERVER_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid { name: "SERVER_PORT", value: "eighty".to_string() }
        );

        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/ewallet"),
            ("MAX_PAGE_SIZE", "0"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for MAX_PAGE_SIZE: '0'");
    }
}
