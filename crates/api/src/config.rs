use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL connection URL.
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    /// HS256 secret admin bearer tokens are signed with.
    pub jwt_secret: String,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
    /// Base URL relative media paths are joined onto.
    pub media_base_url: String,
}

fn var_or(key: &'static str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = var_or(key, default);
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", "3030")?,
            database_url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", "20")?,
            db_min_connections: parse_var("DB_MIN_CONNECTIONS", "5")?,
            jwt_secret: var_or("JWT_SECRET", "dev-secret-change-me-in-production"),
            event_bus_capacity: parse_var("EVENT_BUS_CAPACITY", "1024")?,
            log_level: var_or("LOG_LEVEL", "info"),
            media_base_url: var_or("MEDIA_BASE_URL", "/media"),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_number_is_reported_with_key() {
        env::set_var("BRAND_CMS_TEST_BAD_PORT", "abc");
        let err = parse_var::<u16>("BRAND_CMS_TEST_BAD_PORT", "3030").unwrap_err();
        assert_eq!(
            err.to_string(),
            "BRAND_CMS_TEST_BAD_PORT has an invalid value: \"abc\""
        );
    }

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(parse_var::<u32>("BRAND_CMS_TEST_UNSET_VAR", "20").unwrap(), 20);
        assert_eq!(var_or("BRAND_CMS_TEST_UNSET_VAR", "/media"), "/media");
    }
}
