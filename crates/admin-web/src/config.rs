//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Admin web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Liturgical calendar base URL.
    pub calendar_url: String,
    /// Use the Israel reading schedule.
    pub calendar_israel: bool,
    /// How many members the honor dropdowns offer.
    pub member_search_limit: usize,
    /// Triennial flag used until the setting is stored.
    pub triennial_default: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ADMIN_ADDR` | Server bind address | `127.0.0.1:8788` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:honors.db?mode=rwc` |
    /// | `CALENDAR_URL` | Calendar base URL | `https://www.hebcal.com` |
    /// | `CALENDAR_ISRAEL` | Israel reading schedule | `false` |
    /// | `MEMBER_SEARCH_LIMIT` | Members offered per dropdown | `500` |
    /// | `TRIENNIAL_DEFAULT` | Triennial flag when unset | `false` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("ADMIN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8788".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:honors.db?mode=rwc".to_string());

        let calendar_url = env::var("CALENDAR_URL")
            .unwrap_or_else(|_| "https://www.hebcal.com".to_string());

        let calendar_israel = flag("CALENDAR_ISRAEL")?;

        let member_search_limit = match env::var("MEMBER_SEARCH_LIMIT") {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("MEMBER_SEARCH_LIMIT"))?,
            Err(_) => 500,
        };

        let triennial_default = flag("TRIENNIAL_DEFAULT")?;

        Ok(Self {
            addr,
            database_url,
            calendar_url,
            calendar_israel,
            member_search_limit,
            triennial_default,
        })
    }
}

fn flag(name: &'static str) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_flag(&value).ok_or(ConfigError::InvalidFlag(name)),
        Err(_) => Ok(false),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ADMIN_ADDR format")]
    InvalidAddr,

    #[error("{0} must be true or false")]
    InvalidFlag(&'static str),

    #[error("{0} must be a whole number")]
    InvalidNumber(&'static str),
}
