use std::net::SocketAddr;
use std::num::ParseIntError;
use std::time::Duration;

use thiserror::Error;
use utils_trace::{LogFormat, TracingInitError};

use crate::db::DatabaseUrl;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

pub const DEFAULT_LEETCODE_USERNAME: &str = "zyzpaprika";
pub const DEFAULT_CODEFORCES_USERNAME: &str = "paprikazyz";
pub const DEFAULT_GITHUB_USERNAME: &str = "zyzpaprika";

/// Whose stats to fetch and where from. Never supplied by API callers.
#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    pub leetcode_username: String,
    pub codeforces_username: String,
    pub github_username: String,
    pub leetcode_base_url: String,
    pub codeforces_base_url: String,
    pub github_base_url: String,
    pub fetch_timeout: Duration,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            leetcode_username: DEFAULT_LEETCODE_USERNAME.to_string(),
            codeforces_username: DEFAULT_CODEFORCES_USERNAME.to_string(),
            github_username: DEFAULT_GITHUB_USERNAME.to_string(),
            leetcode_base_url: interfaces_leetcode_submit_stats::index::DEFAULT_BASE_URL.to_string(),
            codeforces_base_url: interfaces_codeforces_user_info::index::DEFAULT_BASE_URL.to_string(),
            github_base_url: interfaces_github_users::index::DEFAULT_BASE_URL.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: DatabaseUrl,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub log_format: LogFormat,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("InvalidBindAddr: {value}: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("InvalidFetchTimeout: {value}: {source}")]
    InvalidFetchTimeout {
        value: String,
        source: ParseIntError,
    },
    #[error("InvalidLogFormat: {source}")]
    InvalidLogFormat {
        #[from]
        source: TracingInitError,
    },
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ProvidersConfig::default();
        let or_default = |key: &str, default: String| lookup(key).unwrap_or(default);

        let bind_addr = or_default("BIND_ADDR", DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddr { value: bind_addr.clone(), source })?;

        let fetch_timeout = match lookup("FETCH_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(
                value
                    .parse::<u64>()
                    .map_err(|source| ConfigError::InvalidFetchTimeout { value: value.clone(), source })?,
            ),
            None => defaults.fetch_timeout,
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => value.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            database_url: DatabaseUrl::parse(lookup("DATABASE_URL").as_deref()),
            bind_addr,
            log_level: or_default("LOG_LEVEL", DEFAULT_LOG_LEVEL.to_string()),
            log_format,
            providers: ProvidersConfig {
                leetcode_username: or_default("LEETCODE_USERNAME", defaults.leetcode_username),
                codeforces_username: or_default("CODEFORCES_USERNAME", defaults.codeforces_username),
                github_username: or_default("GITHUB_USERNAME", defaults.github_username),
                leetcode_base_url: or_default("LEETCODE_BASE_URL", defaults.leetcode_base_url),
                codeforces_base_url: or_default("CODEFORCES_BASE_URL", defaults.codeforces_base_url),
                github_base_url: or_default("GITHUB_API_BASE_URL", defaults.github_base_url),
                fetch_timeout,
            },
        })
    }
}
