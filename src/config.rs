//! Runtime configuration from the environment.
//!
//! `.env` is loaded by the binary before [`Config::from_env`] runs, so values
//! can come from either place:
//!
//! ```text
//! BACKEND_URL=http://127.0.0.1:5001
//! LOG_FILE_PATH=logs/engagement_series.log
//! HTTP_TIMEOUT_SECS=30
//! ```

use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/engagement_series.log";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    pub log_file_path: String,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            log_file_path: DEFAULT_LOG_FILE_PATH.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("HTTP_TIMEOUT_SECS must be a whole number, got '{raw}'"))?,
            ),
            None => defaults.http_timeout,
        };

        Ok(Config {
            backend_url: lookup("BACKEND_URL").unwrap_or(defaults.backend_url),
            log_file_path: lookup("LOG_FILE_PATH").unwrap_or(defaults.log_file_path),
            http_timeout,
        })
    }
}
