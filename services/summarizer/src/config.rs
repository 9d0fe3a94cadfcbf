//! services/summarizer/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::time::Duration;
use summarizer_core::domain::{MAX_WORD_COUNT, MIN_WORD_COUNT};
use summarizer_core::Credential;
use tracing::Level;
use url::Url;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: Url,
    pub api_token: Option<Credential>,
    pub log_level: Level,
    pub default_word_count: u32,
    pub progress_tick: Duration,
    pub request_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Gateway Settings ---
        let base_str =
            lookup("API_BASE_URL").unwrap_or_else(|| "http://localhost:8080".to_string());
        let api_base_url = Url::parse(&base_str)
            .map_err(|e| ConfigError::InvalidValue("API_BASE_URL".to_string(), e.to_string()))?;
        if api_base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue(
                "API_BASE_URL".to_string(),
                format!("'{}' cannot be used as a base URL", base_str),
            ));
        }

        let api_token = lookup("API_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .map(Credential::new);

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Request Settings ---
        let default_word_count = parse_or("DEFAULT_WORD_COUNT", &lookup, 150u32)?;
        if !(MIN_WORD_COUNT..=MAX_WORD_COUNT).contains(&default_word_count) {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_WORD_COUNT".to_string(),
                format!(
                    "{} is outside {}..={}",
                    default_word_count, MIN_WORD_COUNT, MAX_WORD_COUNT
                ),
            ));
        }

        let tick_ms = parse_or("PROGRESS_TICK_MS", &lookup, 500u64)?;
        if tick_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "PROGRESS_TICK_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", &lookup, 300u64)?;

        Ok(Self {
            api_base_url,
            api_token,
            log_level,
            default_word_count,
            progress_tick: Duration::from_millis(tick_ms),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
