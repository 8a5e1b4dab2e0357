//! Client configuration from the environment.

use std::time::Duration;

use thiserror::Error;

pub const API_URL_ENV: &str = "INVOICEDESK_API_URL";
pub const API_TOKEN_ENV: &str = "INVOICEDESK_API_TOKEN";
pub const TIMEOUT_ENV: &str = "INVOICEDESK_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("INVOICEDESK_API_URL must be an http(s) URL (got {0:?})")]
    InvalidUrl(String),
    #[error("INVOICEDESK_TIMEOUT_SECS must be a positive number of seconds (got {0:?})")]
    InvalidTimeout(String),
}

/// Where the invoice service lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash, e.g. `https://erp.example.com/api`.
    pub api_url: String,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_url(&api_url.into())?,
            ..Self::default()
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `INVOICEDESK_API_URL`, `INVOICEDESK_API_TOKEN` and
    /// `INVOICEDESK_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            Some(url) => normalize_url(&url)?,
            None => {
                tracing::warn!("{} not set; using {}", API_URL_ENV, DEFAULT_API_URL);
                DEFAULT_API_URL.to_string()
            }
        };

        let token = lookup(API_TOKEN_ENV)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let timeout = match lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            token,
            timeout,
        })
    }
}

fn normalize_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
