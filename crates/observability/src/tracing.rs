//! Tracing/logging initialization.
//!
//! The filter comes from `RUST_LOG` (default `info`), the output format from
//! `INVOICEDESK_LOG_FORMAT` (`json` or `pretty`, default `json`).

use core::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "INVOICEDESK_LOG_FORMAT";

/// Log line format.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable, multi-line output for terminals.
    Pretty,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown log format {0:?} (expected \"json\" or \"pretty\")")]
pub struct LogFormatError(pub String);

impl FromStr for LogFormat {
    type Err = LogFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(LogFormatError(other.to_string())),
        }
    }
}

/// Initialize tracing/logging for the process.
///
/// The CLI passes its `--log-format`, which clap also reads from
/// [`LOG_FORMAT_ENV`]. Safe to call multiple times (subsequent calls are
/// no-ops).
pub fn init_with(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so command output on stdout stays clean.
    let _ = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init(),
    };
}
