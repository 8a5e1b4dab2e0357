//! Tracing and logging (shared setup).

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use tracing::{LogFormat, LogFormatError, init_with};
