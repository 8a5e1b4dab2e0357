//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures such as
/// validation and range checks. Transport concerns belong to the client crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a blank required field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A number fell outside the domain an operation supports.
    #[error("value {value} is out of range (max {max})")]
    OutOfRange { value: u64, max: u64 },

    /// The requested invoice does not exist.
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn out_of_range(value: u64, max: u64) -> Self {
        Self::OutOfRange { value, max }
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
