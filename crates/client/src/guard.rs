//! One-at-a-time submission, the equivalent of a disabled submit button.
//!
//! There is no idempotency key: once a submission finishes, the next one is a
//! new invoice even if the payload is identical.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ClientError;

/// Shared in-flight flag. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    in_flight: Arc<AtomicBool>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard, or fail fast if a submission is already running.
    pub fn try_begin(&self) -> Result<SubmissionTicket, ClientError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::SubmissionInFlight)?;
        Ok(SubmissionTicket {
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Held for the duration of a submission; releases the guard on drop,
/// whether the request succeeded, failed or was cancelled.
#[derive(Debug)]
pub struct SubmissionTicket {
    in_flight: Arc<AtomicBool>,
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}
