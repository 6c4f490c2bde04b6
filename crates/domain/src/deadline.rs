//! Per-call deadlines for storage operations.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::ports::RepositoryError;

/// Default budget for a single use-case operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// A point in time after which storage work is abandoned.
///
/// A deadline is fixed when a use case starts and passed by value into every
/// store call made on its behalf, so all calls of one operation share the
/// same budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    /// The instant at which the deadline expires.
    pub fn instant(&self) -> Instant {
        self.at
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Drives `fut` until it completes or the deadline passes.
    ///
    /// On expiry the future is dropped, which cancels any in-flight query.
    pub async fn run<F>(self, fut: F) -> Result<F::Output, RepositoryError>
    where
        F: Future,
    {
        tokio::time::timeout_at(self.at, fut)
            .await
            .map_err(|_| RepositoryError::Timeout)
    }
}
