//! Per-request execution context.
//!
//! One `RequestContext` is created per incoming request and passed by
//! reference into every strategy and store call. It carries the request
//! deadline and a cancellation token that fires when the caller goes away.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Deadline and cancellation shared by all work done for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request, used in log fields
    pub request_id: Uuid,
    deadline: Instant,
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Create a root context that expires `timeout` from now
    pub fn new(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Create a root context with an absolute deadline
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            deadline,
            cancellation: CancellationToken::new(),
        }
    }

    /// Derived context with the same deadline and a child token.
    ///
    /// Cancelling the parent cancels the child, not the other way round.
    pub fn child(&self) -> Self {
        Self {
            request_id: self.request_id,
            deadline: self.deadline,
            cancellation: self.cancellation.child_token(),
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Cancel this context and every child derived from it
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Time left before the deadline (zero once expired)
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// True once the deadline has passed or the request was cancelled
    pub fn is_done(&self) -> bool {
        self.cancellation.is_cancelled() || Instant::now() >= self.deadline
    }

    /// Fail fast if the request can no longer make progress
    pub fn check(&self) -> StoreResult<()> {
        if self.cancellation.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        if Instant::now() >= self.deadline {
            return Err(StoreError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Run a store call, abandoning it when the deadline passes or the
    /// request is cancelled. The in-flight future is dropped in that case.
    pub async fn run<F, T>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        self.check()?;
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(StoreError::Cancelled),
            _ = tokio::time::sleep_until(self.deadline) => Err(StoreError::DeadlineExceeded),
            result = fut => result,
        }
    }
}
