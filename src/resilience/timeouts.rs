//! Timeout and cancellation enforcement for chain calls.
//!
//! # Responsibilities
//! - Wrap every adapter call with a per-call timeout
//! - Enforce the optional overall run deadline
//! - Abort in-flight calls when the run is cancelled
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - The effective budget of a call is `min(call timeout, time left before deadline)`
//! - Timeout, deadline and cancellation are distinct error variants

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Deadline and cancellation state shared by all calls of one run.
#[derive(Debug, Clone)]
pub struct CallContext {
    call_timeout: Duration,
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl CallContext {
    /// Create a context with a per-call timeout and no run deadline.
    pub fn new(call_timeout: Duration) -> Self {
        Self {
            call_timeout,
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop all calls once `run_deadline` has elapsed from now.
    pub fn with_run_deadline(mut self, run_deadline: Duration) -> Self {
        self.deadline = Some(Instant::now() + run_deadline);
        self
    }

    /// Abort calls when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Time left before the run deadline, if one is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Run `fut` under this context's timeout, deadline and cancellation.
    pub async fn guard<T, F>(&self, op: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: Future<Output = BlockchainResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(BlockchainError::Cancelled { op });
        }

        let (budget, deadline_bound) = match self.remaining() {
            Some(left) if left.is_zero() => return Err(BlockchainError::DeadlineExceeded { op }),
            Some(left) if left < self.call_timeout => (left, true),
            _ => (self.call_timeout, false),
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(BlockchainError::Cancelled { op }),
            result = tokio::time::timeout(budget, fut) => match result {
                Ok(outcome) => outcome,
                Err(_) if deadline_bound => Err(BlockchainError::DeadlineExceeded { op }),
                Err(_) => Err(BlockchainError::Timeout { op, after: budget }),
            },
        }
    }
}
