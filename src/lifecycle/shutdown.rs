//! Shutdown coordination for a sweep run.

use tokio_util::sync::CancellationToken;

/// Coordinator for interrupting a run.
///
/// Every chain call observes the token; triggering it makes in-flight and
/// not-yet-started calls fail with a cancellation error.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token to hand to call contexts.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// Whether shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }
}
