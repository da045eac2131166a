//! Chain-specific types and error definitions.

use std::time::Duration;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Endpoint unreachable, transport failure, or malformed response.
    #[error("RPC error during {op}: {message}")]
    Connection { op: &'static str, message: String },

    /// The node rejected a raw transaction.
    #[error("Transaction rejected by node: {0}")]
    Broadcast(String),

    /// A single RPC call exceeded its timeout.
    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },

    /// The overall run deadline was reached before or during the call.
    #[error("{op} aborted: run deadline exceeded")]
    DeadlineExceeded { op: &'static str },

    /// The run was interrupted.
    #[error("{op} cancelled")]
    Cancelled { op: &'static str },

    /// The configured endpoint is not a usable URL.
    #[error("Invalid RPC URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The signer failed to produce a signature.
    #[error("Signing failed: {0}")]
    Signing(String),
}

impl BlockchainError {
    /// Whether the call was stopped by a timeout, the run deadline, or an interrupt.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            BlockchainError::Timeout { .. }
                | BlockchainError::DeadlineExceeded { .. }
                | BlockchainError::Cancelled { .. }
        )
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
