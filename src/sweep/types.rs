//! Sweep outcome types.

use alloy::primitives::{Address, TxHash, U256};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::blockchain::types::{BlockchainError, ChainId};

/// Why a single account could not be swept.
///
/// Every variant is recoverable at the orchestration level: it is reported
/// for that account and the run continues with the others.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("invalid private key")]
    InvalidKey(#[source] BlockchainError),

    #[error("failed to get nonce")]
    NonceFetchFailed(#[source] BlockchainError),

    #[error("failed to retrieve account balance")]
    BalanceFetchFailed(#[source] BlockchainError),

    #[error("failed to get gas price")]
    GasPriceFetchFailed(#[source] BlockchainError),

    #[error("failed to get chain id")]
    ChainIdFetchFailed(#[source] BlockchainError),

    #[error("insufficient balance to cover gas cost (balance {balance} wei, gas cost {gas_cost} wei)")]
    InsufficientBalance { balance: U256, gas_cost: U256 },

    #[error("failed to sign transaction")]
    SignFailed(#[source] BlockchainError),

    #[error("failed to send transaction")]
    BroadcastFailed(#[source] BlockchainError),

    /// The account's task ended without producing a result.
    #[error("sweep task aborted: {0}")]
    Aborted(String),
}

impl SweepError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SweepError::InvalidKey(_) => "invalid_key",
            SweepError::NonceFetchFailed(_) => "nonce_fetch_failed",
            SweepError::BalanceFetchFailed(_) => "balance_fetch_failed",
            SweepError::GasPriceFetchFailed(_) => "gas_price_fetch_failed",
            SweepError::ChainIdFetchFailed(_) => "chain_id_fetch_failed",
            SweepError::InsufficientBalance { .. } => "insufficient_balance",
            SweepError::SignFailed(_) => "sign_failed",
            SweepError::BroadcastFailed(_) => "broadcast_failed",
            SweepError::Aborted(_) => "aborted",
        }
    }

    /// The underlying chain error, when the failure came from the adapter or signer.
    pub fn cause(&self) -> Option<&BlockchainError> {
        match self {
            SweepError::InvalidKey(e)
            | SweepError::NonceFetchFailed(e)
            | SweepError::BalanceFetchFailed(e)
            | SweepError::GasPriceFetchFailed(e)
            | SweepError::ChainIdFetchFailed(e)
            | SweepError::SignFailed(e)
            | SweepError::BroadcastFailed(e) => Some(e),
            SweepError::InsufficientBalance { .. } | SweepError::Aborted(_) => None,
        }
    }

    /// Whether the failure was caused by a timeout, the run deadline, or an interrupt.
    pub fn is_cancellation(&self) -> bool {
        self.cause().is_some_and(BlockchainError::is_cancellation)
    }
}

/// A broadcast sweep transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReceipt {
    /// Hash returned by the node for the submitted transaction.
    pub tx_hash: TxHash,
    /// Amount transferred to the receiver, in wei.
    pub value: U256,
    pub nonce: u64,
    pub gas_price: u128,
    pub chain_id: ChainId,
}

/// Outcome of sweeping one account.
pub type SweepOutcome = Result<SweepReceipt, SweepError>;

/// Per-account result, produced once per configured key.
#[derive(Debug)]
pub struct SweepResult {
    /// Position of the key in the configured sender list.
    pub index: usize,
    /// Sender address; `None` when the key could not be parsed.
    pub address: Option<Address>,
    pub outcome: SweepOutcome,
}

impl SweepResult {
    /// Result for a key that could not be parsed.
    pub fn invalid_key(index: usize, error: BlockchainError) -> Self {
        Self {
            index,
            address: None,
            outcome: Err(SweepError::InvalidKey(error)),
        }
    }

    /// Result for an account whose task ended without reporting.
    ///
    /// `address` is kept when the key had already been parsed.
    pub fn aborted(index: usize, address: Option<Address>, reason: impl Into<String>) -> Self {
        Self {
            index,
            address,
            outcome: Err(SweepError::Aborted(reason.into())),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Label for logs and metrics.
    pub fn outcome_label(&self) -> &'static str {
        match &self.outcome {
            Ok(_) => "success",
            Err(e) => e.kind(),
        }
    }
}

/// All results of one run, in input order.
#[derive(Debug)]
pub struct SweepReport {
    pub run_id: Uuid,
    pub results: Vec<SweepResult>,
    pub elapsed: Duration,
}

impl SweepReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// Sum of all transferred values.
    pub fn total_swept(&self) -> U256 {
        self.results
            .iter()
            .filter_map(|r| r.outcome.as_ref().ok())
            .fold(U256::ZERO, |acc, receipt| acc.saturating_add(receipt.value))
    }
}
