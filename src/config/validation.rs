//! Configuration validation.
//!
//! # Responsibilities
//! - Turn a [`FileConfig`] into a typed [`SweepConfig`]
//! - Reject missing or malformed values before any network access
//!
//! # Design Decisions
//! - Checks run in a fixed order and stop at the first failure:
//!   RPC URL → receiver present → receiver well-formed → sender list → runtime knobs
//! - Receiver parsing accepts an optional `0x` prefix and any letter case
//!   (no EIP-55 checksum enforcement)
//! - Private keys are not parsed here; a malformed key only fails its own account

use alloy::primitives::Address;
use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

use crate::config::schema::{FileConfig, SweepConfig};

/// A configuration value that cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("RPC URL is required")]
    MissingRpc,

    #[error("receiver address is required")]
    MissingReceiver,

    #[error("invalid receiver address '{0}'")]
    InvalidReceiver(String),

    #[error("at least one sender private key is required")]
    NoSenders,

    #[error("maxConcurrency must be at least 1")]
    InvalidConcurrency,

    #[error("{0} must be greater than zero")]
    InvalidTimeout(&'static str),
}

/// Parse a hex address the way the CLI accepts it.
pub fn parse_address(raw: &str) -> Option<Address> {
    raw.strip_prefix("0X").unwrap_or(raw).parse().ok()
}

/// Validate `config`, consuming it.
pub fn validate_config(config: FileConfig) -> Result<SweepConfig, ValidationError> {
    let rpc_url = config.rpc.trim().to_string();
    if rpc_url.is_empty() {
        return Err(ValidationError::MissingRpc);
    }

    let receiver_raw = config.receiver_address.trim();
    if receiver_raw.is_empty() {
        return Err(ValidationError::MissingReceiver);
    }
    let receiver = parse_address(receiver_raw)
        .ok_or_else(|| ValidationError::InvalidReceiver(receiver_raw.to_string()))?;

    if config.sender_private_keys.is_empty() {
        return Err(ValidationError::NoSenders);
    }

    if config.max_concurrency == 0 {
        return Err(ValidationError::InvalidConcurrency);
    }
    if config.rpc_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout("rpcTimeoutSecs"));
    }
    if config.run_deadline_secs == Some(0) {
        return Err(ValidationError::InvalidTimeout("runDeadlineSecs"));
    }

    Ok(SweepConfig {
        rpc_url,
        receiver,
        sender_keys: config
            .sender_private_keys
            .into_iter()
            .map(SecretString::from)
            .collect(),
        rpc_timeout: Duration::from_secs(config.rpc_timeout_secs),
        run_deadline: config.run_deadline_secs.map(Duration::from_secs),
        max_concurrency: config.max_concurrency,
    })
}
