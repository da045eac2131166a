//! Configuration schema definitions.
//!
//! [`FileConfig`] is the raw, unvalidated shape read from a config file and
//! patched by command-line flags. [`SweepConfig`] is what the rest of the
//! crate consumes: validated, typed, and immutable.

use alloy::primitives::Address;
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Root configuration as written in a config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    /// JSON-RPC endpoint URL.
    pub rpc: String,

    /// Hex-encoded destination address.
    pub receiver_address: String,

    /// Hex-encoded sender private keys, swept in this order.
    pub sender_private_keys: Vec<String>,

    /// Timeout for each RPC call in seconds.
    pub rpc_timeout_secs: u64,

    /// Optional deadline for the whole run in seconds.
    pub run_deadline_secs: Option<u64>,

    /// Maximum number of accounts swept concurrently.
    pub max_concurrency: usize,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            rpc: String::new(),
            receiver_address: String::new(),
            sender_private_keys: Vec::new(),
            rpc_timeout_secs: 10,
            run_deadline_secs: None,
            max_concurrency: 4,
        }
    }
}

/// Validated configuration for a sweep run.
#[derive(Debug)]
pub struct SweepConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Destination of every sweep.
    pub receiver: Address,

    /// Sender keys in input order. Redacted from `Debug`.
    pub sender_keys: Vec<SecretString>,

    /// Timeout for each RPC call.
    pub rpc_timeout: Duration,

    /// Deadline for the whole run.
    pub run_deadline: Option<Duration>,

    /// Maximum number of accounts swept concurrently.
    pub max_concurrency: usize,
}
