//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Sender private key (config)
//!     → wallet.rs (key parsing, address derivation, EIP-155 signing)
//!     → client.rs (chain state queries with timeouts)
//!     → transaction.rs (fee reserve, build, encode)
//!     → client.rs (raw transaction broadcast)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls go through a `CallContext` (timeout, deadline, cancellation)

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ChainClient, RpcChainClient};
pub use transaction::{SignedSweep, TRANSFER_GAS_LIMIT};
pub use types::{BlockchainError, BlockchainResult, ChainId};
pub use wallet::Wallet;
