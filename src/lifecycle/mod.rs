//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve config → Validate → Connect to RPC → Sweep all accounts
//!
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger → in-flight chain calls cancelled
//! ```
//!
//! # Design Decisions
//! - Fail fast: config and connection errors are fatal, before any transaction
//! - Once sweeping starts, failures are per account and the run completes

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{connect, run_sweep, StartupError};
