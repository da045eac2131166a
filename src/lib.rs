//! EVM native-token sweeper library.
//!
//! Moves the whole native balance of each configured account, minus the
//! transfer fee, to one receiver address.

pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod sweep;

pub use config::SweepConfig;
pub use lifecycle::Shutdown;
pub use sweep::{SweepReport, SweepResult};
