//! Sweep subsystem.
//!
//! # Data Flow
//! ```text
//! SweepConfig.sender_keys
//!     → orchestrator.rs (bounded task pool, one task per key)
//!     → engine.rs (key → chain state → fee reserve → sign → broadcast)
//!     → types.rs (SweepResult per key, SweepReport per run)
//! ```

pub mod engine;
pub mod orchestrator;
pub mod types;

pub use engine::SweepEngine;
pub use orchestrator::SweepOrchestrator;
pub use types::{SweepError, SweepOutcome, SweepReceipt, SweepReport, SweepResult};
