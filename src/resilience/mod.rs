//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Chain call:
//!     → timeouts.rs (per-call timeout, run deadline, cancellation)
//!     → On failure: error returned to the sweep engine as-is
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries; a broadcast is submitted at most once

pub mod timeouts;

pub use timeouts::CallContext;
