//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (human or JSON lines)
//!     → Prometheus textfile written at the end of a run
//! ```
//!
//! # Design Decisions
//! - Structured fields (account index, sender, tx hash), never key material
//! - Run ID attached to every per-account span
//! - Metrics are recorded through the `metrics` facade; without an installed
//!   recorder they are no-ops

pub mod logging;
pub mod metrics;
