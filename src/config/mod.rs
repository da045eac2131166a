//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON or TOML, optional)
//!     → loader.rs (read & deserialize into FileConfig)
//!     → ConfigOverrides (command-line flags patch the file values)
//!     → validation.rs (ordered semantic checks)
//!     → SweepConfig (validated, immutable, passed by value)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once validated
//! - All file fields have defaults so flags alone are enough
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_file, resolve_config, ConfigError, ConfigOverrides};
pub use schema::{FileConfig, SweepConfig};
pub use validation::{validate_config, ValidationError};
