//! Configuration loading from disk and flags.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{FileConfig, SweepConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing config file")]
    Json(#[from] serde_json::Error),

    #[error("error parsing config file")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Values supplied on the command line. Set values win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub rpc: Option<String>,
    pub receiver: Option<String>,
    /// Replaces the file's list when non-empty.
    pub senders: Vec<String>,
    pub rpc_timeout_secs: Option<u64>,
    pub run_deadline_secs: Option<u64>,
    pub max_concurrency: Option<usize>,
}

impl ConfigOverrides {
    /// Patch `config` with every override that carries a value.
    pub fn apply(self, config: &mut FileConfig) {
        if let Some(rpc) = self.rpc.filter(|s| !s.is_empty()) {
            config.rpc = rpc;
        }
        if let Some(receiver) = self.receiver.filter(|s| !s.is_empty()) {
            config.receiver_address = receiver;
        }
        if !self.senders.is_empty() {
            config.sender_private_keys = self.senders;
        }
        if let Some(secs) = self.rpc_timeout_secs {
            config.rpc_timeout_secs = secs;
        }
        if let Some(secs) = self.run_deadline_secs {
            config.run_deadline_secs = Some(secs);
        }
        if let Some(n) = self.max_concurrency {
            config.max_concurrency = n;
        }
    }
}

/// Read a config file. `.toml` files are parsed as TOML, anything else as JSON.
pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        Ok(toml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

/// Build the validated run configuration from an optional file plus flags.
pub fn resolve_config(mut overrides: ConfigOverrides) -> Result<SweepConfig, ConfigError> {
    let mut config = match overrides.config_path.take() {
        Some(path) => load_file(&path)?,
        None => FileConfig::default(),
    };

    overrides.apply(&mut config);

    Ok(validate_config(config)?)
}
