//! Ledger configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StakingError;
use para_types::{Address, StakingParams};
use para_utils::{init_logging, try_init_logging, LogFormat};

/// Configuration for a staking ledger deployment.
///
/// Can be loaded from a TOML file via [`StakingConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingConfig {
    /// Seconds after a staker's first deposit before withdrawals unlock.
    #[serde(default = "default_lock_period_secs")]
    pub lock_period_secs: u64,

    /// Governance address, applied once when the ledger is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governance: Option<Address>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_lock_period_secs() -> u64 {
    StakingParams::DEFAULT_LOCK_PERIOD_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl StakingConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, StakingError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| StakingError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, StakingError> {
        toml::from_str(s).map_err(|e| StakingError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, StakingError> {
        toml::to_string_pretty(self).map_err(|e| StakingError::Config(e.to_string()))
    }

    pub fn params(&self) -> StakingParams {
        StakingParams::with_lock_period(self.lock_period_secs)
    }

    /// Install the global tracing subscriber described by this config.
    pub fn init_logging(&self) {
        init_logging(self.log_format, &self.log_level);
    }

    /// Like [`StakingConfig::init_logging`], but fails if a subscriber is
    /// already installed.
    pub fn try_init_logging(&self) -> Result<(), StakingError> {
        try_init_logging(self.log_format, &self.log_level)
            .map_err(|e| StakingError::Config(e.to_string()))
    }
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            lock_period_secs: default_lock_period_secs(),
            governance: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
