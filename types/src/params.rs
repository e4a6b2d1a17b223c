//! Staking parameters shared by the ledger and its configuration layer.

use serde::{Deserialize, Serialize};

/// Seconds in one day.
pub const DAY_SECS: u64 = 24 * 3600;

/// Runtime parameters of the staking ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingParams {
    /// Time (seconds) after a staker's first deposit before confirmed
    /// withdrawals may leave custody.
    /// Default: 7 days = 604800 seconds.
    pub lock_period_secs: u64,
}

impl StakingParams {
    /// The default lock period: 7 days.
    pub const DEFAULT_LOCK_PERIOD_SECS: u64 = 7 * DAY_SECS;

    pub fn with_lock_period(lock_period_secs: u64) -> Self {
        Self { lock_period_secs }
    }
}

impl Default for StakingParams {
    fn default() -> Self {
        Self {
            lock_period_secs: Self::DEFAULT_LOCK_PERIOD_SECS,
        }
    }
}
