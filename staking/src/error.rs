//! Staking ledger errors.
//!
//! Display strings of the core failures are user facing and stable.

use para_registry::RegistryError;
use para_token::TokenError;
use para_types::{ParachainId, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StakingError {
    #[error("parachain not registered")]
    UnregisteredParachain(ParachainId),

    #[error("account already linked to another staker")]
    AccountAlreadyLinked,

    #[error("insufficient staked balance")]
    InsufficientStakedBalance { requested: u128, available: u128 },

    #[error("insufficient locked balance")]
    InsufficientLockedBalance { requested: u128, available: u128 },

    #[error("lock period not expired")]
    LockPeriodNotExpired { unlocks_at: Timestamp },

    #[error("unauthorized")]
    Unauthorized,

    #[error("governance already initialized")]
    AlreadyInitialized,

    #[error("governance address must not be zero")]
    InvalidGovernanceAddress,

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("linked account must not be empty")]
    EmptyAccount,

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("token custody error: {0}")]
    Custody(#[from] TokenError),

    #[error("registry error: {0}")]
    Registry(RegistryError),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Broad classification of a [`StakingError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request is malformed or the ledger state does not allow it.
    Validation,
    /// The caller is not allowed to perform the operation.
    Authorization,
    /// The token transfer backing the operation failed.
    Custody,
    /// Registry, persistence or configuration failure.
    Internal,
}

impl StakingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnregisteredParachain(_)
            | Self::AccountAlreadyLinked
            | Self::InsufficientStakedBalance { .. }
            | Self::InsufficientLockedBalance { .. }
            | Self::LockPeriodNotExpired { .. }
            | Self::InvalidGovernanceAddress
            | Self::ZeroAmount
            | Self::EmptyAccount
            | Self::ArithmeticOverflow => ErrorKind::Validation,
            Self::Unauthorized | Self::AlreadyInitialized => ErrorKind::Authorization,
            Self::Custody(_) => ErrorKind::Custody,
            Self::Registry(_) | Self::Snapshot(_) | Self::Config(_) => ErrorKind::Internal,
        }
    }
}

impl From<RegistryError> for StakingError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotFound(id) => Self::UnregisteredParachain(id),
            other => Self::Registry(other),
        }
    }
}
