//! Token transfer errors.

use para_types::Address;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient balance for {holder}: need {needed}, have {available}")]
    InsufficientBalance {
        holder: Address,
        needed: u128,
        available: u128,
    },

    #[error("insufficient allowance from {owner} to {spender}: need {needed}, have {available}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        needed: u128,
        available: u128,
    },

    #[error("token amount overflow")]
    Overflow,

    #[error("transfer rejected: {0}")]
    Rejected(String),

    #[error("token backend error: {0}")]
    Backend(String),
}
