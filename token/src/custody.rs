//! The custody seam between the staking ledger and the token.

use std::sync::Arc;

use crate::erc20::Erc20Token;
use crate::error::TokenError;
use para_types::Address;

/// Moves tokens into and out of the ledger's custody.
///
/// A returned error means the transfer did not happen; the ledger relies on
/// that to keep its counters in step with custody.
pub trait TokenCustody: Send + Sync {
    /// The address holding staked funds.
    fn custody_address(&self) -> Address;

    /// Pull `amount` from `from` into custody. `from` must have approved custody.
    fn transfer_in(&self, from: &Address, amount: u128) -> Result<(), TokenError>;

    /// Pay `amount` out of custody to `to`.
    fn transfer_out(&self, to: &Address, amount: u128) -> Result<(), TokenError>;

    /// Token balance of `holder`.
    fn balance_of(&self, holder: &Address) -> Result<u128, TokenError>;

    /// Tokens currently held in custody.
    fn custody_balance(&self) -> Result<u128, TokenError> {
        self.balance_of(&self.custody_address())
    }
}

/// Binds a shared [`Erc20Token`] to a custody address.
///
/// Deposits use `transfer_from` with the custody address as spender, so a
/// staker must `approve(custody, amount)` before depositing.
#[derive(Clone)]
pub struct CustodyAccount {
    token: Arc<Erc20Token>,
    address: Address,
}

impl CustodyAccount {
    pub fn new(token: Arc<Erc20Token>, address: Address) -> Self {
        Self { token, address }
    }

    pub fn token(&self) -> &Arc<Erc20Token> {
        &self.token
    }
}

impl TokenCustody for CustodyAccount {
    fn custody_address(&self) -> Address {
        self.address
    }

    fn transfer_in(&self, from: &Address, amount: u128) -> Result<(), TokenError> {
        self.token
            .transfer_from(self.address, *from, self.address, amount)
    }

    fn transfer_out(&self, to: &Address, amount: u128) -> Result<(), TokenError> {
        self.token.transfer(self.address, *to, amount)
    }

    fn balance_of(&self, holder: &Address) -> Result<u128, TokenError> {
        self.token.balance_of(holder)
    }
}
