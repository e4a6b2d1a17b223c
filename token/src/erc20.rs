//! In-memory fungible token with ERC20 transfer/approve semantics.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::TokenError;
use para_types::Address;

#[derive(Default)]
struct Balances {
    balances: HashMap<Address, u128>,
    /// (owner, spender) -> remaining allowance.
    allowances: HashMap<(Address, Address), u128>,
    total_supply: u128,
}

impl Balances {
    fn balance(&self, holder: &Address) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    /// Move `amount` between holders. Both sides are computed before either is written.
    fn move_funds(&mut self, from: Address, to: Address, amount: u128) -> Result<(), TokenError> {
        let available = self.balance(&from);
        let from_after = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                holder: from,
                needed: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }
        let to_after = self
            .balance(&to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(from, from_after);
        self.balances.insert(to, to_after);
        Ok(())
    }
}

/// A fungible token held entirely in memory.
///
/// All methods take `&self` so one token can be shared (via `Arc`) between
/// the custody adapter and the test or host code funding stakers.
#[derive(Default)]
pub struct Erc20Token {
    state: Mutex<Balances>,
}

impl Erc20Token {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, Balances>, TokenError> {
        self.state
            .lock()
            .map_err(|e| TokenError::Backend(e.to_string()))
    }

    /// Create `amount` new tokens for `to`.
    pub fn mint(&self, to: Address, amount: u128) -> Result<(), TokenError> {
        let mut state = self.state()?;
        let supply = state
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = state.balance(&to).checked_add(amount).ok_or(TokenError::Overflow)?;
        state.total_supply = supply;
        state.balances.insert(to, balance);
        Ok(())
    }

    /// Move `amount` from `from` to `to`.
    pub fn transfer(&self, from: Address, to: Address, amount: u128) -> Result<(), TokenError> {
        self.state()?.move_funds(from, to, amount)?;
        tracing::trace!(from = %from, to = %to, amount, "token transfer");
        Ok(())
    }

    /// Allow `spender` to move up to `amount` of `owner`'s tokens. Replaces any
    /// previous allowance.
    pub fn approve(&self, owner: Address, spender: Address, amount: u128) -> Result<(), TokenError> {
        self.state()?.allowances.insert((owner, spender), amount);
        Ok(())
    }

    /// `spender` moves `amount` from `from` to `to`, consuming allowance.
    pub fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        let mut state = self.state()?;
        let allowed = state
            .allowances
            .get(&(from, spender))
            .copied()
            .unwrap_or(0);
        let remaining = allowed
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance {
                owner: from,
                spender,
                needed: amount,
                available: allowed,
            })?;
        state.move_funds(from, to, amount)?;
        state.allowances.insert((from, spender), remaining);
        tracing::trace!(spender = %spender, from = %from, to = %to, amount, "token transfer_from");
        Ok(())
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Result<u128, TokenError> {
        Ok(self
            .state()?
            .allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0))
    }

    pub fn balance_of(&self, holder: &Address) -> Result<u128, TokenError> {
        Ok(self.state()?.balance(holder))
    }

    pub fn total_supply(&self) -> Result<u128, TokenError> {
        Ok(self.state()?.total_supply)
    }
}
