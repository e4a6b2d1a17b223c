//! Nullable token custody: an in-memory ledger of what went in and out.

use para_token::{TokenCustody, TokenError};
use para_types::Address;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Custody for tests.
///
/// Deposits always succeed, so stakers need no token balance. Payouts are
/// limited by what custody holds. [`NullCustody::fail_next_transfer`] makes
/// the next transfer in either direction fail without moving anything.
#[derive(Debug, Default)]
pub struct NullCustody {
    held: Mutex<u128>,
    paid: Mutex<HashMap<Address, u128>>,
    transfers_in: AtomicUsize,
    transfers_out: AtomicUsize,
    fail_next: AtomicBool,
}

impl NullCustody {
    /// Address reported as the custody account.
    pub const ADDRESS: Address = Address::repeat(0xcc);

    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens currently in custody.
    pub fn held(&self) -> u128 {
        *lock(&self.held)
    }

    /// Total paid out to `to`.
    pub fn paid_to(&self, to: &Address) -> u128 {
        lock(&self.paid).get(to).copied().unwrap_or(0)
    }

    /// Successful inbound transfers.
    pub fn transfers_in(&self) -> usize {
        self.transfers_in.load(Ordering::SeqCst)
    }

    /// Successful outbound transfers.
    pub fn transfers_out(&self) -> usize {
        self.transfers_out.load(Ordering::SeqCst)
    }

    pub fn fail_next_transfer(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn take_failure(&self) -> Result<(), TokenError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(TokenError::Rejected("injected failure".to_string()));
        }
        Ok(())
    }
}

// A panicking test thread must not hide the recorded state from the others.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TokenCustody for NullCustody {
    fn custody_address(&self) -> Address {
        Self::ADDRESS
    }

    fn transfer_in(&self, _from: &Address, amount: u128) -> Result<(), TokenError> {
        self.take_failure()?;
        let mut held = lock(&self.held);
        *held = held.checked_add(amount).ok_or(TokenError::Overflow)?;
        self.transfers_in.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn transfer_out(&self, to: &Address, amount: u128) -> Result<(), TokenError> {
        self.take_failure()?;
        let mut held = lock(&self.held);
        let remaining = held
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                holder: Self::ADDRESS,
                needed: amount,
                available: *held,
            })?;
        let mut paid = lock(&self.paid);
        let entry = paid.entry(*to).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(TokenError::Overflow)?;
        *held = remaining;
        self.transfers_out.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn balance_of(&self, holder: &Address) -> Result<u128, TokenError> {
        if *holder == Self::ADDRESS {
            Ok(self.held())
        } else {
            Ok(self.paid_to(holder))
        }
    }
}
