//! Per-(parachain, staker) stake records and their read views.

use para_types::{Address, LinkedAccount, ParachainId, Timestamp};
use serde::{Deserialize, Serialize};

/// Stake held by one staker for one parachain.
///
/// Created on the staker's first deposit for the parachain and never deleted;
/// a fully withdrawn or slashed record keeps zero balances.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerRecord {
    /// Time of the first deposit. Anchors the lock period; never changes.
    pub start_date: Timestamp,
    /// Stake available for withdrawal requests and slashing.
    pub balance: u128,
    /// Requested for withdrawal, not yet confirmed.
    pub locked_balance: u128,
    /// Confirmed for withdrawal, waiting for the lock period to pass.
    pub locked_balance_confirmed: u128,
    /// Consumer-chain account linked on the first deposit.
    pub linked_account: Option<LinkedAccount>,
}

impl StakerRecord {
    /// Everything this record has in custody.
    pub fn total(&self) -> Option<u128> {
        self.balance
            .checked_add(self.locked_balance)?
            .checked_add(self.locked_balance_confirmed)
    }

    pub fn info(&self) -> StakerInfo {
        StakerInfo {
            start_date: self.start_date,
            balance: self.balance,
            locked_balance: self.locked_balance,
            locked_balance_confirmed: self.locked_balance_confirmed,
        }
    }
}

/// Numeric snapshot of a staker record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerInfo {
    pub start_date: Timestamp,
    pub balance: u128,
    pub locked_balance: u128,
    pub locked_balance_confirmed: u128,
}

/// Full view of a staker record, including its link and unlock time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerDetails {
    pub para_id: ParachainId,
    pub staker: Address,
    pub start_date: Timestamp,
    pub balance: u128,
    pub locked_balance: u128,
    pub locked_balance_confirmed: u128,
    pub linked_account: Option<LinkedAccount>,
    /// When confirmed funds become withdrawable. `None` for a staker that
    /// never deposited.
    pub unlocks_at: Option<Timestamp>,
}
