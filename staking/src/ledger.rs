//! The staking ledger: records, account links, deposits and read accessors.
//!
//! Withdrawal and slashing live in [`crate::withdrawal`] and
//! [`crate::slashing`] as further `impl StakingLedger` blocks.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::config::StakingConfig;
use crate::error::StakingError;
use crate::event::{EventBus, StakingEvent};
use crate::governance::Governance;
use crate::record::{StakerDetails, StakerInfo, StakerRecord};
use para_registry::Registry;
use para_token::TokenCustody;
use para_types::{Address, Clock, LinkedAccount, ParachainId, StakingParams, Timestamp};

/// Key of a staker record.
pub(crate) type StakerKey = (ParachainId, Address);

/// The staking ledger.
///
/// Collaborators are injected at construction. Every mutating operation takes
/// `&mut self` and runs to completion; none of them can be re-entered by the
/// custody it calls into.
pub struct StakingLedger {
    pub(crate) registry: Arc<dyn Registry>,
    pub(crate) custody: Arc<dyn TokenCustody>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) params: StakingParams,
    pub(crate) governance: Governance,
    /// Ordered so snapshots are deterministic.
    pub(crate) stakers: BTreeMap<StakerKey, StakerRecord>,
    /// (parachain, consumer-chain account) -> staker. At most one staker per account.
    pub(crate) account_links: HashMap<(ParachainId, LinkedAccount), Address>,
    pub(crate) events: EventBus,
}

impl StakingLedger {
    pub fn new(
        registry: Arc<dyn Registry>,
        custody: Arc<dyn TokenCustody>,
        clock: Arc<dyn Clock>,
        params: StakingParams,
    ) -> Self {
        Self {
            registry,
            custody,
            clock,
            params,
            governance: Governance::new(),
            stakers: BTreeMap::new(),
            account_links: HashMap::new(),
            events: EventBus::new(),
        }
    }

    /// Build a ledger from configuration, initialising governance when the
    /// config names an address.
    pub fn from_config(
        config: &StakingConfig,
        registry: Arc<dyn Registry>,
        custody: Arc<dyn TokenCustody>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StakingError> {
        let mut ledger = Self::new(registry, custody, clock, config.params());
        if let Some(governance) = config.governance {
            ledger.init_governance(governance)?;
        }
        Ok(ledger)
    }

    /// Register a listener for [`StakingEvent`]s.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&StakingEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Governance ─────────────────────────────────────────────────────

    /// Set the governance address. Only the first call succeeds.
    pub fn init_governance(&mut self, address: Address) -> Result<(), StakingError> {
        self.governance.init(address)?;
        tracing::info!(governance = %address, "governance initialized");
        self.events
            .emit(&StakingEvent::GovernanceInitialized { governance: address });
        Ok(())
    }

    pub fn governance(&self) -> Option<Address> {
        self.governance.address()
    }

    // ── Deposits ───────────────────────────────────────────────────────

    /// Deposit `amount` from `caller` as stake for `para_id`.
    ///
    /// The first deposit of a staker for a parachain fixes `start_date` and
    /// links `account` to the staker. `caller` must have approved custody for
    /// `amount`. The record only changes after the tokens are in custody.
    pub fn deposit_stake(
        &mut self,
        caller: Address,
        para_id: ParachainId,
        account: LinkedAccount,
        amount: u128,
    ) -> Result<(), StakingError> {
        self.ensure_registered(para_id)?;
        if account.is_empty() {
            return Err(StakingError::EmptyAccount);
        }
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        if let Some(linked) = self.account_links.get(&(para_id, account.clone())) {
            if *linked != caller {
                return Err(StakingError::AccountAlreadyLinked);
            }
        }

        let key = (para_id, caller);
        let first_deposit = !self.stakers.contains_key(&key);
        let mut updated = self.stakers.get(&key).cloned().unwrap_or_default();
        updated.balance = updated
            .balance
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        if first_deposit {
            updated.start_date = self.clock.now();
            updated.linked_account = Some(account.clone());
        }

        self.custody.transfer_in(&caller, amount)?;

        let start_date = updated.start_date;
        self.stakers.insert(key, updated);
        if first_deposit {
            self.account_links.insert((para_id, account.clone()), caller);
            tracing::info!(
                para_id = %para_id,
                staker = %caller,
                account = %account,
                start_date = %start_date,
                "new parachain staker"
            );
            self.events.emit(&StakingEvent::NewStaker {
                para_id,
                staker: caller,
                account,
                start_date,
            });
        }
        tracing::info!(para_id = %para_id, staker = %caller, amount, "stake deposited");
        self.events.emit(&StakingEvent::StakeDeposited {
            para_id,
            staker: caller,
            amount,
        });
        Ok(())
    }

    // ── Read accessors ─────────────────────────────────────────────────

    /// Numeric view of a staker record. Zero for unknown stakers.
    pub fn get_staker_info(&self, para_id: ParachainId, staker: &Address) -> StakerInfo {
        self.stakers
            .get(&(para_id, *staker))
            .map(StakerRecord::info)
            .unwrap_or_default()
    }

    /// Full view of a staker record. Zero-valued for unknown stakers.
    pub fn get_staker_details(&self, para_id: ParachainId, staker: &Address) -> StakerDetails {
        let record = self.stakers.get(&(para_id, *staker));
        let info = record.map(StakerRecord::info).unwrap_or_default();
        StakerDetails {
            para_id,
            staker: *staker,
            start_date: info.start_date,
            balance: info.balance,
            locked_balance: info.locked_balance,
            locked_balance_confirmed: info.locked_balance_confirmed,
            linked_account: record.and_then(|r| r.linked_account.clone()),
            unlocks_at: record.map(|r| self.unlock_time(r)),
        }
    }

    /// The staker a consumer-chain account is linked to on `para_id`.
    pub fn staker_for_account(
        &self,
        para_id: ParachainId,
        account: &LinkedAccount,
    ) -> Option<Address> {
        self.account_links.get(&(para_id, account.clone())).copied()
    }

    /// Everything staked for `para_id`, across all three counters.
    pub fn total_staked(&self, para_id: ParachainId) -> Result<u128, StakingError> {
        sum_records(
            self.stakers
                .range((para_id, Address::ZERO)..=(para_id, Address::repeat(u8::MAX)))
                .map(|(_, record)| record),
        )
    }

    /// What the ledger owes stakers in total. Equals custody unless funds
    /// were discarded by a withdrawal that cleared unconfirmed requests.
    pub fn total_custody_liability(&self) -> Result<u128, StakingError> {
        sum_records(self.stakers.values())
    }

    /// Number of staker records.
    pub fn staker_count(&self) -> usize {
        self.stakers.len()
    }

    pub fn lock_period(&self) -> u64 {
        self.params.lock_period_secs
    }

    pub fn params(&self) -> &StakingParams {
        &self.params
    }

    // ── Internal helpers ───────────────────────────────────────────────

    pub(crate) fn ensure_registered(&self, para_id: ParachainId) -> Result<(), StakingError> {
        self.registry.lookup(para_id)?;
        Ok(())
    }

    pub(crate) fn unlock_time(&self, record: &StakerRecord) -> Timestamp {
        record.start_date.plus(self.params.lock_period_secs)
    }
}

fn sum_records<'a>(mut records: impl Iterator<Item = &'a StakerRecord>) -> Result<u128, StakingError> {
    records.try_fold(0u128, |acc, record| {
        record
            .total()
            .and_then(|total| acc.checked_add(total))
            .ok_or(StakingError::ArithmeticOverflow)
    })
}
