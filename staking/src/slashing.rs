//! Governance slashing.
//!
//! Slashing draws from a reporter's unlocked `balance` only and pays the
//! seized amount straight to a recipient. It ignores the lock period and any
//! pending withdrawal state.

use crate::error::StakingError;
use crate::event::StakingEvent;
use crate::ledger::StakingLedger;
use para_types::{Address, ParachainId};

impl StakingLedger {
    /// Seize `slash_amount` of `reporter`'s stake on `para_id` and pay it to
    /// `recipient`. Only the governance address may call this.
    pub fn slash_reporter(
        &mut self,
        caller: Address,
        slash_amount: u128,
        para_id: ParachainId,
        reporter: Address,
        recipient: Address,
    ) -> Result<(), StakingError> {
        if let Err(e) = self.governance.ensure(&caller) {
            tracing::warn!(caller = %caller, reporter = %reporter, "slash attempted by non-governance caller");
            return Err(e);
        }
        self.ensure_registered(para_id)?;
        if slash_amount == 0 {
            return Err(StakingError::ZeroAmount);
        }

        let key = (para_id, reporter);
        let available = self.stakers.get(&key).map(|r| r.balance).unwrap_or(0);
        let remaining = available.checked_sub(slash_amount).ok_or(
            StakingError::InsufficientStakedBalance {
                requested: slash_amount,
                available,
            },
        )?;

        self.custody.transfer_out(&recipient, slash_amount)?;

        if let Some(record) = self.stakers.get_mut(&key) {
            record.balance = remaining;
        }
        tracing::info!(
            para_id = %para_id,
            reporter = %reporter,
            recipient = %recipient,
            amount = slash_amount,
            "reporter slashed"
        );
        self.events.emit(&StakingEvent::ReporterSlashed {
            para_id,
            reporter,
            recipient,
            amount: slash_amount,
        });
        Ok(())
    }
}
