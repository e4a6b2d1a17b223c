//! Two-phase withdrawal: request, confirm, then withdraw after the lock period.
//!
//! The lock period is measured from the staker's first deposit, so repeated
//! requests never push the unlock time out. Confirmation comes from the
//! parachain side (see [`crate::relay`]); the lock check is purely local.

use crate::error::StakingError;
use crate::event::StakingEvent;
use crate::ledger::StakingLedger;
use para_registry::RegistryError;
use para_types::{Address, ParachainId};
use para_utils::format_duration;

impl StakingLedger {
    /// Move `amount` of the caller's stake on `para_id` from `balance` to
    /// `locked_balance`.
    pub fn request_withdraw(
        &mut self,
        caller: Address,
        para_id: ParachainId,
        amount: u128,
    ) -> Result<(), StakingError> {
        self.ensure_registered(para_id)?;
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        let key = (para_id, caller);
        let mut updated = self.stakers.get(&key).cloned().unwrap_or_default();
        updated.balance = updated.balance.checked_sub(amount).ok_or(
            StakingError::InsufficientStakedBalance {
                requested: amount,
                available: updated.balance,
            },
        )?;
        updated.locked_balance = updated
            .locked_balance
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;

        self.stakers.insert(key, updated);
        tracing::info!(para_id = %para_id, staker = %caller, amount, "withdraw requested");
        self.events.emit(&StakingEvent::WithdrawRequested {
            para_id,
            staker: caller,
            amount,
        });
        Ok(())
    }

    /// Confirm `amount` of `staker`'s pending withdrawal request.
    ///
    /// The caller must be the registered owner of a parachain; the record
    /// confirmed is the staker's record on that parachain.
    pub fn confirm_withdraw_request(
        &mut self,
        caller: Address,
        staker: Address,
        amount: u128,
    ) -> Result<(), StakingError> {
        let para_id = match self.registry.lookup_by_owner(&caller) {
            Ok(id) => id,
            Err(RegistryError::OwnerNotFound(_)) => {
                tracing::warn!(caller = %caller, staker = %staker, "withdraw confirmation from non-parachain caller");
                return Err(StakingError::Unauthorized);
            }
            Err(e) => return Err(e.into()),
        };
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        let key = (para_id, staker);
        let mut updated = self.stakers.get(&key).cloned().unwrap_or_default();
        updated.locked_balance = updated.locked_balance.checked_sub(amount).ok_or(
            StakingError::InsufficientLockedBalance {
                requested: amount,
                available: updated.locked_balance,
            },
        )?;
        updated.locked_balance_confirmed = updated
            .locked_balance_confirmed
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;

        self.stakers.insert(key, updated);
        tracing::info!(para_id = %para_id, staker = %staker, amount, "withdraw confirmed");
        self.events.emit(&StakingEvent::WithdrawConfirmed {
            para_id,
            staker,
            amount,
        });
        Ok(())
    }

    /// Pay the caller's confirmed withdrawal on `para_id` out of custody.
    ///
    /// Allowed once the lock period since the first deposit has passed.
    /// Clears both `locked_balance_confirmed` and any still-unconfirmed
    /// `locked_balance`. Returns the amount paid out.
    pub fn withdraw_stake(
        &mut self,
        caller: Address,
        para_id: ParachainId,
    ) -> Result<u128, StakingError> {
        self.ensure_registered(para_id)?;
        let key = (para_id, caller);
        let Some(record) = self.stakers.get(&key) else {
            return Ok(0);
        };

        let now = self.clock.now();
        let unlocks_at = self.unlock_time(record);
        if now < unlocks_at {
            tracing::debug!(
                para_id = %para_id,
                staker = %caller,
                remaining = %format_duration(now.elapsed_since(unlocks_at)),
                "withdraw attempted during lock period"
            );
            return Err(StakingError::LockPeriodNotExpired { unlocks_at });
        }

        let amount = record.locked_balance_confirmed;
        let discarded_pending = record.locked_balance;
        if amount > 0 {
            self.custody.transfer_out(&caller, amount)?;
        }

        if let Some(record) = self.stakers.get_mut(&key) {
            record.locked_balance = 0;
            record.locked_balance_confirmed = 0;
        }
        if discarded_pending > 0 {
            tracing::warn!(
                para_id = %para_id,
                staker = %caller,
                discarded_pending,
                "unconfirmed withdraw request cleared by withdrawal"
            );
        }
        tracing::info!(para_id = %para_id, staker = %caller, amount, "stake withdrawn");
        self.events.emit(&StakingEvent::StakeWithdrawn {
            para_id,
            staker: caller,
            amount,
            discarded_pending,
        });
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::StakingError;
    use crate::event::StakingEvent;
    use crate::ledger::StakingLedger;
    use para_nullables::{NullClock, NullCustody};
    use para_registry::ParachainRegistry;
    use para_types::{Address, LinkedAccount, ParachainId, StakingParams, Timestamp};
    use std::sync::{Arc, Mutex};

    const PARA: ParachainId = ParachainId::new(2000);
    const PARA_OWNER: Address = Address::repeat(0x0e);
    const STAKER: Address = Address::repeat(1);
    const WEEK: u64 = 7 * 24 * 3600;

    fn setup() -> (StakingLedger, Arc<NullCustody>, Arc<NullClock>) {
        let registry = Arc::new(ParachainRegistry::new());
        registry.register(PARA_OWNER, PARA, 40, 10_000, 12, vec![]).unwrap();
        let custody = Arc::new(NullCustody::new());
        let clock = Arc::new(NullClock::new(1_000));
        let mut ledger = StakingLedger::new(
            registry,
            custody.clone(),
            clock.clone(),
            StakingParams::default(),
        );
        ledger
            .deposit_stake(STAKER, PARA, LinkedAccount::new(vec![1; 32]), 20)
            .unwrap();
        (ledger, custody, clock)
    }

    #[test]
    fn request_moves_balance_to_locked() {
        let (mut ledger, _custody, _clock) = setup();
        ledger.request_withdraw(STAKER, PARA, 15).unwrap();

        let info = ledger.get_staker_info(PARA, &STAKER);
        assert_eq!(info.balance, 5);
        assert_eq!(info.locked_balance, 15);
        assert_eq!(info.locked_balance_confirmed, 0);
    }

    #[test]
    fn request_more_than_balance_fails() {
        let (mut ledger, _custody, _clock) = setup();
        let err = ledger.request_withdraw(STAKER, PARA, 21).unwrap_err();
        assert!(matches!(
            err,
            StakingError::InsufficientStakedBalance { requested: 21, available: 20 }
        ));
        assert_eq!(err.to_string(), "insufficient staked balance");
        assert_eq!(ledger.get_staker_info(PARA, &STAKER).balance, 20);
    }

    #[test]
    fn request_on_unregistered_parachain_fails() {
        let (mut ledger, _custody, _clock) = setup();
        let err = ledger
            .request_withdraw(STAKER, ParachainId::new(1), 1)
            .unwrap_err();
        assert!(matches!(err, StakingError::UnregisteredParachain(_)));
    }

    #[test]
    fn withdraw_on_unregistered_parachain_fails() {
        let (mut ledger, custody, _clock) = setup();
        assert!(matches!(
            ledger.withdraw_stake(STAKER, ParachainId::new(1)),
            Err(StakingError::UnregisteredParachain(_))
        ));
        assert_eq!(custody.transfers_out(), 0);
    }

    #[test]
    fn request_does_not_move_start_date() {
        let (mut ledger, _custody, clock) = setup();
        clock.advance(3_600);
        ledger.request_withdraw(STAKER, PARA, 10).unwrap();
        assert_eq!(ledger.get_staker_info(PARA, &STAKER).start_date, Timestamp::new(1_000));
    }

    #[test]
    fn confirm_moves_locked_to_confirmed() {
        let (mut ledger, _custody, clock) = setup();
        ledger.request_withdraw(STAKER, PARA, 20).unwrap();
        clock.advance(WEEK);
        ledger.confirm_withdraw_request(PARA_OWNER, STAKER, 20).unwrap();

        let info = ledger.get_staker_info(PARA, &STAKER);
        assert_eq!(info.locked_balance, 0);
        assert_eq!(info.locked_balance_confirmed, 20);
        assert_eq!(info.start_date, Timestamp::new(1_000));
    }

    #[test]
    fn confirm_from_non_owner_is_unauthorized() {
        let (mut ledger, _custody, _clock) = setup();
        ledger.request_withdraw(STAKER, PARA, 20).unwrap();

        let err = ledger
            .confirm_withdraw_request(Address::repeat(0x55), STAKER, 20)
            .unwrap_err();
        assert!(matches!(err, StakingError::Unauthorized));
        assert_eq!(ledger.get_staker_info(PARA, &STAKER).locked_balance, 20);
    }

    #[test]
    fn confirm_cannot_exceed_pending_request() {
        let (mut ledger, _custody, _clock) = setup();
        ledger.request_withdraw(STAKER, PARA, 5).unwrap();

        let err = ledger
            .confirm_withdraw_request(PARA_OWNER, STAKER, 6)
            .unwrap_err();
        assert!(matches!(
            err,
            StakingError::InsufficientLockedBalance { requested: 6, available: 5 }
        ));
        let info = ledger.get_staker_info(PARA, &STAKER);
        assert_eq!(info.locked_balance, 5);
        assert_eq!(info.locked_balance_confirmed, 0);
    }

    #[test]
    fn withdraw_before_lock_expiry_fails() {
        let (mut ledger, custody, clock) = setup();
        ledger.request_withdraw(STAKER, PARA, 20).unwrap();
        ledger.confirm_withdraw_request(PARA_OWNER, STAKER, 20).unwrap();
        clock.advance(WEEK - 1);

        let err = ledger.withdraw_stake(STAKER, PARA).unwrap_err();
        assert!(matches!(
            err,
            StakingError::LockPeriodNotExpired { unlocks_at } if unlocks_at == Timestamp::new(1_000 + WEEK)
        ));
        assert_eq!(err.to_string(), "lock period not expired");
        assert_eq!(ledger.get_staker_info(PARA, &STAKER).locked_balance_confirmed, 20);
        assert_eq!(custody.held(), 20);
    }

    #[test]
    fn withdraw_after_lock_pays_confirmed_amount() {
        let (mut ledger, custody, clock) = setup();
        ledger.request_withdraw(STAKER, PARA, 20).unwrap();
        ledger.confirm_withdraw_request(PARA_OWNER, STAKER, 20).unwrap();
        clock.advance(WEEK + 1);

        assert_eq!(ledger.withdraw_stake(STAKER, PARA).unwrap(), 20);
        let info = ledger.get_staker_info(PARA, &STAKER);
        assert_eq!(info.locked_balance, 0);
        assert_eq!(info.locked_balance_confirmed, 0);
        assert_eq!(custody.held(), 0);
        assert_eq!(custody.paid_to(&STAKER), 20);
    }

    #[test]
    fn lock_is_anchored_to_first_deposit() {
        let (mut ledger, _custody, clock) = setup();
        clock.advance(WEEK);
        // Requested and confirmed well after the deposit: already unlocked.
        ledger.request_withdraw(STAKER, PARA, 10).unwrap();
        ledger.confirm_withdraw_request(PARA_OWNER, STAKER, 10).unwrap();
        assert_eq!(ledger.withdraw_stake(STAKER, PARA).unwrap(), 10);
    }

    #[test]
    fn withdraw_clears_unconfirmed_request() {
        let (mut ledger, custody, clock) = setup();
        ledger.request_withdraw(STAKER, PARA, 15).unwrap();
        ledger.confirm_withdraw_request(PARA_OWNER, STAKER, 10).unwrap();
        clock.advance(WEEK);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        ledger.subscribe(Box::new(move |e| sink.lock().unwrap().push(e.clone())));

        assert_eq!(ledger.withdraw_stake(STAKER, PARA).unwrap(), 10);
        let info = ledger.get_staker_info(PARA, &STAKER);
        assert_eq!(info.balance, 5);
        assert_eq!(info.locked_balance, 0);
        assert_eq!(info.locked_balance_confirmed, 0);
        assert_eq!(custody.held(), 10);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[StakingEvent::StakeWithdrawn {
                para_id: PARA,
                staker: STAKER,
                amount: 10,
                discarded_pending: 5,
            }]
        );
    }

    #[test]
    fn failed_payout_keeps_confirmed_balance() {
        let (mut ledger, custody, clock) = setup();
        ledger.request_withdraw(STAKER, PARA, 20).unwrap();
        ledger.confirm_withdraw_request(PARA_OWNER, STAKER, 20).unwrap();
        clock.advance(WEEK);
        custody.fail_next_transfer();

        let err = ledger.withdraw_stake(STAKER, PARA).unwrap_err();
        assert!(matches!(err, StakingError::Custody(_)));
        assert_eq!(ledger.get_staker_info(PARA, &STAKER).locked_balance_confirmed, 20);

        assert_eq!(ledger.withdraw_stake(STAKER, PARA).unwrap(), 20);
    }

    #[test]
    fn withdraw_without_stake_pays_nothing() {
        let (mut ledger, custody, _clock) = setup();
        let stranger = Address::repeat(0x77);
        assert_eq!(ledger.withdraw_stake(stranger, PARA).unwrap(), 0);
        assert_eq!(ledger.get_staker_info(PARA, &stranger), Default::default());
        assert_eq!(custody.transfers_out(), 0);
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let (mut ledger, _custody, _clock) = setup();
        assert!(matches!(
            ledger.request_withdraw(STAKER, PARA, 0),
            Err(StakingError::ZeroAmount)
        ));
        assert!(matches!(
            ledger.confirm_withdraw_request(PARA_OWNER, STAKER, 0),
            Err(StakingError::ZeroAmount)
        ));
    }
}
