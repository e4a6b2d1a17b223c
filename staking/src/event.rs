//! Events emitted after successful ledger operations.

use para_types::{Address, LinkedAccount, ParachainId, Timestamp};
use serde::{Deserialize, Serialize};

/// Staking events that observers can subscribe to via the [`EventBus`].
///
/// Emitted only after the operation (including its token transfer) succeeded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StakingEvent {
    /// The governance address was set.
    GovernanceInitialized { governance: Address },
    /// First deposit of a staker for a parachain; the account is now linked.
    NewStaker {
        para_id: ParachainId,
        staker: Address,
        account: LinkedAccount,
        start_date: Timestamp,
    },
    /// Stake was pulled into custody.
    StakeDeposited {
        para_id: ParachainId,
        staker: Address,
        amount: u128,
    },
    /// Stake moved from `balance` to `locked_balance`.
    WithdrawRequested {
        para_id: ParachainId,
        staker: Address,
        amount: u128,
    },
    /// A pending request moved to `locked_balance_confirmed`.
    WithdrawConfirmed {
        para_id: ParachainId,
        staker: Address,
        amount: u128,
    },
    /// Confirmed stake left custody. `discarded_pending` is the unconfirmed
    /// `locked_balance` cleared by the withdrawal.
    StakeWithdrawn {
        para_id: ParachainId,
        staker: Address,
        amount: u128,
        discarded_pending: u128,
    },
    /// Governance seized stake.
    ReporterSlashed {
        para_id: ParachainId,
        reporter: Address,
        recipient: Address,
        amount: u128,
    },
}

/// Synchronous fan-out event bus for staking events.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&StakingEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&StakingEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &StakingEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn deposited() -> StakingEvent {
        StakingEvent::StakeDeposited {
            para_id: ParachainId::new(2000),
            staker: Address::repeat(1),
            amount: 20,
        }
    }

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&deposited());
        assert_eq!(counter.load(Ordering::SeqCst), 11);
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        EventBus::default().emit(&deposited());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(deposited()).unwrap();
        assert_eq!(json["type"], "stake_deposited");
        assert_eq!(json["amount"], 20);
        assert_eq!(json["staker"], format!("0x{}", "01".repeat(20)));
    }
}
