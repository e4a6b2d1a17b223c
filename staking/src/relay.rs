//! Delivery of externally triggered withdrawal confirmations.
//!
//! In a deployment, confirmations are relayed from the parachain. The ledger
//! does not care about the transport: a transport decodes the message, builds
//! a [`WithdrawConfirmation`] carrying the authorized origin, and hands it to
//! a [`ConfirmationHandler`], directly or through a [`ConfirmationRelay`].

use std::collections::VecDeque;

use crate::error::StakingError;
use crate::ledger::StakingLedger;
use para_types::Address;
use serde::{Deserialize, Serialize};

/// Entry point for withdrawal confirmations.
pub trait ConfirmationHandler {
    /// Confirm `amount` of `staker`'s pending request on behalf of `origin`.
    fn confirm(&mut self, origin: &Address, staker: &Address, amount: u128)
        -> Result<(), StakingError>;
}

impl ConfirmationHandler for StakingLedger {
    fn confirm(
        &mut self,
        origin: &Address,
        staker: &Address,
        amount: u128,
    ) -> Result<(), StakingError> {
        self.confirm_withdraw_request(*origin, *staker, amount)
    }
}

/// A confirmation as received from a transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawConfirmation {
    /// The authorized caller the confirmation speaks for (a parachain owner).
    pub origin: Address,
    pub staker: Address,
    pub amount: u128,
}

/// Result of delivering one confirmation.
#[derive(Debug)]
pub struct DeliveryOutcome {
    pub confirmation: WithdrawConfirmation,
    pub result: Result<(), StakingError>,
}

impl DeliveryOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// FIFO queue of confirmations waiting to be delivered.
///
/// Failed deliveries are reported in the outcome list and dropped, never retried.
#[derive(Debug, Default)]
pub struct ConfirmationRelay {
    queue: VecDeque<WithdrawConfirmation>,
}

impl ConfirmationRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, confirmation: WithdrawConfirmation) {
        self.queue.push_back(confirmation);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deliver every queued confirmation to `handler`, oldest first.
    pub fn deliver<H: ConfirmationHandler + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Vec<DeliveryOutcome> {
        let mut outcomes = Vec::with_capacity(self.queue.len());
        while let Some(confirmation) = self.queue.pop_front() {
            let result = handler.confirm(
                &confirmation.origin,
                &confirmation.staker,
                confirmation.amount,
            );
            if let Err(e) = &result {
                tracing::warn!(
                    origin = %confirmation.origin,
                    staker = %confirmation.staker,
                    amount = confirmation.amount,
                    "withdraw confirmation rejected: {e}"
                );
            }
            outcomes.push(DeliveryOutcome {
                confirmation,
                result,
            });
        }
        outcomes
    }
}
