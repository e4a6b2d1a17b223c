//! Parachain staking ledger.
//!
//! Reporters lock collateral against a parachain in exchange for the right to
//! report on its behalf. The ledger keeps one [`StakerRecord`] per
//! `(parachain, staker)` and moves funds through it:
//!
//! ```text
//! deposit ─▶ balance ─request─▶ locked_balance ─confirm─▶ locked_balance_confirmed ─withdraw─▶ out
//!               │
//!               └──────────── slash (governance only, ignores the lock) ───────────▶ recipient
//! ```
//!
//! Withdrawals unlock a fixed lock period after the staker's *first* deposit.
//! Confirmations arrive from the parachain side through the [`relay`] adapter.
//! Every operation either completes fully or leaves the ledger untouched.

pub mod config;
pub mod error;
pub mod event;
pub mod governance;
pub mod ledger;
pub mod record;
pub mod relay;
pub mod slashing;
pub mod snapshot;
pub mod withdrawal;

pub use config::StakingConfig;
pub use error::{ErrorKind, StakingError};
pub use event::{EventBus, StakingEvent};
pub use governance::Governance;
pub use ledger::StakingLedger;
pub use record::{StakerDetails, StakerInfo, StakerRecord};
pub use relay::{ConfirmationHandler, ConfirmationRelay, DeliveryOutcome, WithdrawConfirmation};
pub use snapshot::{SnapshotEntry, StakingSnapshot};
