//! Fundamental types for the parachain staking ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, parachain identifiers, linked consumer-chain accounts, timestamps,
//! the clock abstraction and staking parameters.

pub mod address;
pub mod error;
pub mod params;
pub mod parachain;
pub mod time;

pub use address::Address;
pub use error::TypesError;
pub use params::StakingParams;
pub use parachain::{LinkedAccount, ParachainId};
pub use time::{Clock, SystemClock, Timestamp};
