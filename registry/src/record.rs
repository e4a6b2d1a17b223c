//! Registration record published by a parachain owner.

use para_types::{Address, ParachainId};
use serde::{Deserialize, Serialize};

/// What the registry knows about a parachain.
///
/// Only `owner` matters to the staking ledger; the remaining fields describe
/// how fees for messages to the parachain are paid and are carried opaquely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub id: ParachainId,
    /// Account that registered the parachain. Set once.
    pub owner: Address,
    /// Pallet index of the oracle pallet on the parachain.
    pub pallet_instance: u8,
    /// Conversion factor from message weight to fee.
    pub weight_to_fee: u128,
    /// Decimals of the parachain's fee asset.
    pub decimals: u8,
    /// Encoded location of the fee asset.
    pub fee_location: Vec<u8>,
}
