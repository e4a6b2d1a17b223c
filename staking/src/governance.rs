//! Governance guard: the single authority allowed to slash.

use crate::error::StakingError;
use para_types::Address;

/// Holds the governance address. Set exactly once, never rotated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Governance {
    address: Option<Address>,
}

impl Governance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the governance address. Fails if one is already set.
    pub fn init(&mut self, address: Address) -> Result<(), StakingError> {
        if self.address.is_some() {
            return Err(StakingError::AlreadyInitialized);
        }
        if address.is_zero() {
            return Err(StakingError::InvalidGovernanceAddress);
        }
        self.address = Some(address);
        Ok(())
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn is_initialized(&self) -> bool {
        self.address.is_some()
    }

    /// `Ok` only for the governance address. Before initialisation nobody is authorized.
    pub fn ensure(&self, caller: &Address) -> Result<(), StakingError> {
        match self.address {
            Some(gov) if gov == *caller => Ok(()),
            _ => Err(StakingError::Unauthorized),
        }
    }
}
