//! Registry lookup trait and the in-memory registry.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::RegistryError;
use crate::record::RegistrationRecord;
use para_types::{Address, ParachainId};

/// Read-side view of the parachain registry consumed by the staking ledger.
pub trait Registry: Send + Sync {
    /// Registration record for `id`, or [`RegistryError::NotFound`].
    fn lookup(&self, id: ParachainId) -> Result<RegistrationRecord, RegistryError>;

    /// The parachain owned by `owner`, or [`RegistryError::OwnerNotFound`].
    fn lookup_by_owner(&self, owner: &Address) -> Result<ParachainId, RegistryError>;

    /// Whether `id` has been registered.
    fn is_registered(&self, id: ParachainId) -> Result<bool, RegistryError> {
        match self.lookup(id) {
            Ok(_) => Ok(true),
            Err(RegistryError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[derive(Default)]
struct Entries {
    by_id: HashMap<ParachainId, RegistrationRecord>,
    by_owner: HashMap<Address, ParachainId>,
}

/// In-memory parachain registry with owner-set-once semantics.
#[derive(Default)]
pub struct ParachainRegistry {
    entries: RwLock<Entries>,
}

impl ParachainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` or update its fee configuration.
    ///
    /// The first registration makes `caller` the owner. Later calls for the
    /// same id must come from that owner. An address may own one parachain.
    pub fn register(
        &self,
        caller: Address,
        id: ParachainId,
        pallet_instance: u8,
        weight_to_fee: u128,
        decimals: u8,
        fee_location: Vec<u8>,
    ) -> Result<RegistrationRecord, RegistryError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| RegistryError::Backend(e.to_string()))?;

        if let Some(existing) = entries.by_id.get(&id) {
            if existing.owner != caller {
                return Err(RegistryError::NotOwner {
                    para_id: id,
                    owner: existing.owner,
                });
            }
        } else if let Some(owned) = entries.by_owner.get(&caller) {
            return Err(RegistryError::OwnerAlreadyRegistered {
                owner: caller,
                para_id: *owned,
            });
        }

        let record = RegistrationRecord {
            id,
            owner: caller,
            pallet_instance,
            weight_to_fee,
            decimals,
            fee_location,
        };
        let first = entries.by_id.insert(id, record.clone()).is_none();
        entries.by_owner.insert(caller, id);

        if first {
            tracing::info!(para_id = %id, owner = %caller, "parachain registered");
        } else {
            tracing::info!(para_id = %id, owner = %caller, "parachain registration updated");
        }
        Ok(record)
    }

    /// The owner of `id`.
    pub fn owner(&self, id: ParachainId) -> Result<Address, RegistryError> {
        self.lookup(id).map(|record| record.owner)
    }

    /// Number of registered parachains.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.by_id.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Registry for ParachainRegistry {
    fn lookup(&self, id: ParachainId) -> Result<RegistrationRecord, RegistryError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| RegistryError::Backend(e.to_string()))?;
        entries
            .by_id
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    fn lookup_by_owner(&self, owner: &Address) -> Result<ParachainId, RegistryError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| RegistryError::Backend(e.to_string()))?;
        entries
            .by_owner
            .get(owner)
            .copied()
            .ok_or(RegistryError::OwnerNotFound(*owner))
    }
}
