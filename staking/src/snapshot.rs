//! Ledger snapshots: capture every staker record at a point in time.
//!
//! A snapshot lets a host persist the ledger and rebuild it later. The hash
//! is computed deterministically from the captured state so a corrupted or
//! tampered snapshot is refused on restore.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::StakingError;
use crate::ledger::StakingLedger;
use crate::record::StakerRecord;
use para_registry::Registry;
use para_token::TokenCustody;
use para_types::{Address, Clock, ParachainId, StakingParams, Timestamp};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One staker record captured in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub para_id: ParachainId,
    pub staker: Address,
    pub record: StakerRecord,
}

/// A ledger snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingSnapshot {
    /// Blake2b-256 over every other field.
    pub hash: [u8; 32],
    pub version: u32,
    pub created_at: Timestamp,
    pub lock_period_secs: u64,
    pub governance: Option<Address>,
    /// Sorted by (parachain, staker).
    pub entries: Vec<SnapshotEntry>,
}

impl StakingSnapshot {
    pub fn new(
        entries: Vec<SnapshotEntry>,
        lock_period_secs: u64,
        governance: Option<Address>,
        created_at: Timestamp,
    ) -> Self {
        let mut snap = Self {
            hash: [0u8; 32],
            version: SNAPSHOT_VERSION,
            created_at,
            lock_period_secs,
            governance,
            entries,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.created_at.as_secs().to_le_bytes());
        hasher.update(self.lock_period_secs.to_le_bytes());
        match &self.governance {
            Some(gov) => {
                hasher.update([1u8]);
                hasher.update(gov.as_bytes());
            }
            None => hasher.update([0u8]),
        }
        for entry in &self.entries {
            let record = &entry.record;
            hasher.update(entry.para_id.as_u32().to_le_bytes());
            hasher.update(entry.staker.as_bytes());
            hasher.update(record.start_date.as_secs().to_le_bytes());
            hasher.update(record.balance.to_le_bytes());
            hasher.update(record.locked_balance.to_le_bytes());
            hasher.update(record.locked_balance_confirmed.to_le_bytes());
            match &record.linked_account {
                Some(account) => {
                    hasher.update((account.as_bytes().len() as u64).to_le_bytes());
                    hasher.update(account.as_bytes());
                }
                None => hasher.update(u64::MAX.to_le_bytes()),
            }
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Whether the stored hash matches the captured state.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, StakingError> {
        bincode::serialize(self).map_err(|e| StakingError::Snapshot(e.to_string()))
    }

    /// Deserialize a snapshot from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StakingError> {
        bincode::deserialize(bytes).map_err(|e| StakingError::Snapshot(e.to_string()))
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl StakingLedger {
    /// Capture the ledger state.
    pub fn snapshot(&self) -> StakingSnapshot {
        let entries = self
            .stakers
            .iter()
            .map(|(&(para_id, staker), record)| SnapshotEntry {
                para_id,
                staker,
                record: record.clone(),
            })
            .collect();
        StakingSnapshot::new(
            entries,
            self.params.lock_period_secs,
            self.governance.address(),
            self.clock.now(),
        )
    }

    /// Rebuild a ledger from a snapshot. Account links are derived from the
    /// records. Event listeners are not part of a snapshot.
    pub fn restore(
        snapshot: &StakingSnapshot,
        registry: Arc<dyn Registry>,
        custody: Arc<dyn TokenCustody>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StakingError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StakingError::Snapshot(format!(
                "unsupported version {}",
                snapshot.version
            )));
        }
        if !snapshot.verify() {
            return Err(StakingError::Snapshot("hash mismatch".to_string()));
        }

        let params = StakingParams::with_lock_period(snapshot.lock_period_secs);
        let mut ledger = Self::new(registry, custody, clock, params);
        if let Some(gov) = snapshot.governance {
            ledger
                .governance
                .init(gov)
                .map_err(|e| StakingError::Snapshot(format!("governance: {e}")))?;
        }

        let mut stakers = BTreeMap::new();
        for entry in &snapshot.entries {
            let key = (entry.para_id, entry.staker);
            if stakers.insert(key, entry.record.clone()).is_some() {
                return Err(StakingError::Snapshot(format!(
                    "duplicate record for staker {} on parachain {}",
                    entry.staker, entry.para_id
                )));
            }
            if let Some(account) = &entry.record.linked_account {
                let link = (entry.para_id, account.clone());
                if let Some(other) = ledger.account_links.insert(link, entry.staker) {
                    return Err(StakingError::Snapshot(format!(
                        "account {account} linked to both {other} and {}",
                        entry.staker
                    )));
                }
            }
        }
        ledger.stakers = stakers;

        tracing::info!(
            records = snapshot.entry_count(),
            created_at = %snapshot.created_at,
            "ledger restored from snapshot"
        );
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use para_nullables::{NullClock, NullCustody};
    use para_registry::ParachainRegistry;
    use para_types::LinkedAccount;

    const PARA: ParachainId = ParachainId::new(2000);

    fn populated() -> (StakingLedger, Arc<ParachainRegistry>, Arc<NullCustody>, Arc<NullClock>) {
        let registry = Arc::new(ParachainRegistry::new());
        registry
            .register(Address::repeat(0x0e), PARA, 40, 10_000, 12, vec![])
            .unwrap();
        let custody = Arc::new(NullCustody::new());
        let clock = Arc::new(NullClock::new(1_000));
        let mut ledger = StakingLedger::new(
            registry.clone(),
            custody.clone(),
            clock.clone(),
            StakingParams::with_lock_period(60),
        );
        ledger.init_governance(Address::repeat(0x90)).unwrap();
        ledger
            .deposit_stake(Address::repeat(1), PARA, LinkedAccount::new(vec![1; 32]), 20)
            .unwrap();
        ledger
            .deposit_stake(Address::repeat(2), PARA, LinkedAccount::new(vec![2; 32]), 30)
            .unwrap();
        ledger.request_withdraw(Address::repeat(2), PARA, 10).unwrap();
        (ledger, registry, custody, clock)
    }

    #[test]
    fn snapshot_survives_bytes_and_restore() {
        let (ledger, registry, custody, clock) = populated();
        let snap = ledger.snapshot();
        assert!(snap.verify());
        assert_eq!(snap.entry_count(), 2);

        let decoded = StakingSnapshot::from_bytes(&snap.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, snap);

        let restored = StakingLedger::restore(&decoded, registry, custody, clock).unwrap();
        assert_eq!(restored.governance(), Some(Address::repeat(0x90)));
        assert_eq!(restored.lock_period(), 60);
        assert_eq!(
            restored.get_staker_info(PARA, &Address::repeat(2)),
            ledger.get_staker_info(PARA, &Address::repeat(2))
        );
        assert_eq!(
            restored.staker_for_account(PARA, &LinkedAccount::new(vec![1; 32])),
            Some(Address::repeat(1))
        );
        assert_eq!(restored.total_custody_liability().unwrap(), 50);
    }

    #[test]
    fn tampered_snapshot_is_refused() {
        let (ledger, registry, custody, clock) = populated();
        let mut snap = ledger.snapshot();
        snap.entries[0].record.balance += 1;
        assert!(!snap.verify());

        let Err(err) = StakingLedger::restore(&snap, registry, custody, clock) else {
            panic!("tampered snapshot restored");
        };
        assert!(matches!(err, StakingError::Snapshot(_)));
    }

    #[test]
    fn edited_timestamp_fails_verification() {
        let (ledger, _registry, _custody, _clock) = populated();
        let mut snap = ledger.snapshot();
        snap.created_at = Timestamp::new(999_999);
        assert!(!snap.verify());
    }

    #[test]
    fn doubly_linked_account_is_refused() {
        let (ledger, registry, custody, clock) = populated();
        let snap = ledger.snapshot();
        let mut entries = snap.entries.clone();
        entries[1].record.linked_account = entries[0].record.linked_account.clone();
        let forged = StakingSnapshot::new(entries, 60, None, Timestamp::new(5));

        let Err(err) = StakingLedger::restore(&forged, registry, custody, clock) else {
            panic!("doubly linked snapshot restored");
        };
        assert!(matches!(err, StakingError::Snapshot(ref msg) if msg.contains("linked to both")));
    }

    #[test]
    fn garbage_bytes_are_a_snapshot_error() {
        assert!(matches!(
            StakingSnapshot::from_bytes(&[1, 2, 3]),
            Err(StakingError::Snapshot(_))
        ));
    }
}
