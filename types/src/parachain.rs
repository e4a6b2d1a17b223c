//! Parachain identifiers and linked consumer-chain accounts.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a consumer chain.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ParachainId(u32);

impl ParachainId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ParachainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ParachainId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A consumer-chain account identifier linked to a staker.
///
/// The encoding is chain specific (SS58 public key bytes, an EVM address, ...),
/// so the ledger treats it as opaque bytes and only compares for equality.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkedAccount(Vec<u8>);

impl LinkedAccount {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse a hex string (with or without `0x`).
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        hex::decode(digits)
            .map(Self)
            .map_err(|e| TypesError::InvalidAccount(format!("{s}: {e}")))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LinkedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for LinkedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinkedAccount({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linked_account_hex_round_trip() {
        let account = LinkedAccount::new(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(account.to_string(), "0xdeadbeef");
        assert_eq!(LinkedAccount::from_hex("0xdeadbeef").unwrap(), account);
        assert_eq!(LinkedAccount::from_hex("deadbeef").unwrap(), account);
    }

    #[test]
    fn linked_account_rejects_bad_hex() {
        assert!(LinkedAccount::from_hex("0xnothex").is_err());
    }

    #[test]
    fn empty_account() {
        assert!(LinkedAccount::new(Vec::new()).is_empty());
        assert!(LinkedAccount::from_hex("0x").unwrap().is_empty());
    }

    #[test]
    fn parachain_id_display() {
        assert_eq!(ParachainId::new(2000).to_string(), "2000");
        assert_eq!(ParachainId::from(7).as_u32(), 7);
    }
}
