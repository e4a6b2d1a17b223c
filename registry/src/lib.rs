//! Parachain registry.
//!
//! Maps a [`ParachainId`](para_types::ParachainId) to the registration record a
//! parachain owner published for it. The staking ledger only reads it through
//! the [`Registry`] trait, to check that a parachain is known and to resolve
//! which parachain a relayed confirmation speaks for.
//!
//! [`ParachainRegistry`] is the in-memory implementation: the first caller to
//! register an id becomes its owner, and only that owner may update it.

pub mod error;
pub mod record;
pub mod registry;

pub use error::RegistryError;
pub use record::RegistrationRecord;
pub use registry::{ParachainRegistry, Registry};
