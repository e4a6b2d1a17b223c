use para_types::{Address, ParachainId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("parachain {0} not registered")]
    NotFound(ParachainId),

    #[error("address {0} owns no parachain")]
    OwnerNotFound(Address),

    #[error("parachain {para_id} is owned by {owner}")]
    NotOwner { para_id: ParachainId, owner: Address },

    #[error("address {owner} already owns parachain {para_id}")]
    OwnerAlreadyRegistered { owner: Address, para_id: ParachainId },

    #[error("registry backend error: {0}")]
    Backend(String),
}
