//! Fungible token custody.
//!
//! The staking ledger never touches token balances directly. It pulls stake in
//! and pays stake out through the [`TokenCustody`] trait. This crate provides
//! an in-memory ERC20-style token ([`Erc20Token`]) and the adapter that binds
//! it to the ledger's custody address ([`CustodyAccount`]).

pub mod custody;
pub mod erc20;
pub mod error;

pub use custody::{CustodyAccount, TokenCustody};
pub use erc20::Erc20Token;
pub use error::TokenError;
