//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The ledger reaches the outside world (time, token custody) only through
//! traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record what was asked of them
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod custody;

pub use clock::NullClock;
pub use custody::NullCustody;
