//! Shared utilities for the parachain staking ledger.

pub mod logging;
pub mod time;

pub use logging::{init_logging, try_init_logging, LogFormat, LoggingError};
pub use time::format_duration;
