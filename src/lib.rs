//! Dynamic DNS updates for Amazon Route 53.
//!
//! Looks up the caller's public IPv4/IPv6 address and UPSERTs the matching
//! A/AAAA records for one hostname in a hosted zone.

pub mod config;
pub mod dns;
pub mod error;
pub mod ip;
pub mod update;

pub use error::{FlagError, LookupError, ProviderError, UpdateError};
pub use update::{UpdateOutcome, Updater};
