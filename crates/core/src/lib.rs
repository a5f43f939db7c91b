//! Ledgersync Core - Domain entities, services, and traits.
//!
//! This crate contains the sync orchestration and transfer matching logic.
//! It is database-agnostic and defines traits that are implemented by the
//! `storage-sqlite` crate; provider clients live in `connect`.

pub mod accounts;
pub mod balances;
pub mod constants;
pub mod entries;
pub mod errors;
pub mod events;
pub mod families;
pub mod import;
pub mod investments;
pub mod items;
pub mod providers;
pub mod reporting;
pub mod sync;
pub mod transfers;
pub mod utils;
pub mod webhooks;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
