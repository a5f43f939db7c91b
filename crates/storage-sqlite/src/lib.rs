//! SQLite storage implementation for ledgersync.
//!
//! This crate is the only place Diesel appears. It implements the repository
//! traits defined in `ledgersync-core`:
//! - connection pooling, pragmas and embedded migrations
//! - a single serialized writer (`WriteHandle`) for every mutation
//! - repository implementations and their Diesel row models
//!
//! ```text
//! core (domain)          connect (provider)
//!       │                      │
//!       └──────────┬───────────┘
//!                  ▼
//!      storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

pub mod accounts;
pub mod balances;
pub mod entries;
pub mod families;
pub mod investments;
pub mod items;
pub mod sync;
pub mod transfers;

pub use db::{
    create_pool, get_connection, init, open, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};
pub use errors::{IntoCore, StorageError};

pub use accounts::AccountRepository;
pub use balances::BalanceRepository;
pub use entries::EntryRepository;
pub use families::FamilyRepository;
pub use investments::InvestmentRepository;
pub use items::LinkedItemRepository;
pub use sync::SyncRecordRepository;
pub use transfers::TransferRepository;

pub use ledgersync_core::errors::{DatabaseError, Error, Result};
