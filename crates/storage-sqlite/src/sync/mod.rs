//! SQLite storage implementation for sync records.

mod model;
mod repository;

pub use model::SyncRecordDB;
pub use repository::SyncRecordRepository;
