//! SQLite storage implementation for entries.

mod model;
mod repository;

pub use model::EntryDB;
pub use repository::EntryRepository;
