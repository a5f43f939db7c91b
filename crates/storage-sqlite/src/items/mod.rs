//! SQLite storage implementation for linked items.

mod model;
mod repository;

pub use model::LinkedItemDB;
pub use repository::LinkedItemRepository;
