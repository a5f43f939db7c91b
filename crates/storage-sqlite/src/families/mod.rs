//! SQLite storage implementation for families.

mod model;
mod repository;

pub use model::FamilyDB;
pub use repository::FamilyRepository;
