//! SQLite storage implementation for securities and holdings.

mod model;
mod repository;

pub use model::{HoldingDB, SecurityDB};
pub use repository::InvestmentRepository;
