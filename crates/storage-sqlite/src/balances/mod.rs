//! SQLite storage implementation for daily account balances.

mod model;
mod repository;

pub use model::AccountBalanceDB;
pub use repository::BalanceRepository;
