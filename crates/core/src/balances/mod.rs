//! Daily account balance recomputation.

mod balance_calculator;
mod balances_model;
mod balances_traits;

pub use balance_calculator::{BalanceCalculator, BalanceStrategy};
pub use balances_model::DailyBalance;
pub use balances_traits::BalanceRepositoryTrait;
