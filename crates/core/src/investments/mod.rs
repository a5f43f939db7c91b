//! Securities and holdings imported for investment accounts.

mod investments_model;
mod investments_traits;

pub use investments_model::{Holding, NewHolding, NewSecurity, Security};
pub use investments_traits::InvestmentRepositoryTrait;
