//! Accounts module - domain models and repository trait.

mod accounts_constants;
mod accounts_model;
mod accounts_traits;


// Re-export the public interface
pub use accounts_constants::*;
pub use accounts_model::{
    get_liability_details, set_liability_details, Account, AccountClassification,
    LiabilityDetails, NewAccount,
};
pub use accounts_traits::AccountRepositoryTrait;
