//! Transfer detection between transactions of one family.

mod transfers_matcher;
mod transfers_model;
mod transfers_service;
mod transfers_traits;

pub use transfers_matcher::plan_transfer_matches;
pub use transfers_model::*;
pub use transfers_service::TransferService;
pub use transfers_traits::TransferRepositoryTrait;
