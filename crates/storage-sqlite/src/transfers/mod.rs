//! SQLite storage implementation for transfers and rejected pairs.

mod model;
mod repository;

pub use model::{RejectedTransferDB, TransferDB};
pub use repository::TransferRepository;
