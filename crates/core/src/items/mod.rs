//! Linked items: one external aggregation login at one institution.

mod items_model;
mod items_service;
mod items_traits;

pub use items_model::{InstitutionDetails, LinkedItem, LinkedItemStatus, NewLinkedItem};
pub use items_service::LinkedItemService;
pub use items_traits::LinkedItemRepositoryTrait;

#[cfg(test)]
mod items_service_tests;
