//! Families: the tenant boundary that owns accounts, items and entries.

mod families_model;
mod families_traits;

pub use families_model::{Family, NewFamily};
pub use families_traits::FamilyRepositoryTrait;
