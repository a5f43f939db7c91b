//! Entries: dated, signed financial events with one typed payload.

mod entries_model;
mod entries_traits;

pub use entries_model::{Entry, EntryKind, EntryPayload, NewEntry, UpsertSummary};
pub use entries_traits::EntryRepositoryTrait;
