//! Provider snapshot import for linked items.

mod import_mapping;
mod import_model;
mod import_pipeline;

pub use import_mapping::*;
pub use import_model::ImportSummary;
pub use import_pipeline::ImportPipeline;
