use serde::{Deserialize, Serialize};

use crate::entries::UpsertSummary;

/// What one item import touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Internal ids of every account upserted for the item.
    pub account_ids: Vec<String>,
    pub entries: UpsertSummary,
    pub entries_removed: usize,
    pub securities: usize,
    pub holdings: UpsertSummary,
    pub liabilities: usize,
}
