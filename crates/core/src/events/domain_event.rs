//! Domain event types.

use serde::{Deserialize, Serialize};

use crate::sync::SyncTarget;

/// Domain events emitted by core services after sync state changes.
///
/// These events represent facts, never commands. Consumers outside the sync
/// core (notifications, dashboards) react to them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A sync record finished its data hook successfully.
    SyncCompleted { target: SyncTarget, record_id: String },

    /// A sync record failed; `error` is the stored failure message.
    SyncFailed {
        target: SyncTarget,
        record_id: String,
        error: String,
    },

    /// New transfer links were created by auto-matching.
    TransfersMatched {
        family_id: String,
        transfer_ids: Vec<String>,
    },

    /// The provider reported the item's login as stale.
    LinkedItemRequiresUpdate { item_id: String },

    /// The account's daily balance series was recomputed.
    AccountBalancesUpdated { account_id: String },
}

impl DomainEvent {
    pub fn sync_completed(target: SyncTarget, record_id: String) -> Self {
        Self::SyncCompleted { target, record_id }
    }

    pub fn sync_failed(target: SyncTarget, record_id: String, error: String) -> Self {
        Self::SyncFailed {
            target,
            record_id,
            error,
        }
    }

    pub fn transfers_matched(family_id: String, transfer_ids: Vec<String>) -> Self {
        Self::TransfersMatched {
            family_id,
            transfer_ids,
        }
    }

    pub fn linked_item_requires_update(item_id: String) -> Self {
        Self::LinkedItemRequiresUpdate { item_id }
    }

    pub fn account_balances_updated(account_id: String) -> Self {
        Self::AccountBalancesUpdated { account_id }
    }
}
