//! Sync record domain models.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::SYNC_STALE_AFTER_MINUTES;
use crate::{errors::ValidationError, Error, Result};

/// Lifecycle of a sync record: `pending -> syncing -> completed | failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Pending,
    Syncing,
    Completed,
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Completed => "completed",
            SyncStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "pending" => Ok(SyncStatus::Pending),
            "syncing" => Ok(SyncStatus::Syncing),
            "completed" => Ok(SyncStatus::Completed),
            "failed" => Ok(SyncStatus::Failed),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown sync status '{}'",
                other
            )))),
        }
    }

    /// Completed and failed records are never executed again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncStatus::Completed | SyncStatus::Failed)
    }

    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn can_transition_to(&self, next: SyncStatus) -> bool {
        matches!(
            (self, next),
            (SyncStatus::Pending, SyncStatus::Syncing)
                | (SyncStatus::Syncing, SyncStatus::Completed)
                | (SyncStatus::Syncing, SyncStatus::Failed)
        )
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entity a sync record refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SyncTarget {
    Family(String),
    Account(String),
    Item(String),
}

impl SyncTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            SyncTarget::Family(_) => "family",
            SyncTarget::Account(_) => "account",
            SyncTarget::Item(_) => "item",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            SyncTarget::Family(id) | SyncTarget::Account(id) | SyncTarget::Item(id) => id,
        }
    }

    /// Rebuilds a target from its stored `(kind, id)` columns.
    pub fn from_parts(kind: &str, id: String) -> Result<Self> {
        match kind {
            "family" => Ok(SyncTarget::Family(id)),
            "account" => Ok(SyncTarget::Account(id)),
            "item" => Ok(SyncTarget::Item(id)),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown sync target kind '{}'",
                other
            )))),
        }
    }
}

impl std::fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// Optional date bounds of the history a sync refreshes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncWindow {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SyncWindow {
    pub fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

/// A persisted unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRecord {
    pub id: String,
    pub target: SyncTarget,
    pub status: SyncStatus,
    /// Set on child records cascaded from a family or item sync.
    pub parent_id: Option<String>,
    pub window: SyncWindow,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SyncRecord {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// An active record older than the staleness cutoff is ignored by status checks.
    pub fn is_stale(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
        self.created_at < now - stale_after
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSyncRecord {
    pub target: SyncTarget,
    pub parent_id: Option<String>,
    pub window: SyncWindow,
}

/// Tunables for scheduling and provider paging.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How long an active record counts toward "currently syncing".
    pub stale_after: Duration,
    /// Safety cap on transaction pages fetched in one import.
    pub max_transaction_pages: usize,
    /// Default look-back for investment transactions when the window has no start.
    pub investments_lookback_days: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            stale_after: Duration::minutes(SYNC_STALE_AFTER_MINUTES),
            max_transaction_pages: 100,
            investments_lookback_days: crate::constants::INVESTMENTS_LOOKBACK_DAYS,
        }
    }
}
