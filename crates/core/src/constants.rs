/// Provider error code signalling that the stored credential is no longer valid.
pub const REAUTH_REQUIRED_ERROR_CODE: &str = "ITEM_LOGIN_REQUIRED";

/// Non-terminal sync records older than this are ignored by "is syncing" checks.
pub const SYNC_STALE_AFTER_MINUTES: i64 = 10;

/// Maximum distance in days between the two legs of an auto-matched transfer.
pub const TRANSFER_DATE_WINDOW_DAYS: i64 = 4;

/// Webhooks signed longer ago than this are rejected as replays.
pub const WEBHOOK_MAX_AGE_SECS: i64 = 5 * 60;

/// Days of history requested on the first investments fetch of an item.
pub const INVESTMENTS_LOOKBACK_DAYS: i64 = 730;

/// Currency assumed when a provider omits one.
pub const DEFAULT_CURRENCY: &str = "USD";
