/// Key holding the serialized workout collection.
pub const STORAGE_KEY: &str = "gymWorkouts";

/// Key holding the schema version tag.
pub const VERSION_KEY: &str = "appVersion";

pub const CURRENT_VERSION: &str = "1.0.0";

/// Prefix for keys that preserve unreadable blobs.
pub const BACKUP_KEY_PREFIX: &str = "gymWorkouts_backup_";

/// Browser local storage gives an origin roughly this much room.
pub const DEFAULT_STORAGE_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Sentinel weight for "performed, weight not tracked".
pub const NA_WEIGHT: &str = "NA";

pub const SESSION_START_HOUR: u32 = 7;
pub const SESSION_END_HOUR: u32 = 8;

/// Minutes before the session start at which the calendar alarm fires.
pub const REMINDER_MINUTES: i64 = 60;
