//! Domain model for system settings.

use serde::{Deserialize, Serialize};

/// Default retention horizon for any task, in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 90;
/// Default retention horizon for disabled tasks, in days.
pub const DEFAULT_DISABLED_RETENTION_DAYS: u32 = 30;
/// Default cap on tasks examined per cleanup scan.
pub const DEFAULT_CLEANUP_SCAN_LIMIT: usize = 500;
/// Default cap on runs examined per pruning scan.
pub const DEFAULT_PRUNE_SCAN_LIMIT: usize = 500;

/// Tunable system-wide settings.
///
/// Stored as a single document under a fixed key; absent fields fall
/// back to the defaults above on deserialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSettings {
    /// Days of inactivity before any task becomes a cleanup candidate.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Days of inactivity before a disabled task becomes a candidate.
    #[serde(default = "default_disabled_retention_days")]
    pub disabled_retention_days: u32,
    /// Cap on tasks examined per cleanup scan.
    #[serde(default = "default_cleanup_scan_limit")]
    pub cleanup_scan_limit: usize,
    /// Cap on runs examined per pruning scan.
    #[serde(default = "default_prune_scan_limit")]
    pub prune_scan_limit: usize,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
            disabled_retention_days: DEFAULT_DISABLED_RETENTION_DAYS,
            cleanup_scan_limit: DEFAULT_CLEANUP_SCAN_LIMIT,
            prune_scan_limit: DEFAULT_PRUNE_SCAN_LIMIT,
        }
    }
}

const fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

const fn default_disabled_retention_days() -> u32 {
    DEFAULT_DISABLED_RETENTION_DAYS
}

const fn default_cleanup_scan_limit() -> usize {
    DEFAULT_CLEANUP_SCAN_LIMIT
}

const fn default_prune_scan_limit() -> usize {
    DEFAULT_PRUNE_SCAN_LIMIT
}
