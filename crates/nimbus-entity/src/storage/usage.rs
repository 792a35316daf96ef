//! Account storage usage reported by the server.

use serde::{Deserialize, Serialize};

/// Used and total bytes for the signed-in account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageUsage {
    /// Bytes currently used.
    pub used: u64,
    /// Total quota in bytes.
    pub quota: u64,
    /// Usage percentage (0.0 - 100.0).
    #[serde(default)]
    pub percentage: f64,
}

impl StorageUsage {
    /// Create a usage value from quota and used bytes.
    pub fn new(quota: u64, used: u64) -> Self {
        let percentage = if quota == 0 {
            0.0
        } else {
            (used as f64 / quota as f64) * 100.0
        };
        Self {
            used,
            quota,
            percentage,
        }
    }

    /// Bytes still available.
    pub fn available(&self) -> u64 {
        self.quota.saturating_sub(self.used)
    }

    /// Check if the quota is exceeded.
    pub fn is_exceeded(&self) -> bool {
        self.used >= self.quota
    }

    /// Check if adding the given number of bytes would exceed the quota.
    pub fn would_exceed(&self, additional_bytes: u64) -> bool {
        self.used.saturating_add(additional_bytes) > self.quota
    }
}
