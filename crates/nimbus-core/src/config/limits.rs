//! Client-side validation limits.

use serde::{Deserialize, Serialize};

/// Bytes in one gibibyte.
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Limits checked before any request leaves the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Largest single upload accepted, in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: u64,
    /// Quota assumed when the server has not reported usage yet.
    #[serde(default = "default_quota")]
    pub default_quota_bytes: u64,
    /// Minimum length of a folder lock password.
    #[serde(default = "default_min_password")]
    pub min_folder_password_length: usize,
    /// Page size used for file search.
    #[serde(default = "default_page_size")]
    pub search_page_size: u32,
    /// Breadcrumb paths longer than this collapse to first / … / last.
    #[serde(default = "default_collapse_after")]
    pub breadcrumb_collapse_after: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload(),
            default_quota_bytes: default_quota(),
            min_folder_password_length: default_min_password(),
            search_page_size: default_page_size(),
            breadcrumb_collapse_after: default_collapse_after(),
        }
    }
}

fn default_max_upload() -> u64 {
    100 * 1024 * 1024
}

fn default_quota() -> u64 {
    15 * GIB
}

fn default_min_password() -> usize {
    4
}

fn default_page_size() -> u32 {
    20
}

fn default_collapse_after() -> usize {
    3
}
