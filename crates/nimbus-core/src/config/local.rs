//! Durable local storage configuration.

use serde::{Deserialize, Serialize};

/// Where the client keeps its durable key-value data (token, profile,
/// volumes, preferences).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Path of the JSON file backing the key-value store.
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
        }
    }
}

fn default_state_file() -> String {
    "data/nimbus-state.json".to_string()
}
