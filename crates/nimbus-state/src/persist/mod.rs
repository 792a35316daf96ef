//! Durable key-value stores.
//!
//! The backing store is chosen from the `[local]` configuration: a JSON
//! file when `state_file` is set, an in-memory map when it is empty.

pub mod file;
pub mod memory;

use std::sync::Arc;

use tracing::info;

use nimbus_core::config::LocalConfig;
use nimbus_core::result::AppResult;
use nimbus_core::traits::KeyValueStore;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

/// Open the configured durable store.
pub fn open(config: &LocalConfig) -> AppResult<Arc<dyn KeyValueStore>> {
    let path = config.state_file.trim();
    if path.is_empty() {
        info!("No state file configured, client state will not survive restarts");
        return Ok(Arc::new(MemoryKeyValueStore::new()));
    }
    info!(path, "Opening client state file");
    Ok(Arc::new(FileKeyValueStore::open(path)?))
}
