//! Client-declared volumes mirrored to durable storage.

use std::sync::Arc;

use tracing::{debug, warn};

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::traits::KeyValueStore;
use nimbus_core::types::VolumeId;
use nimbus_entity::Volume;

use crate::collection::Collection;
use crate::keys;

/// The volume collection plus its durable snapshot.
///
/// Every mutation writes the full snapshot under the `volumes` key before
/// the in-memory collection changes, so a failed write leaves both sides
/// as they were.
#[derive(Debug)]
pub struct VolumeStore {
    volumes: Collection<Volume>,
    kv: Arc<dyn KeyValueStore>,
}

impl VolumeStore {
    /// Load the snapshot written by a previous run.
    ///
    /// An unreadable snapshot is logged and treated as empty.
    pub fn hydrate(kv: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let mut volumes = Collection::new();
        match kv.get_json::<Vec<Volume>>(keys::VOLUMES) {
            Ok(Some(saved)) => {
                debug!(count = saved.len(), "Restored volumes");
                volumes.set_all(saved);
            }
            Ok(None) => {}
            Err(e) if e.kind == nimbus_core::error::ErrorKind::Serialization => {
                warn!(error = %e, "Discarding unreadable volume snapshot");
            }
            Err(e) => return Err(e),
        }
        Ok(Self { volumes, kv })
    }

    /// Volumes in display order.
    pub fn list(&self) -> Vec<Volume> {
        self.volumes.to_vec()
    }

    pub fn get(&self, id: &VolumeId) -> Option<&Volume> {
        self.volumes.get(id)
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Capacity already promised to volumes, in bytes.
    pub fn total_declared(&self) -> u64 {
        self.volumes.iter().map(|v| v.total).sum()
    }

    /// Add a new volume (or replace one with the same id).
    pub fn add(&mut self, volume: Volume) -> AppResult<()> {
        let mut next = self.volumes.clone();
        next.upsert(volume);
        self.commit(next)
    }

    /// Replace an existing volume.
    pub fn update(&mut self, volume: Volume) -> AppResult<()> {
        if !self.volumes.contains(&volume.id) {
            return Err(AppError::not_found(format!("Volume {} not found", volume.id)));
        }
        self.add(volume)
    }

    /// Remove a volume. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &VolumeId) -> AppResult<Option<Volume>> {
        if !self.volumes.contains(id) {
            return Ok(None);
        }
        let mut next = self.volumes.clone();
        let removed = next.remove(id);
        self.commit(next)?;
        Ok(removed)
    }

    fn commit(&mut self, next: Collection<Volume>) -> AppResult<()> {
        self.kv.set_json(keys::VOLUMES, &next.to_vec())?;
        self.volumes = next;
        Ok(())
    }
}
