//! Volume management.
//!
//! Volumes never reach the server. The only remote call here is the
//! storage usage lookup that caps a new volume's size.

use tracing::info;

use nimbus_core::error::AppError;
use nimbus_core::types::VolumeId;
use nimbus_entity::{NewVolume, Volume};

use crate::context::ServiceContext;
use crate::storage::StorageService;

/// Declares, renames and removes volumes.
#[derive(Debug, Clone)]
pub struct VolumeService {
    ctx: ServiceContext,
    storage: StorageService,
}

impl VolumeService {
    /// Creates a new volume service.
    pub fn new(ctx: ServiceContext, storage: StorageService) -> Self {
        Self { ctx, storage }
    }

    /// All volumes, newest first.
    pub async fn list(&self) -> Vec<Volume> {
        self.ctx.state.read().await.volumes.list()
    }

    /// Declare a new volume no larger than the free space in whole GiB.
    pub async fn create(&self, form: NewVolume) -> Result<Volume, AppError> {
        // Name problems are reported before the usage lookup.
        if form.name.trim().is_empty() {
            return Err(AppError::validation("Please enter a volume name"));
        }
        let available = self.storage.available_bytes().await?;
        let volume = form.into_volume(available)?;
        self.ctx.state.write().await.volumes.add(volume.clone())?;
        info!(volume_id = %volume.id, name = %volume.name, total = volume.total, "Created volume");
        Ok(volume)
    }

    /// Rename a volume.
    pub async fn rename(&self, id: &VolumeId, name: &str) -> Result<Volume, AppError> {
        let mut state = self.ctx.state.write().await;
        let renamed = state
            .volumes
            .get(id)
            .ok_or_else(|| AppError::not_found(format!("Volume {id} not found")))?
            .renamed(name)?;
        state.volumes.update(renamed.clone())?;
        Ok(renamed)
    }

    /// Remove a volume. Removing an unknown id is a no-op.
    pub async fn remove(&self, id: &VolumeId) -> Result<Option<Volume>, AppError> {
        let mut state = self.ctx.state.write().await;
        let removed = state.volumes.remove(id)?;
        if state.ui.current_volume.as_ref() == Some(id) {
            state.ui.current_volume = None;
        }
        if removed.is_some() {
            info!(volume_id = %id, "Removed volume");
        }
        Ok(removed)
    }

    /// Make a volume the current one.
    pub async fn open(&self, id: &VolumeId) -> Result<Volume, AppError> {
        let mut state = self.ctx.state.write().await;
        let volume = state
            .volumes
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Volume {id} not found")))?;
        state.ui.current_volume = Some(volume.id.clone());
        Ok(volume)
    }

    /// Clear the current volume.
    pub async fn close(&self) {
        self.ctx.state.write().await.ui.current_volume = None;
    }
}
