//! File CRUD.

use bytes::Bytes;
use tracing::info;

use nimbus_core::error::AppError;
use nimbus_core::types::FileId;
use nimbus_entity::File;

use crate::context::ServiceContext;

/// Renames, stars, deletes and downloads files.
#[derive(Debug, Clone)]
pub struct FileService {
    ctx: ServiceContext,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fetch one file's metadata.
    pub async fn get(&self, id: &FileId) -> Result<File, AppError> {
        self.ctx.gateway.get_file(id).await
    }

    /// Rename a file.
    pub async fn rename(&self, id: &FileId, name: &str) -> Result<File, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Please enter a file name"));
        }
        let file = self.ctx.gateway.rename_file(id, name).await?;
        self.merge(&file).await;
        info!(file_id = %id, name = %file.name, "Renamed file");
        Ok(file)
    }

    /// Flip a file's star.
    pub async fn toggle_star(&self, id: &FileId) -> Result<File, AppError> {
        let file = self.ctx.gateway.toggle_file_star(id).await?;
        self.merge(&file).await;
        Ok(file)
    }

    /// Move a file to the trash.
    pub async fn delete(&self, id: &FileId) -> Result<(), AppError> {
        self.ctx.gateway.delete_file(id).await?;
        let mut state = self.ctx.state.write().await;
        state.files.remove(id);
        if state.ui.preview.as_ref().is_some_and(|f| &f.id == id) {
            state.ui.preview = None;
        }
        info!(file_id = %id, "Deleted file");
        Ok(())
    }

    /// Download a file's bytes.
    pub async fn download(&self, id: &FileId) -> Result<Bytes, AppError> {
        let bytes = self.ctx.gateway.download_file(id).await?;
        info!(file_id = %id, size = bytes.len(), "Downloaded file");
        Ok(bytes)
    }

    async fn merge(&self, file: &File) {
        let mut state = self.ctx.state.write().await;
        if state.files.contains(&file.id) {
            state.files.upsert(file.clone());
        }
        if state.ui.preview.as_ref().is_some_and(|f| f.id == file.id) {
            state.ui.preview = Some(file.clone());
        }
    }
}
