//! Single-request uploads into the current folder.

use bytes::Bytes;
use tracing::{info, warn};

use nimbus_client::FileUpload;
use nimbus_core::error::AppError;
use nimbus_entity::File;

use crate::context::ServiceContext;
use crate::storage::StorageService;

/// Uploads files after checking the size limit and remaining quota.
#[derive(Debug, Clone)]
pub struct UploadService {
    ctx: ServiceContext,
    storage: StorageService,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(ctx: ServiceContext, storage: StorageService) -> Self {
        Self { ctx, storage }
    }

    /// Upload `bytes` as `name` into the current folder.
    pub async fn upload(
        &self,
        name: &str,
        mime_type: &str,
        bytes: Bytes,
    ) -> Result<File, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("File name is required"));
        }
        let size = bytes.len() as u64;
        let max = self.ctx.limits.max_upload_bytes;
        if size > max {
            return Err(AppError::validation(format!(
                "File is too large (maximum {} MB)",
                max / (1024 * 1024)
            )));
        }
        let usage = self.storage.usage().await?;
        if usage.would_exceed(size) {
            return Err(AppError::validation("Not enough storage space for this file"));
        }

        let folder_id = {
            let mut state = self.ctx.state.write().await;
            state.ui.begin_upload();
            state.navigation.current_id().cloned()
        };
        let result = self
            .ctx
            .gateway
            .upload_file(FileUpload {
                name: name.to_string(),
                mime_type: mime_type.to_string(),
                bytes,
                folder_id: folder_id.clone(),
            })
            .await;

        let mut state = self.ctx.state.write().await;
        state.ui.end_upload();
        match result {
            Ok(file) => {
                if state.navigation.current_id() == folder_id.as_ref() {
                    state.files.upsert(file.clone());
                }
                info!(file_id = %file.id, name = %file.name, size, "Uploaded file");
                Ok(file)
            }
            Err(e) => {
                warn!(name, error = %e, "Upload failed");
                Err(e)
            }
        }
    }
}
