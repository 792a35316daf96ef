//! Folder CRUD and password protection.

use tracing::{info, warn};

use nimbus_core::error::AppError;
use nimbus_core::types::FolderId;
use nimbus_entity::Folder;

use crate::context::ServiceContext;
use crate::folder::navigation::NavigationService;

/// Manages folders in the current view.
#[derive(Debug, Clone)]
pub struct FolderService {
    ctx: ServiceContext,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a folder inside the current folder.
    pub async fn create(&self, name: &str) -> Result<Folder, AppError> {
        let name = require_name(name)?;
        let parent = self.ctx.state.read().await.navigation.current_id().cloned();

        let folder = self
            .ctx
            .gateway
            .create_folder(&name, parent.as_ref())
            .await?;

        let mut state = self.ctx.state.write().await;
        // The user may have moved on while the request was in flight.
        if state.navigation.current_id() == parent.as_ref() {
            state.folders.upsert(folder.clone());
        }
        info!(folder_id = %folder.id, name = %folder.name, "Created folder");
        Ok(folder)
    }

    /// Rename a folder.
    pub async fn rename(&self, id: &FolderId, name: &str) -> Result<Folder, AppError> {
        let name = require_name(name)?;
        let folder = self.ctx.gateway.rename_folder(id, &name).await?;
        self.merge(&folder).await;
        info!(folder_id = %id, name = %folder.name, "Renamed folder");
        Ok(folder)
    }

    /// Flip a folder's star.
    pub async fn toggle_star(&self, id: &FolderId) -> Result<Folder, AppError> {
        let folder = self.ctx.gateway.toggle_folder_star(id).await?;
        self.merge(&folder).await;
        Ok(folder)
    }

    /// Move a folder and everything below it to the trash.
    ///
    /// If the folder is on the breadcrumb path, navigation moves to the
    /// entry before it (or the root).
    pub async fn delete(&self, id: &FolderId) -> Result<(), AppError> {
        self.ctx.gateway.delete_folder(id).await?;
        let back_to = {
            let mut state = self.ctx.state.write().await;
            state.folders.remove(id);
            let path = state.navigation.path();
            path.iter()
                .position(|f| &f.id == id)
                .map(|i| path[..i].last().cloned())
        };
        info!(folder_id = %id, "Deleted folder");

        if let Some(target) = back_to {
            let navigation = NavigationService::new(self.ctx.clone());
            if let Err(e) = navigation.open(target).await {
                warn!(folder_id = %id, error = %e, "Could not leave deleted folder");
            }
        }
        Ok(())
    }

    /// Protect a folder with a password.
    ///
    /// The password must meet the minimum length and match its
    /// confirmation; both are checked before any request.
    pub async fn lock(
        &self,
        id: &FolderId,
        password: &str,
        confirm_password: &str,
    ) -> Result<Folder, AppError> {
        let min = self.ctx.limits.min_folder_password_length;
        if password.chars().count() < min {
            return Err(AppError::validation(format!(
                "Password must be at least {min} characters"
            )));
        }
        if password != confirm_password {
            return Err(AppError::validation("Passwords do not match"));
        }
        let folder = self.ctx.gateway.lock_folder(id, password).await?;
        self.merge(&folder).await;
        info!(folder_id = %id, "Locked folder");
        Ok(folder)
    }

    /// Remove a folder's password protection.
    pub async fn unlock(&self, id: &FolderId, password: &str) -> Result<Folder, AppError> {
        if password.is_empty() {
            return Err(AppError::validation("Please enter the folder password"));
        }
        let folder = self.ctx.gateway.unlock_folder(id, password).await?;
        self.merge(&folder).await;
        info!(folder_id = %id, "Unlocked folder");
        Ok(folder)
    }

    /// Fold a server copy into the listing and the breadcrumb.
    async fn merge(&self, folder: &Folder) {
        let mut state = self.ctx.state.write().await;
        if state.folders.contains(&folder.id) {
            state.folders.upsert(folder.clone());
        }
        state.navigation.rename(folder);
    }
}

fn require_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Please enter a folder name"));
    }
    Ok(trimmed.to_string())
}
