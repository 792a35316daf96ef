//! In-process drive backend.
//!
//! Mirrors the server's observable rules: per-account trees, star toggles,
//! soft delete of whole subtrees, folder passwords and a byte quota that
//! grows on upload and is not given back by a soft delete. Nothing is
//! persisted; the backend lives as long as the gateway.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use nimbus_core::config::limits::LimitsConfig;
use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::types::{FileId, FolderId, Page, PageRequest, UserId};
use nimbus_entity::{
    AuthSession, File, Folder, LoginRequest, RegisterRequest, StorageUsage, UserProfile,
};

use crate::gateway::{DriveGateway, FileUpload};

/// Files touched within this window count as recent.
const RECENT_WINDOW_DAYS: i64 = 30;
/// Maximum number of recent files returned.
const RECENT_LIMIT: usize = 20;

#[derive(Debug)]
struct Account {
    profile: UserProfile,
    password: String,
    quota: u64,
    used: u64,
}

#[derive(Debug)]
struct StoredFolder {
    folder: Folder,
    owner: UserId,
    password: Option<String>,
    trashed: bool,
}

#[derive(Debug)]
struct StoredFile {
    file: File,
    owner: UserId,
    content: Bytes,
    trashed: bool,
}

#[derive(Debug, Default)]
struct Backend {
    accounts: Vec<Account>,
    sessions: HashMap<String, UserId>,
    folders: Vec<StoredFolder>,
    files: Vec<StoredFile>,
}

impl Backend {
    fn account(&self, user: &UserId) -> AppResult<&Account> {
        self.accounts
            .iter()
            .find(|a| &a.profile.id == user)
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    fn account_mut(&mut self, user: &UserId) -> AppResult<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|a| &a.profile.id == user)
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    fn open_session(&mut self, user: UserId) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.clone(), user);
        token
    }

    fn folder(&self, id: &FolderId, owner: &UserId) -> AppResult<&StoredFolder> {
        let stored = self
            .folders
            .iter()
            .find(|f| &f.folder.id == id && !f.trashed)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        if &stored.owner != owner {
            return Err(AppError::authorization("Access denied"));
        }
        Ok(stored)
    }

    fn folder_mut(&mut self, id: &FolderId, owner: &UserId) -> AppResult<&mut StoredFolder> {
        let stored = self
            .folders
            .iter_mut()
            .find(|f| &f.folder.id == id && !f.trashed)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        if &stored.owner != owner {
            return Err(AppError::authorization("Access denied"));
        }
        Ok(stored)
    }

    fn file(&self, id: &FileId, owner: &UserId) -> AppResult<&StoredFile> {
        let stored = self
            .files
            .iter()
            .find(|f| &f.file.id == id && !f.trashed)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if &stored.owner != owner {
            return Err(AppError::authorization("Access denied"));
        }
        Ok(stored)
    }

    fn file_mut(&mut self, id: &FileId, owner: &UserId) -> AppResult<&mut StoredFile> {
        let stored = self
            .files
            .iter_mut()
            .find(|f| &f.file.id == id && !f.trashed)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if &stored.owner != owner {
            return Err(AppError::authorization("Access denied"));
        }
        Ok(stored)
    }

    fn live_files(&self, owner: &UserId) -> impl Iterator<Item = &File> {
        self.files
            .iter()
            .filter(move |f| &f.owner == owner && !f.trashed)
            .map(|f| &f.file)
    }

    fn path_for(&self, parent: Option<&FolderId>, name: &str, owner: &UserId) -> AppResult<String> {
        match parent {
            None => Ok(format!("/{name}")),
            Some(parent) => {
                let parent = self.folder(parent, owner)?;
                let base = parent.folder.path.clone().unwrap_or_default();
                Ok(format!("{base}/{name}"))
            }
        }
    }

    /// Ids of `root` and every live folder below it.
    fn subtree(&self, root: &FolderId) -> Vec<FolderId> {
        let mut ids = vec![root.clone()];
        let mut cursor = 0;
        while cursor < ids.len() {
            let current = ids[cursor].clone();
            ids.extend(
                self.folders
                    .iter()
                    .filter(|f| !f.trashed && f.folder.parent_id.as_ref() == Some(&current))
                    .map(|f| f.folder.id.clone()),
            );
            cursor += 1;
        }
        ids
    }
}

/// Gateway backed by an in-process drive.
///
/// Behaves like the HTTP API for every operation the client uses, which
/// makes it the backend for offline runs and for tests.
pub struct MemoryGateway {
    backend: RwLock<Backend>,
    token: RwLock<Option<String>>,
    default_quota: u64,
}

impl std::fmt::Debug for MemoryGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGateway")
            .field("default_quota", &self.default_quota)
            .finish_non_exhaustive()
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    /// Empty backend with the default per-account quota.
    pub fn new() -> Self {
        Self::with_quota(LimitsConfig::default().default_quota_bytes)
    }

    /// Empty backend where new accounts get `quota` bytes.
    pub fn with_quota(quota: u64) -> Self {
        Self {
            backend: RwLock::new(Backend::default()),
            token: RwLock::new(None),
            default_quota: quota,
        }
    }

    /// Create an account directly, bypassing registration validation.
    pub async fn seed_account(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> UserProfile {
        let profile = UserProfile {
            id: UserId::generate(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            storage_used: None,
            storage_quota: None,
        };
        self.backend.write().await.accounts.push(Account {
            profile: profile.clone(),
            password: password.to_string(),
            quota: self.default_quota,
            used: 0,
        });
        profile
    }

    /// Resolve the bearer token to its account.
    async fn session_user(&self) -> AppResult<UserId> {
        let token = self.token.read().await.clone();
        let token = token.ok_or_else(|| AppError::authentication("Authentication required"))?;
        self.backend
            .read()
            .await
            .sessions
            .get(&token)
            .cloned()
            .ok_or_else(|| AppError::authentication("Session expired"))
    }
}

fn require_name(name: &str, what: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{what} name is required")));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl DriveGateway for MemoryGateway {
    async fn set_bearer_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    async fn login(&self, request: &LoginRequest) -> AppResult<AuthSession> {
        let mut backend = self.backend.write().await;
        let profile = backend
            .accounts
            .iter()
            .find(|a| a.profile.email.eq_ignore_ascii_case(request.email.trim()))
            .filter(|a| a.password == request.password)
            .map(|a| a.profile.clone())
            .ok_or_else(|| AppError::authentication("Invalid email or password"))?;
        let token = backend.open_session(profile.id.clone());
        debug!(user_id = %profile.id, "Memory backend session opened");
        Ok(AuthSession { token, user: profile })
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<AuthSession> {
        let mut backend = self.backend.write().await;
        let email = request.email.trim();
        if backend
            .accounts
            .iter()
            .any(|a| a.profile.email.eq_ignore_ascii_case(email))
        {
            return Err(AppError::validation("Email already exists"));
        }
        let profile = UserProfile {
            id: UserId::generate(),
            email: email.to_string(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            storage_used: None,
            storage_quota: None,
        };
        backend.accounts.push(Account {
            profile: profile.clone(),
            password: request.password.clone(),
            quota: self.default_quota,
            used: 0,
        });
        let token = backend.open_session(profile.id.clone());
        Ok(AuthSession { token, user: profile })
    }

    async fn current_user(&self) -> AppResult<UserProfile> {
        let user = self.session_user().await?;
        let backend = self.backend.read().await;
        let account = backend.account(&user)?;
        Ok(UserProfile {
            storage_used: Some(account.used),
            storage_quota: Some(account.quota),
            ..account.profile.clone()
        })
    }

    async fn list_files(&self, folder_id: Option<&FolderId>) -> AppResult<Vec<File>> {
        let user = self.session_user().await?;
        let backend = self.backend.read().await;
        Ok(backend
            .live_files(&user)
            .filter(|f| f.folder_id.as_ref() == folder_id)
            .cloned()
            .collect())
    }

    async fn search_files(&self, query: &str, page: PageRequest) -> AppResult<Page<File>> {
        let user = self.session_user().await?;
        let needle = query.trim().to_lowercase();
        let backend = self.backend.read().await;
        let matches = backend
            .live_files(&user)
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(Page::slice(matches, page))
    }

    async fn starred_files(&self) -> AppResult<Vec<File>> {
        let user = self.session_user().await?;
        let backend = self.backend.read().await;
        Ok(backend.live_files(&user).filter(|f| f.starred).cloned().collect())
    }

    async fn recent_files(&self) -> AppResult<Vec<File>> {
        let user = self.session_user().await?;
        let since = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        let backend = self.backend.read().await;
        let mut recent: Vec<File> = backend
            .live_files(&user)
            .filter(|f| f.updated_at >= since)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        recent.truncate(RECENT_LIMIT);
        Ok(recent)
    }

    async fn get_file(&self, id: &FileId) -> AppResult<File> {
        let user = self.session_user().await?;
        let backend = self.backend.read().await;
        Ok(backend.file(id, &user)?.file.clone())
    }

    async fn upload_file(&self, upload: FileUpload) -> AppResult<File> {
        let user = self.session_user().await?;
        let name = require_name(&upload.name, "File")?;
        let size = upload.size();
        let mut backend = self.backend.write().await;
        if let Some(folder_id) = &upload.folder_id {
            backend.folder(folder_id, &user)?;
        }
        let account = backend.account_mut(&user)?;
        if account.used.saturating_add(size) > account.quota {
            return Err(AppError::validation("Storage quota exceeded"));
        }
        account.used += size;

        let now = Utc::now();
        let file = File {
            id: FileId::generate(),
            name,
            mime_type: upload.mime_type,
            size,
            starred: false,
            folder_id: upload.folder_id,
            created_at: now,
            updated_at: now,
        };
        backend.files.push(StoredFile {
            file: file.clone(),
            owner: user,
            content: upload.bytes,
            trashed: false,
        });
        Ok(file)
    }

    async fn download_file(&self, id: &FileId) -> AppResult<Bytes> {
        let user = self.session_user().await?;
        let backend = self.backend.read().await;
        Ok(backend.file(id, &user)?.content.clone())
    }

    async fn toggle_file_star(&self, id: &FileId) -> AppResult<File> {
        let user = self.session_user().await?;
        let mut backend = self.backend.write().await;
        let stored = backend.file_mut(id, &user)?;
        stored.file.starred = !stored.file.starred;
        Ok(stored.file.clone())
    }

    async fn rename_file(&self, id: &FileId, name: &str) -> AppResult<File> {
        let user = self.session_user().await?;
        let name = require_name(name, "File")?;
        let mut backend = self.backend.write().await;
        let stored = backend.file_mut(id, &user)?;
        stored.file.name = name;
        stored.file.updated_at = Utc::now();
        Ok(stored.file.clone())
    }

    async fn delete_file(&self, id: &FileId) -> AppResult<()> {
        let user = self.session_user().await?;
        let mut backend = self.backend.write().await;
        backend.file_mut(id, &user)?.trashed = true;
        Ok(())
    }

    async fn create_folder(&self, name: &str, parent_id: Option<&FolderId>) -> AppResult<Folder> {
        let user = self.session_user().await?;
        let name = require_name(name, "Folder")?;
        let mut backend = self.backend.write().await;
        let duplicate = backend.folders.iter().any(|f| {
            f.owner == user
                && !f.trashed
                && f.folder.parent_id.as_ref() == parent_id
                && f.folder.name == name
        });
        if duplicate {
            return Err(AppError::conflict("Folder with this name already exists"));
        }
        let path = backend.path_for(parent_id, &name, &user)?;
        let folder = Folder {
            id: FolderId::generate(),
            name,
            parent_id: parent_id.cloned(),
            path: Some(path),
            starred: false,
            locked: false,
            created_at: Utc::now(),
            updated_at: None,
        };
        backend.folders.push(StoredFolder {
            folder: folder.clone(),
            owner: user,
            password: None,
            trashed: false,
        });
        Ok(folder)
    }

    async fn list_folders(&self, parent_id: Option<&FolderId>) -> AppResult<Vec<Folder>> {
        let user = self.session_user().await?;
        let backend = self.backend.read().await;
        Ok(backend
            .folders
            .iter()
            .filter(|f| f.owner == user && !f.trashed && f.folder.parent_id.as_ref() == parent_id)
            .map(|f| f.folder.clone())
            .collect())
    }

    async fn get_folder(&self, id: &FolderId) -> AppResult<Folder> {
        let user = self.session_user().await?;
        let backend = self.backend.read().await;
        Ok(backend.folder(id, &user)?.folder.clone())
    }

    async fn rename_folder(&self, id: &FolderId, name: &str) -> AppResult<Folder> {
        let user = self.session_user().await?;
        let name = require_name(name, "Folder")?;
        let mut backend = self.backend.write().await;
        let parent = backend.folder(id, &user)?.folder.parent_id.clone();
        let new_path = backend.path_for(parent.as_ref(), &name, &user)?;

        let stored = backend.folder_mut(id, &user)?;
        let old_path = stored.folder.path.replace(new_path.clone()).unwrap_or_default();
        stored.folder.name = name;
        stored.folder.updated_at = Some(Utc::now());
        let renamed = stored.folder.clone();

        let prefix = format!("{old_path}/");
        for sub in backend.folders.iter_mut().filter(|f| f.owner == user) {
            if let Some(path) = sub.folder.path.as_mut()
                && let Some(rest) = path.strip_prefix(&prefix)
            {
                *path = format!("{new_path}/{rest}");
            }
        }
        Ok(renamed)
    }

    async fn toggle_folder_star(&self, id: &FolderId) -> AppResult<Folder> {
        let user = self.session_user().await?;
        let mut backend = self.backend.write().await;
        let stored = backend.folder_mut(id, &user)?;
        stored.folder.starred = !stored.folder.starred;
        Ok(stored.folder.clone())
    }

    async fn delete_folder(&self, id: &FolderId) -> AppResult<()> {
        let user = self.session_user().await?;
        let mut backend = self.backend.write().await;
        backend.folder(id, &user)?;
        let doomed = backend.subtree(id);
        for stored in backend.folders.iter_mut() {
            if doomed.contains(&stored.folder.id) {
                stored.trashed = true;
            }
        }
        for stored in backend.files.iter_mut() {
            if stored.file.folder_id.as_ref().is_some_and(|f| doomed.contains(f)) {
                stored.trashed = true;
            }
        }
        debug!(folder_id = %id, count = doomed.len(), "Memory backend trashed folders");
        Ok(())
    }

    async fn lock_folder(&self, id: &FolderId, password: &str) -> AppResult<Folder> {
        let user = self.session_user().await?;
        let mut backend = self.backend.write().await;
        let stored = backend.folder_mut(id, &user)?;
        if stored.folder.locked {
            return Err(AppError::conflict("Folder is already locked"));
        }
        stored.folder.locked = true;
        stored.password = Some(password.to_string());
        Ok(stored.folder.clone())
    }

    async fn unlock_folder(&self, id: &FolderId, password: &str) -> AppResult<Folder> {
        let user = self.session_user().await?;
        let mut backend = self.backend.write().await;
        let stored = backend.folder_mut(id, &user)?;
        if !stored.folder.locked {
            return Err(AppError::conflict("Folder is not locked"));
        }
        if stored.password.as_deref() != Some(password) {
            return Err(AppError::authentication("Invalid password"));
        }
        stored.folder.locked = false;
        stored.password = None;
        Ok(stored.folder.clone())
    }

    async fn verify_folder_password(&self, id: &FolderId, password: &str) -> AppResult<bool> {
        let user = self.session_user().await?;
        let backend = self.backend.read().await;
        let stored = backend.folder(id, &user)?;
        if !stored.folder.locked {
            return Ok(true);
        }
        Ok(stored.password.as_deref() == Some(password))
    }

    async fn storage_usage(&self) -> AppResult<StorageUsage> {
        let user = self.session_user().await?;
        let backend = self.backend.read().await;
        let account = backend.account(&user)?;
        Ok(StorageUsage::new(account.quota, account.used))
    }
}
