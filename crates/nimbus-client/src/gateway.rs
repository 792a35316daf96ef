//! Gateway trait for the drive API.

use async_trait::async_trait;
use bytes::Bytes;

use nimbus_core::result::AppResult;
use nimbus_core::types::{FileId, FolderId, Page, PageRequest};
use nimbus_entity::{AuthSession, File, Folder, LoginRequest, RegisterRequest, StorageUsage, UserProfile};

/// A single-request file upload.
#[derive(Clone)]
pub struct FileUpload {
    /// File name as stored on the server.
    pub name: String,
    /// MIME type sent with the multipart part.
    pub mime_type: String,
    /// File contents (opaque).
    pub bytes: Bytes,
    /// Target folder (`None` uploads to the drive root).
    pub folder_id: Option<FolderId>,
}

impl FileUpload {
    /// Size of the payload in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .field("folder_id", &self.folder_id)
            .finish()
    }
}

/// Stateless transport to the drive backend.
///
/// Every method is a single request/response. Implementations never retry;
/// rename, star and delete by id are safe for a caller to repeat. All
/// methods except `login` and `register` send the bearer token set through
/// [`DriveGateway::set_bearer_token`].
#[async_trait]
pub trait DriveGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Replace (or clear) the bearer token attached to requests.
    async fn set_bearer_token(&self, token: Option<String>);

    // ── Auth ──────────────────────────────────────────────────

    /// Exchange credentials for a session.
    async fn login(&self, request: &LoginRequest) -> AppResult<AuthSession>;

    /// Create an account and return its first session.
    async fn register(&self, request: &RegisterRequest) -> AppResult<AuthSession>;

    /// Fetch the profile of the token's owner.
    async fn current_user(&self) -> AppResult<UserProfile>;

    // ── Files ─────────────────────────────────────────────────

    /// List files directly inside a folder (`None` = drive root).
    async fn list_files(&self, folder_id: Option<&FolderId>) -> AppResult<Vec<File>>;

    /// Search files by name.
    async fn search_files(&self, query: &str, page: PageRequest) -> AppResult<Page<File>>;

    /// List starred files.
    async fn starred_files(&self) -> AppResult<Vec<File>>;

    /// List recently updated files.
    async fn recent_files(&self) -> AppResult<Vec<File>>;

    /// Fetch one file's metadata.
    async fn get_file(&self, id: &FileId) -> AppResult<File>;

    /// Upload a file in one multipart request.
    async fn upload_file(&self, upload: FileUpload) -> AppResult<File>;

    /// Download a file's bytes.
    async fn download_file(&self, id: &FileId) -> AppResult<Bytes>;

    /// Flip the starred flag and return the updated file.
    async fn toggle_file_star(&self, id: &FileId) -> AppResult<File>;

    /// Rename a file.
    async fn rename_file(&self, id: &FileId, name: &str) -> AppResult<File>;

    /// Move a file to the trash.
    async fn delete_file(&self, id: &FileId) -> AppResult<()>;

    // ── Folders ───────────────────────────────────────────────

    /// Create a folder under `parent_id` (`None` = drive root).
    async fn create_folder(&self, name: &str, parent_id: Option<&FolderId>) -> AppResult<Folder>;

    /// List folders directly inside a folder (`None` = drive root).
    async fn list_folders(&self, parent_id: Option<&FolderId>) -> AppResult<Vec<Folder>>;

    /// Fetch one folder.
    async fn get_folder(&self, id: &FolderId) -> AppResult<Folder>;

    /// Rename a folder.
    async fn rename_folder(&self, id: &FolderId, name: &str) -> AppResult<Folder>;

    /// Flip the starred flag and return the updated folder.
    async fn toggle_folder_star(&self, id: &FolderId) -> AppResult<Folder>;

    /// Move a folder (and its subtree) to the trash.
    async fn delete_folder(&self, id: &FolderId) -> AppResult<()>;

    /// Protect a folder with a password.
    async fn lock_folder(&self, id: &FolderId, password: &str) -> AppResult<Folder>;

    /// Remove a folder's password protection.
    async fn unlock_folder(&self, id: &FolderId, password: &str) -> AppResult<Folder>;

    /// Check a folder password without changing the folder.
    async fn verify_folder_password(&self, id: &FolderId, password: &str) -> AppResult<bool>;

    // ── Storage ───────────────────────────────────────────────

    /// Fetch the account's storage usage.
    async fn storage_usage(&self) -> AppResult<StorageUsage>;
}
