//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use nimbus_client::{DriveGateway, FileUpload, MemoryGateway};
use nimbus_core::config::LimitsConfig;
use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::traits::KeyValueStore;
use nimbus_core::types::{FileId, FolderId, Page, PageRequest};
use nimbus_entity::{
    AuthSession, File, Folder, LoginRequest, RegisterRequest, StorageUsage, UserProfile,
};
use nimbus_service::{OpenOutcome, ServiceContext, Services};
use nimbus_state::DriveState;
use nimbus_state::persist::MemoryKeyValueStore;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "secret123";

/// In-process drive with knobs for slow and failing calls.
#[derive(Debug, Default)]
pub struct ControlledGateway {
    inner: MemoryGateway,
    listing_delays: Mutex<HashMap<FolderId, Duration>>,
    fail_listings: AtomicBool,
    fail_usage: AtomicBool,
}

impl ControlledGateway {
    pub fn new(inner: MemoryGateway) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn inner(&self) -> &MemoryGateway {
        &self.inner
    }

    /// Delay listing responses for `folder` by `delay`.
    pub fn delay_listing(&self, folder: &FolderId, delay: Duration) {
        self.listing_delays
            .lock()
            .expect("delays")
            .insert(folder.clone(), delay);
    }

    /// Make every listing call fail with a network error.
    pub fn fail_listings(&self, fail: bool) {
        self.fail_listings.store(fail, Ordering::SeqCst);
    }

    /// Make the storage usage call fail with a network error.
    pub fn fail_usage(&self, fail: bool) {
        self.fail_usage.store(fail, Ordering::SeqCst);
    }

    async fn before_listing(&self, folder: Option<&FolderId>) -> AppResult<()> {
        let delay = folder.and_then(|id| {
            self.listing_delays
                .lock()
                .expect("delays")
                .get(id)
                .copied()
        });
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_listings.load(Ordering::SeqCst) {
            return Err(AppError::network("Connection reset"));
        }
        Ok(())
    }
}

#[async_trait]
impl DriveGateway for ControlledGateway {
    async fn set_bearer_token(&self, token: Option<String>) {
        self.inner.set_bearer_token(token).await
    }

    async fn login(&self, request: &LoginRequest) -> AppResult<AuthSession> {
        self.inner.login(request).await
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<AuthSession> {
        self.inner.register(request).await
    }

    async fn current_user(&self) -> AppResult<UserProfile> {
        self.inner.current_user().await
    }

    async fn list_files(&self, folder_id: Option<&FolderId>) -> AppResult<Vec<File>> {
        self.before_listing(folder_id).await?;
        self.inner.list_files(folder_id).await
    }

    async fn search_files(&self, query: &str, page: PageRequest) -> AppResult<Page<File>> {
        self.inner.search_files(query, page).await
    }

    async fn starred_files(&self) -> AppResult<Vec<File>> {
        self.inner.starred_files().await
    }

    async fn recent_files(&self) -> AppResult<Vec<File>> {
        self.inner.recent_files().await
    }

    async fn get_file(&self, id: &FileId) -> AppResult<File> {
        self.inner.get_file(id).await
    }

    async fn upload_file(&self, upload: FileUpload) -> AppResult<File> {
        self.inner.upload_file(upload).await
    }

    async fn download_file(&self, id: &FileId) -> AppResult<Bytes> {
        self.inner.download_file(id).await
    }

    async fn toggle_file_star(&self, id: &FileId) -> AppResult<File> {
        self.inner.toggle_file_star(id).await
    }

    async fn rename_file(&self, id: &FileId, name: &str) -> AppResult<File> {
        self.inner.rename_file(id, name).await
    }

    async fn delete_file(&self, id: &FileId) -> AppResult<()> {
        self.inner.delete_file(id).await
    }

    async fn create_folder(&self, name: &str, parent_id: Option<&FolderId>) -> AppResult<Folder> {
        self.inner.create_folder(name, parent_id).await
    }

    async fn list_folders(&self, parent_id: Option<&FolderId>) -> AppResult<Vec<Folder>> {
        self.before_listing(parent_id).await?;
        self.inner.list_folders(parent_id).await
    }

    async fn get_folder(&self, id: &FolderId) -> AppResult<Folder> {
        self.inner.get_folder(id).await
    }

    async fn rename_folder(&self, id: &FolderId, name: &str) -> AppResult<Folder> {
        self.inner.rename_folder(id, name).await
    }

    async fn toggle_folder_star(&self, id: &FolderId) -> AppResult<Folder> {
        self.inner.toggle_folder_star(id).await
    }

    async fn delete_folder(&self, id: &FolderId) -> AppResult<()> {
        self.inner.delete_folder(id).await
    }

    async fn lock_folder(&self, id: &FolderId, password: &str) -> AppResult<Folder> {
        self.inner.lock_folder(id, password).await
    }

    async fn unlock_folder(&self, id: &FolderId, password: &str) -> AppResult<Folder> {
        self.inner.unlock_folder(id, password).await
    }

    async fn verify_folder_password(&self, id: &FolderId, password: &str) -> AppResult<bool> {
        self.inner.verify_folder_password(id, password).await
    }

    async fn storage_usage(&self) -> AppResult<StorageUsage> {
        if self.fail_usage.load(Ordering::SeqCst) {
            return Err(AppError::network("Connection refused"));
        }
        self.inner.storage_usage().await
    }
}

/// A wired client over a [`ControlledGateway`].
pub struct TestDrive {
    pub services: Services,
    pub gateway: Arc<ControlledGateway>,
    pub kv: Arc<dyn KeyValueStore>,
}

impl TestDrive {
    /// Fresh drive with one seeded account, not signed in.
    pub async fn new() -> Self {
        Self::with_quota(LimitsConfig::default().default_quota_bytes).await
    }

    /// Fresh drive whose account holds at most `quota` bytes.
    pub async fn with_quota(quota: u64) -> Self {
        let gateway = ControlledGateway::new(MemoryGateway::with_quota(quota));
        gateway
            .inner()
            .seed_account(EMAIL, PASSWORD, "Ada", "Lovelace")
            .await;
        Self::with_parts(Arc::new(gateway), Arc::new(MemoryKeyValueStore::new())).await
    }

    /// Fresh drive, signed in and showing the root.
    pub async fn signed_in() -> Self {
        Self::new().await.ready().await
    }

    /// Sign in and show the root.
    pub async fn ready(self) -> Self {
        self.login().await;
        self.open_root().await;
        self
    }

    /// Upload a text file into the current folder.
    pub async fn upload_text(&self, name: &str, body: &str) -> File {
        self.services
            .uploads
            .upload(name, "text/plain", Bytes::from(body.to_string()))
            .await
            .expect("upload")
    }

    /// Drive over an existing gateway and store, as after a restart.
    pub async fn with_parts(gateway: Arc<ControlledGateway>, kv: Arc<dyn KeyValueStore>) -> Self {
        let state = DriveState::hydrate(kv.clone()).expect("hydrate");
        let services = Services::new(ServiceContext::new(
            gateway.clone(),
            state,
            LimitsConfig::default(),
        ));
        Self {
            services,
            gateway,
            kv,
        }
    }

    /// A second client over the same gateway and store.
    pub async fn restart(&self) -> Self {
        Self::with_parts(self.gateway.clone(), self.kv.clone()).await
    }

    pub async fn login(&self) -> AuthSession {
        self.services
            .auth
            .login(LoginRequest::new(EMAIL, PASSWORD))
            .await
            .expect("login")
    }

    pub async fn open_root(&self) {
        let outcome = self.services.navigation.go_home().await.expect("root");
        assert_eq!(outcome, OpenOutcome::Opened);
    }

    /// Create `name` in the current folder.
    pub async fn mkdir(&self, name: &str) -> Folder {
        self.services.folders.create(name).await.expect("create folder")
    }

    /// Open a folder and expect it to open without a prompt.
    pub async fn enter(&self, folder: &Folder) {
        let outcome = self
            .services
            .navigation
            .open(Some(folder.clone()))
            .await
            .expect("open");
        assert_eq!(outcome, OpenOutcome::Opened);
    }

    /// Create the chain `names[0]/names[1]/...` and walk into it.
    pub async fn mkdir_chain(&self, names: &[&str]) -> Vec<Folder> {
        let mut chain = Vec::new();
        for name in names {
            let folder = self.mkdir(name).await;
            self.enter(&folder).await;
            chain.push(folder);
        }
        chain
    }

    /// Names on the breadcrumb path, root first.
    pub async fn path_names(&self) -> Vec<String> {
        let state = self.services.state().read().await;
        state
            .navigation
            .path()
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }

    /// Names of the folders in the current listing.
    pub async fn folder_names(&self) -> Vec<String> {
        let state = self.services.state().read().await;
        state.folders.iter().map(|f| f.name.clone()).collect()
    }

    /// Names of the files in the current listing.
    pub async fn file_names(&self) -> Vec<String> {
        let state = self.services.state().read().await;
        state.files.iter().map(|f| f.name.clone()).collect()
    }
}
