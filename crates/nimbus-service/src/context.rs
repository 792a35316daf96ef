//! Shared dependencies handed to every service.

use std::sync::Arc;

use tokio::sync::RwLock;

use nimbus_client::DriveGateway;
use nimbus_core::config::LimitsConfig;
use nimbus_state::DriveState;

use crate::auth::AuthService;
use crate::file::{FileService, PreviewService, SearchService, UploadService};
use crate::folder::{FolderService, NavigationService};
use crate::storage::StorageService;
use crate::volume::VolumeService;

/// Client state shared between services and the front end.
pub type SharedState = Arc<RwLock<DriveState>>;

/// What every service is constructed from.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    /// Remote data gateway.
    pub gateway: Arc<dyn DriveGateway>,
    /// Shared client state.
    pub state: SharedState,
    /// Client-side validation limits.
    pub limits: LimitsConfig,
}

impl ServiceContext {
    /// Bundle the dependencies.
    pub fn new(gateway: Arc<dyn DriveGateway>, state: DriveState, limits: LimitsConfig) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(state)),
            limits,
        }
    }
}

/// Every service, wired to one context.
#[derive(Debug, Clone)]
pub struct Services {
    pub auth: AuthService,
    pub navigation: NavigationService,
    pub folders: FolderService,
    pub files: FileService,
    pub uploads: UploadService,
    pub search: SearchService,
    pub preview: PreviewService,
    pub storage: StorageService,
    pub volumes: VolumeService,
    context: ServiceContext,
}

impl Services {
    /// Build all services from a context.
    pub fn new(context: ServiceContext) -> Self {
        let storage = StorageService::new(context.clone());
        Self {
            auth: AuthService::new(context.clone()),
            navigation: NavigationService::new(context.clone()),
            folders: FolderService::new(context.clone()),
            files: FileService::new(context.clone()),
            uploads: UploadService::new(context.clone(), storage.clone()),
            search: SearchService::new(context.clone()),
            preview: PreviewService::new(context.clone()),
            volumes: VolumeService::new(context.clone(), storage.clone()),
            storage,
            context,
        }
    }

    /// Shared client state.
    pub fn state(&self) -> &SharedState {
        &self.context.state
    }

    /// Configured limits.
    pub fn limits(&self) -> &LimitsConfig {
        &self.context.limits
    }
}
