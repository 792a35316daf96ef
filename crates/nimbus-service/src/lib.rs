//! # nimbus-service
//!
//! Use-case services for Nimbus Drive. Each service validates input,
//! calls the gateway, and folds the result into the shared [`DriveState`].
//!
//! Services follow constructor injection: all of them are built from one
//! [`ServiceContext`] holding the gateway, the shared state and the
//! configured limits. The state lock is never held across a gateway call.
//!
//! [`DriveState`]: nimbus_state::DriveState

pub mod auth;
pub mod context;
pub mod file;
pub mod folder;
pub mod storage;
pub mod volume;

pub use auth::AuthService;
pub use context::{ServiceContext, Services, SharedState};
pub use file::{FileService, Preview, PreviewService, SearchService, UploadService};
pub use folder::{FolderService, NavigationService, OpenOutcome};
pub use storage::StorageService;
pub use volume::VolumeService;
