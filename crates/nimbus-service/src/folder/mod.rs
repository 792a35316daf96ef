//! Folder navigation and folder management.

pub mod navigation;
pub mod service;

pub use navigation::{NavigationService, OpenOutcome};
pub use service::FolderService;
