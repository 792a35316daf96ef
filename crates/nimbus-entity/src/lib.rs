//! # nimbus-entity
//!
//! Domain entity models for Nimbus Drive. Every struct in this crate is
//! either a record the drive API sends back (folders, files, users,
//! storage usage) or a client-local record (volumes). All entities
//! derive `Debug`, `Clone`, `Serialize`, and `Deserialize` and use the
//! API's camelCase field names on the wire.

pub mod file;
pub mod folder;
pub mod keyed;
pub mod storage;
pub mod timestamp;
pub mod user;
pub mod volume;

pub use file::{File, PreviewKind};
pub use folder::Folder;
pub use keyed::Keyed;
pub use storage::{CategoryUsage, FileCategory, StorageBreakdown, StorageUsage};
pub use user::{AuthSession, LoginRequest, RegisterRequest, UserProfile};
pub use volume::{NewVolume, Volume, VolumeColor};
