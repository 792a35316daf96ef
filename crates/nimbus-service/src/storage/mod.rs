//! Account storage usage.

pub mod service;

pub use service::StorageService;
