//! Client-local volumes.

pub mod service;

pub use service::VolumeService;
