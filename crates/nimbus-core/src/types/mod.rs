//! Core type definitions used across the Nimbus workspace.

pub mod id;
pub mod pagination;
pub mod sorting;

pub use id::*;
pub use pagination::{Page, PageRequest};
pub use sorting::{SortDirection, SortKey};
