//! Storage usage value objects.

pub mod breakdown;
pub mod usage;

pub use breakdown::{CategoryUsage, FileCategory, StorageBreakdown};
pub use usage::StorageUsage;
