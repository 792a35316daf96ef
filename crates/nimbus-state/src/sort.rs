//! Listing order.

use std::cmp::Ordering;

use nimbus_core::types::SortKey;
use nimbus_entity::{File, Folder};

fn by_name(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Sort folders in place. Folders have no size, so `Size` falls back to name.
pub fn sort_folders(folders: &mut [Folder], key: SortKey) {
    match key {
        SortKey::Name | SortKey::Size => folders.sort_by(|a, b| by_name(&a.name, &b.name)),
        SortKey::Date => folders.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Sort files in place: names A to Z, newest first, largest first.
pub fn sort_files(files: &mut [File], key: SortKey) {
    match key {
        SortKey::Name => files.sort_by(|a, b| by_name(&a.name, &b.name)),
        SortKey::Date => files.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Size => files.sort_by(|a, b| b.size.cmp(&a.size)),
    }
}
