//! View flags and preferences.

use serde::{Deserialize, Serialize};
use tracing::warn;

use nimbus_core::result::AppResult;
use nimbus_core::traits::KeyValueStore;
use nimbus_core::types::{FileId, FolderId, SortKey, VolumeId};
use nimbus_entity::File;

use crate::keys;

/// How listings are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// A selectable item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemRef {
    File(FileId),
    Folder(FolderId),
}

/// Scalar UI state.
///
/// Only the dark mode preference is durable. Everything else resets on
/// restart and, apart from the view mode, on sign-out.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub view_mode: ViewMode,
    dark_mode: bool,
    pub search_query: String,
    selection: Vec<ItemRef>,
    pub preview: Option<File>,
    pub sort_key: SortKey,
    pub loading: bool,
    pub uploading: bool,
    upload_progress: u8,
    pub current_volume: Option<VolumeId>,
    pub breadcrumb_expanded: bool,
}

impl UiState {
    /// Restore durable preferences.
    pub fn hydrate(kv: &dyn KeyValueStore) -> AppResult<Self> {
        let dark_mode = match kv.get(keys::DARK_MODE)?.as_deref() {
            Some("true") => true,
            Some("false") | None => false,
            Some(other) => {
                warn!(value = other, "Ignoring unreadable dark mode preference");
                false
            }
        };
        Ok(Self {
            dark_mode,
            ..Self::default()
        })
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Change the dark mode preference. Memory follows only a durable write.
    pub fn set_dark_mode(&mut self, kv: &dyn KeyValueStore, enabled: bool) -> AppResult<()> {
        kv.set(keys::DARK_MODE, if enabled { "true" } else { "false" })?;
        self.dark_mode = enabled;
        Ok(())
    }

    /// Selected items in selection order.
    pub fn selection(&self) -> &[ItemRef] {
        &self.selection
    }

    /// Add or drop an item from the selection. Returns whether it is now selected.
    pub fn toggle_selection(&mut self, item: ItemRef) -> bool {
        if let Some(index) = self.selection.iter().position(|i| i == &item) {
            self.selection.remove(index);
            false
        } else {
            self.selection.push(item);
            true
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn upload_progress(&self) -> u8 {
        self.upload_progress
    }

    /// Record upload progress, capped at 100.
    pub fn set_upload_progress(&mut self, percent: u8) {
        self.upload_progress = percent.min(100);
    }

    /// Start an upload.
    pub fn begin_upload(&mut self) {
        self.uploading = true;
        self.upload_progress = 0;
    }

    /// Finish an upload, successful or not.
    pub fn end_upload(&mut self) {
        self.uploading = false;
        self.upload_progress = 0;
    }

    /// Drop per-session state, keeping preferences.
    pub fn reset_session(&mut self) {
        *self = Self {
            view_mode: self.view_mode,
            dark_mode: self.dark_mode,
            sort_key: self.sort_key,
            ..Self::default()
        };
    }
}
