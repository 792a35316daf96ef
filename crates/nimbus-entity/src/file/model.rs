//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nimbus_core::types::{FileId, FolderId};

use super::preview::PreviewKind;
use crate::keyed::Keyed;

/// A file stored in the drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The file name (including extension).
    pub name: String,
    /// MIME type reported by the server.
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Whether the owner starred the file.
    #[serde(default)]
    pub starred: bool,
    /// The folder containing this file (`None` at the drive root).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
    /// When the file was uploaded.
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }

    /// How the file can be previewed.
    pub fn preview_kind(&self) -> PreviewKind {
        PreviewKind::from_mime(&self.mime_type)
    }
}

impl Keyed for File {
    type Id = FileId;

    fn id(&self) -> &FileId {
        &self.id
    }
}

fn default_mime_type() -> String {
    "application/octet-stream".to_string()
}
