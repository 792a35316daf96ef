//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nimbus_core::types::FolderId;

use crate::keyed::Keyed;

/// A folder in the drive hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (`None` for top-level folders).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<FolderId>,
    /// Materialized display path (e.g. `/Projects/2025`), when the server sends it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Whether the owner starred the folder.
    #[serde(default)]
    pub starred: bool,
    /// Whether the folder is protected by a passphrase.
    #[serde(default)]
    pub locked: bool,
    /// When the folder was created.
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::timestamp::option::deserialize"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Folder {
    /// Check if this is a top-level folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether opening the folder requires a passphrase.
    pub fn requires_passphrase(&self) -> bool {
        self.locked
    }
}

impl Keyed for Folder {
    type Id = FolderId;

    fn id(&self) -> &FolderId {
        &self.id
    }
}
