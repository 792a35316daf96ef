//! Volume model: a client-declared storage bucket.
//!
//! Volumes never reach the server. They have no relationship to the
//! folder tree and exist only in the client's durable key-value store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nimbus_core::config::limits::GIB;
use nimbus_core::error::AppError;
use nimbus_core::types::VolumeId;

use crate::keyed::Keyed;

/// Palette a volume can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeColor {
    #[default]
    Indigo,
    Blue,
    Purple,
    Pink,
    Red,
    Orange,
    Green,
    Teal,
}

impl VolumeColor {
    /// Every selectable color, in picker order.
    pub const ALL: [VolumeColor; 8] = [
        Self::Indigo,
        Self::Blue,
        Self::Purple,
        Self::Pink,
        Self::Red,
        Self::Orange,
        Self::Green,
        Self::Teal,
    ];

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indigo => "indigo",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Green => "green",
            Self::Teal => "teal",
        }
    }
}

impl std::str::FromStr for VolumeColor {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::validation(format!("Unknown volume color '{s}'")))
    }
}

/// A client-local logical storage bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Client-generated identifier.
    pub id: VolumeId,
    /// Display name.
    pub name: String,
    /// Declared capacity in bytes.
    pub total: u64,
    /// Bytes attributed to the volume.
    #[serde(default)]
    pub used: u64,
    /// Number of files attributed to the volume.
    #[serde(default)]
    pub file_count: u64,
    /// Tag color.
    #[serde(default)]
    pub color: VolumeColor,
    /// Lock flag (kept for display; volumes have no passphrase).
    #[serde(default)]
    pub locked: bool,
    /// When the volume was declared.
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// Form input for declaring a new volume.
#[derive(Debug, Clone)]
pub struct NewVolume {
    /// Display name.
    pub name: String,
    /// Capacity in whole GiB.
    pub size_gb: u64,
    /// Tag color.
    pub color: VolumeColor,
}

impl NewVolume {
    /// Validate against the bytes still available and build the volume.
    ///
    /// The size may not exceed the available space rounded down to whole GiB.
    pub fn into_volume(self, available_bytes: u64) -> Result<Volume, AppError> {
        let name = validate_name(&self.name)?;
        if self.size_gb == 0 {
            return Err(AppError::validation("Volume size must be at least 1 GB"));
        }
        let max_gb = available_bytes / GIB;
        if self.size_gb > max_gb {
            return Err(AppError::validation(format!(
                "Maximum available storage is {max_gb} GB"
            )));
        }
        Ok(Volume {
            id: VolumeId::generate(),
            name,
            total: self.size_gb * GIB,
            used: 0,
            file_count: 0,
            color: self.color,
            locked: false,
            created_at: Utc::now(),
        })
    }
}

impl Volume {
    /// Return a copy with a new, validated name.
    pub fn renamed(&self, name: &str) -> Result<Volume, AppError> {
        Ok(Volume {
            name: validate_name(name)?,
            ..self.clone()
        })
    }

    /// Usage percentage (0.0 - 100.0).
    pub fn usage_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.used as f64 / self.total as f64) * 100.0
        }
    }
}

impl Keyed for Volume {
    type Id = VolumeId;

    fn id(&self) -> &VolumeId {
        &self.id
    }
}

fn validate_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Please enter a volume name"));
    }
    Ok(trimmed.to_string())
}
