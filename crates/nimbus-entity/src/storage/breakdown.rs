//! Storage use split by kind of file.

use std::fmt;

use serde::Serialize;

use crate::file::File;

/// Coarse file category derived from the MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Images,
    Documents,
    Videos,
    Audio,
    Archives,
    Other,
}

impl FileCategory {
    /// Display order.
    pub const ALL: [FileCategory; 6] = [
        FileCategory::Images,
        FileCategory::Documents,
        FileCategory::Videos,
        FileCategory::Audio,
        FileCategory::Archives,
        FileCategory::Other,
    ];

    /// Classify a MIME type.
    ///
    /// The top-level type decides images, videos and audio. Otherwise
    /// `pdf`, `document` or `text` anywhere in the type means a document,
    /// and `zip`, `rar` or `compressed` means an archive.
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.to_ascii_lowercase();
        match mime.split('/').next().unwrap_or_default() {
            "image" => return Self::Images,
            "video" => return Self::Videos,
            "audio" => return Self::Audio,
            _ => {}
        }
        if ["pdf", "document", "text"].iter().any(|k| mime.contains(k)) {
            Self::Documents
        } else if ["zip", "rar", "compressed"].iter().any(|k| mime.contains(k)) {
            Self::Archives
        } else {
            Self::Other
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Images => "Images",
            Self::Documents => "Documents",
            Self::Videos => "Videos",
            Self::Audio => "Audio",
            Self::Archives => "Archives",
            Self::Other => "Other Files",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bytes and file count for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryUsage {
    pub category: FileCategory,
    pub bytes: u64,
    pub files: usize,
}

/// Per-category totals over a set of files.
///
/// Categories without any bytes are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageBreakdown {
    pub categories: Vec<CategoryUsage>,
    pub total: u64,
}

impl StorageBreakdown {
    pub fn from_files<'a>(files: impl IntoIterator<Item = &'a File>) -> Self {
        let mut totals = FileCategory::ALL.map(|category| CategoryUsage {
            category,
            bytes: 0,
            files: 0,
        });
        for file in files {
            let category = FileCategory::from_mime(&file.mime_type);
            if let Some(slot) = totals.iter_mut().find(|c| c.category == category) {
                slot.bytes += file.size;
                slot.files += 1;
            }
        }
        let total = totals.iter().map(|c| c.bytes).sum();
        Self {
            categories: totals.into_iter().filter(|c| c.bytes > 0).collect(),
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Bytes recorded for `category` (0 when absent).
    pub fn bytes(&self, category: FileCategory) -> u64 {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map_or(0, |c| c.bytes)
    }
}
