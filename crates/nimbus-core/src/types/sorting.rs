//! Sorting keys for folder and file listings.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// What a listing is ordered by. Each key carries its own direction:
/// names read A to Z, dates and sizes put the newest / largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Case-insensitive name.
    #[default]
    Name,
    /// Creation time.
    Date,
    /// Size in bytes (folders count as zero).
    Size,
}

impl SortKey {
    /// The direction this key sorts in.
    pub fn direction(&self) -> SortDirection {
        match self {
            Self::Name => SortDirection::Asc,
            Self::Date | Self::Size => SortDirection::Desc,
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "date" => Ok(Self::Date),
            "size" => Ok(Self::Size),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}
