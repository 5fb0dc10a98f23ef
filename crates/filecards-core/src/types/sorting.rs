//! Sorting types for the visible-item feed.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Field the card grid is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Case-insensitive item name.
    #[default]
    Name,
    /// Creation timestamp.
    CreatedAt,
    /// Last modification timestamp.
    UpdatedAt,
    /// Document size in bytes (folders sort as zero).
    Size,
}

/// A sort specification consisting of a key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by.
    pub key: SortKey,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
    /// Keep pinned items ahead of unpinned ones regardless of key.
    #[serde(default = "default_true")]
    pub pinned_first: bool,
    /// Keep folders ahead of documents regardless of key.
    #[serde(default = "default_true")]
    pub folders_first: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::Name,
            direction: SortDirection::Asc,
            pinned_first: true,
            folders_first: true,
        }
    }
}

impl SortSpec {
    /// Create an ascending sort on the given key.
    pub fn asc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
            ..Self::default()
        }
    }

    /// Create a descending sort on the given key.
    pub fn desc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
            ..Self::default()
        }
    }
}

fn default_true() -> bool {
    true
}
