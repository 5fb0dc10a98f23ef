//! Filter types for the visible-item feed.

use serde::{Deserialize, Serialize};

/// Restricts the feed to one variant of item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    /// Folders and documents.
    #[default]
    All,
    /// Only folders.
    Folders,
    /// Only documents.
    Documents,
}

/// Filter applied when building the visible-item feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Case-insensitive substring that item names must contain.
    #[serde(default)]
    pub search: Option<String>,
    /// Variant restriction.
    #[serde(default)]
    pub kind: KindFilter,
    /// Show soft-deleted items (trash view) instead of active ones.
    #[serde(default)]
    pub trashed: bool,
    /// Only pinned items.
    #[serde(default)]
    pub pinned_only: bool,
}

impl ItemFilter {
    /// Returns the normalized search needle, if any non-blank search is set.
    pub fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether a name passes the search filter.
    pub fn matches_name(&self, name: &str) -> bool {
        match self.needle() {
            Some(needle) => name.to_lowercase().contains(&needle),
            None => true,
        }
    }
}
