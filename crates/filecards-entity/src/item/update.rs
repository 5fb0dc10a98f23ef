//! Partial updates applied through the tree store.
//!
//! There is deliberately no parent field here: re-parenting goes through
//! `TreeStore::move_item`, which maintains child counts and the acyclic
//! invariant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::color::FolderColor;
use super::model::FileSystemItem;

/// Shallow patch of item fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New pin state.
    pub is_pinned: Option<bool>,
    /// New update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// New soft-delete state (`Some(None)` restores).
    #[serde(default, with = "double_option")]
    pub deleted_at: Option<Option<DateTime<Utc>>>,
    /// New folder colour. Ignored for documents.
    pub color: Option<FolderColor>,
    /// New size. Ignored for folders.
    pub size: Option<u64>,
    /// New storage key. Ignored for folders.
    pub storage_key: Option<String>,
}

impl ItemUpdate {
    /// A rename patch.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            updated_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Whether applying this patch can change the live child count of the parent.
    pub fn touches_deletion(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Merge the patch into `item`.
    pub fn apply_to(&self, item: &mut FileSystemItem) {
        let meta = item.meta_mut();
        if let Some(name) = &self.name {
            meta.name = name.clone();
        }
        if let Some(pinned) = self.is_pinned {
            meta.is_pinned = pinned;
        }
        if let Some(updated_at) = self.updated_at {
            meta.updated_at = updated_at;
        }
        if let Some(deleted_at) = self.deleted_at {
            meta.deleted_at = deleted_at;
        }

        match item {
            FileSystemItem::Folder(folder) => {
                if let Some(color) = self.color {
                    folder.color = color;
                }
            }
            FileSystemItem::Document(doc) => {
                if let Some(size) = self.size {
                    doc.size = size;
                }
                if let Some(key) = &self.storage_key {
                    doc.storage_key = key.clone();
                }
                if let Some(name) = &self.name {
                    doc.extension = name
                        .rsplit_once('.')
                        .map(|(_, ext)| ext.to_lowercase())
                        .unwrap_or_default();
                }
            }
        }
    }
}

mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::model::{Document, Folder, ItemMeta};

    #[test]
    fn test_rename_document_refreshes_extension() {
        let mut item: FileSystemItem =
            Document::new(ItemMeta::new("d1", "notes.txt", "u1"), None, 3, "k").into();
        ItemUpdate::rename("notes.md").apply_to(&mut item);
        match item {
            FileSystemItem::Document(d) => {
                assert_eq!(d.meta.name, "notes.md");
                assert_eq!(d.extension, "md");
            }
            FileSystemItem::Folder(_) => panic!("expected a document"),
        }
    }

    #[test]
    fn test_color_ignored_for_documents() {
        let mut item: FileSystemItem =
            Document::new(ItemMeta::new("d1", "a.txt", "u1"), None, 3, "k").into();
        let before = item.clone();
        let patch = ItemUpdate {
            color: Some(FolderColor::Red),
            ..ItemUpdate::default()
        };
        patch.apply_to(&mut item);
        assert_eq!(item, before);
    }

    #[test]
    fn test_restore_clears_deleted_at() {
        let mut folder: FileSystemItem =
            Folder::new(ItemMeta::new("f1", "Docs", "u1"), None).into();
        folder.meta_mut().deleted_at = Some(Utc::now());
        let patch = ItemUpdate {
            deleted_at: Some(None),
            ..ItemUpdate::default()
        };
        assert!(patch.touches_deletion());
        patch.apply_to(&mut folder);
        assert!(!folder.is_deleted());
    }
}
