//! Folder and document models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filecards_core::types::ItemId;

use super::color::FolderColor;

/// Fields shared by every item in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMeta {
    /// Stable unique id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Owning user id.
    pub owner: String,
    /// Whether the item is pinned to the top of its listing.
    #[serde(default)]
    pub is_pinned: bool,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete timestamp; `None` means the item is active.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Set when some ancestor folder is in the trash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_deleted_ancestor: Option<bool>,
}

impl ItemMeta {
    /// Create an active, unpinned envelope stamped with the current time.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            owner: owner.into(),
            is_pinned: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            has_deleted_ancestor: None,
        }
    }
}

/// A folder card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Shared envelope.
    #[serde(flatten)]
    pub meta: ItemMeta,
    /// Parent folder id (`None` for root-level folders).
    pub parent: Option<ItemId>,
    /// Colour tag.
    #[serde(default)]
    pub color: FolderColor,
    /// Number of live children; maintained by the tree store.
    #[serde(default)]
    pub items: u64,
}

impl Folder {
    /// Create an empty folder under `parent`.
    pub fn new(meta: ItemMeta, parent: Option<ItemId>) -> Self {
        Self {
            meta,
            parent,
            color: FolderColor::Default,
            items: 0,
        }
    }
}

/// A document card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Shared envelope.
    #[serde(flatten)]
    pub meta: ItemMeta,
    /// Containing folder id (`None` for root-level documents).
    pub folder: Option<ItemId>,
    /// File extension without the dot.
    pub extension: String,
    /// Size in bytes.
    pub size: u64,
    /// Key of the blob in object storage.
    pub storage_key: String,
}

impl Document {
    /// Create a document in `folder`. The extension is taken from the name.
    pub fn new(meta: ItemMeta, folder: Option<ItemId>, size: u64, storage_key: impl Into<String>) -> Self {
        let extension = meta
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        Self {
            meta,
            folder,
            extension,
            size,
            storage_key: storage_key.into(),
        }
    }
}

/// Variant discriminant, also used to pick the move endpoint and label
/// duplicate prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A document (labelled "file" in prompts and endpoints).
    File,
    /// A folder.
    Folder,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

/// An item in the file-system tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cardType", rename_all = "lowercase")]
pub enum FileSystemItem {
    /// A folder.
    Folder(Folder),
    /// A document.
    Document(Document),
}

impl FileSystemItem {
    /// Shared envelope.
    pub fn meta(&self) -> &ItemMeta {
        match self {
            Self::Folder(f) => &f.meta,
            Self::Document(d) => &d.meta,
        }
    }

    /// Mutable shared envelope.
    pub fn meta_mut(&mut self) -> &mut ItemMeta {
        match self {
            Self::Folder(f) => &mut f.meta,
            Self::Document(d) => &mut d.meta,
        }
    }

    /// Item id.
    pub fn id(&self) -> &ItemId {
        &self.meta().id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.meta().name
    }

    /// The containing folder, whichever field the variant keeps it in.
    pub fn parent_id(&self) -> Option<&ItemId> {
        match self {
            Self::Folder(f) => f.parent.as_ref(),
            Self::Document(d) => d.folder.as_ref(),
        }
    }

    /// Re-point the containing folder. Only the tree store calls this.
    pub fn set_parent_id(&mut self, parent: Option<ItemId>) {
        match self {
            Self::Folder(f) => f.parent = parent,
            Self::Document(d) => d.folder = parent,
        }
    }

    /// Variant discriminant.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Folder(_) => ItemKind::Folder,
            Self::Document(_) => ItemKind::File,
        }
    }

    /// Whether this item is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    /// Borrow as a folder, if it is one.
    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(f) => Some(f),
            Self::Document(_) => None,
        }
    }

    /// Whether the item itself is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.meta().deleted_at.is_some()
    }

    /// Whether the item is visible in active (non-trash) views.
    pub fn is_active(&self) -> bool {
        !self.is_deleted() && self.meta().has_deleted_ancestor != Some(true)
    }

    /// Size in bytes (folders report zero).
    pub fn size(&self) -> u64 {
        match self {
            Self::Folder(_) => 0,
            Self::Document(d) => d.size,
        }
    }
}

impl From<Folder> for FileSystemItem {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

impl From<Document> for FileSystemItem {
    fn from(doc: Document) -> Self {
        Self::Document(doc)
    }
}
