//! Immutable view of the tree and its read queries.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use filecards_core::types::ItemId;
use filecards_entity::FileSystemItem;

/// The tree at one point in time.
///
/// Cloning is shallow: item records sit behind `Arc`s, so a clone only
/// copies the index maps and a mutation only deep-copies the records it
/// touches.
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    pub(crate) items: HashMap<ItemId, Arc<FileSystemItem>>,
    pub(crate) children: HashMap<ItemId, Vec<ItemId>>,
    pub(crate) root: Vec<ItemId>,
}

impl TreeSnapshot {
    /// Look an item up by id.
    pub fn get(&self, id: &ItemId) -> Option<&FileSystemItem> {
        self.items.get(id).map(Arc::as_ref)
    }

    /// Whether the id is present (soft-deleted items included).
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Whether the id refers to a folder in the store.
    pub fn is_folder(&self, id: &ItemId) -> bool {
        self.get(id).is_some_and(FileSystemItem::is_folder)
    }

    /// Number of items, soft-deleted ones included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Root-level ordering.
    pub fn root_ids(&self) -> &[ItemId] {
        &self.root
    }

    /// Child ordering of `parent` (`None` = root level).
    pub fn child_ids(&self, parent: Option<&ItemId>) -> &[ItemId] {
        match parent {
            None => &self.root,
            Some(id) => self.children.get(id).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Children of `parent` in insertion order, soft-deleted ones included.
    pub fn get_children(&self, parent: Option<&ItemId>) -> Vec<&FileSystemItem> {
        self.child_ids(parent)
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Ancestor chain from the top level down to `id`, the item itself last.
    ///
    /// Empty when `id` is unknown. A missing ancestor ends the chain.
    pub fn get_path(&self, id: &ItemId) -> Vec<&FileSystemItem> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = self.get(id);

        while let Some(item) = cursor {
            if !seen.insert(item.id()) {
                break;
            }
            path.push(item);
            cursor = item.parent_id().and_then(|parent| self.get(parent));
        }

        path.reverse();
        path
    }

    /// Every id below `id`, depth-first. Does not include `id`.
    pub fn descendants(&self, id: &ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack: Vec<&ItemId> = self.child_ids(Some(id)).iter().rev().collect();

        while let Some(next) = stack.pop() {
            if next == id || !seen.insert(next) {
                continue;
            }
            out.push(next.clone());
            stack.extend(self.child_ids(Some(next)).iter().rev());
        }

        out
    }

    /// Whether `candidate` sits somewhere below `ancestor`.
    pub fn is_descendant(&self, candidate: &ItemId, ancestor: &ItemId) -> bool {
        let mut seen = HashSet::new();
        let mut cursor = self.get(candidate).and_then(FileSystemItem::parent_id);

        while let Some(parent) = cursor {
            if parent == ancestor {
                return true;
            }
            if !seen.insert(parent) {
                return false;
            }
            cursor = self.get(parent).and_then(FileSystemItem::parent_id);
        }

        false
    }

    /// Whether moving `id` under `target` (`None` = root) would be accepted.
    pub fn can_move(&self, id: &ItemId, target: Option<&ItemId>) -> bool {
        self.check_move(id, target).is_ok()
    }

    pub(crate) fn check_move(
        &self,
        id: &ItemId,
        target: Option<&ItemId>,
    ) -> Result<(), crate::error::TreeError> {
        use crate::error::TreeError;

        if !self.contains(id) {
            return Err(TreeError::NotFound(id.clone()));
        }
        match target {
            Some(target) if !self.contains(target) => Err(TreeError::InvalidTarget(target.clone())),
            _ => self.check_attach(id, target),
        }
    }

    /// Whether `id` may hang under `parent`. Parents not in the store pass,
    /// so items can arrive before their folder does.
    pub(crate) fn check_attach(
        &self,
        id: &ItemId,
        parent: Option<&ItemId>,
    ) -> Result<(), crate::error::TreeError> {
        use crate::error::TreeError;

        let Some(parent) = parent else {
            return Ok(());
        };
        if parent == id {
            return Err(TreeError::SelfTarget(id.clone()));
        }
        if !self.contains(parent) {
            return Ok(());
        }
        if !self.is_folder(parent) {
            return Err(TreeError::InvalidTarget(parent.clone()));
        }
        if self.is_descendant(parent, id) {
            return Err(TreeError::Cycle {
                item: id.clone(),
                target: parent.clone(),
            });
        }
        Ok(())
    }

    /// Number of live (not soft-deleted) children currently assigned to `parent`.
    pub fn live_child_count(&self, parent: &ItemId) -> u64 {
        self.child_ids(Some(parent))
            .iter()
            .filter_map(|id| self.get(id))
            .filter(|item| !item.is_deleted())
            .count() as u64
    }

    /// Whether `parent` or any folder above it is soft-deleted.
    pub fn is_in_trashed_branch(&self, parent: Option<&ItemId>) -> bool {
        let mut seen = HashSet::new();
        let mut cursor = parent;

        while let Some(id) = cursor {
            if !seen.insert(id) {
                return false;
            }
            match self.get(id) {
                Some(item) if item.is_deleted() => return true,
                Some(item) => cursor = item.parent_id(),
                None => return false,
            }
        }

        false
    }

    /// Soft-deleted items whose ancestors are all live: the roots of the trash view.
    pub fn trashed(&self) -> Vec<&FileSystemItem> {
        let mut trashed: Vec<&FileSystemItem> = self
            .items
            .values()
            .map(Arc::as_ref)
            .filter(|item| item.is_deleted() && item.meta().has_deleted_ancestor != Some(true))
            .collect();
        trashed.sort_by(|a, b| b.meta().deleted_at.cmp(&a.meta().deleted_at));
        trashed
    }

    /// Iterate over every item.
    pub fn iter(&self) -> impl Iterator<Item = &FileSystemItem> {
        self.items.values().map(Arc::as_ref)
    }
}
