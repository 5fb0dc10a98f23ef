//! The mutable tree store.

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

use filecards_core::types::ItemId;
use filecards_entity::{FileSystemItem, ItemUpdate};

use crate::error::TreeError;
use crate::snapshot::TreeSnapshot;

/// Owns the canonical map of file-system items.
///
/// Every mutation works copy-on-write against the current snapshot and then
/// publishes the result, so subscribers always observe a whole tree.
/// Operations on unknown ids are no-ops rather than errors, because UI
/// events may arrive after the item they reference is gone.
#[derive(Debug)]
pub struct TreeStore {
    state: Arc<TreeSnapshot>,
    publisher: watch::Sender<Arc<TreeSnapshot>>,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TreeStore {
    type Target = TreeSnapshot;

    fn deref(&self) -> &TreeSnapshot {
        &self.state
    }
}

impl TreeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let state = Arc::new(TreeSnapshot::default());
        let (publisher, _) = watch::channel(state.clone());
        Self { state, publisher }
    }

    /// Create a store populated with `items`, in order.
    pub fn with_items(items: impl IntoIterator<Item = FileSystemItem>) -> Self {
        let mut store = Self::new();
        store.load(items);
        store
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<TreeSnapshot> {
        self.state.clone()
    }

    /// Receive every snapshot published after this call.
    pub fn subscribe(&self) -> watch::Receiver<Arc<TreeSnapshot>> {
        self.publisher.subscribe()
    }

    /// Replace the whole tree with `items`.
    ///
    /// Items may arrive in any order; child counts and trash flags are
    /// recomputed once everything is in place.
    pub fn load(&mut self, items: impl IntoIterator<Item = FileSystemItem>) {
        let mut next = TreeSnapshot::default();
        for item in items {
            let id = item.id().clone();
            let parent = item.parent_id().cloned();
            if let Some(previous) = next.items.insert(id.clone(), Arc::new(item)) {
                detach(&mut next, &id, previous.parent_id());
            }
            attach(&mut next, &id, parent.as_ref());
        }

        let folders: Vec<ItemId> = next
            .items
            .values()
            .filter(|item| item.is_folder())
            .map(|item| item.id().clone())
            .collect();
        for folder in &folders {
            recount(&mut next, folder);
        }
        let roots = next.root.clone();
        for id in &roots {
            propagate_trash(&mut next, id);
        }

        debug!(items = next.items.len(), "Tree loaded");
        self.commit(next);
    }

    /// Insert or overwrite an item and attach it under its parent.
    ///
    /// A parent already in the store must be a folder that is neither the
    /// item nor one of its descendants; rejections leave the store untouched.
    /// Unknown parents are accepted.
    pub fn add_item(&mut self, item: FileSystemItem) -> Result<(), TreeError> {
        let id = item.id().clone();
        let new_parent = item.parent_id().cloned();
        let is_folder = item.is_folder();

        if let Err(err) = self.state.check_attach(&id, new_parent.as_ref()) {
            debug!(item_id = %id, parent = ?new_parent, error = %err, "Add rejected");
            return Err(err);
        }

        let mut next = (*self.state).clone();
        let old_parent = next
            .items
            .get(&id)
            .map(|existing| existing.parent_id().cloned());

        if let Some(old_parent) = &old_parent {
            if *old_parent != new_parent {
                detach(&mut next, &id, old_parent.as_ref());
                if let Some(old) = old_parent {
                    recount(&mut next, old);
                }
            }
        }

        next.items.insert(id.clone(), Arc::new(item));
        attach(&mut next, &id, new_parent.as_ref());
        if let Some(parent) = &new_parent {
            recount(&mut next, parent);
        }
        if is_folder {
            recount(&mut next, &id);
        }
        propagate_trash(&mut next, &id);

        debug!(item_id = %id, parent = ?new_parent, "Item added");
        self.commit(next);
        Ok(())
    }

    /// Remove an item. Folders take their whole subtree with them.
    ///
    /// Returns every id that left the store, the item itself first; empty
    /// when the id was unknown.
    pub fn remove_item(&mut self, id: &ItemId) -> Vec<ItemId> {
        let Some(item) = self.state.items.get(id) else {
            return Vec::new();
        };
        let parent = item.parent_id().cloned();

        let mut next = (*self.state).clone();
        detach(&mut next, id, parent.as_ref());

        let descendants = next.descendants(id);
        for descendant in &descendants {
            next.items.remove(descendant);
            next.children.remove(descendant);
        }
        next.items.remove(id);
        next.children.remove(id);

        if let Some(parent) = &parent {
            recount(&mut next, parent);
        }

        let mut removed = Vec::with_capacity(descendants.len() + 1);
        removed.push(id.clone());
        removed.extend(descendants);

        debug!(item_id = %id, removed = removed.len(), "Item removed");
        self.commit(next);
        removed
    }

    /// Permanently delete an item and its subtree. Alias of [`Self::remove_item`].
    pub fn permanent_delete(&mut self, id: &ItemId) -> Vec<ItemId> {
        self.remove_item(id)
    }

    /// Re-parent an item under `target` (`None` = root level).
    ///
    /// The target must be an existing folder that is neither the item nor
    /// one of its descendants. Rejections leave the store untouched.
    pub fn move_item(&mut self, id: &ItemId, target: Option<&ItemId>) -> Result<(), TreeError> {
        if let Err(err) = self.state.check_move(id, target) {
            debug!(item_id = %id, to = ?target, error = %err, "Move rejected");
            return Err(err);
        }

        let Some(item) = self.state.items.get(id) else {
            return Err(TreeError::NotFound(id.clone()));
        };
        let old_parent = item.parent_id().cloned();
        if old_parent.as_ref() == target {
            return Ok(());
        }

        let mut next = (*self.state).clone();
        detach(&mut next, id, old_parent.as_ref());
        if let Some(entry) = next.items.get_mut(id) {
            Arc::make_mut(entry).set_parent_id(target.cloned());
        }
        attach(&mut next, id, target);

        if let Some(old) = &old_parent {
            recount(&mut next, old);
        }
        if let Some(new) = target {
            recount(&mut next, new);
        }
        propagate_trash(&mut next, id);

        debug!(item_id = %id, from = ?old_parent, to = ?target, "Item moved");
        self.commit(next);
        Ok(())
    }

    /// Shallow-merge `update` into an item. Returns `false` for unknown ids.
    pub fn update_item(&mut self, id: &ItemId, update: &ItemUpdate) -> bool {
        if !self.state.contains(id) {
            return false;
        }

        let mut next = (*self.state).clone();
        let mut parent = None;
        if let Some(entry) = next.items.get_mut(id) {
            let item = Arc::make_mut(entry);
            update.apply_to(item);
            parent = item.parent_id().cloned();
        }

        if update.touches_deletion() {
            if let Some(parent) = &parent {
                recount(&mut next, parent);
            }
            propagate_trash(&mut next, id);
        }

        self.commit(next);
        true
    }

    /// Move an item (and implicitly its subtree) to the trash.
    pub fn soft_delete(&mut self, id: &ItemId, at: DateTime<Utc>) -> bool {
        let update = ItemUpdate {
            deleted_at: Some(Some(at)),
            ..ItemUpdate::default()
        };
        self.update_item(id, &update)
    }

    /// Bring a soft-deleted item back.
    pub fn restore(&mut self, id: &ItemId) -> bool {
        let update = ItemUpdate {
            deleted_at: Some(None),
            ..ItemUpdate::default()
        };
        self.update_item(id, &update)
    }

    fn commit(&mut self, next: TreeSnapshot) {
        self.state = Arc::new(next);
        self.publisher.send_replace(self.state.clone());
    }
}

fn attach(tree: &mut TreeSnapshot, id: &ItemId, parent: Option<&ItemId>) {
    let list = match parent {
        None => &mut tree.root,
        Some(parent) => tree.children.entry(parent.clone()).or_default(),
    };
    if !list.contains(id) {
        list.push(id.clone());
    }
}

fn detach(tree: &mut TreeSnapshot, id: &ItemId, parent: Option<&ItemId>) {
    match parent {
        None => tree.root.retain(|child| child != id),
        Some(parent) => {
            if let Some(list) = tree.children.get_mut(parent) {
                list.retain(|child| child != id);
            }
        }
    }
}

fn recount(tree: &mut TreeSnapshot, folder: &ItemId) {
    let count = tree.live_child_count(folder);
    if let Some(entry) = tree.items.get_mut(folder) {
        if let FileSystemItem::Folder(f) = &**entry {
            if f.items == count {
                return;
            }
        }
        if let FileSystemItem::Folder(f) = Arc::make_mut(entry) {
            f.items = count;
        }
    }
}

/// Recompute the derived `has_deleted_ancestor` flag for `id` and everything below it.
fn propagate_trash(tree: &mut TreeSnapshot, id: &ItemId) {
    let mut stack = vec![id.clone()];
    let mut seen = HashSet::new();

    while let Some(current) = stack.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        let Some(item) = tree.items.get(&current) else {
            continue;
        };
        let flagged = tree.is_in_trashed_branch(item.parent_id());
        let wanted = flagged.then_some(true);

        if item.meta().has_deleted_ancestor != wanted {
            if let Some(entry) = tree.items.get_mut(&current) {
                Arc::make_mut(entry).meta_mut().has_deleted_ancestor = wanted;
            }
        }

        stack.extend(tree.child_ids(Some(&current)).iter().cloned());
    }
}
