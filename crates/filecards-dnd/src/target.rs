//! Mapping collisions to real drop targets.

use thiserror::Error;

use filecards_core::types::ItemId;
use filecards_tree::TreeSnapshot;

use crate::collision::Collision;
use crate::droppable::DroppableId;

/// Where a drop lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// The top level, reached through the designated root folder.
    Root,
    /// A folder in the store.
    Folder(ItemId),
}

impl DropTarget {
    /// Parent id to send to the move API (`None` = top level).
    pub fn parent(&self) -> Option<&ItemId> {
        match self {
            Self::Root => None,
            Self::Folder(id) => Some(id),
        }
    }
}

/// Why a drop was refused before any API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropRejection {
    /// No target, or an id that maps to nothing in the store.
    #[error("no valid drop target")]
    Unresolvable,
    /// The target exists but is a document.
    #[error("{0} is not a folder")]
    NotAFolder(ItemId),
    /// The target is one of the dragged items.
    #[error("cannot drop {0} onto itself")]
    SelfDrop(ItemId),
    /// A dragged folder would land inside its own subtree.
    #[error("cannot move {item} into its descendant {target}")]
    Cycle {
        /// The dragged folder.
        item: ItemId,
        /// The offending target.
        target: ItemId,
    },
    /// No drag was in progress.
    #[error("nothing is being dragged")]
    NothingDragged,
}

/// Resolve the droppable under the pointer to a real item id.
///
/// Dropdown and breadcrumb ids resolve through the attached item first and
/// the stripped id second, and only to ids the store (or the root sentinel)
/// knows. The dropdown trigger falls back to the root folder. The dropdown
/// content container never resolves.
pub fn resolve_over_id(collision: &Collision, tree: &TreeSnapshot, root_id: &ItemId) -> Option<ItemId> {
    let known = |id: &ItemId| id == root_id || tree.contains(id);

    match &collision.id {
        DroppableId::DropdownContent => None,
        DroppableId::DropdownTrigger => Some(
            collision
                .data
                .clone()
                .filter(|id| known(id))
                .unwrap_or_else(|| root_id.clone()),
        ),
        DroppableId::DropdownItem(stripped) | DroppableId::Breadcrumb(stripped) => collision
            .data
            .as_ref()
            .filter(|id| known(id))
            .or_else(|| Some(stripped).filter(|id| known(id)))
            .cloned(),
        DroppableId::Item(id) => Some(id.clone()),
    }
}

/// Resolve and validate a drop target for a drag of `active`.
///
/// The root sentinel maps to [`DropTarget::Root`] whether or not the store
/// holds a record for it.
pub fn resolve_target(
    collision: Option<&Collision>,
    active: &ItemId,
    tree: &TreeSnapshot,
    root_id: &ItemId,
) -> Result<DropTarget, DropRejection> {
    let resolved = collision
        .and_then(|c| resolve_over_id(c, tree, root_id))
        .ok_or(DropRejection::Unresolvable)?;

    if &resolved == active {
        return Err(DropRejection::SelfDrop(resolved));
    }
    if &resolved == root_id {
        return Ok(DropTarget::Root);
    }
    if !tree.contains(&resolved) {
        return Err(DropRejection::Unresolvable);
    }
    if !tree.is_folder(&resolved) {
        return Err(DropRejection::NotAFolder(resolved));
    }
    Ok(DropTarget::Folder(resolved))
}

/// Check that no dragged item is the target or an ancestor of it.
pub fn check_structure<'a>(
    dragged: impl IntoIterator<Item = &'a ItemId>,
    target: &DropTarget,
    tree: &TreeSnapshot,
) -> Result<(), DropRejection> {
    let DropTarget::Folder(target_id) = target else {
        return Ok(());
    };
    for id in dragged {
        if id == target_id {
            return Err(DropRejection::SelfDrop(id.clone()));
        }
        if tree.is_descendant(target_id, id) {
            return Err(DropRejection::Cycle {
                item: id.clone(),
                target: target_id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filecards_entity::{Document, Folder, ItemMeta};
    use filecards_tree::TreeStore;

    fn store() -> TreeStore {
        TreeStore::with_items(vec![
            Folder::new(ItemMeta::new("a", "A", "u"), None).into(),
            Folder::new(ItemMeta::new("b", "B", "u"), Some(ItemId::from("a"))).into(),
            Document::new(ItemMeta::new("d", "d.txt", "u"), Some(ItemId::from("a")), 1, "k").into(),
        ])
    }

    fn root() -> ItemId {
        ItemId::from("root")
    }

    #[test]
    fn test_content_never_resolves() {
        let tree = store();
        let content = Collision::new(DroppableId::DropdownContent);
        assert_eq!(resolve_over_id(&content, &tree, &root()), None);
        assert_eq!(
            resolve_target(Some(&content), &ItemId::from("d"), &tree, &root()),
            Err(DropRejection::Unresolvable)
        );
    }

    #[test]
    fn test_trigger_falls_back_to_root() {
        let tree = store();
        let trigger = Collision::new(DroppableId::DropdownTrigger);
        assert_eq!(
            resolve_target(Some(&trigger), &ItemId::from("d"), &tree, &root()),
            Ok(DropTarget::Root)
        );
        assert_eq!(DropTarget::Root.parent(), None);
    }

    #[test]
    fn test_dropdown_resolves_by_data_then_stripped_id() {
        let tree = store();
        let with_data = Collision {
            id: DroppableId::parse("breadcrumb-dropdown-stale"),
            data: Some(ItemId::from("b")),
        };
        assert_eq!(resolve_over_id(&with_data, &tree, &root()), Some(ItemId::from("b")));

        let stripped = Collision::new(DroppableId::parse("breadcrumb-dropdown-a"));
        assert_eq!(resolve_over_id(&stripped, &tree, &root()), Some(ItemId::from("a")));

        let unknown = Collision::new(DroppableId::parse("breadcrumb-dropdown-zzz"));
        assert_eq!(resolve_over_id(&unknown, &tree, &root()), None);

        let crumb_root = Collision::new(DroppableId::parse("breadcrumb-root"));
        assert_eq!(
            resolve_target(Some(&crumb_root), &ItemId::from("d"), &tree, &root()),
            Ok(DropTarget::Root)
        );
    }

    #[test]
    fn test_self_and_document_targets_rejected() {
        let tree = store();
        let onto_self = Collision::new(DroppableId::parse("b"));
        assert_eq!(
            resolve_target(Some(&onto_self), &ItemId::from("b"), &tree, &root()),
            Err(DropRejection::SelfDrop(ItemId::from("b")))
        );
        let onto_doc = Collision::new(DroppableId::parse("d"));
        assert_eq!(
            resolve_target(Some(&onto_doc), &ItemId::from("b"), &tree, &root()),
            Err(DropRejection::NotAFolder(ItemId::from("d")))
        );
        assert_eq!(
            resolve_target(None, &ItemId::from("b"), &tree, &root()),
            Err(DropRejection::Unresolvable)
        );
    }

    #[test]
    fn test_structure_check_catches_cycles() {
        let tree = store();
        let target = DropTarget::Folder(ItemId::from("b"));
        let dragged = [ItemId::from("d"), ItemId::from("a")];
        assert_eq!(
            check_structure(&dragged, &target, &tree),
            Err(DropRejection::Cycle {
                item: ItemId::from("a"),
                target: ItemId::from("b")
            })
        );
        assert!(check_structure(&dragged, &DropTarget::Root, &tree).is_ok());
    }
}
