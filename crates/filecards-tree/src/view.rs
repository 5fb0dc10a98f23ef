//! Building the ordered visible-item feed for a folder listing.

use std::cmp::Ordering;

use filecards_core::types::{ItemFilter, ItemId, KindFilter, SortKey, SortSpec};
use filecards_entity::FileSystemItem;

use crate::snapshot::TreeSnapshot;

/// Filter plus ordering for one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    /// Which items are shown.
    pub filter: ItemFilter,
    /// How they are ordered.
    pub sort: SortSpec,
}

impl TreeSnapshot {
    /// The ordered ids a listing of `folder` shows under `query`.
    ///
    /// Active listings show live children of `folder`. The trash listing
    /// (`filter.trashed`) ignores `folder` and shows trash roots.
    pub fn visible_items(&self, folder: Option<&ItemId>, query: &ItemQuery) -> Vec<ItemId> {
        let candidates: Vec<&FileSystemItem> = if query.filter.trashed {
            self.trashed()
        } else {
            self.get_children(folder)
                .into_iter()
                .filter(|item| item.is_active())
                .collect()
        };

        let mut shown: Vec<&FileSystemItem> = candidates
            .into_iter()
            .filter(|item| passes(&query.filter, item))
            .collect();
        shown.sort_by(|a, b| compare(&query.sort, a, b));
        shown.into_iter().map(|item| item.id().clone()).collect()
    }
}

fn passes(filter: &ItemFilter, item: &FileSystemItem) -> bool {
    let kind_ok = match filter.kind {
        KindFilter::All => true,
        KindFilter::Folders => item.is_folder(),
        KindFilter::Documents => !item.is_folder(),
    };
    kind_ok && (!filter.pinned_only || item.meta().is_pinned) && filter.matches_name(item.name())
}

fn compare(sort: &SortSpec, a: &FileSystemItem, b: &FileSystemItem) -> Ordering {
    if sort.pinned_first {
        let pinned = b.meta().is_pinned.cmp(&a.meta().is_pinned);
        if pinned != Ordering::Equal {
            return pinned;
        }
    }
    if sort.folders_first {
        let folders = b.is_folder().cmp(&a.is_folder());
        if folders != Ordering::Equal {
            return folders;
        }
    }

    let by_key = match sort.key {
        SortKey::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortKey::CreatedAt => a.meta().created_at.cmp(&b.meta().created_at),
        SortKey::UpdatedAt => a.meta().updated_at.cmp(&b.meta().updated_at),
        SortKey::Size => a.size().cmp(&b.size()),
    };
    sort.direction.apply(by_key.then_with(|| a.id().cmp(b.id())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use filecards_core::types::SortDirection;
    use filecards_entity::{Document, Folder, ItemMeta, ItemUpdate};

    use crate::store::TreeStore;

    fn ids(list: &[ItemId]) -> Vec<&str> {
        list.iter().map(ItemId::as_str).collect()
    }

    fn sample() -> TreeStore {
        let home = ItemId::from("home");
        TreeStore::with_items(vec![
            Folder::new(ItemMeta::new("home", "Home", "u"), None).into(),
            Document::new(ItemMeta::new("b", "beta.txt", "u"), Some(home.clone()), 300, "k").into(),
            Document::new(ItemMeta::new("a", "Alpha.txt", "u"), Some(home.clone()), 100, "k").into(),
            Folder::new(ItemMeta::new("z", "zeta", "u"), Some(home.clone())).into(),
            Document::new(ItemMeta::new("c", "gamma.pdf", "u"), Some(home), 200, "k").into(),
        ])
    }

    #[test]
    fn test_default_order_is_folders_then_name() {
        let store = sample();
        let visible = store.visible_items(Some(&ItemId::from("home")), &ItemQuery::default());
        assert_eq!(ids(&visible), vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn test_size_desc_and_pinned_first() {
        let mut store = sample();
        store.update_item(
            &ItemId::from("a"),
            &ItemUpdate {
                is_pinned: Some(true),
                ..ItemUpdate::default()
            },
        );
        let query = ItemQuery {
            sort: SortSpec {
                key: SortKey::Size,
                direction: SortDirection::Desc,
                pinned_first: true,
                folders_first: false,
            },
            ..ItemQuery::default()
        };
        let visible = store.visible_items(Some(&ItemId::from("home")), &query);
        assert_eq!(ids(&visible), vec!["a", "b", "c", "z"]);
    }

    #[test]
    fn test_filters_exclude_hidden_items() {
        let mut store = sample();
        store.soft_delete(&ItemId::from("b"), Utc::now());

        let query = ItemQuery {
            filter: ItemFilter {
                search: Some(".TXT".to_string()),
                kind: KindFilter::Documents,
                ..ItemFilter::default()
            },
            ..ItemQuery::default()
        };
        let visible = store.visible_items(Some(&ItemId::from("home")), &query);
        assert_eq!(ids(&visible), vec!["a"]);

        let trash = ItemQuery {
            filter: ItemFilter {
                trashed: true,
                ..ItemFilter::default()
            },
            ..ItemQuery::default()
        };
        assert_eq!(ids(&store.visible_items(None, &trash)), vec!["b"]);
    }
}
