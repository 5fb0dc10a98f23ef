//! Droppable targets and their ids.
//!
//! Cards register under their item id. The breadcrumb bar adds synthetic
//! ids: `breadcrumb-<id>` for inline crumbs and `breadcrumb-dropdown-<id>`
//! for entries of the collapsed-path dropdown, which renders in a portal
//! outside the grid's containment. The dropdown's trigger button and
//! content container have fixed ids of their own.

use std::fmt;

use filecards_core::types::ItemId;

use crate::geometry::Rect;

const BREADCRUMB_PREFIX: &str = "breadcrumb-";
const DROPDOWN_PREFIX: &str = "breadcrumb-dropdown-";
const DROPDOWN_TRIGGER: &str = "breadcrumb-dropdown-trigger";
const DROPDOWN_CONTENT: &str = "breadcrumb-dropdown-content";

/// Id of a droppable region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DroppableId {
    /// A card in the grid.
    Item(ItemId),
    /// An inline breadcrumb for a folder on the current path.
    Breadcrumb(ItemId),
    /// An entry in the breadcrumb dropdown.
    DropdownItem(ItemId),
    /// The button that opens the breadcrumb dropdown.
    DropdownTrigger,
    /// The dropdown's content container.
    DropdownContent,
}

impl DroppableId {
    /// Parse a raw droppable id string.
    pub fn parse(raw: &str) -> Self {
        if raw == DROPDOWN_TRIGGER {
            Self::DropdownTrigger
        } else if raw == DROPDOWN_CONTENT {
            Self::DropdownContent
        } else if let Some(rest) = raw.strip_prefix(DROPDOWN_PREFIX) {
            Self::DropdownItem(ItemId::from(rest))
        } else if let Some(rest) = raw.strip_prefix(BREADCRUMB_PREFIX) {
            Self::Breadcrumb(ItemId::from(rest))
        } else {
            Self::Item(ItemId::from(raw))
        }
    }

    /// The real item id embedded in the droppable id, if any.
    pub fn embedded_item(&self) -> Option<&ItemId> {
        match self {
            Self::Item(id) | Self::Breadcrumb(id) | Self::DropdownItem(id) => Some(id),
            Self::DropdownTrigger | Self::DropdownContent => None,
        }
    }

    /// Whether the id belongs to the breadcrumb dropdown (items, trigger, or content).
    pub fn is_dropdown(&self) -> bool {
        matches!(
            self,
            Self::DropdownItem(_) | Self::DropdownTrigger | Self::DropdownContent
        )
    }
}

impl fmt::Display for DroppableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(id) => write!(f, "{id}"),
            Self::Breadcrumb(id) => write!(f, "{BREADCRUMB_PREFIX}{id}"),
            Self::DropdownItem(id) => write!(f, "{DROPDOWN_PREFIX}{id}"),
            Self::DropdownTrigger => f.write_str(DROPDOWN_TRIGGER),
            Self::DropdownContent => f.write_str(DROPDOWN_CONTENT),
        }
    }
}

impl From<&str> for DroppableId {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// A droppable region as the default hit test sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Droppable {
    /// Region id.
    pub id: DroppableId,
    /// Last measured bounding rect.
    pub rect: Rect,
    /// Item attached to the region, used to resolve synthetic ids.
    pub data: Option<ItemId>,
    /// Disabled regions never collide.
    pub disabled: bool,
}

impl Droppable {
    /// An enabled region with no attached item.
    pub fn new(id: DroppableId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            data: None,
            disabled: false,
        }
    }

    /// Attach an item to the region.
    pub fn with_data(mut self, item: ItemId) -> Self {
        self.data = Some(item);
        self
    }
}

/// A dropdown entry rendered in a portal, measured directly on every query.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalItem {
    /// Folder the entry stands for.
    pub folder: ItemId,
    /// Live bounding rect.
    pub rect: Rect,
}

impl PortalItem {
    /// The droppable id the entry is known by.
    pub fn droppable_id(&self) -> DroppableId {
        DroppableId::DropdownItem(self.folder.clone())
    }
}

/// Every region a drag can currently land on.
#[derive(Debug, Clone, Default)]
pub struct DroppableRegistry {
    droppables: Vec<Droppable>,
    portal_items: Vec<PortalItem>,
}

impl DroppableRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or re-measure a droppable.
    pub fn register(&mut self, droppable: Droppable) {
        match self.droppables.iter_mut().find(|d| d.id == droppable.id) {
            Some(existing) => *existing = droppable,
            None => self.droppables.push(droppable),
        }
    }

    /// Remove a droppable.
    pub fn unregister(&mut self, id: &DroppableId) {
        self.droppables.retain(|d| &d.id != id);
    }

    /// Register or re-measure a portal-rendered dropdown entry.
    pub fn register_portal_item(&mut self, folder: ItemId, rect: Rect) {
        match self.portal_items.iter_mut().find(|p| p.folder == folder) {
            Some(existing) => existing.rect = rect,
            None => self.portal_items.push(PortalItem { folder, rect }),
        }
    }

    /// Forget every portal entry (the dropdown closed).
    pub fn clear_portal_items(&mut self) {
        self.portal_items.clear();
    }

    /// Registered droppables in registration order.
    pub fn droppables(&self) -> &[Droppable] {
        &self.droppables
    }

    /// Registered portal entries in registration order.
    pub fn portal_items(&self) -> &[PortalItem] {
        &self.portal_items
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.droppables.clear();
        self.portal_items.clear();
    }
}
