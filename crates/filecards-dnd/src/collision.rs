//! Collision detection.
//!
//! Detection runs an ordered list of named strategies and returns the first
//! non-empty answer, trimmed to a single collision:
//!
//! 1. `portal-priority`: a direct hit test against portal-rendered dropdown
//!    entries, which the default containment test cannot see.
//! 2. `breadcrumb-item-priority`: the default pointer-within set, where
//!    dropdown entries beat the dropdown's trigger and content container.
//! 3. `padded-containment`: generic droppables with a padded hit box;
//!    inline breadcrumbs must pass the strict test.

use std::cmp::Ordering;

use filecards_core::types::ItemId;

use crate::droppable::{Droppable, DroppableId, PortalItem};
use crate::geometry::Point;

/// A droppable the pointer is over.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    /// Region id.
    pub id: DroppableId,
    /// Item attached to the region.
    pub data: Option<ItemId>,
}

impl Collision {
    /// A collision with no attached item.
    pub fn new(id: DroppableId) -> Self {
        Self { id, data: None }
    }

    fn from_droppable(droppable: &Droppable) -> Self {
        Self {
            id: droppable.id.clone(),
            data: droppable.data.clone(),
        }
    }

    fn from_portal(portal: &PortalItem) -> Self {
        Self {
            id: portal.droppable_id(),
            data: Some(portal.folder.clone()),
        }
    }
}

/// Inputs to a collision query.
#[derive(Debug, Clone, Copy)]
pub struct CollisionArgs<'a> {
    /// Current pointer position; detection needs one.
    pub pointer: Option<Point>,
    /// Regions known to the default hit test.
    pub droppables: &'a [Droppable],
    /// Portal-rendered dropdown entries.
    pub portal_items: &'a [PortalItem],
    /// Padding for the relaxed test.
    pub padding: f64,
}

/// A single detection strategy.
pub type CollisionStrategy = fn(&CollisionArgs<'_>) -> Vec<Collision>;

/// Strategies in priority order.
pub const STRATEGIES: [(&str, CollisionStrategy); 3] = [
    ("portal-priority", portal_priority),
    ("breadcrumb-item-priority", breadcrumb_item_priority),
    ("padded-containment", padded_containment),
];

/// Run the strategies in order and return the highest-priority collision.
pub fn detect_collisions(args: &CollisionArgs<'_>) -> Option<Collision> {
    STRATEGIES.iter().find_map(|(_, strategy)| strategy(args).into_iter().next())
}

/// Enabled droppables strictly containing the pointer, nearest centre first.
pub fn pointer_within<'a>(args: &CollisionArgs<'a>) -> Vec<&'a Droppable> {
    let Some(pointer) = args.pointer else {
        return Vec::new();
    };
    let mut hits: Vec<&Droppable> = args
        .droppables
        .iter()
        .filter(|d| !d.disabled && d.rect.contains(pointer))
        .collect();
    sort_by_distance(&mut hits, pointer);
    hits
}

/// Direct hit test against portal-rendered dropdown entries.
pub fn portal_priority(args: &CollisionArgs<'_>) -> Vec<Collision> {
    let Some(pointer) = args.pointer else {
        return Vec::new();
    };
    args.portal_items
        .iter()
        .find(|portal| portal.rect.contains(pointer))
        .map(Collision::from_portal)
        .into_iter()
        .collect()
}

/// Dropdown entries beat the dropdown's trigger and content container.
///
/// When only the content container matched, any entry under the pointer is
/// preferred over it. Returns nothing unless the pointer is over some part
/// of the dropdown.
pub fn breadcrumb_item_priority(args: &CollisionArgs<'_>) -> Vec<Collision> {
    let within = pointer_within(args);

    if let Some(item) = within
        .iter()
        .find(|d| matches!(d.id, DroppableId::DropdownItem(_)))
    {
        return vec![Collision::from_droppable(item)];
    }

    if let Some(trigger) = within
        .iter()
        .find(|d| d.id == DroppableId::DropdownTrigger)
    {
        return vec![Collision::from_droppable(trigger)];
    }

    if let Some(content) = within
        .iter()
        .find(|d| d.id == DroppableId::DropdownContent)
    {
        let probed = args.pointer.and_then(|pointer| {
            args.droppables
                .iter()
                .find(|d| {
                    !d.disabled
                        && matches!(d.id, DroppableId::DropdownItem(_))
                        && d.rect.contains(pointer)
                })
                .map(Collision::from_droppable)
                .or_else(|| {
                    args.portal_items
                        .iter()
                        .find(|p| p.rect.contains(pointer))
                        .map(Collision::from_portal)
                })
        });
        return vec![probed.unwrap_or_else(|| Collision::from_droppable(content))];
    }

    Vec::new()
}

/// Generic droppables with a padded hit box, nearest centre first.
///
/// Inline breadcrumbs take the strict test; dropdown regions are left to
/// the earlier strategies.
pub fn padded_containment(args: &CollisionArgs<'_>) -> Vec<Collision> {
    let Some(pointer) = args.pointer else {
        return Vec::new();
    };
    let mut hits: Vec<&Droppable> = args
        .droppables
        .iter()
        .filter(|d| !d.disabled && !d.id.is_dropdown())
        .filter(|d| match d.id {
            DroppableId::Breadcrumb(_) => d.rect.contains(pointer),
            _ => d.rect.inflate(args.padding).contains(pointer),
        })
        .collect();
    sort_by_distance(&mut hits, pointer);
    hits.into_iter().map(Collision::from_droppable).collect()
}

fn sort_by_distance(hits: &mut [&Droppable], pointer: Point) {
    hits.sort_by(|a, b| {
        a.rect
            .center()
            .distance(&pointer)
            .partial_cmp(&b.rect.center().distance(&pointer))
            .unwrap_or(Ordering::Equal)
    });
}
