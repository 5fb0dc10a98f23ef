//! The drag-and-drop orchestrator.
//!
//! Lifecycle: `Idle -> Dragging -> (over nothing | over a folder) -> ended`
//! (moved, rejected, or cancelled) `-> Idle`. The orchestrator owns the
//! transient drag state; the tree store and selection engine are borrowed
//! per call from whoever owns them.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use filecards_core::config::drag::DragConfig;
use filecards_core::types::ItemId;
use filecards_entity::{FileSystemItem, ItemUpdate};
use filecards_selection::SelectionEngine;
use filecards_tree::{TreeSnapshot, TreeStore};

use crate::collision::{Collision, CollisionArgs, detect_collisions};
use crate::droppable::DroppableRegistry;
use crate::geometry::{Point, Rect};
use crate::ports::{DuplicateResolver, MoveApi, Notifier};
use crate::protocol::MoveBatch;
use crate::sensor::{Sensor, SensorKind, SensorSignal};
use crate::state::{ActiveDescriptor, CardVariant, DragPhase, DragState, DropOutcome};
use crate::target::{DropRejection, DropTarget, check_structure, resolve_target};

/// What a pointer release amounted to.
#[derive(Debug, Clone)]
pub enum PointerRelease {
    /// Nothing was pressed, or the press never became a click or drag.
    None,
    /// A press released before activation; route it to the selection engine.
    Click(ItemId),
    /// An active drag was dropped.
    Dropped(DropOutcome),
}

/// Drives drags from sensor input through to the move batch.
pub struct DragOrchestrator {
    root_id: ItemId,
    padding: f64,
    variant: CardVariant,
    state: DragState,
    sensor: Sensor,
    registry: DroppableRegistry,
    container: Option<Rect>,
    api: Arc<dyn MoveApi>,
    dialog: Arc<dyn DuplicateResolver>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for DragOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragOrchestrator")
            .field("root_id", &self.root_id)
            .field("state", &self.state)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

impl DragOrchestrator {
    /// Create an idle orchestrator.
    pub fn new(
        config: &DragConfig,
        api: Arc<dyn MoveApi>,
        dialog: Arc<dyn DuplicateResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            root_id: ItemId::from(config.root_folder_id.as_str()),
            padding: config.collision_padding_px,
            variant: CardVariant::default(),
            state: DragState::default(),
            sensor: Sensor::new(config),
            registry: DroppableRegistry::new(),
            container: None,
            api,
            dialog,
            notifier,
        }
    }

    /// Current drag state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Id of the designated root folder.
    pub fn root_id(&self) -> &ItemId {
        &self.root_id
    }

    /// Registered droppables.
    pub fn registry(&self) -> &DroppableRegistry {
        &self.registry
    }

    /// Registered droppables, for (re-)measurement.
    pub fn registry_mut(&mut self) -> &mut DroppableRegistry {
        &mut self.registry
    }

    /// Set (or clear) the bounds of the directory view.
    pub fn set_container_rect(&mut self, rect: Option<Rect>) {
        self.container = rect;
    }

    /// Set the overlay variant used for subsequent drags.
    pub fn set_variant(&mut self, variant: CardVariant) {
        self.variant = variant;
    }

    /// Begin a drag of `id`.
    ///
    /// When `id` is part of a multi-item selection the whole selection is
    /// dragged, in selection order. Returns false when `id` is unknown.
    pub fn drag_start(
        &mut self,
        tree: &TreeSnapshot,
        selection: &SelectionEngine,
        id: &ItemId,
        origin: Point,
    ) -> bool {
        let Some(item) = tree.get(id) else {
            debug!(item_id = %id, "Drag start ignored, item not in store");
            return false;
        };

        let dragged_items: Vec<FileSystemItem> = if selection.is_selected(id) && selection.len() > 1 {
            selection
                .selected_ordered()
                .iter()
                .filter_map(|selected| tree.get(selected).cloned())
                .collect()
        } else {
            vec![item.clone()]
        };

        info!(item_id = %id, count = dragged_items.len(), "Drag started");

        self.state = DragState {
            phase: DragPhase::Dragging,
            active: Some(ActiveDescriptor {
                item: id.clone(),
                kind: item.kind(),
                variant: self.variant,
            }),
            dragged_items,
            origin: Some(origin),
            pointer: Some(origin),
            ..DragState::default()
        };
        true
    }

    /// Track the pointer during a drag and update the hover target.
    pub fn drag_move(&mut self, tree: &TreeSnapshot, at: Point) -> Option<&ItemId> {
        if !self.is_dragging() {
            return None;
        }
        self.state.pointer = Some(at);
        self.state.is_outside_container = self.container.is_some_and(|rect| !rect.contains(at));

        let collision = self.detect(at);
        self.drag_over(tree, collision)
    }

    /// Record the droppable the pointer is over.
    ///
    /// Only a resolvable folder that none of the dragged items contains
    /// becomes the hover target; anything else clears it.
    pub fn drag_over(&mut self, tree: &TreeSnapshot, collision: Option<Collision>) -> Option<&ItemId> {
        let active = self.state.active_id()?.clone();

        let target = resolve_target(collision.as_ref(), &active, tree, &self.root_id).and_then(|target| {
            check_structure(self.state.dragged_items.iter().map(FileSystemItem::id), &target, tree)
                .map(|()| target)
        });

        self.state.over = collision;
        self.state.over_target = match target {
            Ok(DropTarget::Root) => Some(self.root_id.clone()),
            Ok(DropTarget::Folder(id)) => Some(id),
            Err(reason) => {
                debug!(item_id = %active, %reason, "No drop target under pointer");
                None
            }
        };
        self.state.over_target.as_ref()
    }

    /// Drop the dragged items onto `over`.
    ///
    /// Rejected drops make no API calls and only reset drag state. Executed
    /// batches, complete or not, clear both drag state and selection.
    pub async fn drag_end(
        &mut self,
        tree: &mut TreeStore,
        selection: &mut SelectionEngine,
        over: Option<&Collision>,
    ) -> DropOutcome {
        let Some(active) = self.state.active_id().cloned() else {
            return DropOutcome::Rejected(DropRejection::NothingDragged);
        };

        let snapshot: &TreeSnapshot = tree;
        let target = resolve_target(over, &active, snapshot, &self.root_id).and_then(|target| {
            check_structure(self.state.dragged_items.iter().map(FileSystemItem::id), &target, snapshot)
                .map(|()| target)
        });
        let target = match target {
            Ok(target) => target,
            Err(reason) => {
                info!(item_id = %active, %reason, "Drop rejected");
                self.reset();
                return DropOutcome::Rejected(reason);
            }
        };

        let items = std::mem::take(&mut self.state.dragged_items);
        let parent = target.parent().cloned();
        info!(
            item_id = %active,
            count = items.len(),
            destination = parent.as_ref().map(ItemId::as_str).unwrap_or("root"),
            "Drop accepted, moving items"
        );

        let api = self.api.clone();
        let dialog = self.dialog.clone();
        let batch = MoveBatch::new(api.as_ref(), dialog.as_ref());
        let report = batch
            .execute(&items, parent.as_ref(), |original, receipt| {
                apply_receipt(tree, original, receipt, parent.as_ref());
            })
            .await;

        let outcome = DropOutcome::from(report);
        self.notify(&outcome, &items);

        self.reset();
        selection.clear();
        outcome
    }

    /// Abandon the drag without any API calls.
    pub fn drag_cancel(&mut self) {
        if let Some(active) = self.state.active_id() {
            info!(item_id = %active, "Drag cancelled");
        }
        self.reset();
    }

    /// A press on a card began.
    pub fn pointer_down(&mut self, kind: SensorKind, id: ItemId, at: Point, now: Instant) -> SensorSignal {
        self.sensor.press(kind, id, at, now)
    }

    /// The pointer moved.
    pub fn pointer_move(
        &mut self,
        tree: &TreeSnapshot,
        selection: &SelectionEngine,
        at: Point,
        now: Instant,
    ) -> SensorSignal {
        let signal = self.sensor.motion(at, now);
        match &signal {
            SensorSignal::Activated { item, origin } => {
                if self.drag_start(tree, selection, item, *origin) {
                    self.drag_move(tree, at);
                } else {
                    self.sensor.cancel();
                }
            }
            SensorSignal::Moved(point) => {
                self.drag_move(tree, *point);
            }
            _ => {}
        }
        signal
    }

    /// Let a held press activate once its delay elapses.
    pub fn tick(&mut self, tree: &TreeSnapshot, selection: &SelectionEngine, now: Instant) -> SensorSignal {
        let signal = self.sensor.poll(now);
        if let SensorSignal::Activated { item, origin } = &signal {
            if !self.drag_start(tree, selection, item, *origin) {
                self.sensor.cancel();
            }
        }
        signal
    }

    /// The pointer was released.
    ///
    /// The drop lands on whatever was last hovered, inside the directory
    /// view or not.
    pub async fn pointer_up(
        &mut self,
        tree: &mut TreeStore,
        selection: &mut SelectionEngine,
        at: Point,
        now: Instant,
    ) -> PointerRelease {
        match self.sensor.release(at, now) {
            SensorSignal::Click { item } => PointerRelease::Click(item),
            SensorSignal::Released(point) if self.is_dragging() => {
                self.drag_move(tree, point);
                let over = self.state.over.clone();
                PointerRelease::Dropped(self.drag_end(tree, selection, over.as_ref()).await)
            }
            _ => PointerRelease::None,
        }
    }

    /// Run collision detection at `at` against the registry.
    pub fn detect(&self, at: Point) -> Option<Collision> {
        detect_collisions(&CollisionArgs {
            pointer: Some(at),
            droppables: self.registry.droppables(),
            portal_items: self.registry.portal_items(),
            padding: self.padding,
        })
    }

    fn reset(&mut self) {
        self.state.reset();
        self.sensor.cancel();
    }

    fn notify(&self, outcome: &DropOutcome, items: &[FileSystemItem]) {
        match outcome {
            DropOutcome::Partial { failed, error, .. } => {
                let name = items
                    .iter()
                    .find(|item| item.id() == failed)
                    .map(FileSystemItem::name)
                    .unwrap_or(failed.as_str());
                self.notifier.error(&format!("Failed to move \"{name}\": {}", error.message));
            }
            DropOutcome::Moved { moved, .. } if !moved.is_empty() => {
                let noun = if moved.len() == 1 { "item" } else { "items" };
                self.notifier.success(&format!("Moved {} {noun}", moved.len()));
            }
            _ => {}
        }
    }
}

/// Reflect a confirmed move in the store, adopting the server's name.
fn apply_receipt(
    tree: &mut TreeStore,
    original: &FileSystemItem,
    receipt: &FileSystemItem,
    parent: Option<&ItemId>,
) {
    let id = original.id();
    if let Err(err) = tree.move_item(id, parent) {
        warn!(item_id = %id, error = %err, "Server accepted a move the store refused");
        return;
    }
    tree.update_item(
        id,
        &ItemUpdate {
            name: Some(receipt.name().to_string()),
            updated_at: Some(receipt.meta().updated_at),
            ..ItemUpdate::default()
        },
    );
}
