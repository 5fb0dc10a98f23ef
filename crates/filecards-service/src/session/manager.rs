//! Owns the store, the selection, and the orchestrator for one view.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use filecards_core::AppResult;
use filecards_core::config::AppConfig;
use filecards_core::error::AppError;
use filecards_core::types::ItemId;
use filecards_dnd::{
    Collision, DragOrchestrator, DropOutcome, DuplicateResolver, MoveApi, Notifier, Point,
    PointerRelease, SensorKind, SensorSignal,
};
use filecards_entity::{FileSystemItem, ItemUpdate, RenameRequest};
use filecards_selection::{ClickEvent, ClickOutcome, KeyEvent, KeyOutcome, Modifiers, SelectionEngine};
use filecards_tree::{ItemQuery, TreeSnapshot, TreeStore};

use super::listeners::ListenerGuard;

/// A file manager view: one folder listing with its selection and drag state.
///
/// Every mutation goes through here, so the visible-item feed handed to the
/// selection engine is rebuilt whenever the tree, the folder, or the query
/// changes.
pub struct FileManager {
    /// Canonical items.
    tree: TreeStore,
    /// Selection over the visible feed.
    selection: SelectionEngine,
    /// Drag lifecycle.
    orchestrator: DragOrchestrator,
    /// Remote endpoints, shared with the orchestrator.
    api: Arc<dyn MoveApi>,
    /// Duplicate prompt, shared with the orchestrator.
    dialog: Arc<dyn DuplicateResolver>,
    /// Folder being listed (`None` = top level).
    current_folder: Option<ItemId>,
    /// Filter and sort of the listing.
    query: ItemQuery,
    /// Whether a [`ListenerGuard`] is live.
    listeners: Arc<AtomicBool>,
    /// Items opened by double click, delivered on the next frame.
    opened_tx: mpsc::UnboundedSender<ItemId>,
    opened_rx: mpsc::UnboundedReceiver<ItemId>,
}

impl std::fmt::Debug for FileManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileManager")
            .field("items", &self.tree.len())
            .field("selection", &self.selection)
            .field("orchestrator", &self.orchestrator)
            .field("current_folder", &self.current_folder)
            .finish_non_exhaustive()
    }
}

impl FileManager {
    /// Creates a session with an empty tree.
    pub fn new(
        config: &AppConfig,
        api: Arc<dyn MoveApi>,
        dialog: Arc<dyn DuplicateResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let orchestrator = DragOrchestrator::new(&config.drag, api.clone(), dialog.clone(), notifier);
        let (opened_tx, opened_rx) = mpsc::unbounded_channel();

        Self {
            tree: TreeStore::new(),
            selection: SelectionEngine::new(&config.selection),
            orchestrator,
            api,
            dialog,
            current_folder: None,
            query: ItemQuery::default(),
            listeners: Arc::new(AtomicBool::new(false)),
            opened_tx,
            opened_rx,
        }
    }

    /// The current tree.
    pub fn tree(&self) -> &TreeSnapshot {
        &self.tree
    }

    /// Watch tree snapshots as they are published.
    pub fn subscribe(&self) -> watch::Receiver<Arc<TreeSnapshot>> {
        self.tree.subscribe()
    }

    /// The selection.
    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    /// The drag orchestrator.
    pub fn orchestrator(&self) -> &DragOrchestrator {
        &self.orchestrator
    }

    /// The drag orchestrator, for droppable registration and container bounds.
    pub fn orchestrator_mut(&mut self) -> &mut DragOrchestrator {
        &mut self.orchestrator
    }

    /// Folder being listed.
    pub fn current_folder(&self) -> Option<&ItemId> {
        self.current_folder.as_ref()
    }

    /// Active filter and sort.
    pub fn query(&self) -> &ItemQuery {
        &self.query
    }

    /// Replace the tree with a freshly fetched listing.
    pub fn load(&mut self, items: impl IntoIterator<Item = FileSystemItem>) {
        self.tree.load(items);
        info!(items = self.tree.len(), "Tree loaded");
        self.refresh();
    }

    /// List `folder` (`None` = top level). Clears the selection.
    pub fn open_folder(&mut self, folder: Option<ItemId>) {
        debug!(folder = ?folder, "Opening folder");
        self.current_folder = folder;
        self.selection.clear();
        self.refresh();
    }

    /// Change the listing's filter and sort.
    pub fn set_query(&mut self, query: ItemQuery) {
        self.query = query;
        self.refresh();
    }

    /// Rebuild the visible feed and drop selected ids that left the store.
    pub fn refresh(&mut self) {
        let visible = self.tree.visible_items(self.current_folder.as_ref(), &self.query);
        let tree = &self.tree;
        self.selection.retain(|id| tree.contains(id));
        self.selection.set_visible_items(visible);
    }

    // ── listeners ────────────────────────────────────────────────

    /// Start routing background clicks and keyboard shortcuts.
    ///
    /// Fails with a conflict while another guard is live.
    pub fn attach_listeners(&self) -> AppResult<ListenerGuard> {
        self.listeners
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| AppError::conflict("Input listeners are already attached"))?;
        debug!("Input listeners attached");
        Ok(ListenerGuard::new(self.listeners.clone()))
    }

    /// Whether input listeners are attached.
    pub fn listeners_attached(&self) -> bool {
        self.listeners.load(Ordering::SeqCst)
    }

    /// A click that landed on no card. Clears the selection while listening.
    pub fn background_click(&mut self) -> bool {
        if !self.listeners_attached() {
            return false;
        }
        self.selection.clear();
        true
    }

    /// A key press from the process-wide listener.
    ///
    /// Delete/Backspace moves the selection to the trash.
    pub fn key_down(&mut self, event: &KeyEvent) -> KeyOutcome {
        if !self.listeners_attached() {
            return KeyOutcome::Ignored;
        }

        let tree = &mut self.tree;
        let outcome = self.selection.handle_key_down(
            event,
            Some(|ids: &[ItemId]| {
                let now = Utc::now();
                for id in ids {
                    tree.soft_delete(id, now);
                }
                info!(count = ids.len(), "Moved selection to trash");
            }),
        );

        if matches!(outcome, KeyOutcome::Deleted(_)) {
            self.refresh();
        }
        outcome
    }

    // ── clicks ───────────────────────────────────────────────────

    /// A click on a card.
    pub fn click_item(&mut self, id: &ItemId, event: ClickEvent) -> ClickOutcome {
        let opened = self.opened_tx.clone();
        let target = id.clone();
        self.selection.handle_item_click(
            id,
            event,
            Some(move || {
                // the receiver lives as long as the session
                let _ = opened.send(target);
            }),
        )
    }

    /// Run work deferred to the next frame.
    ///
    /// Returns the item opened by a double click, if any. Opening a folder
    /// navigates into it; documents are left to the host.
    pub fn next_frame(&mut self) -> Option<ItemId> {
        self.selection.run_deferred();

        let mut last = None;
        while let Ok(id) = self.opened_rx.try_recv() {
            last = Some(id);
        }

        let opened = last?;
        if self.tree.is_folder(&opened) {
            self.open_folder(Some(opened.clone()));
        }
        Some(opened)
    }

    // ── drag and drop ────────────────────────────────────────────

    /// Start a drag of `id` directly, bypassing the sensor.
    pub fn begin_drag(&mut self, id: &ItemId, at: Point) -> bool {
        self.selection.reset_click();
        self.orchestrator.drag_start(&self.tree, &self.selection, id, at)
    }

    /// A press on a card.
    pub fn pointer_down(&mut self, kind: SensorKind, id: ItemId, at: Point, now: Instant) -> SensorSignal {
        self.orchestrator.pointer_down(kind, id, at, now)
    }

    /// Pointer movement.
    pub fn pointer_move(&mut self, at: Point, now: Instant) -> SensorSignal {
        let signal = self.orchestrator.pointer_move(&self.tree, &self.selection, at, now);
        if matches!(signal, SensorSignal::Activated { .. }) {
            self.selection.reset_click();
        }
        signal
    }

    /// Timer tick while a press is held.
    pub fn tick(&mut self, now: Instant) -> SensorSignal {
        let signal = self.orchestrator.tick(&self.tree, &self.selection, now);
        if matches!(signal, SensorSignal::Activated { .. }) {
            self.selection.reset_click();
        }
        signal
    }

    /// Pointer release. A press that never became a drag is a click.
    pub async fn pointer_up(&mut self, at: Point, modifiers: Modifiers, now: Instant) -> PointerRelease {
        let release = self
            .orchestrator
            .pointer_up(&mut self.tree, &mut self.selection, at, now)
            .await;

        match &release {
            PointerRelease::Click(id) => {
                self.click_item(id, ClickEvent::new(modifiers, now));
            }
            PointerRelease::Dropped(outcome) if outcome.executed() => self.refresh(),
            _ => {}
        }
        release
    }

    /// Drop the current drag onto `over`.
    pub async fn drop_on(&mut self, over: Option<&Collision>) -> DropOutcome {
        let outcome = self
            .orchestrator
            .drag_end(&mut self.tree, &mut self.selection, over)
            .await;
        if outcome.executed() {
            self.refresh();
        }
        outcome
    }

    // ── item operations ──────────────────────────────────────────

    /// Rename an item through the API, prompting on a name collision.
    pub async fn rename(&mut self, id: &ItemId, name: &str) -> AppResult<()> {
        let item = self
            .tree
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;

        let mut request = RenameRequest {
            name: name.to_string(),
            duplicate_action: None,
        };

        let receipt = loop {
            let attempt = match &item {
                FileSystemItem::Folder(_) => self.api.rename_folder(id, &request).await,
                FileSystemItem::Document(_) => self.api.rename_file(id, &request).await,
            };
            match attempt {
                Ok(receipt) => break receipt,
                Err(err) if err.is_conflict() => {
                    warn!(item_id = %id, new_name = name, "Name collision on rename");
                    let choice = self.dialog.resolve_duplicate(name, item.kind()).await;
                    self.dialog.close();
                    let action = choice.map_err(|_| AppError::cancelled("Rename cancelled"))?;
                    request.duplicate_action = Some(action);
                }
                Err(err) => return Err(err),
            }
        };

        self.tree.update_item(
            id,
            &ItemUpdate {
                name: Some(receipt.name().to_string()),
                updated_at: Some(receipt.meta().updated_at),
                ..ItemUpdate::default()
            },
        );
        info!(item_id = %id, name = receipt.name(), "Item renamed");
        self.refresh();
        Ok(())
    }

    /// Move items to the trash.
    pub fn trash(&mut self, ids: &[ItemId]) -> usize {
        let now = Utc::now();
        let count = ids.iter().filter(|id| self.tree.soft_delete(id, now)).count();
        self.refresh();
        count
    }

    /// Bring an item back from the trash.
    pub fn restore(&mut self, id: &ItemId) -> bool {
        let restored = self.tree.restore(id);
        self.refresh();
        restored
    }
}
