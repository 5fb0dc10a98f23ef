//! The selection state machine.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tracing::{debug, info};

use filecards_core::config::selection::SelectionConfig;
use filecards_core::types::ItemId;

use crate::click::{ClickOutcome, ClickTracker};
use crate::input::{ClickEvent, Modifiers};

type Deferred = Box<dyn FnOnce() + Send>;

/// Read-only copy of the selection for renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    /// Selected ids in visible order; selected ids no longer visible trail.
    pub selected: Vec<ItemId>,
    /// Range pivot.
    pub anchor: Option<ItemId>,
    /// Most recent focus.
    pub last_selected: Option<ItemId>,
}

/// Multi-item selection over the visible-item feed.
pub struct SelectionEngine {
    selected: HashSet<ItemId>,
    anchor: Option<ItemId>,
    last_selected: Option<ItemId>,
    visible: Vec<ItemId>,
    positions: HashMap<ItemId, usize>,
    /// Set by a Shift-click; keeps the range tracking `last_selected` and the feed.
    range_active: bool,
    clicks: ClickTracker,
    max_range: usize,
    deferred: Vec<Deferred>,
}

impl std::fmt::Debug for SelectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("selected", &self.selected)
            .field("anchor", &self.anchor)
            .field("last_selected", &self.last_selected)
            .field("visible", &self.visible.len())
            .field("range_active", &self.range_active)
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new(&SelectionConfig::default())
    }
}

impl SelectionEngine {
    /// Create an empty selection.
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            selected: HashSet::new(),
            anchor: None,
            last_selected: None,
            visible: Vec::new(),
            positions: HashMap::new(),
            range_active: false,
            clicks: ClickTracker::new(Duration::from_millis(config.double_click_ms)),
            max_range: config.max_range_items.max(1),
            deferred: Vec::new(),
        }
    }

    // ── queries ──────────────────────────────────────────────────

    /// Whether `id` is selected.
    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selected.contains(id)
    }

    /// The selected set.
    pub fn selected(&self) -> &HashSet<ItemId> {
        &self.selected
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Range pivot.
    pub fn anchor(&self) -> Option<&ItemId> {
        self.anchor.as_ref()
    }

    /// Most recent focus.
    pub fn last_selected(&self) -> Option<&ItemId> {
        self.last_selected.as_ref()
    }

    /// The current visible-item feed.
    pub fn visible_items(&self) -> &[ItemId] {
        &self.visible
    }

    /// Selected ids in visible order, then any selected ids not visible.
    pub fn selected_ordered(&self) -> Vec<ItemId> {
        let mut ordered: Vec<ItemId> = self
            .visible
            .iter()
            .filter(|id| self.selected.contains(*id))
            .cloned()
            .collect();
        let mut hidden: Vec<ItemId> = self
            .selected
            .iter()
            .filter(|id| !self.positions.contains_key(*id))
            .cloned()
            .collect();
        hidden.sort();
        ordered.extend(hidden);
        ordered
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            selected: self.selected_ordered(),
            anchor: self.anchor.clone(),
            last_selected: self.last_selected.clone(),
        }
    }

    // ── feed ─────────────────────────────────────────────────────

    /// Replace the visible-item feed after a sort/filter/navigation change.
    pub fn set_visible_items(&mut self, items: Vec<ItemId>) {
        self.visible = items;
        self.rebuild_positions();
        if self.range_active {
            self.select_range();
        }
    }

    fn rebuild_positions(&mut self) {
        self.positions = self
            .visible
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();
    }

    /// Index of `id` in the feed, repairing the memo if it went stale.
    fn position_of(&mut self, id: &ItemId) -> Option<usize> {
        if let Some(&idx) = self.positions.get(id) {
            if self.visible.get(idx) == Some(id) {
                return Some(idx);
            }
        }
        let idx = self.visible.iter().position(|candidate| candidate == id)?;
        self.rebuild_positions();
        Some(idx)
    }

    // ── mutations ────────────────────────────────────────────────

    /// Apply a click-style selection of `id` under `modifiers`.
    pub fn select(&mut self, id: &ItemId, modifiers: Modifiers) {
        if modifiers.toggles() {
            self.toggle(id);
        } else if modifiers.shift && self.anchor.is_some() {
            self.last_selected = Some(id.clone());
            self.range_active = true;
            self.select_range();
        } else {
            self.range_active = false;
            self.selected.clear();
            self.selected.insert(id.clone());
            self.anchor = Some(id.clone());
            self.last_selected = Some(id.clone());
        }
    }

    /// Select the closed interval between the anchor and `last_selected`.
    ///
    /// No-op (returns `false`) when either end is not in the visible feed.
    /// Spans longer than the configured maximum are cut at the far end.
    pub fn select_range(&mut self) -> bool {
        let (Some(anchor), Some(target)) = (self.anchor.clone(), self.last_selected.clone()) else {
            return false;
        };
        let (Some(anchor_idx), Some(target_idx)) =
            (self.position_of(&anchor), self.position_of(&target))
        else {
            debug!(anchor = %anchor, end = %target, "Range ends not visible");
            return false;
        };

        let reach = self.max_range - 1;
        let (start, end) = if target_idx >= anchor_idx {
            (anchor_idx, target_idx.min(anchor_idx + reach))
        } else {
            (target_idx.max(anchor_idx.saturating_sub(reach)), anchor_idx)
        };

        self.selected = self.visible[start..=end].iter().cloned().collect();
        true
    }

    /// Flip membership of `id` and make it the new pivot.
    pub fn toggle(&mut self, id: &ItemId) {
        self.range_active = false;
        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
        self.anchor = Some(id.clone());
        self.last_selected = Some(id.clone());
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.range_active = false;
        self.selected.clear();
        self.last_selected = None;
    }

    /// Select every id in the visible feed.
    pub fn select_all(&mut self) {
        self.range_active = false;
        self.selected = self.visible.iter().cloned().collect();
        self.anchor = self.visible.first().cloned();
        self.last_selected = self.visible.last().cloned();
    }

    /// Drop selected ids for which `keep` returns `false` (e.g. items that left the store).
    pub fn retain(&mut self, mut keep: impl FnMut(&ItemId) -> bool) {
        self.selected.retain(|id| keep(id));
        if self.anchor.as_ref().is_some_and(|id| !keep(id)) {
            self.anchor = None;
        }
        if self.last_selected.as_ref().is_some_and(|id| !keep(id)) {
            self.last_selected = None;
        }
    }

    /// Hand the selection to `on_delete`, then clear it.
    ///
    /// Returns the ids that were handed over.
    pub fn delete_selected<F>(&mut self, on_delete: Option<F>) -> Vec<ItemId>
    where
        F: FnOnce(&[ItemId]),
    {
        let ids = self.selected_ordered();
        match on_delete {
            Some(handler) => handler(&ids),
            None => info!(count = ids.len(), ids = ?ids, "Delete requested with no handler"),
        }
        self.clear();
        ids
    }

    // ── clicks ───────────────────────────────────────────────────

    /// Handle a click on a card, telling a selection click from an open.
    ///
    /// A second click on the same id within the double-click window opens
    /// the item instead of changing the selection; `on_open` runs on the
    /// next [`Self::run_deferred`] so the host can let layout settle first.
    pub fn handle_item_click<F>(
        &mut self,
        id: &ItemId,
        event: ClickEvent,
        on_open: Option<F>,
    ) -> ClickOutcome
    where
        F: FnOnce() + Send + 'static,
    {
        if self.clicks.register(id, event.at) {
            debug!(item_id = %id, "Double click");
            if let Some(open) = on_open {
                self.deferred.push(Box::new(open));
            }
            return ClickOutcome::Opened(id.clone());
        }

        self.select(id, event.modifiers);
        ClickOutcome::Selected
    }

    /// Forget a pending first click (e.g. when a drag starts from it).
    pub fn reset_click(&mut self) {
        self.clicks.reset();
    }

    /// Run callbacks deferred to the next frame. Returns how many ran.
    pub fn run_deferred(&mut self) -> usize {
        let pending = std::mem::take(&mut self.deferred);
        let count = pending.len();
        for callback in pending {
            callback();
        }
        count
    }
}
