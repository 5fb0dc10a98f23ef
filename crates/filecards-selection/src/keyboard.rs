//! Grid keyboard shortcuts.

use tracing::debug;

use filecards_core::types::ItemId;

use crate::engine::SelectionEngine;
use crate::input::{Key, KeyEvent};

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key was not a grid shortcut, or focus was in an editable control.
    Ignored,
    /// Cmd/Ctrl+A selected the visible feed.
    SelectedAll,
    /// Delete/Backspace handed these ids to the delete handler.
    Deleted(Vec<ItemId>),
    /// Escape cleared the selection.
    Cleared,
}

impl SelectionEngine {
    /// Route a key press from the process-wide listener.
    ///
    /// Returns [`KeyOutcome::Ignored`] while focus is in an editable
    /// control, so text editing keeps its native shortcuts.
    pub fn handle_key_down<F>(&mut self, event: &KeyEvent, on_delete: Option<F>) -> KeyOutcome
    where
        F: FnOnce(&[ItemId]),
    {
        if event.in_editable {
            return KeyOutcome::Ignored;
        }

        match &event.key {
            Key::Char(c) if event.modifiers.toggles() && c.eq_ignore_ascii_case(&'a') => {
                self.select_all();
                debug!(count = self.len(), "Selected all visible items");
                KeyOutcome::SelectedAll
            }
            Key::Delete | Key::Backspace if !self.is_empty() => {
                KeyOutcome::Deleted(self.delete_selected(on_delete))
            }
            Key::Escape => {
                self.clear();
                KeyOutcome::Cleared
            }
            _ => KeyOutcome::Ignored,
        }
    }
}
