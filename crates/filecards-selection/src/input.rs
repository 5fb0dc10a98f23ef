//! Host-neutral input events.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Modifier keys held during a click or key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Control key.
    pub ctrl: bool,
    /// Command (macOS) / Super key.
    pub meta: bool,
    /// Shift key.
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
    };

    /// Only Ctrl held.
    pub const CTRL: Self = Self {
        ctrl: true,
        meta: false,
        shift: false,
    };

    /// Only Shift held.
    pub const SHIFT: Self = Self {
        ctrl: false,
        meta: false,
        shift: true,
    };

    /// Whether the platform "toggle" modifier (Cmd or Ctrl) is held.
    pub fn toggles(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A click on an item card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// When the click happened.
    pub at: Instant,
}

impl ClickEvent {
    /// A click with the given modifiers at `at`.
    pub fn new(modifiers: Modifiers, at: Instant) -> Self {
        Self { modifiers, at }
    }

    /// An unmodified click at `at`.
    pub fn plain(at: Instant) -> Self {
        Self::new(Modifiers::NONE, at)
    }
}

/// Keys the grid reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// A printable character, lowercase.
    Char(char),
    /// Delete.
    Delete,
    /// Backspace.
    Backspace,
    /// Escape.
    Escape,
    /// Anything else, by name.
    Other(String),
}

/// A key press delivered by the process-wide keyboard listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key.
    pub key: Key,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Whether focus is inside a text input, textarea, or contenteditable.
    pub in_editable: bool,
}

impl KeyEvent {
    /// A key press outside any editable control.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            in_editable: false,
        }
    }
}
