//! # filecards-selection
//!
//! Selection state for the card grid: a set of selected ids, an anchor for
//! Shift-range selection, click timing for telling "select" from "open",
//! and the grid's keyboard shortcuts.
//!
//! The engine never owns items. It only knows ids and the ordered
//! visible-item feed the host supplies whenever sorting or filtering
//! changes.

pub mod click;
pub mod engine;
pub mod input;
pub mod keyboard;

pub use click::{ClickOutcome, ClickTracker};
pub use engine::{SelectionEngine, SelectionSnapshot};
pub use input::{ClickEvent, Key, KeyEvent, Modifiers};
pub use keyboard::KeyOutcome;
