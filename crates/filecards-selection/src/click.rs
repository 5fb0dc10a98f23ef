//! Double-click detection.

use std::time::{Duration, Instant};

use filecards_core::types::ItemId;

/// What a card click resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click changed the selection.
    Selected,
    /// The click was the second of a same-item pair; the item opens.
    Opened(ItemId),
}

/// Remembers the last click so a second one on the same item can open it.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    window: Duration,
    last: Option<(ItemId, Instant)>,
}

impl ClickTracker {
    /// A tracker treating clicks strictly less than `window` apart as a double click.
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Register a click. Returns `true` when it completes a double click,
    /// in which case the tracker forgets both clicks.
    pub fn register(&mut self, id: &ItemId, at: Instant) -> bool {
        let is_double = match &self.last {
            Some((last_id, last_at)) => {
                last_id == id && at.saturating_duration_since(*last_at) < self.window
            }
            None => false,
        };

        if is_double {
            self.last = None;
        } else {
            self.last = Some((id.clone(), at));
        }
        is_double
    }

    /// Forget any pending first click.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_item_inside_window() {
        let mut tracker = ClickTracker::new(Duration::from_millis(350));
        let t0 = Instant::now();
        let id = ItemId::from("a");
        assert!(!tracker.register(&id, t0));
        assert!(tracker.register(&id, t0 + Duration::from_millis(200)));
        // a third click starts a new pair
        assert!(!tracker.register(&id, t0 + Duration::from_millis(250)));
    }

    #[test]
    fn test_window_expiry_and_other_items() {
        let mut tracker = ClickTracker::new(Duration::from_millis(350));
        let t0 = Instant::now();
        assert!(!tracker.register(&ItemId::from("a"), t0));
        assert!(!tracker.register(&ItemId::from("b"), t0 + Duration::from_millis(10)));
        assert!(!tracker.register(&ItemId::from("b"), t0 + Duration::from_millis(400)));
    }

    #[test]
    fn test_click_exactly_window_apart_is_single() {
        let mut tracker = ClickTracker::new(Duration::from_millis(350));
        let t0 = Instant::now();
        let id = ItemId::from("a");
        assert!(!tracker.register(&id, t0));
        assert!(!tracker.register(&id, t0 + Duration::from_millis(350)));
        assert!(tracker.register(&id, t0 + Duration::from_millis(699)));
    }
}
