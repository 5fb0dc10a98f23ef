//! Toasts as log events.

use tracing::{error, info};

use filecards_dnd::Notifier;

/// [`Notifier`] that logs instead of rendering toasts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(toast = "success", "{message}");
    }

    fn error(&self, message: &str) {
        error!(toast = "error", "{message}");
    }
}
