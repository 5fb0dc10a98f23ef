//! Scoped subscription for process-wide input listeners.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

/// Keeps background-click and keyboard routing alive.
///
/// Routing stops when the guard is dropped.
#[derive(Debug)]
pub struct ListenerGuard {
    attached: Arc<AtomicBool>,
}

impl ListenerGuard {
    pub(crate) fn new(attached: Arc<AtomicBool>) -> Self {
        Self { attached }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.attached.store(false, Ordering::SeqCst);
        debug!("Input listeners detached");
    }
}
