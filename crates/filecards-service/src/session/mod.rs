//! The file manager session.

pub mod listeners;
pub mod manager;

pub use listeners::ListenerGuard;
pub use manager::FileManager;
