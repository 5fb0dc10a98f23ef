//! # filecards-service
//!
//! Host-side wiring for FileCards. The [`FileManager`] session owns the
//! tree store, the selection engine, and the drag orchestrator, and routes
//! host input to them. The adapters implement the orchestrator's ports:
//! [`HttpMoveApi`] talks to the remote storage API, [`ChannelDuplicateResolver`]
//! bridges duplicate prompts to whatever UI the host runs, and
//! [`TracingNotifier`] turns toasts into log events.
//!
//! Adapters follow constructor injection: everything is supplied at
//! construction time via `Arc` references.

pub mod client;
pub mod dialog;
pub mod notify;
pub mod session;

pub use client::HttpMoveApi;
pub use dialog::{ChannelDuplicateResolver, DuplicatePrompt};
pub use notify::TracingNotifier;
pub use session::{FileManager, ListenerGuard};
