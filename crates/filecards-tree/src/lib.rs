//! # filecards-tree
//!
//! The canonical in-memory model of the file-system tree. [`TreeStore`]
//! owns every [`FileSystemItem`](filecards_entity::FileSystemItem) by id,
//! keeps per-parent child ordering and the denormalized child counts, and
//! refuses moves that would make a folder its own ancestor.
//!
//! Readers never borrow the store across an await point. They subscribe to
//! published [`TreeSnapshot`]s instead, which are immutable and share item
//! records with the live store.

pub mod error;
pub mod snapshot;
pub mod store;
pub mod view;

pub use error::TreeError;
pub use snapshot::TreeSnapshot;
pub use store::TreeStore;
pub use view::ItemQuery;
