//! Shared types used across all FileCards crates.

pub mod filter;
pub mod id;
pub mod sorting;

pub use filter::{ItemFilter, KindFilter};
pub use id::ItemId;
pub use sorting::{SortDirection, SortKey, SortSpec};
