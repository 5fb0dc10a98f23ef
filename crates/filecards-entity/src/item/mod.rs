//! File-system item entities.

pub mod color;
pub mod model;
pub mod update;

pub use color::FolderColor;
pub use model::{Document, FileSystemItem, Folder, ItemKind, ItemMeta};
pub use update::ItemUpdate;
