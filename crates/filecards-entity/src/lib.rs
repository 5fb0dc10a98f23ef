//! # filecards-entity
//!
//! Domain entity models for FileCards. The file-system tree is made of
//! [`FileSystemItem`]s, a sum type over folders and documents sharing a
//! common [`ItemMeta`] envelope. All entities derive `Debug`, `Clone`,
//! `Serialize`, and `Deserialize` and use the backend's camelCase JSON
//! field names.

pub mod item;
pub mod request;

pub use item::{
    Document, FileSystemItem, Folder, FolderColor, ItemKind, ItemMeta, ItemUpdate,
};
pub use request::{DuplicateAction, MoveFileRequest, MoveFolderRequest, RenameRequest};
