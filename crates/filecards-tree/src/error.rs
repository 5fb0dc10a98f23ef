//! Structural rejections raised by the tree store.

use thiserror::Error;

use filecards_core::error::AppError;
use filecards_core::types::ItemId;

/// Why the store refused a structural mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The item to operate on is not in the store.
    #[error("item {0} not found")]
    NotFound(ItemId),
    /// The move target is the item itself.
    #[error("cannot move {0} into itself")]
    SelfTarget(ItemId),
    /// The move target is a descendant of the item.
    #[error("cannot move {item} into its descendant {target}")]
    Cycle {
        /// The folder being moved.
        item: ItemId,
        /// The offending destination.
        target: ItemId,
    },
    /// The move target does not exist or is not a folder.
    #[error("{0} is not a folder")]
    InvalidTarget(ItemId),
}

impl From<TreeError> for AppError {
    fn from(err: TreeError) -> Self {
        match &err {
            TreeError::NotFound(_) => AppError::not_found(err.to_string()),
            _ => AppError::validation(err.to_string()),
        }
    }
}
