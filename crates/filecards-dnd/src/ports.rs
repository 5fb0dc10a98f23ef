//! Services the orchestrator consumes.

use async_trait::async_trait;
use thiserror::Error;

use filecards_core::AppResult;
use filecards_core::types::ItemId;
use filecards_entity::{
    DuplicateAction, FileSystemItem, ItemKind, MoveFileRequest, MoveFolderRequest, RenameRequest,
};

/// Remote move and rename endpoints.
///
/// A name collision at the destination must surface as an error whose
/// kind is `Conflict`; any other failure is fatal for a batch.
#[async_trait]
pub trait MoveApi: Send + Sync {
    /// Move a folder; returns the server's updated record.
    async fn move_folder(&self, id: &ItemId, request: &MoveFolderRequest) -> AppResult<FileSystemItem>;

    /// Move a document; returns the server's updated record.
    async fn move_file(&self, id: &ItemId, request: &MoveFileRequest) -> AppResult<FileSystemItem>;

    /// Rename a folder in place.
    async fn rename_folder(&self, id: &ItemId, request: &RenameRequest) -> AppResult<FileSystemItem>;

    /// Rename a document in place.
    async fn rename_file(&self, id: &ItemId, request: &RenameRequest) -> AppResult<FileSystemItem>;
}

/// The user dismissed the duplicate dialog without choosing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("duplicate dialog cancelled")]
pub struct DialogCancelled;

/// Asks the user how to resolve a name collision.
#[async_trait]
pub trait DuplicateResolver: Send + Sync {
    /// Wait for the user's choice for the item `name` of `kind`.
    ///
    /// There is no timeout; the call resolves when the user answers or the
    /// dialog goes away.
    async fn resolve_duplicate(&self, name: &str, kind: ItemKind) -> Result<DuplicateAction, DialogCancelled>;

    /// Close the dialog once a choice has been consumed.
    fn close(&self) {}
}

/// Toast surface.
pub trait Notifier: Send + Sync {
    /// Report a completed batch.
    fn success(&self, message: &str);

    /// Report an aborting failure.
    fn error(&self, message: &str);
}
