//! The serialized move protocol.
//!
//! Items move strictly one after another. A 409 pauses the batch on the
//! current item until the user picks a duplicate action, then the same item
//! is retried with it. Any other failure ends the batch; items already
//! moved stay moved.

use tracing::{debug, info, warn};

use filecards_core::AppResult;
use filecards_core::error::AppError;
use filecards_core::types::ItemId;
use filecards_entity::{DuplicateAction, FileSystemItem, MoveFileRequest, MoveFolderRequest};

use crate::ports::{DuplicateResolver, MoveApi};

/// The item that stopped a batch and why.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// Item whose move failed.
    pub item: ItemId,
    /// The failure.
    pub error: AppError,
}

/// Result of running a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Moved ids, in order.
    pub moved: Vec<ItemId>,
    /// Ids whose duplicate prompt was dismissed.
    pub skipped: Vec<ItemId>,
    /// Set when a hard failure ended the batch.
    pub failure: Option<BatchFailure>,
}

/// A batch of moves to one destination.
pub struct MoveBatch<'a> {
    api: &'a dyn MoveApi,
    dialog: &'a dyn DuplicateResolver,
}

impl<'a> MoveBatch<'a> {
    /// Bind the batch to its services.
    pub fn new(api: &'a dyn MoveApi, dialog: &'a dyn DuplicateResolver) -> Self {
        Self { api, dialog }
    }

    /// Move `items` under `parent` (`None` = top level), one at a time.
    ///
    /// `on_moved` runs after each confirmed move with the original record
    /// and the server's receipt.
    pub async fn execute<F>(&self, items: &[FileSystemItem], parent: Option<&ItemId>, mut on_moved: F) -> BatchReport
    where
        F: FnMut(&FileSystemItem, &FileSystemItem),
    {
        let mut report = BatchReport::default();

        for item in items {
            let mut action = None;
            loop {
                match self.move_one(item, parent, action).await {
                    Ok(receipt) => {
                        debug!(item_id = %item.id(), ?action, "Item moved");
                        on_moved(item, &receipt);
                        report.moved.push(item.id().clone());
                        break;
                    }
                    Err(err) if err.is_conflict() => {
                        warn!(item_id = %item.id(), name = item.name(), "Name collision at destination");
                        let choice = self.dialog.resolve_duplicate(item.name(), item.kind()).await;
                        self.dialog.close();
                        match choice {
                            Ok(chosen) => action = Some(chosen),
                            Err(_) => {
                                info!(item_id = %item.id(), "Duplicate prompt dismissed, skipping item");
                                report.skipped.push(item.id().clone());
                                break;
                            }
                        }
                    }
                    Err(error) => {
                        warn!(item_id = %item.id(), error = %error, "Move failed, aborting batch");
                        report.failure = Some(BatchFailure {
                            item: item.id().clone(),
                            error,
                        });
                        return report;
                    }
                }
            }
        }

        report
    }

    async fn move_one(
        &self,
        item: &FileSystemItem,
        parent: Option<&ItemId>,
        duplicate_action: Option<DuplicateAction>,
    ) -> AppResult<FileSystemItem> {
        match item {
            FileSystemItem::Folder(folder) => {
                let request = MoveFolderRequest {
                    parent: parent.cloned(),
                    name: folder.meta.name.clone(),
                    duplicate_action,
                };
                self.api.move_folder(&folder.meta.id, &request).await
            }
            FileSystemItem::Document(document) => {
                let request = MoveFileRequest {
                    folder: parent.cloned(),
                    name: document.meta.name.clone(),
                    duplicate_action,
                };
                self.api.move_file(&document.meta.id, &request).await
            }
        }
    }
}
