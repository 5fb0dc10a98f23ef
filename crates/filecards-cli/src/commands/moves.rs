//! Batch move through the remote API.

use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::output::{self, OutputFormat};
use crate::prompt::{ConsoleNotifier, TerminalResolver};
use filecards_core::config::AppConfig;
use filecards_core::error::AppError;
use filecards_core::types::ItemId;
use filecards_dnd::{Collision, DroppableId, DropOutcome, Point};
use filecards_selection::{ClickEvent, Modifiers};
use filecards_service::{FileManager, HttpMoveApi};

/// Arguments for the move command
#[derive(Debug, Args)]
pub struct MoveArgs {
    /// JSON file holding an array of items
    #[arg(short, long)]
    pub snapshot: String,
    /// Destination folder id (the configured root id moves to the top level)
    #[arg(short, long)]
    pub target: String,
    /// Items to move; the batch runs in the folder listing order, unlisted ids last
    #[arg(required = true)]
    pub ids: Vec<String>,
    /// Write the updated snapshot here
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Batch result for display
#[derive(Debug, Serialize)]
struct MoveSummary {
    /// Moved ids, in order
    moved: Vec<ItemId>,
    /// Ids skipped at the duplicate prompt
    skipped: Vec<ItemId>,
    /// Id whose move failed
    failed: Option<ItemId>,
    /// Failure message
    error: Option<String>,
}

/// Execute the move command
pub async fn execute(args: &MoveArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let api = Arc::new(HttpMoveApi::new(&config.api)?);
    let mut manager = FileManager::new(config, api, Arc::new(TerminalResolver), Arc::new(ConsoleNotifier));
    manager.load(super::read_snapshot(&args.snapshot).await?);

    let mut ids: Vec<ItemId> = Vec::new();
    for raw in &args.ids {
        let id = ItemId::from(raw.as_str());
        if manager.tree().get(&id).is_none() {
            return Err(AppError::not_found(format!("Item {id} not found")));
        }
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    let now = Instant::now();
    for (i, id) in ids.iter().enumerate() {
        let modifiers = if i == 0 { Modifiers::NONE } else { Modifiers::CTRL };
        manager.click_item(id, ClickEvent::new(modifiers, now));
    }

    let Some(first) = ids.first() else {
        return Err(AppError::validation("No items to move"));
    };
    if !manager.begin_drag(first, Point::default()) {
        return Err(AppError::internal("Failed to start the move"));
    }

    let target = Collision::new(DroppableId::parse(&args.target));
    let outcome = manager.drop_on(Some(&target)).await;

    let summary = match outcome {
        DropOutcome::Rejected(reason) => {
            return Err(AppError::validation(format!("Move rejected: {reason}")));
        }
        DropOutcome::Cancelled => {
            output::print_warning("Move cancelled");
            return Ok(());
        }
        DropOutcome::Moved { moved, skipped } => MoveSummary {
            moved,
            skipped,
            failed: None,
            error: None,
        },
        DropOutcome::Partial {
            moved,
            skipped,
            failed,
            error,
        } => MoveSummary {
            moved,
            skipped,
            failed: Some(failed),
            error: Some(error.message),
        },
    };

    info!(
        moved = summary.moved.len(),
        skipped = summary.skipped.len(),
        failed = summary.failed.as_ref().map(ItemId::as_str),
        destination = %args.target,
        "Move batch finished"
    );

    if !summary.skipped.is_empty() {
        output::print_warning(&format!("Skipped {} item(s)", summary.skipped.len()));
    }
    output::print_record(&summary, format);

    if let Some(path) = &args.output {
        let items: Vec<_> = manager.tree().iter().collect();
        super::write_snapshot(path, &items).await?;
        output::print_success(&format!("Snapshot written to '{}'", path));
    }

    Ok(())
}
