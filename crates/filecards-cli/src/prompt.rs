//! Terminal adapters for the orchestrator's dialog and toast ports.

use async_trait::async_trait;

use filecards_dnd::{DialogCancelled, DuplicateResolver, Notifier};
use filecards_entity::{DuplicateAction, ItemKind};

use crate::output;

/// Asks on the terminal how to resolve a name collision.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalResolver;

#[async_trait]
impl DuplicateResolver for TerminalResolver {
    async fn resolve_duplicate(&self, name: &str, kind: ItemKind) -> Result<DuplicateAction, DialogCancelled> {
        let prompt = format!("A {kind} named \"{name}\" already exists at the destination");

        let choice = tokio::task::spawn_blocking(move || {
            dialoguer::Select::new()
                .with_prompt(prompt)
                .items(&["Replace", "Keep both", "Skip"])
                .default(1)
                .interact_opt()
        })
        .await
        .map_err(|_| DialogCancelled)?
        .map_err(|_| DialogCancelled)?;

        match choice {
            Some(0) => Ok(DuplicateAction::Replace),
            Some(1) => Ok(DuplicateAction::KeepBoth),
            _ => Err(DialogCancelled),
        }
    }
}

/// Prints toasts to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        output::print_success(message);
    }

    fn error(&self, message: &str) {
        output::print_error(message);
    }
}
