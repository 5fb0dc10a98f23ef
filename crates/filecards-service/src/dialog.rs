//! Channel bridge for the duplicate dialog.
//!
//! The move protocol awaits [`DuplicateResolver::resolve_duplicate`]; this
//! adapter forwards each request as a [`DuplicatePrompt`] to whoever owns
//! the receiving end (a UI task, a terminal prompt) and awaits the answer
//! on a oneshot. Dropping a prompt without answering cancels it.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use filecards_dnd::{DialogCancelled, DuplicateResolver};
use filecards_entity::{DuplicateAction, ItemKind};

/// A pending question for the user.
#[derive(Debug)]
pub struct DuplicatePrompt {
    /// Name of the item that collided.
    pub name: String,
    /// Its kind, for labelling.
    pub kind: ItemKind,
    /// Where the answer goes.
    responder: oneshot::Sender<DuplicateAction>,
}

impl DuplicatePrompt {
    /// Answer the prompt.
    pub fn respond(self, action: DuplicateAction) {
        // the batch may have been dropped meanwhile; nothing to do then
        let _ = self.responder.send(action);
    }

    /// Dismiss the prompt without choosing.
    pub fn dismiss(self) {}
}

/// [`DuplicateResolver`] that forwards prompts over a channel.
#[derive(Debug)]
pub struct ChannelDuplicateResolver {
    prompts: mpsc::Sender<DuplicatePrompt>,
    open: AtomicBool,
}

impl ChannelDuplicateResolver {
    /// Create the resolver and the receiving end for the UI.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<DuplicatePrompt>) {
        let (prompts, rx) = mpsc::channel(buffer.max(1));
        (
            Self {
                prompts,
                open: AtomicBool::new(false),
            },
            rx,
        )
    }

    /// Whether a prompt is currently on screen.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DuplicateResolver for ChannelDuplicateResolver {
    async fn resolve_duplicate(&self, name: &str, kind: ItemKind) -> Result<DuplicateAction, DialogCancelled> {
        let (responder, answer) = oneshot::channel();
        let prompt = DuplicatePrompt {
            name: name.to_string(),
            kind,
            responder,
        };

        self.open.store(true, Ordering::SeqCst);
        if self.prompts.send(prompt).await.is_err() {
            debug!(item_name = name, "Duplicate prompt receiver gone");
            self.open.store(false, Ordering::SeqCst);
            return Err(DialogCancelled);
        }

        answer.await.map_err(|_| DialogCancelled)
    }

    fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answer_reaches_the_caller() {
        let (resolver, mut rx) = ChannelDuplicateResolver::channel(1);
        let ui = tokio::spawn(async move {
            let prompt = rx.recv().await.unwrap();
            assert_eq!(prompt.name, "report.pdf");
            assert_eq!(prompt.kind, ItemKind::File);
            prompt.respond(DuplicateAction::Replace);
        });

        let answer = resolver.resolve_duplicate("report.pdf", ItemKind::File).await;
        assert_eq!(answer, Ok(DuplicateAction::Replace));
        assert!(resolver.is_open());
        resolver.close();
        assert!(!resolver.is_open());
        ui.await.unwrap();
    }

    #[tokio::test]
    async fn test_dismissed_prompt_cancels() {
        let (resolver, mut rx) = ChannelDuplicateResolver::channel(1);
        tokio::spawn(async move {
            if let Some(prompt) = rx.recv().await {
                prompt.dismiss();
            }
        });
        assert_eq!(
            resolver.resolve_duplicate("A", ItemKind::Folder).await,
            Err(DialogCancelled)
        );
    }

    #[tokio::test]
    async fn test_closed_receiver_cancels() {
        let (resolver, rx) = ChannelDuplicateResolver::channel(1);
        drop(rx);
        assert_eq!(
            resolver.resolve_duplicate("A", ItemKind::Folder).await,
            Err(DialogCancelled)
        );
        assert!(!resolver.is_open());
    }
}
