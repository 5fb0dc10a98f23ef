//! `reqwest`-backed move and rename client.
//!
//! Folders live under `{base_url}/folders/{id}` and documents under
//! `{base_url}/files/{id}`; both are updated with `PATCH`. A `409` comes
//! back as a conflict error so the move protocol can prompt the user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use filecards_core::AppResult;
use filecards_core::config::api::ApiConfig;
use filecards_core::error::{AppError, ErrorKind};
use filecards_core::types::ItemId;
use filecards_dnd::MoveApi;
use filecards_entity::{FileSystemItem, ItemKind, MoveFileRequest, MoveFolderRequest, RenameRequest};

/// HTTP implementation of [`MoveApi`].
#[derive(Debug, Clone)]
pub struct HttpMoveApi {
    /// Shared connection pool.
    client: Client,
    /// API root without a trailing slash.
    base_url: String,
    /// Bearer token sent with every request.
    token: Option<String>,
}

impl HttpMoveApi {
    /// Build a client from config.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Resource URL for an item of `kind`.
    pub fn endpoint(&self, kind: ItemKind, id: &ItemId) -> String {
        let collection = match kind {
            ItemKind::Folder => "folders",
            ItemKind::File => "files",
        };
        format!("{}/{collection}/{id}", self.base_url)
    }

    async fn patch<B: Serialize + Sync>(&self, url: String, body: &B) -> AppResult<FileSystemItem> {
        debug!(url = %url, "PATCH");

        let mut request = self.client.patch(&url).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, format!("Request to {url} failed"), e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let message = if detail.is_empty() {
                format!("{url} returned {status}")
            } else {
                format!("{url} returned {status}: {detail}")
            };
            return Err(AppError::from_status(status.as_u16(), message));
        }

        response.json::<FileSystemItem>().await.map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, format!("Invalid item returned by {url}"), e)
        })
    }
}

#[async_trait]
impl MoveApi for HttpMoveApi {
    async fn move_folder(&self, id: &ItemId, request: &MoveFolderRequest) -> AppResult<FileSystemItem> {
        self.patch(self.endpoint(ItemKind::Folder, id), request).await
    }

    async fn move_file(&self, id: &ItemId, request: &MoveFileRequest) -> AppResult<FileSystemItem> {
        self.patch(self.endpoint(ItemKind::File, id), request).await
    }

    async fn rename_folder(&self, id: &ItemId, request: &RenameRequest) -> AppResult<FileSystemItem> {
        self.patch(self.endpoint(ItemKind::Folder, id), request).await
    }

    async fn rename_file(&self, id: &ItemId, request: &RenameRequest) -> AppResult<FileSystemItem> {
        self.patch(self.endpoint(ItemKind::File, id), request).await
    }
}
