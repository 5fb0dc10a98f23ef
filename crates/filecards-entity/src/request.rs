//! Payloads for the remote move/rename endpoints.

use serde::{Deserialize, Serialize};

use filecards_core::types::ItemId;

/// How the server resolves a name collision at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicateAction {
    /// Overwrite the existing item.
    Replace,
    /// Keep both; the server assigns the moved item a fresh name.
    KeepBoth,
}

/// Request to move a folder under a new parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFolderRequest {
    /// New parent folder (`None` = top level).
    pub parent: Option<ItemId>,
    /// Current folder name.
    pub name: String,
    /// Collision strategy, only sent when retrying after a 409.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_action: Option<DuplicateAction>,
}

/// Request to move a document into a new folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFileRequest {
    /// New containing folder (`None` = top level).
    pub folder: Option<ItemId>,
    /// Current document name.
    pub name: String,
    /// Collision strategy, only sent when retrying after a 409.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_action: Option<DuplicateAction>,
}

/// Request to rename a folder or document in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    /// New name.
    pub name: String,
    /// Collision strategy, only sent when retrying after a 409.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_action: Option<DuplicateAction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_attempt_omits_duplicate_action() {
        let req = MoveFolderRequest {
            parent: None,
            name: "Docs".to_string(),
            duplicate_action: None,
        };
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json, serde_json::json!({ "parent": null, "name": "Docs" }));
    }

    #[test]
    fn test_retry_carries_keep_both() {
        let req = MoveFileRequest {
            folder: Some(ItemId::new("f1")),
            name: "a.txt".to_string(),
            duplicate_action: Some(DuplicateAction::KeepBoth),
        };
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json["duplicateAction"], "keepBoth");
        assert_eq!(json["folder"], "f1");
    }
}
