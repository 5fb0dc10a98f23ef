//! Drag lifecycle state.

use serde::{Deserialize, Serialize};

use filecards_core::error::AppError;
use filecards_core::types::ItemId;
use filecards_entity::{FileSystemItem, ItemKind};

use crate::collision::Collision;
use crate::geometry::Point;
use crate::protocol::BatchReport;
use crate::target::DropRejection;

/// Coarse drag phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragPhase {
    /// No drag in progress.
    #[default]
    Idle,
    /// A drag is in progress.
    Dragging,
}

/// How the dragged card is rendered in the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardVariant {
    /// Grid tile.
    #[default]
    Grid,
    /// List row.
    List,
}

/// Descriptor of the item under the pointer when the drag started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDescriptor {
    /// Dragged item.
    pub item: ItemId,
    /// Its kind.
    pub kind: ItemKind,
    /// Overlay variant.
    pub variant: CardVariant,
}

/// Everything a renderer needs to draw drag affordances.
#[derive(Debug, Clone, Default)]
pub struct DragState {
    /// Current phase.
    pub phase: DragPhase,
    /// The pressed item.
    pub active: Option<ActiveDescriptor>,
    /// Items that will move on drop, in selection order.
    pub dragged_items: Vec<FileSystemItem>,
    /// Resolved folder the pointer is over, if it is a valid target.
    pub over_target: Option<ItemId>,
    /// Raw collision the pointer is over.
    pub over: Option<Collision>,
    /// Whether the pointer has left the directory container.
    pub is_outside_container: bool,
    /// Where the drag started.
    pub origin: Option<Point>,
    /// Last pointer position.
    pub pointer: Option<Point>,
}

impl DragState {
    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// The pressed item's id.
    pub fn active_id(&self) -> Option<&ItemId> {
        self.active.as_ref().map(|a| &a.item)
    }

    /// Ids of the dragged items.
    pub fn dragged_ids(&self) -> Vec<ItemId> {
        self.dragged_items.iter().map(|item| item.id().clone()).collect()
    }

    /// Return to idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// How a drop ended.
#[derive(Debug, Clone)]
pub enum DropOutcome {
    /// Every item was moved or skipped by the user.
    Moved {
        /// Moved ids, in order.
        moved: Vec<ItemId>,
        /// Ids whose duplicate prompt was dismissed.
        skipped: Vec<ItemId>,
    },
    /// A hard failure stopped the batch; earlier moves stand.
    Partial {
        /// Moved ids, in order.
        moved: Vec<ItemId>,
        /// Ids whose duplicate prompt was dismissed.
        skipped: Vec<ItemId>,
        /// Item whose move failed.
        failed: ItemId,
        /// The failure.
        error: AppError,
    },
    /// Refused before any API call.
    Rejected(DropRejection),
    /// The drag was cancelled.
    Cancelled,
}

impl DropOutcome {
    /// Ids that reached their destination.
    pub fn moved(&self) -> &[ItemId] {
        match self {
            Self::Moved { moved, .. } | Self::Partial { moved, .. } => moved,
            Self::Rejected(_) | Self::Cancelled => &[],
        }
    }

    /// Whether a batch ran (fully or partially).
    pub fn executed(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Partial { .. })
    }
}

impl From<BatchReport> for DropOutcome {
    fn from(report: BatchReport) -> Self {
        match report.failure {
            None => Self::Moved {
                moved: report.moved,
                skipped: report.skipped,
            },
            Some(failure) => Self::Partial {
                moved: report.moved,
                skipped: report.skipped,
                failed: failure.item,
                error: failure.error,
            },
        }
    }
}
