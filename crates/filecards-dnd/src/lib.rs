//! # filecards-dnd
//!
//! Drag-and-drop for the card grid. The [`DragOrchestrator`] turns sensor
//! input into a drag lifecycle, decides which droppable the pointer is over
//! with an ordered list of collision strategies, maps synthetic breadcrumb
//! ids back to real folders, and on drop runs a strictly serial move batch
//! against the remote API, pausing for the user whenever the server reports
//! a name collision.
//!
//! Hosts feed plain geometry (rects and pointer positions); nothing here
//! depends on a renderer.

pub mod collision;
pub mod droppable;
pub mod geometry;
pub mod orchestrator;
pub mod ports;
pub mod protocol;
pub mod sensor;
pub mod state;
pub mod target;

pub use collision::{Collision, CollisionArgs, detect_collisions};
pub use droppable::{Droppable, DroppableId, DroppableRegistry, PortalItem};
pub use geometry::{Point, Rect};
pub use orchestrator::{DragOrchestrator, PointerRelease};
pub use ports::{DialogCancelled, DuplicateResolver, MoveApi, Notifier};
pub use protocol::{BatchFailure, BatchReport, MoveBatch};
pub use sensor::{ActivationConstraint, Sensor, SensorKind, SensorSignal};
pub use state::{ActiveDescriptor, CardVariant, DragPhase, DragState, DropOutcome};
pub use target::{DropRejection, DropTarget, check_structure, resolve_over_id, resolve_target};
