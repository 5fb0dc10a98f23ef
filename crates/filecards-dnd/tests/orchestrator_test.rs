//! Drop-to-move flows against in-memory services.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use filecards_core::AppResult;
use filecards_core::config::drag::DragConfig;
use filecards_core::error::AppError;
use filecards_core::types::ItemId;
use filecards_dnd::{
    Collision, DialogCancelled, DragOrchestrator, DropOutcome, DropRejection, Droppable, DroppableId,
    DuplicateResolver, MoveApi, Notifier, Point, PointerRelease, Rect, SensorKind,
};
use filecards_entity::{
    Document, DuplicateAction, FileSystemItem, Folder, ItemKind, ItemMeta, MoveFileRequest,
    MoveFolderRequest, RenameRequest,
};
use filecards_selection::{Modifiers, SelectionEngine};
use filecards_tree::TreeStore;

#[derive(Debug, Clone, PartialEq)]
struct Call {
    id: ItemId,
    parent: Option<ItemId>,
    action: Option<DuplicateAction>,
}

#[derive(Default)]
struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    conflict_once: Mutex<HashSet<ItemId>>,
    fail: HashSet<ItemId>,
}

impl RecordingApi {
    fn conflicting(ids: &[&str]) -> Self {
        Self {
            conflict_once: Mutex::new(ids.iter().map(|id| ItemId::from(*id)).collect()),
            ..Self::default()
        }
    }

    fn failing(ids: &[&str]) -> Self {
        Self {
            fail: ids.iter().map(|id| ItemId::from(*id)).collect(),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, id: &ItemId, parent: Option<ItemId>, action: Option<DuplicateAction>) -> AppResult<()> {
        self.calls.lock().unwrap().push(Call {
            id: id.clone(),
            parent,
            action,
        });
        if self.fail.contains(id) {
            return Err(AppError::from_status(500, "storage unavailable"));
        }
        if action.is_none() && self.conflict_once.lock().unwrap().remove(id) {
            return Err(AppError::from_status(409, "name already exists"));
        }
        Ok(())
    }
}

fn receipt_name(name: &str, action: Option<DuplicateAction>) -> String {
    match action {
        Some(DuplicateAction::KeepBoth) => format!("{name} (1)"),
        _ => name.to_string(),
    }
}

#[async_trait]
impl MoveApi for RecordingApi {
    async fn move_folder(&self, id: &ItemId, request: &MoveFolderRequest) -> AppResult<FileSystemItem> {
        self.record(id, request.parent.clone(), request.duplicate_action)?;
        let name = receipt_name(&request.name, request.duplicate_action);
        Ok(Folder::new(ItemMeta::new(id.clone(), name, "u"), request.parent.clone()).into())
    }

    async fn move_file(&self, id: &ItemId, request: &MoveFileRequest) -> AppResult<FileSystemItem> {
        self.record(id, request.folder.clone(), request.duplicate_action)?;
        let name = receipt_name(&request.name, request.duplicate_action);
        Ok(Document::new(ItemMeta::new(id.clone(), name, "u"), request.folder.clone(), 1, "k").into())
    }

    async fn rename_folder(&self, id: &ItemId, request: &RenameRequest) -> AppResult<FileSystemItem> {
        Ok(Folder::new(ItemMeta::new(id.clone(), request.name.clone(), "u"), None).into())
    }

    async fn rename_file(&self, id: &ItemId, request: &RenameRequest) -> AppResult<FileSystemItem> {
        Ok(Document::new(ItemMeta::new(id.clone(), request.name.clone(), "u"), None, 1, "k").into())
    }
}

#[derive(Default)]
struct ScriptedDialog {
    answers: Mutex<VecDeque<Result<DuplicateAction, DialogCancelled>>>,
    prompts: Mutex<Vec<(String, ItemKind)>>,
    closed: AtomicUsize,
}

impl ScriptedDialog {
    fn answering(answers: Vec<Result<DuplicateAction, DialogCancelled>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl DuplicateResolver for ScriptedDialog {
    async fn resolve_duplicate(&self, name: &str, kind: ItemKind) -> Result<DuplicateAction, DialogCancelled> {
        self.prompts.lock().unwrap().push((name.to_string(), kind));
        self.answers.lock().unwrap().pop_front().unwrap_or(Err(DialogCancelled))
    }

    fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<(bool, String)>>,
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.messages.lock().unwrap().push((true, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push((false, message.to_string()));
    }
}

struct Harness {
    tree: TreeStore,
    selection: SelectionEngine,
    orchestrator: DragOrchestrator,
    api: Arc<RecordingApi>,
    dialog: Arc<ScriptedDialog>,
    notifier: Arc<RecordingNotifier>,
}

fn id(raw: &str) -> ItemId {
    ItemId::from(raw)
}

/// `docs/` and `sub/` under it, plus `f1`, `a/`, `f2` at the top level.
fn harness(api: RecordingApi, dialog: ScriptedDialog) -> Harness {
    let tree = TreeStore::with_items(vec![
        Folder::new(ItemMeta::new("docs", "Docs", "u"), None).into(),
        Folder::new(ItemMeta::new("sub", "Sub", "u"), Some(id("docs"))).into(),
        Document::new(ItemMeta::new("f1", "one.txt", "u"), None, 1, "k1").into(),
        Folder::new(ItemMeta::new("a", "A", "u"), None).into(),
        Document::new(ItemMeta::new("f2", "two.txt", "u"), None, 2, "k2").into(),
    ]);
    let mut selection = SelectionEngine::default();
    selection.set_visible_items(vec![id("docs"), id("f1"), id("a"), id("f2")]);

    let api = Arc::new(api);
    let dialog = Arc::new(dialog);
    let notifier = Arc::new(RecordingNotifier::default());
    let orchestrator = DragOrchestrator::new(
        &DragConfig::default(),
        api.clone(),
        dialog.clone(),
        notifier.clone(),
    );

    Harness {
        tree,
        selection,
        orchestrator,
        api,
        dialog,
        notifier,
    }
}

fn select_three(h: &mut Harness) {
    h.selection.select(&id("f1"), Modifiers::NONE);
    h.selection.select(&id("a"), Modifiers::CTRL);
    h.selection.select(&id("f2"), Modifiers::CTRL);
}

fn over(raw: &str) -> Collision {
    Collision::new(DroppableId::parse(raw))
}

fn start(h: &mut Harness, raw: &str) {
    let started = h
        .orchestrator
        .drag_start(&h.tree, &h.selection, &id(raw), Point::new(0.0, 0.0));
    assert!(started);
}

#[tokio::test]
async fn test_conflict_on_second_item_retries_it_once() {
    let mut h = harness(
        RecordingApi::conflicting(&["a"]),
        ScriptedDialog::answering(vec![Ok(DuplicateAction::KeepBoth)]),
    );
    select_three(&mut h);
    start(&mut h, "a");
    assert_eq!(h.orchestrator.state().dragged_ids(), vec![id("f1"), id("a"), id("f2")]);

    let target = over("docs");
    let outcome = h
        .orchestrator
        .drag_end(&mut h.tree, &mut h.selection, Some(&target))
        .await;

    let calls = h.api.calls();
    let per_item = |raw: &str| calls.iter().filter(|c| c.id == id(raw)).count();
    assert_eq!(per_item("f1"), 1);
    assert_eq!(per_item("a"), 2);
    assert_eq!(per_item("f2"), 1);
    assert_eq!(calls[1].action, None);
    assert_eq!(calls[2].action, Some(DuplicateAction::KeepBoth));
    assert!(calls.iter().all(|c| c.parent == Some(id("docs"))));

    match outcome {
        DropOutcome::Moved { moved, skipped } => {
            assert_eq!(moved, vec![id("f1"), id("a"), id("f2")]);
            assert!(skipped.is_empty());
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    assert_eq!(
        *h.dialog.prompts.lock().unwrap(),
        vec![("A".to_string(), ItemKind::Folder)]
    );
    assert_eq!(h.dialog.closed.load(Ordering::SeqCst), 1);

    assert_eq!(h.tree.get(&id("a")).unwrap().parent_id(), Some(&id("docs")));
    assert_eq!(h.tree.get(&id("a")).unwrap().name(), "A (1)");
    assert_eq!(h.tree.live_child_count(&id("docs")), 4);

    assert!(h.selection.is_empty());
    assert!(!h.orchestrator.is_dragging());
    assert_eq!(
        *h.notifier.messages.lock().unwrap(),
        vec![(true, "Moved 3 items".to_string())]
    );
}

#[tokio::test]
async fn test_hard_failure_aborts_without_rollback() {
    let mut h = harness(RecordingApi::failing(&["a"]), ScriptedDialog::default());
    select_three(&mut h);
    start(&mut h, "f1");

    let target = over("docs");
    let outcome = h
        .orchestrator
        .drag_end(&mut h.tree, &mut h.selection, Some(&target))
        .await;

    assert_eq!(h.api.calls().len(), 2);
    match &outcome {
        DropOutcome::Partial { moved, failed, error, .. } => {
            assert_eq!(moved, &vec![id("f1")]);
            assert_eq!(failed, &id("a"));
            assert_eq!(error.status, Some(500));
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    assert_eq!(h.tree.get(&id("f1")).unwrap().parent_id(), Some(&id("docs")));
    assert_eq!(h.tree.get(&id("a")).unwrap().parent_id(), None);
    assert_eq!(h.tree.get(&id("f2")).unwrap().parent_id(), None);

    let messages = h.notifier.messages.lock().unwrap().clone();
    assert_eq!(messages.len(), 1);
    assert!(!messages[0].0);
    assert!(messages[0].1.contains("\"A\""));

    assert!(h.selection.is_empty());
    assert!(!h.orchestrator.is_dragging());
}

#[tokio::test]
async fn test_dismissed_prompt_skips_item_and_continues() {
    let mut h = harness(
        RecordingApi::conflicting(&["f1"]),
        ScriptedDialog::answering(vec![Err(DialogCancelled)]),
    );
    select_three(&mut h);
    start(&mut h, "f2");

    let target = over("docs");
    let outcome = h
        .orchestrator
        .drag_end(&mut h.tree, &mut h.selection, Some(&target))
        .await;

    match outcome {
        DropOutcome::Moved { moved, skipped } => {
            assert_eq!(moved, vec![id("a"), id("f2")]);
            assert_eq!(skipped, vec![id("f1")]);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(h.api.calls().len(), 3);
    assert_eq!(h.tree.get(&id("f1")).unwrap().parent_id(), None);
}

#[tokio::test]
async fn test_content_container_is_never_a_target() {
    let mut h = harness(RecordingApi::default(), ScriptedDialog::default());
    select_three(&mut h);
    start(&mut h, "f1");

    let content = Collision::new(DroppableId::DropdownContent);
    assert_eq!(h.orchestrator.drag_over(&h.tree, Some(content.clone())), None);

    let outcome = h
        .orchestrator
        .drag_end(&mut h.tree, &mut h.selection, Some(&content))
        .await;

    assert!(matches!(outcome, DropOutcome::Rejected(DropRejection::Unresolvable)));
    assert!(h.api.calls().is_empty());
    assert!(h.notifier.messages.lock().unwrap().is_empty());
    assert!(!h.orchestrator.is_dragging());
    assert_eq!(h.selection.len(), 3);
}

#[tokio::test]
async fn test_folder_cannot_drop_into_its_subtree() {
    let mut h = harness(RecordingApi::default(), ScriptedDialog::default());
    start(&mut h, "docs");
    assert_eq!(h.orchestrator.state().dragged_ids(), vec![id("docs")]);

    assert_eq!(h.orchestrator.drag_over(&h.tree, Some(over("sub"))), None);
    assert_eq!(h.orchestrator.drag_over(&h.tree, Some(over("docs"))), None);
    assert_eq!(h.orchestrator.drag_over(&h.tree, Some(over("f1"))), None);
    assert_eq!(h.orchestrator.drag_over(&h.tree, Some(over("a"))), Some(&id("a")));

    let target = over("breadcrumb-dropdown-sub");
    let outcome = h
        .orchestrator
        .drag_end(&mut h.tree, &mut h.selection, Some(&target))
        .await;
    assert!(matches!(outcome, DropOutcome::Rejected(DropRejection::Cycle { .. })));
    assert!(h.api.calls().is_empty());
}

#[tokio::test]
async fn test_unselected_item_drags_alone_and_trigger_means_root() {
    let mut h = harness(RecordingApi::default(), ScriptedDialog::default());
    h.tree.move_item(&id("f2"), Some(&id("sub"))).unwrap();
    h.selection.select(&id("f1"), Modifiers::NONE);
    h.selection.select(&id("a"), Modifiers::CTRL);
    start(&mut h, "f2");
    assert_eq!(h.orchestrator.state().dragged_ids(), vec![id("f2")]);

    let trigger = Collision::new(DroppableId::DropdownTrigger);
    assert_eq!(
        h.orchestrator.drag_over(&h.tree, Some(trigger.clone())),
        Some(&id("root"))
    );
    let outcome = h
        .orchestrator
        .drag_end(&mut h.tree, &mut h.selection, Some(&trigger))
        .await;

    assert_eq!(outcome.moved(), &[id("f2")]);
    assert_eq!(
        h.api.calls(),
        vec![Call {
            id: id("f2"),
            parent: None,
            action: None
        }]
    );
    assert_eq!(h.tree.get(&id("f2")).unwrap().parent_id(), None);
    assert_eq!(
        *h.notifier.messages.lock().unwrap(),
        vec![(true, "Moved 1 item".to_string())]
    );
}

#[tokio::test]
async fn test_pointer_press_hold_move_release() {
    let mut h = harness(RecordingApi::default(), ScriptedDialog::default());
    h.orchestrator
        .set_container_rect(Some(Rect::new(0.0, 0.0, 500.0, 500.0)));
    h.orchestrator.registry_mut().register(
        Droppable::new(DroppableId::parse("docs"), Rect::new(200.0, 0.0, 100.0, 100.0))
            .with_data(id("docs")),
    );

    let t0 = Instant::now();
    h.orchestrator
        .pointer_down(SensorKind::Pointer, id("f1"), Point::new(10.0, 10.0), t0);
    h.orchestrator
        .tick(&h.tree, &h.selection, t0 + Duration::from_millis(160));
    assert!(h.orchestrator.is_dragging());

    h.orchestrator.pointer_move(
        &h.tree,
        &h.selection,
        Point::new(250.0, 50.0),
        t0 + Duration::from_millis(200),
    );
    assert_eq!(h.orchestrator.state().over_target, Some(id("docs")));

    let release = h
        .orchestrator
        .pointer_up(
            &mut h.tree,
            &mut h.selection,
            Point::new(250.0, 50.0),
            t0 + Duration::from_millis(240),
        )
        .await;
    match release {
        PointerRelease::Dropped(outcome) => assert_eq!(outcome.moved(), &[id("f1")]),
        other => panic!("unexpected release {other:?}"),
    }
    assert_eq!(h.tree.get(&id("f1")).unwrap().parent_id(), Some(&id("docs")));
}

#[tokio::test]
async fn test_drop_on_portal_entry_outside_container_moves() {
    let mut h = harness(RecordingApi::default(), ScriptedDialog::default());
    h.orchestrator
        .set_container_rect(Some(Rect::new(0.0, 100.0, 500.0, 400.0)));
    h.orchestrator
        .registry_mut()
        .register_portal_item(id("docs"), Rect::new(10.0, 10.0, 120.0, 20.0));

    let t0 = Instant::now();
    h.orchestrator
        .pointer_down(SensorKind::Pointer, id("f1"), Point::new(50.0, 150.0), t0);
    h.orchestrator
        .tick(&h.tree, &h.selection, t0 + Duration::from_millis(160));
    h.orchestrator.pointer_move(
        &h.tree,
        &h.selection,
        Point::new(20.0, 20.0),
        t0 + Duration::from_millis(200),
    );
    assert!(h.orchestrator.state().is_outside_container);
    assert_eq!(h.orchestrator.state().over_target, Some(id("docs")));

    let release = h
        .orchestrator
        .pointer_up(
            &mut h.tree,
            &mut h.selection,
            Point::new(20.0, 20.0),
            t0 + Duration::from_millis(220),
        )
        .await;

    assert!(matches!(release, PointerRelease::Dropped(DropOutcome::Moved { .. })));
    assert_eq!(
        h.api.calls(),
        vec![Call {
            id: id("f1"),
            parent: Some(id("docs")),
            action: None,
        }]
    );
    assert_eq!(h.tree.get(&id("f1")).and_then(|f| f.parent_id()), Some(&id("docs")));
    assert!(!h.orchestrator.is_dragging());
}

#[tokio::test]
async fn test_release_outside_over_nothing_is_rejected() {
    let mut h = harness(RecordingApi::default(), ScriptedDialog::default());
    h.orchestrator
        .set_container_rect(Some(Rect::new(0.0, 0.0, 100.0, 100.0)));

    let t0 = Instant::now();
    h.orchestrator
        .pointer_down(SensorKind::Touch, id("f1"), Point::new(10.0, 10.0), t0);
    h.orchestrator
        .tick(&h.tree, &h.selection, t0 + Duration::from_millis(260));
    h.orchestrator.pointer_move(
        &h.tree,
        &h.selection,
        Point::new(300.0, 300.0),
        t0 + Duration::from_millis(300),
    );
    assert!(h.orchestrator.state().is_outside_container);

    let release = h
        .orchestrator
        .pointer_up(
            &mut h.tree,
            &mut h.selection,
            Point::new(300.0, 300.0),
            t0 + Duration::from_millis(320),
        )
        .await;
    assert!(matches!(release, PointerRelease::Dropped(DropOutcome::Rejected(_))));
    assert!(h.api.calls().is_empty());
    assert!(!h.orchestrator.is_dragging());
}

#[tokio::test]
async fn test_quick_release_is_a_click() {
    let mut h = harness(RecordingApi::default(), ScriptedDialog::default());
    let t0 = Instant::now();
    h.orchestrator
        .pointer_down(SensorKind::Pointer, id("a"), Point::new(10.0, 10.0), t0);
    let release = h
        .orchestrator
        .pointer_up(
            &mut h.tree,
            &mut h.selection,
            Point::new(11.0, 10.0),
            t0 + Duration::from_millis(50),
        )
        .await;
    assert!(matches!(release, PointerRelease::Click(ref clicked) if clicked == &id("a")));
    assert!(!h.orchestrator.is_dragging());
}
