//! File manager session flows with an in-memory API.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use filecards_core::AppResult;
use filecards_core::config::AppConfig;
use filecards_core::error::{AppError, ErrorKind};
use filecards_core::types::ItemId;
use filecards_dnd::{Collision, DroppableId, MoveApi, Point, PointerRelease, SensorKind};
use filecards_entity::{
    Document, DuplicateAction, FileSystemItem, Folder, ItemMeta, MoveFileRequest, MoveFolderRequest,
    RenameRequest,
};
use filecards_selection::{ClickEvent, ClickOutcome, Key, KeyEvent, KeyOutcome, Modifiers};
use filecards_service::{ChannelDuplicateResolver, FileManager, TracingNotifier};

#[derive(Default)]
struct MemoryApi {
    renames: Mutex<Vec<RenameRequest>>,
    taken_names: Vec<String>,
}

#[async_trait]
impl MoveApi for MemoryApi {
    async fn move_folder(&self, id: &ItemId, request: &MoveFolderRequest) -> AppResult<FileSystemItem> {
        Ok(Folder::new(ItemMeta::new(id.clone(), request.name.clone(), "u"), request.parent.clone()).into())
    }

    async fn move_file(&self, id: &ItemId, request: &MoveFileRequest) -> AppResult<FileSystemItem> {
        Ok(Document::new(ItemMeta::new(id.clone(), request.name.clone(), "u"), request.folder.clone(), 1, "k").into())
    }

    async fn rename_folder(&self, id: &ItemId, request: &RenameRequest) -> AppResult<FileSystemItem> {
        self.renames.lock().unwrap().push(request.clone());
        if request.duplicate_action.is_none() && self.taken_names.contains(&request.name) {
            return Err(AppError::from_status(409, "taken"));
        }
        let name = match request.duplicate_action {
            Some(DuplicateAction::KeepBoth) => format!("{} (1)", request.name),
            _ => request.name.clone(),
        };
        Ok(Folder::new(ItemMeta::new(id.clone(), name, "u"), None).into())
    }

    async fn rename_file(&self, id: &ItemId, request: &RenameRequest) -> AppResult<FileSystemItem> {
        self.renames.lock().unwrap().push(request.clone());
        Ok(Document::new(ItemMeta::new(id.clone(), request.name.clone(), "u"), None, 1, "k").into())
    }
}

fn id(raw: &str) -> ItemId {
    ItemId::from(raw)
}

fn items() -> Vec<FileSystemItem> {
    vec![
        Folder::new(ItemMeta::new("docs", "Docs", "u"), None).into(),
        Folder::new(ItemMeta::new("inner", "Inner", "u"), Some(id("docs"))).into(),
        Document::new(ItemMeta::new("f1", "one.txt", "u"), None, 1, "k1").into(),
        Document::new(ItemMeta::new("f2", "two.txt", "u"), None, 2, "k2").into(),
    ]
}

fn manager(api: MemoryApi) -> (FileManager, tokio::sync::mpsc::Receiver<filecards_service::DuplicatePrompt>) {
    let (dialog, prompts) = ChannelDuplicateResolver::channel(4);
    let mut manager = FileManager::new(
        &AppConfig::default(),
        Arc::new(api),
        Arc::new(dialog),
        Arc::new(TracingNotifier),
    );
    manager.load(items());
    (manager, prompts)
}

#[tokio::test]
async fn test_listeners_route_only_while_guard_lives() {
    let (mut fm, _prompts) = manager(MemoryApi::default());
    let select_all = KeyEvent::new(Key::Char('a'), Modifiers::CTRL);

    assert_eq!(fm.key_down(&select_all), KeyOutcome::Ignored);

    let guard = fm.attach_listeners().unwrap();
    let second = fm.attach_listeners().unwrap_err();
    assert_eq!(second.kind, ErrorKind::Conflict);

    assert_eq!(fm.key_down(&select_all), KeyOutcome::SelectedAll);
    assert_eq!(fm.selection().len(), 3);
    assert!(fm.background_click());
    assert!(fm.selection().is_empty());

    drop(guard);
    assert!(!fm.listeners_attached());
    fm.key_down(&select_all);
    assert!(fm.selection().is_empty());
    assert!(!fm.background_click());
}

#[tokio::test]
async fn test_delete_key_trashes_selection() {
    let (mut fm, _prompts) = manager(MemoryApi::default());
    let _guard = fm.attach_listeners().unwrap();

    fm.click_item(&id("f1"), ClickEvent::plain(Instant::now()));
    let outcome = fm.key_down(&KeyEvent::new(Key::Delete, Modifiers::NONE));

    assert_eq!(outcome, KeyOutcome::Deleted(vec![id("f1")]));
    assert!(fm.tree().get(&id("f1")).unwrap().is_deleted());
    assert_eq!(fm.selection().visible_items(), &[id("docs"), id("f2")]);

    assert!(fm.restore(&id("f1")));
    assert_eq!(fm.selection().visible_items().len(), 3);
}

#[tokio::test]
async fn test_double_click_opens_folder_next_frame() {
    let (mut fm, _prompts) = manager(MemoryApi::default());
    let t0 = Instant::now();

    assert_eq!(fm.click_item(&id("docs"), ClickEvent::plain(t0)), ClickOutcome::Selected);
    let second = fm.click_item(&id("docs"), ClickEvent::plain(t0 + Duration::from_millis(200)));
    assert_eq!(second, ClickOutcome::Opened(id("docs")));
    assert_eq!(fm.current_folder(), None);

    assert_eq!(fm.next_frame(), Some(id("docs")));
    assert_eq!(fm.current_folder(), Some(&id("docs")));
    assert_eq!(fm.selection().visible_items(), &[id("inner")]);
    assert!(fm.selection().is_empty());
    assert_eq!(fm.next_frame(), None);
}

#[tokio::test]
async fn test_drop_refreshes_listing() {
    let (mut fm, _prompts) = manager(MemoryApi::default());
    let t0 = Instant::now();

    fm.pointer_down(SensorKind::Pointer, id("f2"), Point::new(0.0, 0.0), t0);
    fm.tick(t0 + Duration::from_millis(150));
    assert!(fm.orchestrator().is_dragging());

    let outcome = fm
        .drop_on(Some(&Collision::new(DroppableId::parse("breadcrumb-docs"))))
        .await;
    assert_eq!(outcome.moved(), &[id("f2")]);
    assert_eq!(fm.tree().get(&id("f2")).unwrap().parent_id(), Some(&id("docs")));
    assert_eq!(fm.selection().visible_items(), &[id("docs"), id("f1")]);
}

#[tokio::test]
async fn test_quick_press_routes_to_selection() {
    let (mut fm, _prompts) = manager(MemoryApi::default());
    let t0 = Instant::now();

    fm.pointer_down(SensorKind::Pointer, id("f1"), Point::new(5.0, 5.0), t0);
    let release = fm
        .pointer_up(Point::new(5.0, 5.0), Modifiers::NONE, t0 + Duration::from_millis(40))
        .await;

    assert!(matches!(release, PointerRelease::Click(_)));
    assert!(fm.selection().is_selected(&id("f1")));
}

#[tokio::test]
async fn test_rename_conflict_prompts_then_retries() {
    let api = MemoryApi {
        taken_names: vec!["Archive".to_string()],
        ..MemoryApi::default()
    };
    let (mut fm, mut prompts) = manager(api);

    let ui = tokio::spawn(async move {
        let prompt = prompts.recv().await.unwrap();
        assert_eq!(prompt.name, "Archive");
        prompt.respond(DuplicateAction::KeepBoth);
    });

    fm.rename(&id("docs"), "Archive").await.unwrap();
    ui.await.unwrap();

    assert_eq!(fm.tree().get(&id("docs")).unwrap().name(), "Archive (1)");

    let missing = fm.rename(&id("nope"), "x").await.unwrap_err();
    assert_eq!(missing.kind, ErrorKind::NotFound);
}
