use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::document::{self, Block, BlockKind, Document, EditorState, Mark, Point};
use crate::persist::{ContentStore, MemoryStore, PersistError};
use crate::schema::Corner;

use super::input::{handle_key, handle_mouse};
use super::{App, Message, Model, SaveStatus, ToastLevel, ToolbarButton, update};

fn model_with(nodes: Vec<Block>) -> Model {
    Model::new(EditorState::new(Document::new(nodes)), (80, 30))
}

/// Draw one frame so the hit map in `model.layout` is filled in.
fn render(model: &mut Model) {
    let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
    terminal
        .draw(|frame| crate::ui::render(model, frame))
        .unwrap();
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn click(column: u16, row: u16) -> MouseEvent {
    mouse(MouseEventKind::Down(MouseButton::Left), column, row)
}

/// Run `msg` through `update` and the app's side effects, like the event
/// loop does.
fn dispatch(app: &mut App, model: Model, msg: Message) -> Model {
    let mut model = update(model, msg.clone());
    app.handle_message_side_effects(&mut model, &msg);
    model
}

fn stored_json(app: &App) -> Option<String> {
    app.store().load().unwrap()
}

struct FailingStore;

impl ContentStore for FailingStore {
    fn load(&self) -> Result<Option<String>, PersistError> {
        Ok(None)
    }

    fn save(&mut self, _value: &str) -> Result<(), PersistError> {
        Err(PersistError::Write {
            path: PathBuf::from("/dev/full/content.json"),
            source: io::Error::other("disk full"),
        })
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        Ok(())
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

#[test]
fn test_typing_marks_document_changed() {
    let model = model_with(vec![Block::paragraph("Hello")]);
    let mut model = update(
        model,
        Message::Key(key(KeyCode::Char('a'), KeyModifiers::NONE)),
    );
    assert_eq!(
        model.state.start_block().and_then(Block::text).map(|t| t.content()),
        Some("aHello".to_string())
    );
    assert!(model.take_document_changed());
    assert!(!model.take_document_changed(), "flag is consumed");
}

#[test]
fn test_cursor_move_does_not_change_document() {
    let model = model_with(vec![Block::paragraph("Hello")]);
    let mut model = update(
        model,
        Message::Key(key(KeyCode::Right, KeyModifiers::NONE)),
    );
    assert_eq!(model.state.selection().focus.offset, 1);
    assert!(!model.take_document_changed());
}

#[test]
fn test_every_document_change_is_saved() {
    let mut app = App::new(Box::new(MemoryStore::new()));
    let model = app.initial_model((80, 30)).unwrap();
    assert_eq!(model.save_status, SaveStatus::Unchanged);

    let model = dispatch(
        &mut app,
        model,
        Message::Key(key(KeyCode::Char('z'), KeyModifiers::NONE)),
    );
    assert_eq!(model.save_status, SaveStatus::Saved);
    let stored = stored_json(&app).expect("document saved");
    let reloaded = document::from_json(&stored).unwrap();
    assert_eq!(
        document::to_json(&reloaded).unwrap(),
        document::to_json(model.state.document()).unwrap()
    );

    let model = dispatch(
        &mut app,
        model,
        Message::Toolbar(ToolbarButton::HeadingOne),
    );
    let stored = stored_json(&app).unwrap();
    assert_eq!(stored, document::to_json(model.state.document()).unwrap());
}

#[test]
fn test_selection_change_is_not_saved() {
    let mut app = App::new(Box::new(MemoryStore::new()));
    let model = app.initial_model((80, 30)).unwrap();
    let model = dispatch(
        &mut app,
        model,
        Message::Key(key(KeyCode::Char('a'), KeyModifiers::CONTROL)),
    );
    assert!(!model.state.is_collapsed());
    assert_eq!(stored_json(&app), None);
    assert_eq!(model.save_status, SaveStatus::Unchanged);
}

#[test]
fn test_save_failure_keeps_document_and_shows_toast() {
    let mut app = App::new(Box::new(FailingStore));
    let model = app.initial_model((80, 30)).unwrap();
    let model = dispatch(
        &mut app,
        model,
        Message::Key(key(KeyCode::Char('x'), KeyModifiers::NONE)),
    );

    assert_eq!(model.save_status, SaveStatus::Failed);
    let (message, level) = model.active_toast().expect("error toast");
    assert_eq!(level, ToastLevel::Error);
    assert!(message.starts_with("Save failed"), "{message}");
    assert!(message.contains("disk full"));
    assert!(
        model
            .state
            .start_block()
            .and_then(Block::text)
            .is_some_and(|text| text.content().starts_with('x'))
    );
}

#[test]
fn test_malformed_store_starts_from_default_with_warning() {
    let mut app = App::new(Box::new(MemoryStore::with_content("{not json")));
    let model = app.initial_model((80, 30)).unwrap();

    assert_eq!(
        model.state.document(),
        &document::default_document().unwrap()
    );
    let (_, level) = model.active_toast().expect("warning toast");
    assert_eq!(level, ToastLevel::Warning);
    assert_eq!(model.store_label, "memory");
}

#[test]
fn test_stored_document_is_loaded() {
    let saved = document::to_json(&Document::new(vec![Block::paragraph("kept")])).unwrap();
    let mut app = App::new(Box::new(MemoryStore::with_content(saved)));
    let model = app.initial_model((80, 30)).unwrap();

    let leaves = model.state.document().leaf_blocks();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].text().map(|t| t.content()), Some("kept".to_string()));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_reset_clears_store() {
    let saved = document::to_json(&Document::new(vec![Block::paragraph("old")])).unwrap();
    let mut app = App::new(Box::new(MemoryStore::with_content(saved))).with_reset(true);
    let model = app.initial_model((80, 30)).unwrap();

    assert_eq!(stored_json(&app), None);
    assert_eq!(
        model.state.document(),
        &document::default_document().unwrap()
    );
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Info));
}

#[test]
fn test_config_paths_reach_model() {
    let mut app = App::new(Box::new(MemoryStore::new()))
        .with_config_paths(Some(PathBuf::from("/g/config")), Some(PathBuf::from(".ternrc")));
    let model = app.initial_model((80, 30)).unwrap();
    assert_eq!(model.config_global_path, Some(PathBuf::from("/g/config")));
    assert_eq!(model.config_local_path, Some(PathBuf::from(".ternrc")));
}

#[test]
fn test_toolbar_click_keeps_cursor() {
    let mut model = model_with(vec![Block::paragraph("Hello world")]);
    let leaf = model.state.document().leaf_blocks()[0].key;
    model.state = model.state.transform().select(Point::new(leaf, 6)).apply();
    render(&mut model);

    let msg = handle_mouse(click(1, 0), &model).expect("toolbar hit");
    assert_eq!(msg, Message::Toolbar(ToolbarButton::Bold));

    let model = update(model, msg);
    assert_eq!(model.state.selection().anchor, Point::new(leaf, 6));
    assert_eq!(model.state.selection().focus, Point::new(leaf, 6));
    assert!(model.state.marks().contains(Mark::Bold));
}

#[test]
fn test_click_and_drag_select_text() {
    let mut model = model_with(vec![Block::paragraph("Hello world")]);
    let leaf = model.state.document().leaf_blocks()[0].key;
    render(&mut model);

    let msg = handle_mouse(click(1, 1), &model).unwrap();
    assert_eq!(msg, Message::PlaceCursor(Point::new(leaf, 0)));
    let model = update(model, msg);

    let drag = mouse(MouseEventKind::Drag(MouseButton::Left), 6, 1);
    let msg = handle_mouse(drag, &model).unwrap();
    assert_eq!(msg, Message::ExtendSelection(Point::new(leaf, 5)));
    let model = update(model, msg);
    assert_eq!(model.state.range_in(leaf), Some(0..5));
}

#[test]
fn test_shift_click_extends_selection() {
    let mut model = model_with(vec![Block::paragraph("Hello world")]);
    let leaf = model.state.document().leaf_blocks()[0].key;
    render(&mut model);

    let mut event = click(4, 1);
    event.modifiers = KeyModifiers::SHIFT;
    assert_eq!(
        handle_mouse(event, &model),
        Some(Message::ExtendSelection(Point::new(leaf, 3)))
    );
}

#[test]
fn test_checkbox_click_toggles_item() {
    let mut model = model_with(vec![
        Block::paragraph("intro"),
        Block::check_list_item("todo", false),
    ]);
    let intro = model.state.document().leaf_blocks()[0].key;
    let item = model.state.document().leaf_blocks()[1].key;
    render(&mut model);

    // intro on row 1, blank separator, check item on row 3
    let msg = handle_mouse(click(2, 3), &model).expect("checkbox hit");
    assert_eq!(msg, Message::ToggleChecked(item));

    let mut model = update(model, msg);
    assert!(model.state.document().find(item).is_some_and(Block::checked));
    assert_eq!(model.state.selection().focus.key, intro, "cursor stays");
    assert!(model.take_document_changed());

    let model = update(model, Message::ToggleChecked(item));
    assert!(!model.state.document().find(item).is_some_and(Block::checked));
}

#[test]
fn test_image_prompt_inserts_image() {
    let model = model_with(vec![Block::paragraph("text")]);
    let model = update(model, Message::Toolbar(ToolbarButton::Image));
    assert!(model.prompt_active());

    let mut model = "https://x/cat.png"
        .chars()
        .fold(model, |model, ch| update(model, Message::PromptInput(ch)));
    model = update(model, Message::PromptInput('!'));
    model = update(model, Message::PromptBackspace);
    assert_eq!(
        model.prompt.as_ref().map(|p| p.input.as_str()),
        Some("https://x/cat.png")
    );

    let mut model = update(model, Message::PromptSubmit);
    assert!(!model.prompt_active());
    assert!(model.take_document_changed());
    let image = model
        .state
        .document()
        .leaf_blocks()
        .into_iter()
        .find(|block| block.kind == BlockKind::Image)
        .cloned()
        .expect("image inserted");
    assert_eq!(image.image_src(), Some("https://x/cat.png"));
    assert_eq!(image.image_size().width, 300);
    assert_eq!(image.image_size().height, 300);
}

#[test]
fn test_empty_image_url_inserts_nothing() {
    let model = model_with(vec![Block::paragraph("text")]);
    let before = model.state.document().clone();
    let model = update(model, Message::Toolbar(ToolbarButton::Image));
    let model = update(model, Message::PromptInput(' '));
    let mut model = update(model, Message::PromptSubmit);

    assert!(!model.prompt_active());
    assert_eq!(model.state.document(), &before);
    assert!(!model.take_document_changed());
}

#[test]
fn test_prompt_cancel_inserts_nothing() {
    let model = model_with(vec![Block::paragraph("text")]);
    let before = model.state.document().clone();
    let model = update(model, Message::Toolbar(ToolbarButton::Image));
    let model = update(model, Message::PromptInput('a'));
    let model = update(model, Message::PromptCancel);
    assert!(!model.prompt_active());
    assert_eq!(model.state.document(), &before);
}

#[test]
fn test_dragging_handle_resizes_image() {
    let mut model = model_with(vec![Block::image("https://x/a.png", 300, 300)]);
    let image = model.state.document().leaf_blocks()[0].key;
    render(&mut model);

    // 300px wide is 37 columns, 300px high is 12 rows plus two borders.
    let (column, row) = (1 + 36, 1 + 13);
    let msg = handle_mouse(click(column, row), &model).expect("handle hit");
    assert_eq!(
        msg,
        Message::StartImageDrag {
            key: image,
            corner: Corner::BottomRight,
            column,
            row,
        }
    );
    let model = update(model, msg);
    assert!(model.drag.is_some());

    let drag = mouse(MouseEventKind::Drag(MouseButton::Left), column + 5, row + 2);
    let msg = handle_mouse(drag, &model).unwrap();
    assert_eq!(
        msg,
        Message::DragImage {
            column: column + 5,
            row: row + 2
        }
    );
    let mut model = update(model, msg);
    let size = model.state.document().find(image).unwrap().image_size();
    assert_eq!((size.width, size.height), (340, 332));
    assert!(model.take_document_changed());

    let release = mouse(MouseEventKind::Up(MouseButton::Left), column + 5, row + 2);
    let msg = handle_mouse(release, &model).unwrap();
    assert_eq!(msg, Message::EndImageDrag);
    let model = update(model, msg);
    assert!(model.drag.is_none());
}

#[test]
fn test_drag_without_movement_changes_nothing() {
    let model = model_with(vec![Block::image("a.png", 300, 300)]);
    let image = model.state.document().leaf_blocks()[0].key;
    let model = update(
        model,
        Message::StartImageDrag {
            key: image,
            corner: Corner::TopLeft,
            column: 1,
            row: 1,
        },
    );
    let mut model = update(model, Message::DragImage { column: 1, row: 1 });
    assert!(!model.take_document_changed());
}

#[test]
fn test_key_mapping() {
    let model = model_with(vec![Block::paragraph("x")]);
    assert_eq!(
        handle_key(key(KeyCode::Char('q'), KeyModifiers::CONTROL), &model),
        Some(Message::Quit)
    );
    assert_eq!(
        handle_key(key(KeyCode::F(1), KeyModifiers::NONE), &model),
        Some(Message::ToggleHelp)
    );
    assert_eq!(
        handle_key(key(KeyCode::Char('t'), KeyModifiers::ALT), &model),
        Some(Message::Toolbar(ToolbarButton::Table))
    );
    assert_eq!(
        handle_key(key(KeyCode::Char('z'), KeyModifiers::ALT), &model),
        None
    );
    let typed = key(KeyCode::Char('q'), KeyModifiers::NONE);
    assert_eq!(handle_key(typed, &model), Some(Message::Key(typed)));

    let mut release = typed;
    release.kind = KeyEventKind::Release;
    assert_eq!(handle_key(release, &model), None);
}

#[test]
fn test_help_swallows_keys_and_clicks() {
    let model = update(model_with(vec![Block::paragraph("x")]), Message::ToggleHelp);
    assert!(model.help_visible);
    assert_eq!(
        handle_key(key(KeyCode::Char('a'), KeyModifiers::NONE), &model),
        None
    );
    assert_eq!(
        handle_key(key(KeyCode::Esc, KeyModifiers::NONE), &model),
        Some(Message::HideHelp)
    );
    assert_eq!(handle_mouse(click(5, 5), &model), Some(Message::HideHelp));
    assert_eq!(
        handle_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL), &model),
        Some(Message::Quit)
    );
}

#[test]
fn test_prompt_captures_keys() {
    let model = update(
        model_with(vec![Block::paragraph("x")]),
        Message::Toolbar(ToolbarButton::Image),
    );
    assert_eq!(
        handle_key(key(KeyCode::Char('a'), KeyModifiers::NONE), &model),
        Some(Message::PromptInput('a'))
    );
    assert_eq!(
        handle_key(key(KeyCode::Enter, KeyModifiers::NONE), &model),
        Some(Message::PromptSubmit)
    );
    assert_eq!(
        handle_key(key(KeyCode::Esc, KeyModifiers::NONE), &model),
        Some(Message::PromptCancel)
    );
    assert_eq!(handle_mouse(click(1, 0), &model), None);
}

#[test]
fn test_scroll_stops_following_cursor() {
    let nodes = (0..40).map(|i| Block::paragraph(&format!("line {i}"))).collect();
    let mut model = model_with(nodes);
    render(&mut model);
    assert_eq!(model.viewport.offset(), 0);

    let model = update(model, Message::ScrollDown(5));
    assert_eq!(model.viewport.offset(), 5);
    assert!(!model.follow_cursor);
    let model = update(model, Message::ScrollUp(2));
    assert_eq!(model.viewport.offset(), 3);

    let wheel = mouse(MouseEventKind::ScrollDown, 10, 10);
    assert_eq!(handle_mouse(wheel, &model), Some(Message::ScrollDown(3)));
}

#[test]
fn test_toast_expires() {
    let mut model = model_with(vec![Block::paragraph("x")]);
    model.show_toast(ToastLevel::Info, "hello");
    assert!(!model.expire_toast(Instant::now()));
    assert!(model.active_toast().is_some());
    assert!(model.expire_toast(Instant::now() + Duration::from_secs(5)));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_quit_sets_flag() {
    let model = update(Model::default(), Message::Quit);
    assert!(model.should_quit);
}
