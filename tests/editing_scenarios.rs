//! Multi-step editing sessions driven through `update`, the same path the
//! event loop takes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use tern::app::{Message, Model, ToolbarButton, update};
use tern::document::{
    Block, BlockKind, Document, EditorState, Leaf, Mark, MarkSet, Point, Selection,
    is_selection_in_table,
};
use tern::schema::{self, Corner};

fn model_with(nodes: Vec<Block>) -> Model {
    Model::new(EditorState::new(Document::new(nodes)), (80, 24))
}

fn press(model: Model, code: KeyCode, modifiers: KeyModifiers) -> Model {
    update(model, Message::Key(KeyEvent::new(code, modifiers)))
}

fn type_text(model: Model, text: &str) -> Model {
    text.chars()
        .fold(model, |model, ch| press(model, KeyCode::Char(ch), KeyModifiers::NONE))
}

fn click(model: Model, button: ToolbarButton) -> Model {
    update(model, Message::Toolbar(button))
}

fn top_kinds(model: &Model) -> Vec<BlockKind> {
    model
        .state
        .document()
        .nodes()
        .iter()
        .map(|block| block.kind)
        .collect()
}

fn leaf_texts(model: &Model) -> Vec<String> {
    model
        .state
        .document()
        .leaf_blocks()
        .iter()
        .map(|block| block.text().map(|text| text.content()).unwrap_or_default())
        .collect()
}

#[test]
fn test_select_all_and_bold_chord() {
    let model = model_with(vec![Block::paragraph("Hello")]);
    let original = model.state.document().clone();

    let model = press(model, KeyCode::Char('a'), KeyModifiers::CONTROL);
    let model = press(model, KeyCode::Char('b'), KeyModifiers::CONTROL);
    let nodes = model.state.document().nodes();
    assert_eq!(nodes.len(), 1);
    assert_eq!(
        nodes[0].text().map(|text| text.leaves().to_vec()),
        Some(vec![Leaf::new("Hello", MarkSet::EMPTY.with(Mark::Bold))])
    );
    assert!(ToolbarButton::Bold.is_active(&model.state));

    let model = press(model, KeyCode::Char('b'), KeyModifiers::CONTROL);
    assert_eq!(model.state.document(), &original);
}

#[test]
fn test_marks_typed_after_collapsed_toggle() {
    let model = model_with(vec![Block::paragraph("")]);
    let model = type_text(model, "plain ");
    let model = click(model, ToolbarButton::Italic);
    let model = type_text(model, "slanted");

    let leaves = model.state.document().nodes()[0]
        .text()
        .map(|text| text.leaves().to_vec())
        .unwrap_or_default();
    assert_eq!(
        leaves,
        vec![
            Leaf::new("plain ", MarkSet::EMPTY),
            Leaf::new("slanted", MarkSet::EMPTY.with(Mark::Italic)),
        ]
    );
}

#[test]
fn test_building_a_check_list() {
    let model = model_with(vec![Block::paragraph("")]);
    let model = click(model, ToolbarButton::CheckListItem);
    let model = type_text(model, "milk");
    let model = press(model, KeyCode::Enter, KeyModifiers::NONE);
    let model = type_text(model, "eggs");
    assert_eq!(
        top_kinds(&model),
        vec![BlockKind::CheckListItem, BlockKind::CheckListItem]
    );

    let milk = model.state.document().leaf_blocks()[0].key;
    let model = update(model, Message::ToggleChecked(milk));
    let model = update(model, Message::PlaceCursor(Point::new(milk, 4)));
    let model = press(model, KeyCode::Enter, KeyModifiers::NONE);

    let blocks = model.state.document().leaf_blocks();
    assert_eq!(leaf_texts(&model), vec!["milk", "", "eggs"]);
    assert!(blocks[0].checked(), "original keeps its checked state");
    assert!(!blocks[1].checked(), "new item starts unchecked");
    assert!(!blocks[2].checked());
    assert_eq!(model.state.selection().focus.key, blocks[1].key);

    let model = press(model, KeyCode::Backspace, KeyModifiers::NONE);
    assert_eq!(
        top_kinds(&model),
        vec![
            BlockKind::CheckListItem,
            BlockKind::Paragraph,
            BlockKind::CheckListItem
        ]
    );
}

#[test]
fn test_building_and_removing_a_table() {
    let model = model_with(vec![Block::paragraph("")]);
    let model = click(model, ToolbarButton::Table);
    assert!(is_selection_in_table(&model.state));

    let table = &model.state.document().nodes()[0];
    assert_eq!(table.kind, BlockKind::Table);
    assert_eq!(table.children().len(), 2);
    assert!(table.children().iter().all(|row| row.children().len() == 2));

    let model = type_text(model, "a");
    let model = press(model, KeyCode::Tab, KeyModifiers::NONE);
    let model = type_text(model, "b");
    let model = press(model, KeyCode::Enter, KeyModifiers::NONE);
    let model = click(model, ToolbarButton::InsertColumn);

    let table = &model.state.document().nodes()[0];
    assert_eq!(table.children().len(), 3);
    assert!(table.children().iter().all(|row| row.children().len() == 3));
    let first_row: Vec<String> = table.children()[0]
        .children()
        .iter()
        .map(|cell| cell.text().map(|text| text.content()).unwrap_or_default())
        .collect();
    assert_eq!(first_row, vec!["a", "b", ""]);

    let canvas = schema::render_document(&model.state, 60);
    let header = canvas.lines[0].to_string();
    assert!(header.contains(" A") && header.contains(" B") && header.contains(" C"));

    let model = click(model, ToolbarButton::Table);
    assert!(!top_kinds(&model).contains(&BlockKind::Table));
    assert!(!model.state.document().leaf_blocks().is_empty());
}

#[test]
fn test_row_and_column_buttons_outside_table() {
    let model = model_with(vec![Block::paragraph("text")]);
    let before = model.state.document().clone();
    let model = click(model, ToolbarButton::InsertRow);
    let model = click(model, ToolbarButton::InsertColumn);
    assert_eq!(model.state.document(), &before);
}

#[test]
fn test_list_buttons_three_ways() {
    let mut model = model_with(vec![Block::paragraph("one"), Block::paragraph("two")]);
    let leaves = model.state.document().leaf_blocks();
    let (one, two) = (leaves[0].key, leaves[1].key);
    model.state = model
        .state
        .with_selection(Selection::new(Point::new(one, 0), Point::new(two, 3)));

    let model = click(model, ToolbarButton::BulletedList);
    assert_eq!(top_kinds(&model), vec![BlockKind::BulletedList]);
    assert!(ToolbarButton::BulletedList.is_active(&model.state));

    let model = click(model, ToolbarButton::NumberedList);
    assert_eq!(top_kinds(&model), vec![BlockKind::NumberedList]);
    assert_eq!(model.state.document().nodes()[0].children().len(), 2);
    assert!(!ToolbarButton::BulletedList.is_active(&model.state));

    let model = click(model, ToolbarButton::NumberedList);
    assert_eq!(
        top_kinds(&model),
        vec![BlockKind::Paragraph, BlockKind::Paragraph]
    );
    assert_eq!(leaf_texts(&model), vec!["one", "two"]);
}

#[test]
fn test_heading_inside_list_leaves_the_list() {
    let model = model_with(vec![Block::paragraph("title")]);
    let model = click(model, ToolbarButton::BulletedList);
    let model = click(model, ToolbarButton::HeadingOne);
    assert_eq!(top_kinds(&model), vec![BlockKind::HeadingOne]);

    let model = click(model, ToolbarButton::HeadingOne);
    assert_eq!(top_kinds(&model), vec![BlockKind::Paragraph]);
}

#[test]
fn test_inserting_and_resizing_an_image() {
    let model = model_with(vec![Block::paragraph("caption"), Block::paragraph("after")]);
    let after = model.state.document().leaf_blocks()[1].clone();
    let caption = model.state.document().leaf_blocks()[0].key;
    let model = update(model, Message::PlaceCursor(Point::new(caption, 7)));

    let model = click(model, ToolbarButton::Image);
    let model = "http://x/img.png"
        .chars()
        .fold(model, |model, ch| update(model, Message::PromptInput(ch)));
    let model = update(model, Message::PromptSubmit);

    let image = model
        .state
        .document()
        .nodes()
        .iter()
        .find(|block| block.kind == BlockKind::Image)
        .cloned()
        .expect("image node");
    assert!(image.is_void());
    assert_eq!(image.image_src(), Some("http://x/img.png"));
    assert_eq!((image.image_size().width, image.image_size().height), (300, 300));

    let resized = schema::drag_image(&model.state, image.key, Corner::BottomRight, (24, -48))
        .expect("image key");
    let size = resized.document().find(image.key).map(Block::image_size);
    assert_eq!(size.map(|s| (s.width, s.height)), Some((324, 252)));
    assert_eq!(resized.document().find(after.key), Some(&after));
    assert_eq!(
        resized.document().find(caption).map(|block| &block.data),
        model.state.document().find(caption).map(|block| &block.data)
    );
}
