use proptest::prelude::*;

use tern::document::{
    Block, BlockKind, Document, EditorState, Leaf, Mark, MarkSet, Point, Selection, Text,
    from_json, to_json,
};
use tern::persist::{
    ContentStore, FileStore, LoadSource, MemoryStore, load_initial_state, save_state,
};

fn mark_set(bits: u8) -> MarkSet {
    Mark::ALL
        .into_iter()
        .enumerate()
        .filter(|(index, _)| bits & (1 << index) != 0)
        .fold(MarkSet::EMPTY, |set, (_, mark)| set.with(mark))
}

fn text_strategy() -> impl Strategy<Value = Text> {
    prop::collection::vec(("[a-zA-Z0-9 ]{1,8}", 0u8..16), 0..4).prop_map(|runs| {
        Text::from_leaves(
            runs.into_iter()
                .map(|(text, bits)| Leaf::new(text, mark_set(bits))),
        )
    })
}

fn block_strategy() -> impl Strategy<Value = Block> {
    prop_oneof![
        text_strategy().prop_map(|text| Block::leaf(BlockKind::Paragraph, text)),
        text_strategy().prop_map(|text| Block::leaf(BlockKind::HeadingOne, text)),
        text_strategy().prop_map(|text| Block::leaf(BlockKind::HeadingTwo, text)),
        text_strategy().prop_map(|text| Block::leaf(BlockKind::BlockQuote, text)),
        (text_strategy(), any::<bool>()).prop_map(|(text, checked)| {
            Block::leaf(BlockKind::CheckListItem, text).with_data("checked", checked)
        }),
        (
            prop_oneof![Just(BlockKind::BulletedList), Just(BlockKind::NumberedList)],
            prop::collection::vec(text_strategy(), 1..4),
        )
            .prop_map(|(kind, items)| {
                let items = items
                    .into_iter()
                    .map(|text| Block::leaf(BlockKind::ListItem, text))
                    .collect();
                Block::container(kind, items)
            }),
        (1usize..4, 1usize..4).prop_map(|(columns, rows)| Block::table(columns, rows)),
        ("[a-z]{1,10}", 16i64..2000, 16i64..2000).prop_map(|(name, width, height)| {
            Block::image(&format!("http://x/{name}.png"), width, height)
        }),
    ]
}

fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::vec(block_strategy(), 1..6).prop_map(Document::new)
}

proptest! {
    #[test]
    fn serialized_form_is_stable(document in document_strategy()) {
        let once = to_json(&document).unwrap();
        let reloaded = from_json(&once).unwrap();
        let twice = to_json(&reloaded).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn reload_preserves_text_and_kinds(document in document_strategy()) {
        let reloaded = from_json(&to_json(&document).unwrap()).unwrap();
        let summary = |doc: &Document| -> Vec<(BlockKind, String)> {
            doc.leaf_blocks()
                .iter()
                .map(|block| (block.kind, block.text().map(Text::content).unwrap_or_default()))
                .collect()
        };
        prop_assert_eq!(summary(&document), summary(&reloaded));
    }

    #[test]
    fn toggling_a_mark_twice_restores_document(
        text in text_strategy(),
        mark_index in 0usize..4,
        all_marked in any::<bool>(),
        a in 0usize..40,
        b in 0usize..40,
    ) {
        let mark = Mark::ALL[mark_index];
        // The range must carry the mark everywhere or nowhere.
        let text = Text::from_leaves(text.leaves().iter().map(|leaf| {
            let marks = if all_marked { leaf.marks.with(mark) } else { leaf.marks.without(mark) };
            Leaf::new(leaf.text.clone(), marks)
        }));
        let len = text.len();
        let state = EditorState::new(Document::new(vec![Block::leaf(BlockKind::Paragraph, text)]));
        let key = state.document().leaf_blocks()[0].key;
        let (start, end) = (a.min(len), b.min(len));
        let state = state.with_selection(Selection::new(Point::new(key, start), Point::new(key, end)));

        let once = state.transform().toggle_mark(mark).apply();
        let twice = once.transform().toggle_mark(mark).apply();
        prop_assert_eq!(twice.document(), state.document());
    }

    #[test]
    fn toggling_a_block_type_twice_restores_paragraph(text in "[a-z ]{0,12}", choice in 0usize..4) {
        let kind = [
            BlockKind::HeadingOne,
            BlockKind::HeadingTwo,
            BlockKind::BlockQuote,
            BlockKind::CheckListItem,
        ][choice];
        let state = EditorState::new(Document::new(vec![Block::paragraph(&text)]));
        let once = tern::app::toolbar::toggle_block(&state, kind);
        prop_assert_eq!(once.document().nodes()[0].kind, kind);
        let twice = tern::app::toolbar::toggle_block(&once, kind);
        prop_assert_eq!(twice.document().nodes()[0].kind, BlockKind::Paragraph);
    }
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path().join("store"), "notes").unwrap();

    let first = load_initial_state(&store).unwrap();
    assert_eq!(first.source, LoadSource::Default);

    let state = EditorState::new(Document::new(vec![
        Block::paragraph("persisted"),
        Block::check_list_item("done", true),
        Block::table(2, 2),
    ]));
    save_state(&mut store, &state).unwrap();
    assert!(store.path().exists());

    let reopened = FileStore::new(dir.path().join("store"), "notes").unwrap();
    let loaded = load_initial_state(&reopened).unwrap();
    assert_eq!(loaded.source, LoadSource::Stored);
    assert!(loaded.warning.is_none());
    assert_eq!(
        to_json(loaded.state.document()).unwrap(),
        to_json(state.document()).unwrap()
    );
}

#[test]
fn test_corrupt_file_falls_back_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path(), "content").unwrap();
    std::fs::write(store.path(), "{\"document\": 12}").unwrap();

    let loaded = load_initial_state(&store).unwrap();
    assert_eq!(loaded.source, LoadSource::Default);
    assert!(loaded.warning.is_some());
    assert_eq!(
        loaded.state.document(),
        &tern::document::default_document().unwrap()
    );
}

#[test]
fn test_memory_store_counts_every_save() {
    let mut store = MemoryStore::new();
    let state = EditorState::new(Document::new(vec![Block::paragraph("a")]));
    save_state(&mut store, &state).unwrap();
    save_state(&mut store, &state).unwrap();
    assert_eq!(store.writes(), 2);
    assert_eq!(store.load().unwrap(), Some(to_json(state.document()).unwrap()));
}
