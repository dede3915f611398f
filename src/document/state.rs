use std::ops::Range;

use super::selection::{Point, Selection};
use super::transform::Transform;
use super::types::{Block, Document, Key, MarkSet};

/// One revision of the editor: a document and the selection inside it.
///
/// States are never edited in place. [`EditorState::transform`] starts a
/// transform, and [`Transform::apply`] hands back the next revision.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub(crate) document: Document,
    pub(crate) selection: Selection,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::collapsed(Point::new(Key::UNSET, 0))
    }
}

impl EditorState {
    /// Wrap `document` with a collapsed cursor at its first leaf.
    pub fn new(document: Document) -> Self {
        let mut state = Self {
            document,
            selection: Selection::default(),
        };
        state.normalize_selection();
        state
    }

    /// Replace the selection. Points that do not name a leaf block are moved
    /// to the start of the document; offsets are clamped to the text.
    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self.normalize_selection();
        self
    }

    pub const fn document(&self) -> &Document {
        &self.document
    }

    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.clone())
    }

    pub(crate) fn normalize_selection(&mut self) {
        self.selection.anchor = self.clamp(self.selection.anchor);
        self.selection.focus = self.clamp(self.selection.focus);
    }

    fn clamp(&self, point: Point) -> Point {
        match self.document.find(point.key) {
            Some(block) if block.is_leaf() => Point::new(point.key, point.offset.min(block.text_len())),
            _ => self
                .document
                .first_leaf()
                .map_or(point, |block| Point::new(block.key, 0)),
        }
    }

    fn order(&self, point: Point) -> (usize, usize) {
        (self.document.leaf_index(point.key).unwrap_or(0), point.offset)
    }

    /// True when the focus comes before the anchor.
    pub fn is_backward(&self) -> bool {
        self.order(self.selection.focus) < self.order(self.selection.anchor)
    }

    pub fn start(&self) -> Point {
        if self.is_backward() {
            self.selection.focus
        } else {
            self.selection.anchor
        }
    }

    pub fn end(&self) -> Point {
        if self.is_backward() {
            self.selection.anchor
        } else {
            self.selection.focus
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.selection.is_collapsed()
    }

    /// Leaf blocks touched by the selection, in document order.
    pub fn blocks(&self) -> Vec<&Block> {
        let leaves = self.document.leaf_blocks();
        let start = self.document.leaf_index(self.start().key).unwrap_or(0);
        let end = self.document.leaf_index(self.end().key).unwrap_or(start);
        leaves
            .into_iter()
            .skip(start)
            .take(end.saturating_sub(start) + 1)
            .collect()
    }

    pub fn start_block(&self) -> Option<&Block> {
        self.document.find(self.start().key)
    }

    pub fn focus_block(&self) -> Option<&Block> {
        self.document.find(self.selection.focus.key)
    }

    /// The selected character range inside the leaf block `key`, if the
    /// selection touches it.
    pub fn range_in(&self, key: Key) -> Option<Range<usize>> {
        let block = self.blocks().into_iter().find(|block| block.key == key)?;
        let (start, end) = (self.start(), self.end());
        let from = if start.key == key { start.offset } else { 0 };
        let to = if end.key == key {
            end.offset
        } else {
            block.text_len()
        };
        Some(from..to.max(from))
    }

    fn selected_ranges(&self) -> Vec<(&Block, Range<usize>)> {
        self.blocks()
            .into_iter()
            .filter(|block| !block.is_void())
            .filter_map(|block| Some((block, self.range_in(block.key)?)))
            .filter(|(_, range)| !range.is_empty())
            .collect()
    }

    fn collapsed_marks(&self) -> MarkSet {
        self.selection.marks.unwrap_or_else(|| {
            let focus = self.selection.focus;
            self.document
                .find(focus.key)
                .and_then(Block::text)
                .map_or(MarkSet::EMPTY, |text| text.marks_before(focus.offset))
        })
    }

    /// Marks present anywhere in the selection. For a collapsed selection,
    /// the marks the next typed character would get.
    pub fn marks(&self) -> MarkSet {
        if self.is_collapsed() {
            return self.collapsed_marks();
        }
        self.selected_ranges()
            .into_iter()
            .filter_map(|(block, range)| Some(block.text()?.marks_in(range)))
            .fold(MarkSet::EMPTY, MarkSet::union)
    }

    /// True when the focus lies in `key` or one of its descendants.
    pub fn has_focus_in(&self, key: Key) -> bool {
        self.document.contains(key, self.selection.focus.key)
    }

    /// True when the anchor or the focus lies in `key` or below it.
    pub fn has_edge_in(&self, key: Key) -> bool {
        self.document.contains(key, self.selection.anchor.key)
            || self.document.contains(key, self.selection.focus.key)
    }
}
