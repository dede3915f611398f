//! The transform builder.
//!
//! A [`Transform`] owns a working copy of an [`EditorState`]. Each operation
//! consumes the builder and returns it, so operations chain:
//!
//! ```
//! use tern::document::{Block, Document, EditorState, Mark};
//!
//! let state = EditorState::new(Document::new(vec![Block::paragraph("Hello")]));
//! let next = state.transform().select_all().toggle_mark(Mark::Bold).apply();
//!
//! assert!(next.marks().contains(Mark::Bold));
//! assert!(!state.marks().contains(Mark::Bold));
//! ```
//!
//! Operations that cannot apply (a missing key, a cursor in the wrong kind of
//! block) leave the working copy unchanged.

use super::selection::{Point, Selection};
use super::state::EditorState;
use super::types::{Block, BlockKind, Content, Data, Document, Key, Mark, Text};

/// Cursor movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Replace,
    Before,
    After,
}

/// A chain of edits against one [`EditorState`].
#[derive(Debug, Clone)]
#[must_use = "a transform does nothing until applied"]
pub struct Transform {
    state: EditorState,
}

impl Transform {
    pub(crate) const fn new(state: EditorState) -> Self {
        Self { state }
    }

    /// Finish the chain and return the next state.
    pub fn apply(mut self) -> EditorState {
        self.state.document.prune();
        self.state.normalize_selection();
        self.state
    }

    /// The working state, as it stands part way through the chain.
    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    pub(crate) const fn document_mut(&mut self) -> &mut Document {
        &mut self.state.document
    }

    pub(crate) fn selected_keys(&self) -> Vec<Key> {
        self.state.blocks().iter().map(|block| block.key).collect()
    }

    pub(crate) fn text_mut(&mut self, key: Key) -> Option<&mut Text> {
        self.state.document.find_mut(key)?.text_mut()
    }

    pub(crate) fn in_table(&self, key: Key) -> bool {
        self.state
            .document
            .closest(key, |block| block.kind == BlockKind::Table)
            .is_some()
    }

    pub(crate) fn collapse_to(&mut self, point: Point) {
        let is_focused = self.state.selection.is_focused;
        self.state.selection = Selection {
            is_focused,
            ..Selection::collapsed(point)
        };
        self.state.normalize_selection();
    }

    /// Insert `block` next to the node at `path`: `0` before it, `1` after.
    pub(crate) fn insert_beside(&mut self, path: &[usize], after: usize, block: Block) -> bool {
        let Some((index, parent)) = path.split_last() else {
            return false;
        };
        match self.state.document.siblings_mut(parent) {
            Some(siblings) => {
                siblings.insert(index + after, block);
                true
            }
            None => false,
        }
    }

    // Marks

    /// Toggle `mark`. An expanded selection loses the mark when any
    /// selected character carries it and gains it otherwise; a collapsed
    /// selection toggles the marks stored for the next insertion.
    pub fn toggle_mark(self, mark: Mark) -> Self {
        let on = !self.state.marks().contains(mark);
        self.set_mark(mark, on)
    }

    pub fn add_mark(self, mark: Mark) -> Self {
        self.set_mark(mark, true)
    }

    fn set_mark(mut self, mark: Mark, on: bool) -> Self {
        if self.state.is_collapsed() {
            let marks = self.state.marks();
            self.state.selection.marks = Some(if on { marks.with(mark) } else { marks.without(mark) });
            return self;
        }
        let ranges: Vec<_> = self
            .state
            .blocks()
            .iter()
            .filter(|block| !block.is_void())
            .filter_map(|block| Some((block.key, self.state.range_in(block.key)?)))
            .collect();
        for (key, range) in ranges {
            if let Some(text) = self.text_mut(key) {
                text.set_mark(range, mark, on);
            }
        }
        self
    }

    // Block types and data

    /// Set the type of every selected leaf block. Container kinds are
    /// ignored; use [`Transform::wrap_block`] for those.
    pub fn set_block(mut self, kind: BlockKind) -> Self {
        if kind.is_container() {
            return self;
        }
        for key in self.selected_keys() {
            if let Some(block) = self.state.document.find_mut(key) {
                block.kind = kind;
            }
        }
        self
    }

    /// Replace the data of every selected leaf block.
    pub fn set_block_data(mut self, data: &Data) -> Self {
        for key in self.selected_keys() {
            if let Some(block) = self.state.document.find_mut(key) {
                block.data = data.clone();
            }
        }
        self
    }

    /// Retype one node. A leaf cannot become a container or the reverse.
    pub fn set_node_kind_by_key(mut self, key: Key, kind: BlockKind) -> Self {
        if let Some(block) = self.state.document.find_mut(key)
            && block.kind.is_container() == kind.is_container()
        {
            block.kind = kind;
        }
        self
    }

    pub fn set_node_data_by_key(mut self, key: Key, data: Data) -> Self {
        if let Some(block) = self.state.document.find_mut(key) {
            block.data = data;
        }
        self
    }

    /// Overwrite the named fields of a node's data, keeping the rest.
    pub fn merge_node_data_by_key(mut self, key: Key, data: Data) -> Self {
        if let Some(block) = self.state.document.find_mut(key) {
            block.data.extend(data);
        }
        self
    }

    // Structure

    /// Split the block at the cursor. The new block copies the type and
    /// data of the original and receives the cursor.
    pub fn split_block(self) -> Self {
        let mut this = self.delete_range();
        let point = this.state.start();
        let Some(block) = this.state.document.find(point.key) else {
            return this;
        };
        if block.is_void() {
            return this.insert_paragraph_after(point.key);
        }
        let Some(path) = this.state.document.path_of(point.key) else {
            return this;
        };
        let key = this.state.document.alloc_key();
        let Some(block) = this.state.document.get_mut(&path) else {
            return this;
        };
        let tail = block
            .text_mut()
            .map(|text| text.split_off(point.offset))
            .unwrap_or_default();
        let new_block = Block {
            key,
            kind: block.kind,
            data: block.data.clone(),
            content: Content::Text(tail),
        };
        if this.insert_beside(&path, 1, new_block) {
            this.collapse_to(Point::new(key, 0));
        }
        this
    }

    fn insert_paragraph_after(mut self, key: Key) -> Self {
        let Some(path) = self.state.document.path_of(key) else {
            return self;
        };
        let mut paragraph = Block::paragraph("");
        paragraph.key = self.state.document.alloc_key();
        let new_key = paragraph.key;
        if self.insert_beside(&path, 1, paragraph) {
            self.collapse_to(Point::new(new_key, 0));
        }
        self
    }

    /// Wrap the selected blocks in a new container of `kind`.
    ///
    /// The wrapped nodes are the children of the first selected block's
    /// parent that contain selected blocks.
    pub fn wrap_block(mut self, kind: BlockKind) -> Self {
        if !kind.is_container() {
            return self;
        }
        let selected = self.selected_keys();
        let Some(first) = selected.first().copied() else {
            return self;
        };
        let Some(path) = self.state.document.path_of(first) else {
            return self;
        };
        let parent = &path[..path.len() - 1];
        let key = self.state.document.alloc_key();
        let Some(siblings) = self.state.document.siblings_mut(parent) else {
            return self;
        };
        let hits: Vec<usize> = siblings
            .iter()
            .enumerate()
            .filter(|(_, block)| block.leaf_keys().iter().any(|leaf| selected.contains(leaf)))
            .map(|(index, _)| index)
            .collect();
        let (Some(&first_hit), Some(&last_hit)) = (hits.first(), hits.last()) else {
            return self;
        };
        let children: Vec<Block> = siblings.drain(first_hit..=last_hit).collect();
        let mut container = Block::container(kind, children);
        container.key = key;
        siblings.insert(first_hit, container);
        self
    }

    /// Move the selected blocks out of their closest ancestor of `kind`.
    pub fn unwrap_block(self, kind: BlockKind) -> Self {
        self.unwrap_matching(move |block| block.kind == kind)
    }

    /// Move the selected blocks out of their closest ancestor matching
    /// `predicate`. Blocks before and after the selection stay wrapped; the
    /// ones after move into a copy of the ancestor.
    pub(crate) fn unwrap_matching(mut self, predicate: impl Fn(&Block) -> bool) -> Self {
        let selected = self.selected_keys();
        let Some(first) = selected.first().copied() else {
            return self;
        };
        let Some(ancestor) = self.state.document.closest(first, &predicate) else {
            return self;
        };
        let hits: Vec<usize> = ancestor
            .children()
            .iter()
            .enumerate()
            .filter(|(_, block)| block.leaf_keys().iter().any(|leaf| selected.contains(leaf)))
            .map(|(index, _)| index)
            .collect();
        let (Some(&first_hit), Some(&last_hit)) = (hits.first(), hits.last()) else {
            return self;
        };
        let (kind, data) = (ancestor.kind, ancestor.data.clone());
        let Some(path) = self.state.document.path_of(ancestor.key) else {
            return self;
        };
        let Some((&index, parent)) = path.split_last() else {
            return self;
        };
        let tail_key = self.state.document.alloc_key();
        let Some(siblings) = self.state.document.siblings_mut(parent) else {
            return self;
        };
        let mut container = siblings.remove(index);
        let mut head = container.children_mut().map(std::mem::take).unwrap_or_default();
        let tail = head.split_off(last_hit + 1);
        let middle = head.split_off(first_hit);

        let mut replacement = Vec::with_capacity(middle.len() + 2);
        if !head.is_empty() {
            container.content = Content::Blocks(head);
            replacement.push(container);
        }
        replacement.extend(middle);
        if !tail.is_empty() {
            replacement.push(Block {
                key: tail_key,
                kind,
                data,
                content: Content::Blocks(tail),
            });
        }
        siblings.splice(index..index, replacement);
        self
    }

    /// Insert `block` at the cursor and move the cursor into it.
    ///
    /// An empty paragraph is replaced; a cursor at the start of a block
    /// inserts before it, at the end after it, and in the middle splits the
    /// block first. Inside a table the block goes after the table.
    pub fn insert_block(self, block: Block) -> Self {
        let mut this = self.delete_range();
        let mut block = block;
        this.state.document.rekey(&mut block);
        let target = block.first_leaf().map_or(block.key, |leaf| leaf.key);

        let point = this.state.start();
        let Some(current) = this.state.document.find(point.key) else {
            return this;
        };
        let table = this
            .state
            .document
            .closest(point.key, |node| node.kind == BlockKind::Table)
            .map(|node| node.key);
        let len = current.text_len();
        let (anchor, placement) = if let Some(table) = table {
            (table, Placement::After)
        } else if current.kind == BlockKind::Paragraph && len == 0 {
            (point.key, Placement::Replace)
        } else if current.is_void() || point.offset >= len {
            (point.key, Placement::After)
        } else if point.offset == 0 {
            (point.key, Placement::Before)
        } else {
            this = this.split_block();
            (point.key, Placement::After)
        };

        let Some(path) = this.state.document.path_of(anchor) else {
            return this;
        };
        let placed = match placement {
            Placement::Before => this.insert_beside(&path, 0, block),
            Placement::After => this.insert_beside(&path, 1, block),
            Placement::Replace => match this.state.document.get_mut(&path) {
                Some(slot) => {
                    *slot = block;
                    true
                }
                None => false,
            },
        };
        if placed {
            this.collapse_to(Point::new(target, 0));
        }
        this
    }

    /// Detach a node and move the cursor next to where it was.
    pub fn remove_node(mut self, key: Key, prefer_previous: bool) -> Self {
        let Some(node) = self.state.document.find(key) else {
            return self;
        };
        let leaves = node.leaf_keys();
        let document = &self.state.document;
        let before = leaves
            .first()
            .and_then(|leaf| document.previous_leaf(*leaf))
            .map(|block| Point::new(block.key, block.text_len()));
        let after = leaves
            .last()
            .and_then(|leaf| document.next_leaf(*leaf))
            .map(|block| Point::new(block.key, 0));
        let target = if prefer_previous {
            before.or(after)
        } else {
            after.or(before)
        };

        self.state.document.remove(key);
        self.state.document.prune();
        self.collapse_to(target.unwrap_or(Point::new(Key::UNSET, 0)));
        self
    }

    // Text

    /// Insert `text` at the cursor, replacing any selected range.
    pub fn insert_text(self, text: &str) -> Self {
        let mut this = self.delete_range();
        let marks = this.state.marks();
        let focus = this.state.selection.focus;
        if this.state.document.find(focus.key).is_some_and(Block::is_void) {
            this = this.insert_paragraph_after(focus.key);
        }
        let point = this.state.selection.focus;
        if let Some(target) = this.text_mut(point.key) {
            target.insert(point.offset, text, marks);
        }
        this.collapse_to(Point::new(point.key, point.offset + text.chars().count()));
        this
    }

    /// Delete the selected range.
    ///
    /// Blocks fully inside the range are removed, except table cells, which
    /// are emptied. The two edge blocks are merged unless either sits in a
    /// table.
    pub fn delete_range(mut self) -> Self {
        if self.state.is_collapsed() {
            return self;
        }
        let (start, end) = (self.state.start(), self.state.end());
        if start.key == end.key {
            if let Some(text) = self.text_mut(start.key) {
                text.remove(start.offset..end.offset);
            }
            self.collapse_to(start);
            return self;
        }

        let keys = self.selected_keys();
        for key in keys.iter().skip(1).take(keys.len().saturating_sub(2)) {
            let is_cell = self
                .state
                .document
                .find(*key)
                .is_some_and(|block| block.kind == BlockKind::TableCell);
            if is_cell {
                if let Some(text) = self.text_mut(*key) {
                    *text = Text::default();
                }
            } else {
                self.state.document.remove(*key);
            }
        }
        if let Some(text) = self.text_mut(start.key) {
            let len = text.len();
            text.remove(start.offset..len);
        }
        if let Some(text) = self.text_mut(end.key) {
            text.remove(0..end.offset);
        }

        let is_void = |this: &Self, key| this.state.document.find(key).is_some_and(Block::is_void);
        if is_void(&self, start.key) {
            self.state.document.remove(start.key);
            self.state.document.prune();
            self.collapse_to(Point::new(end.key, 0));
            return self;
        }
        if !is_void(&self, end.key) && !self.in_table(start.key) && !self.in_table(end.key) {
            self = self.merge_into(start.key, end.key);
        }
        self.state.document.prune();
        self.collapse_to(start);
        self
    }

    /// Append the text of `from` to `into` and remove `from`.
    fn merge_into(mut self, into: Key, from: Key) -> Self {
        let offset = self.state.document.find(into).map_or(0, Block::text_len);
        if let Some(removed) = self.state.document.remove(from)
            && let Content::Text(text) = removed.content
            && let Some(target) = self.text_mut(into)
        {
            target.append(text);
        }
        self.state.document.prune();
        self.collapse_to(Point::new(into, offset));
        self
    }

    /// Backspace.
    pub fn delete_backward(mut self) -> Self {
        if !self.state.is_collapsed() {
            return self.delete_range();
        }
        let point = self.state.selection.focus;
        let Some(block) = self.state.document.find(point.key) else {
            return self;
        };
        if block.is_void() {
            return self.remove_node(point.key, true);
        }
        if point.offset > 0 {
            if let Some(text) = self.text_mut(point.key) {
                text.remove(point.offset - 1..point.offset);
            }
            self.collapse_to(Point::new(point.key, point.offset - 1));
            return self;
        }
        let Some(previous) = self.state.document.previous_leaf(point.key) else {
            return self;
        };
        let (previous_key, previous_len) = (previous.key, previous.text_len());
        if previous.is_void() && !self.in_table(point.key) {
            self.state.document.remove(previous_key);
            self.state.document.prune();
            return self;
        }
        if self.in_table(point.key) || self.in_table(previous_key) {
            self.collapse_to(Point::new(previous_key, previous_len));
            return self;
        }
        self.merge_into(previous_key, point.key)
    }

    /// Forward delete.
    pub fn delete_forward(mut self) -> Self {
        if !self.state.is_collapsed() {
            return self.delete_range();
        }
        let point = self.state.selection.focus;
        let Some(block) = self.state.document.find(point.key) else {
            return self;
        };
        if block.is_void() {
            return self.remove_node(point.key, false);
        }
        if point.offset < block.text_len() {
            if let Some(text) = self.text_mut(point.key) {
                text.remove(point.offset..point.offset + 1);
            }
            return self;
        }
        let Some(next) = self.state.document.next_leaf(point.key) else {
            return self;
        };
        let next_key = next.key;
        if self.in_table(point.key) || self.in_table(next_key) {
            return self;
        }
        if next.is_void() {
            self.state.document.remove(next_key);
            self.state.document.prune();
            return self;
        }
        self.merge_into(point.key, next_key)
    }

    // Selection

    /// Move the focus. Without `extend` the selection collapses; a plain
    /// left or right on an expanded selection collapses it to that edge.
    pub fn move_focus(self, motion: Motion, extend: bool) -> Self {
        if !extend && !self.state.is_collapsed() {
            match motion {
                Motion::Left => {
                    let start = self.state.start();
                    return self.select(start);
                }
                Motion::Right => {
                    let end = self.state.end();
                    return self.select(end);
                }
                _ => {}
            }
        }
        let focus = self.state.selection.focus;
        let document = &self.state.document;
        let len = document.find(focus.key).map_or(0, Block::text_len);
        let target = match motion {
            Motion::Left if focus.offset > 0 => Point::new(focus.key, focus.offset - 1),
            Motion::Left => document
                .previous_leaf(focus.key)
                .map_or(focus, |block| Point::new(block.key, block.text_len())),
            Motion::Right if focus.offset < len => Point::new(focus.key, focus.offset + 1),
            Motion::Right => document
                .next_leaf(focus.key)
                .map_or(focus, |block| Point::new(block.key, 0)),
            Motion::Up => document
                .previous_leaf(focus.key)
                .map_or(Point::new(focus.key, 0), |block| {
                    Point::new(block.key, focus.offset.min(block.text_len()))
                }),
            Motion::Down => document
                .next_leaf(focus.key)
                .map_or(Point::new(focus.key, len), |block| {
                    Point::new(block.key, focus.offset.min(block.text_len()))
                }),
            Motion::LineStart => Point::new(focus.key, 0),
            Motion::LineEnd => Point::new(focus.key, len),
            Motion::DocumentStart => document
                .first_leaf()
                .map_or(focus, |block| Point::new(block.key, 0)),
            Motion::DocumentEnd => document
                .last_leaf()
                .map_or(focus, |block| Point::new(block.key, block.text_len())),
        };
        if extend {
            self.extend_to(target)
        } else {
            self.select(target)
        }
    }

    /// Collapse the selection to `point` and focus the editor.
    pub fn select(mut self, point: Point) -> Self {
        self.state.selection.is_focused = true;
        self.collapse_to(point);
        self
    }

    /// Move only the focus, keeping the anchor.
    pub fn extend_to(mut self, point: Point) -> Self {
        self.state.selection.focus = point;
        self.state.selection.marks = None;
        self.state.selection.is_focused = true;
        self.state.normalize_selection();
        self
    }

    pub fn select_all(mut self) -> Self {
        let document = &self.state.document;
        let (Some(first), Some(last)) = (document.first_leaf(), document.last_leaf()) else {
            return self;
        };
        self.state.selection = Selection::new(
            Point::new(first.key, 0),
            Point::new(last.key, last.text_len()),
        );
        self
    }

    pub fn blur(mut self) -> Self {
        self.state.selection.is_focused = false;
        self
    }
}
