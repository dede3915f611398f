//! Bulleted and numbered list editing.
//!
//! A list is a [`BlockKind::BulletedList`] or [`BlockKind::NumberedList`]
//! container whose children are [`BlockKind::ListItem`] blocks or nested
//! lists.

use super::state::EditorState;
use super::transform::Transform;
use super::types::{Block, BlockKind};

/// The closest list around the start of the selection.
pub fn current_list(state: &EditorState) -> Option<&Block> {
    state
        .document()
        .closest(state.start().key, |block| block.kind.is_list())
}

pub fn is_selection_in_list(state: &EditorState) -> bool {
    current_list(state).is_some()
}

/// The closest list of `kind` around any selected block.
pub fn closest_list_of_kind(state: &EditorState, kind: BlockKind) -> Option<&Block> {
    state
        .blocks()
        .into_iter()
        .find_map(|block| state.document().closest(block.key, |node| node.kind == kind))
}

impl Transform {
    /// Turn the selected blocks into items of a new list of `kind`.
    pub fn wrap_in_list(self, kind: BlockKind) -> Self {
        if !kind.is_list() {
            return self;
        }
        self.set_block(BlockKind::ListItem).wrap_block(kind)
    }

    /// Move the selected items one level out of their list. Items that end
    /// up outside every list become paragraphs.
    pub fn unwrap_list(self) -> Self {
        let this = self.unwrap_matching(|block| block.kind.is_list());
        let mut orphans = Vec::new();
        for key in this.selected_keys() {
            let document = this.state().document();
            let is_item = document
                .find(key)
                .is_some_and(|block| block.kind == BlockKind::ListItem);
            let in_list = document.closest(key, |block| block.kind.is_list()).is_some();
            if is_item && !in_list {
                orphans.push(key);
            }
        }
        orphans.into_iter().fold(this, |this, key| {
            this.set_node_kind_by_key(key, BlockKind::Paragraph)
        })
    }
}
