//! Toolbar buttons and what they do to the document.
//!
//! Each button maps to exactly one transform. Clicking a button never
//! moves the cursor; the mouse press is consumed by the toolbar row.

use crate::document::{
    Block, BlockKind, DEFAULT_IMAGE_SIZE, EditorState, Mark, closest_list_of_kind,
    is_selection_in_list, is_selection_in_table,
};

/// Block type a "toggle off" reverts to.
pub const DEFAULT_NODE: BlockKind = BlockKind::Paragraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarButton {
    Bold,
    Italic,
    Underlined,
    Code,
    HeadingOne,
    HeadingTwo,
    BlockQuote,
    NumberedList,
    BulletedList,
    Table,
    InsertRow,
    InsertColumn,
    CheckListItem,
    Image,
}

impl ToolbarButton {
    /// Buttons in toolbar order.
    pub const ALL: [Self; 14] = [
        Self::Bold,
        Self::Italic,
        Self::Underlined,
        Self::Code,
        Self::HeadingOne,
        Self::HeadingTwo,
        Self::BlockQuote,
        Self::NumberedList,
        Self::BulletedList,
        Self::Table,
        Self::InsertRow,
        Self::InsertColumn,
        Self::CheckListItem,
        Self::Image,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Bold => "B",
            Self::Italic => "I",
            Self::Underlined => "U",
            Self::Code => "</>",
            Self::HeadingOne => "H1",
            Self::HeadingTwo => "H2",
            Self::BlockQuote => "❝",
            Self::NumberedList => "1.",
            Self::BulletedList => "•",
            Self::Table => "▦",
            Self::InsertRow => "+row",
            Self::InsertColumn => "+col",
            Self::CheckListItem => "☑",
            Self::Image => "img",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Underlined => "Underline",
            Self::Code => "Code",
            Self::HeadingOne => "Heading 1",
            Self::HeadingTwo => "Heading 2",
            Self::BlockQuote => "Block quote",
            Self::NumberedList => "Numbered list",
            Self::BulletedList => "Bulleted list",
            Self::Table => "Insert / remove table",
            Self::InsertRow => "Insert row",
            Self::InsertColumn => "Insert column",
            Self::CheckListItem => "Check list",
            Self::Image => "Insert image",
        }
    }

    /// The mark a button toggles, for the four mark buttons.
    pub const fn mark(self) -> Option<Mark> {
        match self {
            Self::Bold => Some(Mark::Bold),
            Self::Italic => Some(Mark::Italic),
            Self::Underlined => Some(Mark::Underlined),
            Self::Code => Some(Mark::Code),
            _ => None,
        }
    }

    /// Alt+key chord for the block buttons. Marks use their Ctrl chords.
    pub const fn alt_key(self) -> Option<char> {
        match self {
            Self::HeadingOne => Some('1'),
            Self::HeadingTwo => Some('2'),
            Self::BlockQuote => Some('q'),
            Self::NumberedList => Some('o'),
            Self::BulletedList => Some('l'),
            Self::Table => Some('t'),
            Self::InsertRow => Some('r'),
            Self::InsertColumn => Some('c'),
            Self::CheckListItem => Some('x'),
            Self::Image => Some('g'),
            Self::Bold | Self::Italic | Self::Underlined | Self::Code => None,
        }
    }

    pub fn from_alt_key(ch: char) -> Option<Self> {
        let ch = ch.to_ascii_lowercase();
        Self::ALL.into_iter().find(|button| button.alt_key() == Some(ch))
    }

    /// Chord hint shown in the help overlay.
    pub fn shortcut(self) -> String {
        match (self.mark(), self.alt_key()) {
            (Some(Mark::Bold), _) => "Ctrl-b".to_string(),
            (Some(Mark::Italic), _) => "Ctrl-i".to_string(),
            (Some(Mark::Underlined), _) => "Ctrl-u".to_string(),
            (Some(Mark::Code), _) => "Ctrl-`".to_string(),
            (None, Some(key)) => format!("Alt-{key}"),
            (None, None) => String::new(),
        }
    }

    /// Whether the button is shown highlighted for `state`.
    pub fn is_active(self, state: &EditorState) -> bool {
        if let Some(mark) = self.mark() {
            return has_mark(state, mark);
        }
        match self {
            Self::NumberedList => closest_list_of_kind(state, BlockKind::NumberedList).is_some(),
            Self::BulletedList => closest_list_of_kind(state, BlockKind::BulletedList).is_some(),
            Self::Table => is_selection_in_table(state),
            Self::InsertRow | Self::InsertColumn | Self::Image => false,
            _ => self.block_kind().is_some_and(|kind| has_block(state, kind)),
        }
    }

    const fn block_kind(self) -> Option<BlockKind> {
        match self {
            Self::HeadingOne => Some(BlockKind::HeadingOne),
            Self::HeadingTwo => Some(BlockKind::HeadingTwo),
            Self::BlockQuote => Some(BlockKind::BlockQuote),
            Self::CheckListItem => Some(BlockKind::CheckListItem),
            _ => None,
        }
    }
}

/// What a toolbar click produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarOutcome {
    Transformed(EditorState),
    /// The image button needs a URL before anything changes.
    PromptImageUrl,
}

pub fn has_mark(state: &EditorState, mark: Mark) -> bool {
    state.marks().contains(mark)
}

pub fn has_block(state: &EditorState, kind: BlockKind) -> bool {
    state.blocks().iter().any(|block| block.kind == kind)
}

/// Handle a click on `button`.
pub fn on_click(state: &EditorState, button: ToolbarButton) -> ToolbarOutcome {
    tracing::debug!(?button, "toolbar click");
    let next = match button {
        ToolbarButton::Image => return ToolbarOutcome::PromptImageUrl,
        ToolbarButton::NumberedList => toggle_list(state, BlockKind::NumberedList),
        ToolbarButton::BulletedList => toggle_list(state, BlockKind::BulletedList),
        ToolbarButton::Table => toggle_table(state),
        ToolbarButton::InsertRow => insert_row(state),
        ToolbarButton::InsertColumn => insert_column(state),
        _ => match (button.mark(), button.block_kind()) {
            (Some(mark), _) => toggle_mark(state, mark),
            (None, Some(kind)) => toggle_block(state, kind),
            (None, None) => state.clone(),
        },
    };
    ToolbarOutcome::Transformed(next)
}

pub fn toggle_mark(state: &EditorState, mark: Mark) -> EditorState {
    state.transform().toggle_mark(mark).apply()
}

/// Bulleted / numbered list button.
///
/// Inside a list of the same kind the selection is unwrapped; inside a
/// list of the other kind that list is retyped; otherwise the blocks
/// become items of a new list.
pub fn toggle_list(state: &EditorState, kind: BlockKind) -> EditorState {
    let in_list = is_selection_in_list(state);
    let is_type = closest_list_of_kind(state, kind).is_some();

    if in_list && is_type {
        state.transform().unwrap_list().apply()
    } else if in_list {
        let other = if kind == BlockKind::BulletedList {
            BlockKind::NumberedList
        } else {
            BlockKind::BulletedList
        };
        match closest_list_of_kind(state, other) {
            Some(list) => state.transform().set_node_kind_by_key(list.key, kind).apply(),
            None => state.clone(),
        }
    } else {
        state.transform().wrap_in_list(kind).apply()
    }
}

/// Remove the table around the selection, or insert a 2×2 one.
pub fn toggle_table(state: &EditorState) -> EditorState {
    if is_selection_in_table(state) {
        state.transform().remove_table().apply()
    } else {
        state.transform().insert_table(2, 2).apply()
    }
}

pub fn insert_row(state: &EditorState) -> EditorState {
    if is_selection_in_table(state) {
        state.transform().insert_row().apply()
    } else {
        state.clone()
    }
}

pub fn insert_column(state: &EditorState) -> EditorState {
    if is_selection_in_table(state) {
        state.transform().insert_column().apply()
    } else {
        state.clone()
    }
}

/// Insert a 300×300 image for `src`. An empty URL inserts nothing.
pub fn insert_image(state: &EditorState, src: &str) -> Option<EditorState> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    let image = Block::image(src, DEFAULT_IMAGE_SIZE, DEFAULT_IMAGE_SIZE);
    Some(state.transform().insert_block(image).apply())
}

/// Heading, quote and check-list buttons: set the type, or revert to a
/// paragraph when already set. Inside a list both list kinds are unwrapped
/// first.
pub fn toggle_block(state: &EditorState, kind: BlockKind) -> EditorState {
    let target = if has_block(state, kind) { DEFAULT_NODE } else { kind };
    let transform = state.transform().set_block(target);
    if has_block(state, BlockKind::ListItem) {
        transform
            .unwrap_block(BlockKind::BulletedList)
            .unwrap_block(BlockKind::NumberedList)
            .apply()
    } else {
        transform.apply()
    }
}
