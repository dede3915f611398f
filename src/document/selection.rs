use super::types::{Key, MarkSet};

/// A cursor position: a leaf block and a character offset into its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub key: Key,
    pub offset: usize,
}

impl Point {
    pub const fn new(key: Key, offset: usize) -> Self {
        Self { key, offset }
    }
}

/// The user's selection.
///
/// `anchor` is where the selection started and `focus` where it ends; the
/// focus may lie before the anchor. `marks` holds marks toggled while the
/// selection was collapsed; they apply to the next insertion only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
    pub is_focused: bool,
    pub marks: Option<MarkSet>,
}

impl Selection {
    pub const fn collapsed(point: Point) -> Self {
        Self {
            anchor: point,
            focus: point,
            is_focused: true,
            marks: None,
        }
    }

    pub const fn new(anchor: Point, focus: Point) -> Self {
        Self {
            anchor,
            focus,
            is_focused: true,
            marks: None,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}
