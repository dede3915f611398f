//! Line-by-line drawing surface shared by the node renderers.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::document::{Block, EditorState, Key, Point};

use super::image::Corner;
use super::mark_renderer;

/// A run of editable text drawn on one canvas row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextHit {
    pub row: usize,
    pub col: u16,
    pub key: Key,
    /// Character offset of the first character on this row.
    pub start: usize,
    /// Display width of each character on this row.
    pub widths: Vec<u16>,
}

impl TextHit {
    fn end_col(&self) -> u16 {
        self.widths
            .iter()
            .fold(self.col, |col, width| col.saturating_add(*width))
    }

    /// The offset nearest to `col`, rounding to the closer character edge.
    fn offset_at(&self, col: u16) -> usize {
        let mut edge = self.col;
        for (index, width) in self.widths.iter().enumerate() {
            if col < edge.saturating_add(width.div_ceil(2)) {
                return self.start + index;
            }
            edge = edge.saturating_add(*width);
        }
        self.start + self.widths.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxHit {
    pub row: usize,
    pub col: u16,
    pub width: u16,
    pub key: Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleHit {
    pub row: usize,
    pub col: u16,
    pub key: Key,
    pub corner: Corner,
}

/// Screen area of a void block; clicking it selects the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoidHit {
    pub rows: (usize, usize),
    pub key: Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPos {
    pub row: usize,
    pub col: u16,
}

/// The rendered document: styled lines plus the regions the mouse can hit.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    pub lines: Vec<Line<'static>>,
    pub texts: Vec<TextHit>,
    pub checkboxes: Vec<CheckboxHit>,
    pub handles: Vec<HandleHit>,
    pub voids: Vec<VoidHit>,
    pub cursor: Option<CursorPos>,
}

impl Canvas {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Map a canvas cell to a cursor position.
    ///
    /// Clicks on a row with text land on the nearest character of the
    /// closest run; clicks on an image select it. Rows with neither fall back
    /// to the nearest text row above.
    pub fn point_at(&self, row: usize, col: u16) -> Option<Point> {
        if let Some(hit) = self.voids.iter().find(|hit| (hit.rows.0..=hit.rows.1).contains(&row)) {
            return Some(Point::new(hit.key, 0));
        }
        let on_row: Vec<&TextHit> = self.texts.iter().filter(|hit| hit.row == row).collect();
        if on_row.is_empty() {
            let above = self.texts.iter().filter(|hit| hit.row < row).max_by_key(|hit| hit.row)?;
            return self.point_at(above.row, u16::MAX);
        }
        let hit = on_row
            .iter()
            .find(|hit| col >= hit.col && col < hit.end_col())
            .or_else(|| on_row.iter().rev().find(|hit| col >= hit.col))
            .or_else(|| on_row.first())?;
        Some(Point::new(hit.key, hit.offset_at(col)))
    }

    pub fn checkbox_at(&self, row: usize, col: u16) -> Option<Key> {
        self.checkboxes
            .iter()
            .find(|hit| hit.row == row && col >= hit.col && col < hit.col.saturating_add(hit.width))
            .map(|hit| hit.key)
    }

    pub fn handle_at(&self, row: usize, col: u16) -> Option<(Key, Corner)> {
        self.handles
            .iter()
            .find(|hit| hit.row == row && hit.col == col)
            .map(|hit| (hit.key, hit.corner))
    }
}

/// Drawing state threaded through the node renderers.
pub struct Painter<'a> {
    pub(super) state: &'a EditorState,
    pub(super) width: u16,
    pub(super) canvas: Canvas,
    line: Vec<Span<'static>>,
    col: u16,
}

impl<'a> Painter<'a> {
    pub(super) fn new(state: &'a EditorState, width: u16) -> Self {
        Self {
            state,
            width: width.max(1),
            canvas: Canvas::default(),
            line: Vec::new(),
            col: 0,
        }
    }

    pub(super) fn finish(mut self) -> Canvas {
        if !self.line.is_empty() {
            self.end_line();
        }
        self.canvas
    }

    pub(super) fn row(&self) -> usize {
        self.canvas.lines.len()
    }

    pub(super) const fn col(&self) -> u16 {
        self.col
    }

    /// Append `text` to the current line.
    pub(super) fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        self.col = self.col.saturating_add(width);
        match self.line.last_mut() {
            Some(span) if span.style == style => span.content.to_mut().push_str(text),
            _ => self.line.push(Span::styled(text.to_string(), style)),
        }
    }

    /// Fill with spaces up to column `col`.
    pub(super) fn pad_to(&mut self, col: u16) {
        if col > self.col {
            let gap = " ".repeat(usize::from(col - self.col));
            self.push(&gap, Style::default());
        }
    }

    pub(super) fn end_line(&mut self) {
        let spans = std::mem::take(&mut self.line);
        self.canvas.lines.push(Line::from(spans));
        self.col = 0;
    }

    pub(super) fn blank_line(&mut self) {
        self.end_line();
    }

    /// Draw a clickable check box.
    pub(super) fn checkbox(&mut self, key: Key, checked: bool, style: Style) {
        let label = if checked { "[x]" } else { "[ ]" };
        self.canvas.checkboxes.push(CheckboxHit {
            row: self.row(),
            col: self.col,
            width: 3,
            key,
        });
        self.push(label, style);
    }

    /// Draw a resize handle glyph.
    pub(super) fn handle(&mut self, key: Key, corner: Corner, style: Style) {
        self.canvas.handles.push(HandleHit {
            row: self.row(),
            col: self.col,
            key,
            corner,
        });
        self.push("◆", style);
    }

    pub(super) fn void_region(&mut self, key: Key, first_row: usize) {
        let last_row = self.row().saturating_sub(1).max(first_row);
        self.canvas.voids.push(VoidHit {
            rows: (first_row, last_row),
            key,
        });
    }

    /// Draw the text of a leaf block, wrapping at the right edge back to the
    /// column where the text started. Ends the line.
    pub(super) fn text(&mut self, block: &Block, base: Style) {
        self.paint_text(block, base, true);
        self.end_line();
    }

    /// Draw the text of a leaf block on the current line without wrapping.
    pub(super) fn inline_text(&mut self, block: &Block, base: Style) {
        self.paint_text(block, base, false);
    }

    fn paint_text(&mut self, block: &Block, base: Style, wrap: bool) {
        let Some(text) = block.text() else {
            return;
        };
        let state = self.state;
        let selected = if state.is_collapsed() {
            None
        } else {
            state.range_in(block.key)
        };
        let focus = state.selection().focus;
        let cursor = (state.selection().is_focused && focus.key == block.key).then_some(focus.offset);

        let start_col = self.col;
        let mut hit = TextHit {
            row: self.row(),
            col: start_col,
            key: block.key,
            start: 0,
            widths: Vec::new(),
        };
        for (index, (ch, marks)) in text.chars().enumerate() {
            let width = u16::try_from(ch.width().unwrap_or(0)).unwrap_or(1);
            if wrap && self.col.saturating_add(width) > self.width && self.col > start_col && !hit.widths.is_empty() {
                let next_row = self.row() + 1;
                self.canvas.texts.push(std::mem::replace(
                    &mut hit,
                    TextHit {
                        row: next_row,
                        col: start_col,
                        key: block.key,
                        start: index,
                        widths: Vec::new(),
                    },
                ));
                self.end_line();
                self.pad_to(start_col);
            }
            if cursor == Some(index) {
                self.canvas.cursor = Some(CursorPos {
                    row: self.row(),
                    col: self.col,
                });
            }
            let mut style = marks.iter().fold(base, |style, mark| mark_renderer(mark)(style));
            if selected.as_ref().is_some_and(|range| range.contains(&index)) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let mut buffer = [0; 4];
            self.push(ch.encode_utf8(&mut buffer), style);
            hit.widths.push(width);
        }
        if cursor.is_some_and(|offset| offset >= hit.start + hit.widths.len()) {
            self.canvas.cursor = Some(CursorPos {
                row: self.row(),
                col: self.col,
            });
        }
        self.canvas.texts.push(hit);
    }
}
