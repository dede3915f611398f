//! Scroll position over the rendered canvas.
//!
//! The [`Viewport`] tracks which canvas rows are on screen. The canvas is
//! re-rendered every frame, so the total row count changes as the document
//! is edited.

use std::ops::Range;

/// The visible window onto the rendered canvas.
///
/// # Example
///
/// ```
/// use tern::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 10, 50);
/// assert_eq!(vp.visible_range(), 0..10);
///
/// vp.ensure_visible(14);
/// assert_eq!(vp.visible_range(), 5..15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// Create a viewport `width` × `height` cells over `total_lines` rows.
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    /// First visible canvas row.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Canvas rows on screen, clamped to the canvas.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + usize::from(self.height)).min(self.total_lines);
        start..end
    }

    /// How far down the canvas the viewport is, 0-100.
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        let percent = self.offset.min(max_offset) * 100 / max_offset;
        u8::try_from(percent).unwrap_or(100)
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    /// Scroll the least amount that brings `line` on screen.
    pub fn ensure_visible(&mut self, line: usize) {
        if line < self.offset {
            self.offset = line;
        } else if self.height > 0 && line >= self.offset + usize::from(self.height) {
            self.offset = line + 1 - usize::from(self.height);
        }
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the canvas length after a re-render.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}
