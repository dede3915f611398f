//! Image frames and resize handles.
//!
//! Images are void blocks; nothing of the picture itself is drawn. The
//! frame is sized from the stored pixel dimensions.

use ratatui::style::{Color, Modifier, Style};
use unicode_width::UnicodeWidthChar;

use crate::document::{BlockKind, Data, EditorState, ImageSize, Key};

use super::{Painter, RenderProps};

/// Smallest width or height, in pixels, an image can be resized to.
pub const MIN_IMAGE_SIZE: i64 = 16;
pub const PX_PER_COLUMN: i64 = 8;
pub const PX_PER_ROW: i64 = 16;

const MIN_FRAME_COLUMNS: i64 = 12;
const MIN_FRAME_ROWS: i64 = 3;
const MAX_FRAME_ROWS: i64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Which way a positive drag along each axis moves this corner's edges.
    const fn signs(self) -> (i64, i64) {
        match self {
            Self::TopLeft => (-1, -1),
            Self::TopRight => (1, -1),
            Self::BottomLeft => (-1, 1),
            Self::BottomRight => (1, 1),
        }
    }
}

/// New dimensions after dragging `corner` by `delta` pixels.
///
/// Dragging the bottom-right corner adds the delta; the other corners grow
/// the image when dragged away from it. Both sides stay at or above
/// [`MIN_IMAGE_SIZE`].
pub fn resize_image(size: ImageSize, corner: Corner, delta: (i64, i64)) -> ImageSize {
    let (sx, sy) = corner.signs();
    ImageSize {
        width: size.width.saturating_add(sx * delta.0).max(MIN_IMAGE_SIZE),
        height: size.height.saturating_add(sy * delta.1).max(MIN_IMAGE_SIZE),
    }
}

/// The next state after dragging a handle of the image `key`, or `None`
/// when `key` is not an image.
pub fn drag_image(
    state: &EditorState,
    key: Key,
    corner: Corner,
    delta: (i64, i64),
) -> Option<EditorState> {
    let block = state
        .document()
        .find(key)
        .filter(|block| block.kind == BlockKind::Image)?;
    let size = resize_image(block.image_size(), corner, delta);
    let mut data = Data::new();
    data.insert("width".to_string(), size.width.into());
    data.insert("height".to_string(), size.height.into());
    Some(state.transform().merge_node_data_by_key(key, data).apply())
}

fn frame_columns(size: ImageSize, available: u16) -> u16 {
    let columns = (size.width / PX_PER_COLUMN)
        .max(MIN_FRAME_COLUMNS)
        .min(i64::from(available))
        .max(4);
    u16::try_from(columns).unwrap_or(available)
}

fn frame_rows(size: ImageSize) -> usize {
    usize::try_from((size.height / PX_PER_ROW).clamp(MIN_FRAME_ROWS, MAX_FRAME_ROWS)).unwrap_or(3)
}

/// Truncate `text` to at most `width` display columns.
fn fit(text: &str, width: u16) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|ch| {
            used += ch.width().unwrap_or(0);
            used <= usize::from(width)
        })
        .collect()
}

pub(super) fn image(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    let block = props.block;
    let state = painter.state;
    let active = state.selection().is_focused && state.has_edge_in(block.key);
    let size = block.image_size();
    let available = painter.width.saturating_sub(props.indent);
    let columns = frame_columns(size, available);
    let inner = columns.saturating_sub(2);
    let rows = frame_rows(size);

    let border = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Magenta)
    };
    let label = Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC);
    let horizontal = "─".repeat(usize::from(inner));
    let first_row = painter.row();

    let edge = |painter: &mut Painter<'_>, left: (Corner, &str), right: (Corner, &str)| {
        painter.pad_to(props.indent);
        if active {
            painter.handle(block.key, left.0, border);
        } else {
            painter.push(left.1, border);
        }
        painter.push(&horizontal, border);
        if active {
            painter.handle(block.key, right.0, border);
        } else {
            painter.push(right.1, border);
        }
        painter.end_line();
    };

    edge(&mut *painter, (Corner::TopLeft, "┌"), (Corner::TopRight, "┐"));
    let src = block.image_src().unwrap_or("(no source)");
    let captions = [
        format!(" image: {src}"),
        format!(" {}×{}", size.width, size.height),
    ];
    for row in 0..rows {
        painter.pad_to(props.indent);
        painter.push("│", border);
        let start = painter.col();
        if let Some(caption) = captions.get(row) {
            painter.push(&fit(caption, inner), label);
        }
        painter.pad_to(start + inner);
        painter.push("│", border);
        painter.end_line();
    }
    edge(&mut *painter, (Corner::BottomLeft, "└"), (Corner::BottomRight, "┘"));

    painter.void_region(block.key, first_row);
}
