//! Document schema: how every node type and mark is drawn.
//!
//! The registry is a pair of exhaustive matches, [`node_renderer`] and
//! [`mark_renderer`]. Adding a [`BlockKind`] or [`Mark`] variant without a
//! renderer does not compile.
//!
//! [`render_document`] walks the tree and produces a [`Canvas`]: styled
//! terminal lines plus the hit regions used for mouse input.

mod image;
mod painter;
mod table;

use ratatui::style::{Color, Modifier, Style};

use crate::document::{Block, BlockKind, Data, EditorState, Key, Mark};

pub use image::{Corner, MIN_IMAGE_SIZE, PX_PER_COLUMN, PX_PER_ROW, drag_image, resize_image};
pub use painter::{Canvas, CheckboxHit, CursorPos, HandleHit, Painter, TextHit, VoidHit};
pub use table::column_label;

/// Everything a node renderer gets to look at.
#[derive(Debug, Clone)]
pub struct RenderProps<'a> {
    pub block: &'a Block,
    /// Left margin in columns.
    pub indent: u16,
    /// List marker or row label supplied by the parent.
    pub marker: Option<String>,
    /// Column widths supplied by a parent table.
    pub columns: &'a [u16],
}

impl<'a> RenderProps<'a> {
    pub const fn new(block: &'a Block) -> Self {
        Self {
            block,
            indent: 0,
            marker: None,
            columns: &[],
        }
    }

    fn child(&self, block: &'a Block) -> Self {
        Self {
            block,
            indent: self.indent,
            marker: None,
            columns: self.columns,
        }
    }
}

pub type NodeRenderer = fn(&mut Painter<'_>, &RenderProps<'_>);
pub type MarkRenderer = fn(Style) -> Style;

/// The renderer for a node type.
pub fn node_renderer(kind: BlockKind) -> NodeRenderer {
    match kind {
        BlockKind::Paragraph => paragraph,
        BlockKind::HeadingOne => heading_one,
        BlockKind::HeadingTwo => heading_two,
        BlockKind::BlockQuote => block_quote,
        BlockKind::BulletedList | BlockKind::NumberedList => list,
        BlockKind::ListItem => list_item,
        BlockKind::Table => table::table,
        BlockKind::TableRow => table::table_row,
        BlockKind::TableCell => table::table_cell,
        BlockKind::Image => image::image,
        BlockKind::CheckListItem => check_list_item,
    }
}

/// The style transform for a mark.
pub fn mark_renderer(mark: Mark) -> MarkRenderer {
    match mark {
        Mark::Bold => bold,
        Mark::Italic => italic,
        Mark::Underlined => underlined,
        Mark::Code => code,
    }
}

fn bold(style: Style) -> Style {
    style.add_modifier(Modifier::BOLD)
}

fn italic(style: Style) -> Style {
    style.add_modifier(Modifier::ITALIC)
}

fn underlined(style: Style) -> Style {
    style.add_modifier(Modifier::UNDERLINED)
}

fn code(style: Style) -> Style {
    style.fg(Color::Yellow).bg(Color::Indexed(236))
}

/// Draw the whole document `width` columns wide.
pub fn render_document(state: &EditorState, width: u16) -> Canvas {
    let mut painter = Painter::new(state, width);
    for (index, block) in state.document().nodes().iter().enumerate() {
        if index > 0 {
            painter.blank_line();
        }
        render_node(&mut painter, &RenderProps::new(block));
    }
    painter.finish()
}

pub fn render_node(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    node_renderer(props.block.kind)(painter, props);
}

/// The next state after a check-box click.
pub fn set_checked(state: &EditorState, key: Key, checked: bool) -> EditorState {
    let mut data = Data::new();
    data.insert("checked".to_string(), checked.into());
    state.transform().set_node_data_by_key(key, data).apply()
}

fn indent(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    painter.pad_to(props.indent);
}

fn paragraph(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    indent(painter, props);
    painter.text(props.block, Style::default());
}

fn heading_one(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    indent(painter, props);
    painter.text(
        props.block,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    );
}

fn heading_two(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    indent(painter, props);
    painter.text(
        props.block,
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    );
}

fn block_quote(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    indent(painter, props);
    painter.push("│ ", Style::default().fg(Color::Blue));
    painter.text(
        props.block,
        Style::default().fg(Color::Blue).add_modifier(Modifier::ITALIC),
    );
}

fn list(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    let numbered = props.block.kind == BlockKind::NumberedList;
    let mut number = 0;
    for child in props.block.children() {
        let mut child_props = props.child(child);
        if child.kind.is_list() {
            child_props.indent += 2;
        } else if child.kind == BlockKind::ListItem {
            number += 1;
            child_props.marker = Some(if numbered {
                format!("{number}. ")
            } else {
                "• ".to_string()
            });
        }
        render_node(painter, &child_props);
    }
}

fn list_item(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    indent(painter, props);
    let marker = props.marker.as_deref().unwrap_or("• ");
    painter.push(marker, Style::default().fg(Color::Yellow));
    painter.text(props.block, Style::default());
}

fn check_list_item(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    indent(painter, props);
    let checked = props.block.checked();
    let box_style = if checked {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Yellow)
    };
    painter.checkbox(props.block.key, checked, box_style);
    painter.push(" ", Style::default());
    let text_style = if checked {
        Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };
    painter.text(props.block, text_style);
}
