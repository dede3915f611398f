use ratatui::style::{Color, Modifier, Style};
use unicode_width::UnicodeWidthStr;

use crate::document::Text;

use super::{Painter, RenderProps, render_node};

const MIN_COLUMN_WIDTH: u16 = 6;

/// Spreadsheet-style column name: A..Z, then AA, AB, ...
pub fn column_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    label.iter().rev().collect()
}

fn border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn header_style() -> Style {
    Style::default()
        .fg(Color::Indexed(245))
        .add_modifier(Modifier::BOLD)
}

fn cell_width(text: Option<&Text>) -> u16 {
    let width = text.map_or(0, |text| text.content().width());
    u16::try_from(width).unwrap_or(u16::MAX)
}

/// Draw a horizontal rule such as `├──────┼──────┤`.
fn rule(painter: &mut Painter<'_>, start: u16, columns: &[u16], glyphs: [&str; 3]) {
    painter.pad_to(start);
    let [left, middle, right] = glyphs;
    painter.push(left, border_style());
    for (index, width) in columns.iter().enumerate() {
        if index > 0 {
            painter.push(middle, border_style());
        }
        painter.push(&"─".repeat(usize::from(*width) + 2), border_style());
    }
    painter.push(right, border_style());
    painter.end_line();
}

pub(super) fn table(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    let rows = props.block.children();
    let column_count = rows.iter().map(|row| row.children().len()).max().unwrap_or(0);
    let mut columns = vec![MIN_COLUMN_WIDTH; column_count];
    for row in rows {
        for (index, cell) in row.children().iter().enumerate() {
            columns[index] = columns[index].max(cell_width(cell.text()));
        }
    }

    let focused = painter.state.has_focus_in(props.block.key);
    let digits = rows.len().to_string().len();
    let gutter = if focused {
        u16::try_from(digits + 1).unwrap_or(4)
    } else {
        0
    };
    let start = props.indent.saturating_add(gutter);

    if focused {
        painter.pad_to(start.saturating_add(1));
        for (index, width) in columns.iter().enumerate() {
            let cell_start = painter.col();
            painter.push(&format!(" {}", column_label(index)), header_style());
            painter.pad_to(cell_start.saturating_add(*width).saturating_add(3));
        }
        painter.end_line();
    }

    rule(painter, start, &columns, ["┌", "┬", "┐"]);
    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            rule(painter, start, &columns, ["├", "┼", "┤"]);
        }
        let props = RenderProps {
            block: row,
            indent: props.indent,
            marker: focused.then(|| format!("{:>digits$} ", index + 1)),
            columns: &columns,
        };
        render_node(painter, &props);
    }
    rule(painter, start, &columns, ["└", "┴", "┘"]);
}

pub(super) fn table_row(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    painter.pad_to(props.indent);
    if let Some(label) = &props.marker {
        painter.push(label, header_style());
    }
    for (index, cell) in props.block.children().iter().enumerate() {
        painter.push("│ ", border_style());
        let width = props.columns.get(index).copied().unwrap_or(MIN_COLUMN_WIDTH);
        let cell_props = RenderProps {
            block: cell,
            indent: painter.col(),
            marker: None,
            columns: std::slice::from_ref(props.columns.get(index).unwrap_or(&MIN_COLUMN_WIDTH)),
        };
        table_cell(painter, &cell_props);
        painter.pad_to(cell_props.indent.saturating_add(width).saturating_add(1));
    }
    for width in props.columns.iter().skip(props.block.children().len()) {
        painter.push("│ ", border_style());
        let start = painter.col();
        painter.pad_to(start.saturating_add(*width).saturating_add(1));
    }
    painter.push("│", border_style());
    painter.end_line();
}

/// Cells draw on the row's line and never wrap.
pub(super) fn table_cell(painter: &mut Painter<'_>, props: &RenderProps<'_>) {
    if props.block.is_leaf() {
        painter.inline_text(props.block, Style::default());
    }
}
