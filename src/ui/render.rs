use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, ToolbarButton, ToolbarSlot};
use crate::schema;

use super::{CANVAS_LEFT_PADDING, overlays, status, style};

/// Rows taken by the footer: status bar plus optional prompt and toast.
fn footer_rows(model: &Model) -> u16 {
    1 + u16::from(model.prompt_active()) + u16::from(model.active_toast().is_some())
}

/// The area the document canvas is drawn in, below the toolbar.
pub fn canvas_area(area: Rect, footer_rows: u16) -> Rect {
    let top = area.y.saturating_add(1);
    Rect {
        x: area.x + CANVAS_LEFT_PADDING.min(area.width),
        y: top,
        width: area.width.saturating_sub(CANVAS_LEFT_PADDING * 2).max(1),
        height: area.height.saturating_sub(1 + footer_rows),
    }
}

/// Render the complete UI and record the hit map for mouse input.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let footer = footer_rows(model);

    render_toolbar(model, frame, Rect { height: 1.min(area.height), ..area });
    render_canvas(model, frame, canvas_area(area, footer));

    let row_from_bottom = |n: u16| Rect {
        y: area.y + area.height.saturating_sub(n),
        height: 1,
        ..area
    };
    status::render_status_bar(model, frame, row_from_bottom(1));
    let mut next = 2;
    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, row_from_bottom(next));
        next += 1;
    }
    if model.prompt_active() {
        status::render_prompt_bar(model, frame, row_from_bottom(next));
    }

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_toolbar(model: &mut Model, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::with_capacity(ToolbarButton::ALL.len() * 2);
    let mut slots = Vec::with_capacity(ToolbarButton::ALL.len());
    let mut x = area.x;
    for button in ToolbarButton::ALL {
        let text = format!(" {} ", button.label());
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        slots.push(ToolbarSlot {
            button,
            start: x,
            end: x.saturating_add(width),
        });
        spans.push(Span::styled(text, style::button_style(button.is_active(&model.state))));
        spans.push(Span::styled(" ", style::toolbar_style()));
        x = x.saturating_add(width + 1);
    }
    model.layout.toolbar = slots;
    model.layout.toolbar_row = area.y;
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(style::toolbar_style()),
        area,
    );
}

fn render_canvas(model: &mut Model, frame: &mut Frame, area: Rect) {
    let canvas = schema::render_document(&model.state, area.width);

    model.viewport.resize(area.width, area.height);
    model.viewport.set_total_lines(canvas.line_count());
    if model.follow_cursor {
        if let Some(cursor) = canvas.cursor {
            model.viewport.ensure_visible(cursor.row);
        }
        model.follow_cursor = false;
    }

    let range = model.viewport.visible_range();
    let lines: Vec<Line<'static>> = canvas.lines[range.clone()].to_vec();
    frame.render_widget(Paragraph::new(lines), area);

    let show_cursor = model.state.selection().is_focused
        && model.state.is_collapsed()
        && !model.help_visible
        && !model.prompt_active();
    if show_cursor
        && let Some(cursor) = canvas.cursor
        && range.contains(&cursor.row)
        && cursor.col < area.width
    {
        let row = u16::try_from(cursor.row - range.start).unwrap_or(0);
        frame.set_cursor_position((area.x + cursor.col, area.y + row));
    }

    model.layout.canvas_area = area;
    model.layout.canvas = canvas;
}
