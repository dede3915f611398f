use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::{Model, ToolbarButton};

use super::style::{dim_style, overlay_style, section_style};

pub fn help_lines(model: &Model) -> Vec<Line<'static>> {
    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.push(Line::styled("Toolbar", section_style()));
    for button in ToolbarButton::ALL {
        lines.push(Line::raw(format!(
            "  {:<6} {:<9} {}",
            button.label(),
            button.shortcut(),
            button.description()
        )));
    }
    lines.push(Line::raw(""));

    lines.push(Line::styled("Editing", section_style()));
    lines.push(Line::raw("  Arrows, Home/End    Move (Shift extends)"));
    lines.push(Line::raw("  Ctrl-Home/End       Document start / end"));
    lines.push(Line::raw("  Ctrl-a              Select all"));
    lines.push(Line::raw("  Enter               Split block / new row in tables"));
    lines.push(Line::raw("  Tab / Shift-Tab     Next / previous table cell"));
    lines.push(Line::raw("  Ctrl-t              Tick check-list item"));
    lines.push(Line::raw("  Esc                 Deselect"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Mouse", section_style()));
    lines.push(Line::raw("  Click / drag        Place cursor / select"));
    lines.push(Line::raw("  Click [ ]           Toggle check box"));
    lines.push(Line::raw("  Drag ◆              Resize selected image"));
    lines.push(Line::raw("  Wheel, PageUp/Down  Scroll"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Other", section_style()));
    lines.push(Line::raw("  Ctrl-q / Ctrl-c     Quit"));
    lines.push(Line::raw("  F1                  Toggle help"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Config", section_style()));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));
    lines.push(Line::raw(format!("  Document: {}", model.store_label)));
    lines
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(overlay_style());

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );
    let content_height = inner.height.saturating_sub(1);
    let mut lines = help_lines(model);
    lines.truncate(usize::from(content_height));
    frame.render_widget(
        Paragraph::new(lines),
        Rect::new(inner.x, inner.y, inner.width, content_height),
    );

    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    let footer = Line::styled("Esc or F1 closes", dim_style());
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
