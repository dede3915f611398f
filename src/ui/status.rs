use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::Model;

use super::style;

pub fn render_prompt_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(prompt) = model.prompt.as_ref() else {
        return;
    };
    let label = "Image URL: ";
    let hint = "  Enter: insert  Esc: cancel";
    let bar = Paragraph::new(format!("{label}{}{hint}", prompt.input)).style(style::prompt_style());
    frame.render_widget(bar, area);

    let typed = u16::try_from(label.width() + prompt.input.width()).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(typed).min(area.right().saturating_sub(1));
    frame.set_cursor_position((x, area.y));
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let state = &model.state;
    let block = state
        .start_block()
        .map_or_else(|| "-".to_string(), |block| block.kind.to_string());
    let marks = state.marks();
    let marks = if marks.is_empty() {
        "-".to_string()
    } else {
        marks.iter().map(|mark| mark.tag()).collect::<Vec<_>>().join(" ")
    };
    let (saved, saved_style) = style::save_indicator(model.save_status);

    let mut spans = vec![
        Span::raw(format!(" {block}")),
        Span::raw(format!("  [{marks}]")),
        Span::raw(format!("  {}", model.store_label)),
    ];
    if !saved.is_empty() {
        spans.push(Span::styled(format!(" ({saved})"), saved_style));
    }
    spans.push(Span::raw(format!(
        "  [{}%]  F1:help",
        model.viewport.scroll_percent()
    )));

    let status_bar = Paragraph::new(Line::from(spans)).style(style::status_style());
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = style::toast_style(level);
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
