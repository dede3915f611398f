//! Colors for the editor chrome.
//!
//! Document content is styled by the schema renderers; this module only
//! covers the toolbar, footer bars and overlays. Uses ANSI colors that
//! adapt to the terminal's palette.

use ratatui::style::{Color, Modifier, Style};

use crate::app::{SaveStatus, ToastLevel};

pub fn toolbar_style() -> Style {
    Style::default().bg(Color::Indexed(236)).fg(Color::Gray)
}

/// A toolbar button, highlighted while its format applies to the selection.
pub fn button_style(active: bool) -> Style {
    if active {
        Style::default()
            .bg(Color::Yellow)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        toolbar_style().fg(Color::White)
    }
}

pub fn status_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

pub fn prompt_style() -> Style {
    Style::default().bg(Color::Blue).fg(Color::White)
}

pub fn toast_style(level: ToastLevel) -> (&'static str, Style) {
    match level {
        ToastLevel::Info => ("[info]", status_style()),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    }
}

pub fn save_indicator(status: SaveStatus) -> (&'static str, Style) {
    match status {
        SaveStatus::Unchanged => ("", status_style()),
        SaveStatus::Saved => ("saved", status_style().fg(Color::LightGreen)),
        SaveStatus::Failed => (
            "NOT SAVED",
            status_style().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        ),
    }
}

pub fn section_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn dim_style() -> Style {
    Style::default().fg(Color::Indexed(245))
}

pub fn overlay_style() -> Style {
    Style::default().bg(Color::Black).fg(Color::White)
}
