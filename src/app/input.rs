use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, Message, Model, ToolbarButton};

use super::event_loop::ResizeDebouncer;

const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => handle_key(*key, model),
            Event::Mouse(mouse) => handle_mouse(*mouse, model),
            Event::Resize(width, height) => {
                tracing::trace!(width, height, "resize queued");
                resize_debouncer.queue(*width, *height, now_ms);
                None
            }
            _ => None,
        }
    }
}

pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && matches!(key.code, KeyCode::Char('q' | 'c')) {
        return Some(Message::Quit);
    }

    if model.help_visible {
        return match key.code {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q') => Some(Message::HideHelp),
            _ => None,
        };
    }

    if model.prompt_active() {
        return match key.code {
            KeyCode::Esc => Some(Message::PromptCancel),
            KeyCode::Enter => Some(Message::PromptSubmit),
            KeyCode::Backspace => Some(Message::PromptBackspace),
            KeyCode::Char(ch) if !ctrl => Some(Message::PromptInput(ch)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::F(1) => Some(Message::ToggleHelp),
        KeyCode::PageUp => Some(Message::ScrollUp(usize::from(model.viewport.height()))),
        KeyCode::PageDown => Some(Message::ScrollDown(usize::from(model.viewport.height()))),
        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::ALT) => {
            ToolbarButton::from_alt_key(ch).map(Message::Toolbar)
        }
        _ => Some(Message::Key(key)),
    }
}

pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    if model.help_visible {
        return matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
            .then_some(Message::HideHelp);
    }
    if model.prompt_active() {
        return None;
    }

    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            // The toolbar swallows the press so the cursor stays put.
            if let Some(button) = model.layout.button_at(column, row) {
                return Some(Message::Toolbar(button));
            }
            let (line, col) = model.canvas_cell(column, row)?;
            let canvas = &model.layout.canvas;
            if let Some((key, corner)) = canvas.handle_at(line, col) {
                return Some(Message::StartImageDrag {
                    key,
                    corner,
                    column,
                    row,
                });
            }
            if let Some(key) = canvas.checkbox_at(line, col) {
                return Some(Message::ToggleChecked(key));
            }
            let point = canvas.point_at(line, col)?;
            if mouse.modifiers.contains(KeyModifiers::SHIFT) {
                Some(Message::ExtendSelection(point))
            } else {
                Some(Message::PlaceCursor(point))
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if model.drag.is_some() {
                return Some(Message::DragImage { column, row });
            }
            let (line, col) = model.canvas_cell(column, row)?;
            model
                .layout
                .canvas
                .point_at(line, col)
                .map(Message::ExtendSelection)
        }
        MouseEventKind::Up(MouseButton::Left) => model.drag.map(|_| Message::EndImageDrag),
        MouseEventKind::ScrollUp => Some(Message::ScrollUp(WHEEL_LINES)),
        MouseEventKind::ScrollDown => Some(Message::ScrollDown(WHEEL_LINES)),
        _ => None,
    }
}
