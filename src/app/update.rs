use crossterm::event::KeyEvent;

use crate::app::Model;
use crate::app::keys::{default_key_action, on_key_down};
use crate::app::model::{ImageDrag, Prompt};
use crate::app::toolbar::{self, ToolbarButton, ToolbarOutcome};
use crate::document::{Block, Key, Point};
use crate::schema::{Corner, PX_PER_COLUMN, PX_PER_ROW, drag_image, set_checked};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// A key press for the editor canvas
    Key(KeyEvent),
    /// Toolbar button pressed
    Toolbar(ToolbarButton),
    /// Check box of a check-list item clicked
    ToggleChecked(Key),
    /// Click in the text
    PlaceCursor(Point),
    /// Shift-click or mouse drag in the text
    ExtendSelection(Point),

    // Image resizing
    /// Mouse down on an image handle, at a screen cell
    StartImageDrag {
        key: Key,
        corner: Corner,
        column: u16,
        row: u16,
    },
    /// Mouse moved with a handle held
    DragImage { column: u16, row: u16 },
    /// Handle released
    EndImageDrag,

    // Image URL prompt
    PromptInput(char),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,

    // Navigation
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// No side effects should occur in this function; persisting the
/// document is left to the event loop.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Editing
        Message::Key(key) => {
            let next =
                on_key_down(&model.state, &key).or_else(|| default_key_action(&model.state, &key));
            if let Some(next) = next {
                model.commit(next);
            }
        }
        Message::Toolbar(button) => match toolbar::on_click(&model.state, button) {
            ToolbarOutcome::Transformed(next) => model.commit(next),
            ToolbarOutcome::PromptImageUrl => model.prompt = Some(Prompt::default()),
        },
        Message::ToggleChecked(key) => {
            let checked = model.state.document().find(key).is_some_and(Block::checked);
            let next = set_checked(&model.state, key, !checked);
            model.commit(next);
        }
        Message::PlaceCursor(point) => {
            let next = model.state.transform().select(point).apply();
            model.commit(next);
        }
        Message::ExtendSelection(point) => {
            let next = model.state.transform().extend_to(point).apply();
            model.commit(next);
        }

        // Image resizing
        Message::StartImageDrag {
            key,
            corner,
            column,
            row,
        } => {
            model.drag = Some(ImageDrag {
                key,
                corner,
                last: (column, row),
            });
        }
        Message::DragImage { column, row } => {
            if let Some(mut drag) = model.drag {
                let delta = (
                    (i64::from(column) - i64::from(drag.last.0)) * PX_PER_COLUMN,
                    (i64::from(row) - i64::from(drag.last.1)) * PX_PER_ROW,
                );
                if delta != (0, 0)
                    && let Some(next) = drag_image(&model.state, drag.key, drag.corner, delta)
                {
                    model.commit(next);
                }
                drag.last = (column, row);
                model.drag = Some(drag);
            }
        }
        Message::EndImageDrag => {
            model.drag = None;
        }

        // Prompt
        Message::PromptInput(ch) => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input.push(ch);
            }
        }
        Message::PromptBackspace => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input.pop();
            }
        }
        Message::PromptSubmit => {
            if let Some(prompt) = model.prompt.take()
                && let Some(next) = toolbar::insert_image(&model.state, &prompt.input)
            {
                model.commit(next);
            }
        }
        Message::PromptCancel => {
            model.prompt = None;
        }

        // Navigation
        Message::ScrollUp(n) => {
            model.viewport.scroll_up(n);
            model.follow_cursor = false;
        }
        Message::ScrollDown(n) => {
            model.viewport.scroll_down(n);
            model.follow_cursor = false;
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }

        // Window
        Message::Resize(width, height) => {
            model.viewport.resize(width, height.saturating_sub(2));
            model.follow_cursor = true;
        }
        // Redraw: no state change needed
        Message::Redraw => {}

        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}
