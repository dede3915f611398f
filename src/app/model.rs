use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::document::{EditorState, Key};
use crate::schema::{Canvas, Corner};
use crate::ui::viewport::Viewport;

use super::toolbar::ToolbarButton;

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Outcome of the most recent write to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    /// Nothing changed since the document was loaded.
    #[default]
    Unchanged,
    Saved,
    Failed,
}

/// The image URL prompt shown above the status bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    pub input: String,
}

/// An image resize in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDrag {
    pub key: Key,
    pub corner: Corner,
    /// Screen cell of the previous drag event.
    pub last: (u16, u16),
}

/// Horizontal extent of one toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarSlot {
    pub button: ToolbarButton,
    pub start: u16,
    pub end: u16,
}

/// Where things were drawn in the last frame, for mouse hit-testing.
#[derive(Debug, Clone, Default)]
pub struct ScreenLayout {
    pub toolbar: Vec<ToolbarSlot>,
    pub toolbar_row: u16,
    pub canvas_area: Rect,
    pub canvas: Canvas,
}

impl ScreenLayout {
    pub fn button_at(&self, column: u16, row: u16) -> Option<ToolbarButton> {
        if row != self.toolbar_row {
            return None;
        }
        self.toolbar
            .iter()
            .find(|slot| column >= slot.start && column < slot.end)
            .map(|slot| slot.button)
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The document and selection being edited
    pub state: EditorState,
    /// Viewport over the rendered canvas
    pub viewport: Viewport,
    /// Image URL prompt, when open
    pub prompt: Option<Prompt>,
    /// Image resize in progress
    pub drag: Option<ImageDrag>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Hit map of the last frame
    pub layout: ScreenLayout,
    /// Where the document is stored, for the status bar
    pub store_label: String,
    pub save_status: SaveStatus,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Scroll so the cursor is visible on the next render
    pub(crate) follow_cursor: bool,
    document_changed: bool,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("store_label", &self.store_label)
            .field("save_status", &self.save_status)
            .field("help_visible", &self.help_visible)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model for `state` on a terminal of `terminal_size`.
    pub fn new(state: EditorState, terminal_size: (u16, u16)) -> Self {
        Self {
            state,
            // Toolbar and status bar take one row each.
            viewport: Viewport::new(terminal_size.0, terminal_size.1.saturating_sub(2), 0),
            prompt: None,
            drag: None,
            help_visible: false,
            should_quit: false,
            layout: ScreenLayout::default(),
            store_label: String::new(),
            save_status: SaveStatus::Unchanged,
            config_global_path: None,
            config_local_path: None,
            follow_cursor: true,
            document_changed: false,
            toast: None,
        }
    }

    /// Adopt `next` as the current state.
    ///
    /// Marks the document as changed when the tree differs, so the side
    /// effects persist it.
    pub fn commit(&mut self, next: EditorState) {
        if next.document() != self.state.document() {
            self.document_changed = true;
        }
        self.state = next;
        self.follow_cursor = true;
    }

    /// Whether the document changed since the last call.
    pub fn take_document_changed(&mut self) -> bool {
        std::mem::take(&mut self.document_changed)
    }

    pub const fn prompt_active(&self) -> bool {
        self.prompt.is_some()
    }

    pub(crate) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Translate a screen cell to a row and column of the canvas.
    pub fn canvas_cell(&self, column: u16, row: u16) -> Option<(usize, u16)> {
        let area = self.layout.canvas_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        inside.then(|| {
            (
                self.viewport.offset() + usize::from(row - area.y),
                column - area.x,
            )
        })
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(EditorState::default(), (80, 24))
    }
}
