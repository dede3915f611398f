// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. schema::SchemaError)
    clippy::module_name_repetitions
)]

//! # Tern
//!
//! A terminal rich-text editor.
//!
//! Tern edits a tree-shaped document in the terminal with:
//! - Headings, block quotes, bulleted and numbered lists
//! - Tables with spreadsheet-style row/column headers
//! - Check-list items with clickable boxes
//! - Image frames with drag-to-resize handles
//! - Bold / italic / underlined / code marks
//!
//! Every document change is written to a local key-value store, and the
//! stored document is loaded again on the next start.
//!
//! ## Architecture
//!
//! Tern uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state (the current [`document::EditorState`])
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`document`]: Document tree, selection and transforms
//! - [`schema`]: Per-node and per-mark renderers
//! - [`app`]: Toolbar, key commands, main loop and state
//! - [`persist`]: Load/save of the serialized document
//! - [`ui`]: Terminal UI chrome (toolbar, status bar, overlays)
//! - [`config`]: Saved command-line defaults

pub mod app;
pub mod config;
pub mod document;
pub mod persist;
pub mod schema;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{BlockKind, Document, EditorState, Mark};
    pub use crate::persist::{ContentStore, FileStore, MemoryStore};
    pub use crate::ui::viewport::Viewport;
}
