//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! The editor-specific behaviour lives in [`toolbar`] and [`keys`]; both
//! only compute new [`EditorState`](crate::document::EditorState) values.

mod effects;
mod event_loop;
mod input;
pub mod keys;
mod model;
pub mod toolbar;
mod update;

pub use model::{ImageDrag, Model, Prompt, SaveStatus, ScreenLayout, ToastLevel, ToolbarSlot};
pub use toolbar::{ToolbarButton, ToolbarOutcome};
pub use update::{Message, update};

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::persist::{self, ContentStore, LoadSource};

/// Main application struct that owns the store, the terminal and the event
/// loop.
pub struct App {
    store: Box<dyn ContentStore>,
    reset: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application editing the document kept in `store`.
    pub fn new(store: Box<dyn ContentStore>) -> Self {
        Self {
            store,
            reset: false,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Discard the stored document before loading.
    pub const fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }

    /// Load the starting document and build the model around it.
    ///
    /// # Errors
    ///
    /// Fails when `--reset` cannot clear the store or the bundled default
    /// document is broken. Unusable stored data only produces a warning.
    pub fn initial_model(&mut self, terminal_size: (u16, u16)) -> Result<Model> {
        if self.reset {
            self.store
                .clear()
                .context("Failed to reset the stored document")?;
            tracing::info!(store = %self.store.describe(), "stored document reset");
        }
        let outcome = persist::load_initial_state(self.store.as_ref())
            .context("Failed to load the initial document")?;

        let mut model = Model::new(outcome.state, terminal_size);
        model.store_label = self.store.describe();
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        if let Some(warning) = outcome.warning {
            model.show_toast(ToastLevel::Warning, warning);
        } else if outcome.source == LoadSource::Default && self.reset {
            model.show_toast(ToastLevel::Info, "Started from the default document");
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests;
