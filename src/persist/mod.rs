//! Loading and saving the serialized document.
//!
//! The document is kept as raw JSON under a single key of a
//! [`ContentStore`]. [`load_initial_state`] falls back to the bundled
//! default document when nothing usable is stored; [`save_state`] is called
//! after every document change.

mod store;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::document::{self, EditorState, RawError};

pub use store::{ContentStore, FileStore, MemoryStore};

/// Storage key used when none is configured.
pub const DEFAULT_KEY: &str = "content";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to remove {}: {source}", path.display())]
    Remove { path: PathBuf, source: io::Error },
    #[error("invalid storage key {0:?}: must be a plain file name")]
    InvalidKey(String),
    #[error("failed to serialize document: {0}")]
    Encode(#[source] RawError),
    #[error("bundled default document is invalid: {0}")]
    DefaultDocument(#[source] RawError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Stored,
    Default,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub state: EditorState,
    pub source: LoadSource,
    /// Set when stored data existed but could not be used.
    pub warning: Option<String>,
}

fn default_outcome(warning: Option<String>) -> Result<LoadOutcome, PersistError> {
    let document = document::default_document().map_err(PersistError::DefaultDocument)?;
    Ok(LoadOutcome {
        state: EditorState::new(document),
        source: LoadSource::Default,
        warning,
    })
}

/// The state to start editing with.
///
/// Absent data gives the default document. Unreadable or malformed data
/// also gives the default document, plus a warning; only a broken bundled
/// default is an error.
pub fn load_initial_state(store: &dyn ContentStore) -> Result<LoadOutcome, PersistError> {
    let raw = match store.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(store = %store.describe(), "no stored document, using default");
            return default_outcome(None);
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not read stored document");
            return default_outcome(Some(format!("Could not read saved document: {err}")));
        }
    };

    match document::from_json(&raw) {
        Ok(document) => {
            tracing::debug!(store = %store.describe(), bytes = raw.len(), "loaded stored document");
            Ok(LoadOutcome {
                state: EditorState::new(document),
                source: LoadSource::Stored,
                warning: None,
            })
        }
        Err(err) => {
            tracing::warn!(error = %err, "stored document is malformed, using default");
            default_outcome(Some(format!("Saved document was unreadable ({err}); started fresh")))
        }
    }
}

/// Serialize the document of `state` and write it to `store`.
pub fn save_state(store: &mut dyn ContentStore, state: &EditorState) -> Result<(), PersistError> {
    let raw = document::to_json(state.document()).map_err(PersistError::Encode)?;
    store.save(&raw)?;
    tracing::debug!(store = %store.describe(), bytes = raw.len(), "saved document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Document};

    #[test]
    fn test_empty_store_loads_default() {
        let store = MemoryStore::new();
        let outcome = load_initial_state(&store).unwrap();
        assert_eq!(outcome.source, LoadSource::Default);
        assert!(outcome.warning.is_none());
        assert_eq!(
            outcome.state.document(),
            &document::default_document().unwrap()
        );
    }

    #[test]
    fn test_saved_state_loads_back() {
        let mut store = MemoryStore::new();
        let state = EditorState::new(Document::new(vec![Block::paragraph("kept")]));
        save_state(&mut store, &state).unwrap();

        let outcome = load_initial_state(&store).unwrap();
        assert_eq!(outcome.source, LoadSource::Stored);
        let leaves = outcome.state.document().leaf_blocks();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].text().map(|text| text.content()).as_deref(), Some("kept"));
    }

    #[test]
    fn test_malformed_data_falls_back_with_warning() {
        let store = MemoryStore::with_content("{not json");
        let outcome = load_initial_state(&store).unwrap();
        assert_eq!(outcome.source, LoadSource::Default);
        assert!(outcome.warning.is_some());
    }

    #[test]
    fn test_wrong_shape_falls_back_with_warning() {
        let store = MemoryStore::with_content(r#"{"document":{"nodes":[{"kind":"text","ranges":[]}]}}"#);
        let outcome = load_initial_state(&store).unwrap();
        assert_eq!(outcome.source, LoadSource::Default);
        assert!(outcome.warning.is_some());
    }

    #[test]
    fn test_every_save_writes() {
        let mut store = MemoryStore::new();
        let state = EditorState::default();
        save_state(&mut store, &state).unwrap();
        save_state(&mut store, &state).unwrap();
        assert_eq!(store.writes(), 2);
    }
}
