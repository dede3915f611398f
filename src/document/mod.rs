//! Document model and editing engine.
//!
//! This module provides:
//! - [`Document`]: the block tree, with [`Block`], [`Text`] and [`Mark`]
//! - [`EditorState`]: a document plus a [`Selection`]
//! - [`Transform`]: chained edits producing the next state
//! - [`list`] and [`table`] helpers built on top of transforms
//! - [`raw`]: the JSON form used for storage

pub mod list;
pub mod raw;
mod selection;
mod state;
pub mod table;
mod transform;
mod types;

pub use list::{closest_list_of_kind, current_list, is_selection_in_list};
pub use raw::{RawError, default_document, from_json, to_json};
pub use selection::{Point, Selection};
pub use state::EditorState;
pub use table::{TablePosition, is_selection_in_table, table_position};
pub use transform::{Motion, Transform};
pub use types::{
    Block, BlockKind, Content, DEFAULT_IMAGE_SIZE, Data, Document, ImageSize, Key, Leaf, Mark,
    MarkSet, Text,
};
