//! Terminal UI components.
//!
//! This module contains the editor chrome around the document canvas:
//! - [`viewport`]: Scroll position over the rendered canvas
//! - [`style`]: Toolbar, footer and overlay colors
//!
//! The document itself is drawn by [`crate::schema`].

pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::help_lines;
pub use render::{canvas_area, render};

/// Blank columns left and right of the canvas.
pub const CANVAS_LEFT_PADDING: u16 = 1;
