//! Frame painting
//!
//! Turns the walker's segment poses into a flat list of [`DrawCommand`]s.
//! Nothing here mutates simulation state.

pub mod commands;
pub mod paint;
pub mod palette;

pub use commands::{DrawCommand, Glow, Rgba, Stroke};
pub use paint::{LABEL_SIZE, RenderView, render_frame};
pub use palette::{DARK, DEBUG_ANCHOR, DEBUG_POINTER, LIGHT, Palette};
