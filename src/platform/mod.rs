//! Platform layer
//!
//! Browser-only pieces. The simulation and paint pass never touch the DOM;
//! everything here just replays their output onto a real surface.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
