//! Event-driven freehand drawing on a raster surface.
//!
//! `Board` is the entry point: feed it pointer, toolbar, and scroll events
//! and it drives a `StrokeSurface` over any `Rasterizer` backend.

pub mod board;
pub mod input;
pub mod surface;
pub mod toolbar;

pub use board::{Board, BoardResponse, Export, ScrollMetrics};
pub use input::{InputEvent, MouseSample, PointerSample, PointerSource, TouchSample};
pub use surface::{PointerSession, StrokeSurface};
pub use toolbar::{Palette, ToolbarEvent};
