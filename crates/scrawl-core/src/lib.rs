pub mod config;
pub mod model;
pub mod transform;

pub use config::BoardConfig;
pub use model::{Color, LineCap, PenState};
pub use transform::{DeviceToBitmapTransform, DisplayBox};

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Point, Vec2};
