//! Viewport → bitmap coordinate mapping.
//!
//! The bitmap is usually displayed at a different size than its pixel
//! dimensions (CSS stretching, device pixel ratio, a height that has grown
//! since layout). Input arrives in viewport coordinates, so every event is
//! mapped through a `DeviceToBitmapTransform` built from the *current*
//! display box. The transform is never cached.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// The surface's displayed bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A box at the viewport origin displayed at exactly the bitmap size.
    pub fn unscaled(bitmap_width: u32, bitmap_height: u32) -> Self {
        Self::new(0.0, 0.0, bitmap_width as f64, bitmap_height as f64)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

/// Scale correction between displayed size and bitmap resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceToBitmapTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub origin: Point,
}

impl DeviceToBitmapTransform {
    /// Derive the transform for a bitmap of `bitmap_size` shown in `display`.
    ///
    /// A degenerate display dimension (zero, negative, non-finite) maps that
    /// axis at scale 1.
    pub fn compute(bitmap_width: u32, bitmap_height: u32, display: &DisplayBox) -> Self {
        Self {
            scale_x: axis_scale(bitmap_width, display.width),
            scale_y: axis_scale(bitmap_height, display.height),
            origin: display.origin(),
        }
    }

    /// Map a raw viewport point to bitmap space.
    pub fn map(&self, raw: Point) -> Point {
        let local: Vec2 = raw - self.origin;
        Point::new(local.x * self.scale_x, local.y * self.scale_y)
    }
}

fn axis_scale(bitmap: u32, displayed: f64) -> f64 {
    if displayed.is_finite() && displayed > 0.0 {
        bitmap as f64 / displayed
    } else {
        1.0
    }
}

/// Convenience: compute and apply in one step.
pub fn map_to_bitmap(raw: Point, bitmap_width: u32, bitmap_height: u32, display: &DisplayBox) -> Point {
    DeviceToBitmapTransform::compute(bitmap_width, bitmap_height, display).map(raw)
}
