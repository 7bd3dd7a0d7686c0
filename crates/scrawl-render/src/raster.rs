//! The rasterizer capability.
//!
//! A backend owns the pixel buffer and knows how to draw round-capped line
//! segments into it, capture and restore its pixels, and encode it as PNG.
//! Two backends exist: `PixmapRasterizer` (software, tiny-skia) and the
//! browser canvas backend in `scrawl-wasm`.

use crate::error::RasterError;
use scrawl_core::{PenState, Point};

/// A captured copy of a bitmap's pixels.
///
/// `data` is row-major, 4 bytes per pixel, in the backend's native layout
/// (premultiplied for tiny-skia, straight RGBA for a browser canvas).
/// Restoring onto a `PixmapRasterizer` is bit-exact. A browser canvas keeps
/// premultiplied pixels internally, so its antialiased translucent edges may
/// shift by a rounding step per round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Snapshot {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        }
    }

    pub fn row_bytes(&self) -> usize {
        self.width as usize * 4
    }

    /// Check that `data` matches the declared dimensions.
    pub fn validate(&self) -> Result<(), RasterError> {
        let expected = byte_len(self.width, self.height);
        if self.data.len() == expected {
            Ok(())
        } else {
            Err(RasterError::SnapshotSize {
                width: self.width,
                height: self.height,
                expected,
                actual: self.data.len(),
            })
        }
    }

    /// Copy this snapshot into a `dst_width`-wide row-major buffer,
    /// anchored at the top-left. Pixels outside the destination are cropped;
    /// destination pixels outside the snapshot are left untouched.
    pub fn blit_into(&self, dst: &mut [u8], dst_width: u32, dst_height: u32) {
        let cols = self.width.min(dst_width) as usize * 4;
        let rows = self.height.min(dst_height) as usize;
        let dst_stride = dst_width as usize * 4;
        for (y, src_row) in self.data.chunks_exact(self.row_bytes().max(1)).take(rows).enumerate() {
            let start = y * dst_stride;
            dst[start..start + cols].copy_from_slice(&src_row[..cols]);
        }
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// A pixel buffer that can draw pen strokes.
///
/// Resizing is destructive: **`resize` clears every pixel and resets the
/// applied pen to the backend default**, exactly like assigning a canvas's
/// width or height. Callers that want to keep content must `snapshot`
/// before and `restore` after, then re-apply the pen.
pub trait Rasterizer {
    /// Bitmap size in device pixels, `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Set the draw attributes used by subsequent `stroke_segment` calls.
    fn apply_pen(&mut self, pen: &PenState);

    /// Draw a single independent segment with the applied pen.
    /// A zero-length segment draws a dot.
    fn stroke_segment(&mut self, from: Point, to: Point) -> Result<(), RasterError>;

    /// Erase every pixel to transparent. Draw attributes are kept.
    fn clear(&mut self);

    fn snapshot(&self) -> Result<Snapshot, RasterError>;

    /// Resize the bitmap. Clears content and resets draw attributes.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), RasterError>;

    /// Write a snapshot back at the top-left corner, cropping to the bitmap.
    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), RasterError>;

    fn encode_png(&self) -> Result<Vec<u8>, RasterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blit_crops_and_anchors_top_left() {
        // 2x2 snapshot, pixel values tagged by position.
        let snap = Snapshot {
            width: 2,
            height: 2,
            data: vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4],
        };
        let mut dst = vec![0u8; 12];
        snap.blit_into(&mut dst, 3, 1);
        assert_eq!(dst, vec![1, 1, 1, 1, 2, 2, 2, 2, 0, 0, 0, 0]);
    }

    #[test]
    fn validate_rejects_short_buffers() {
        let snap = Snapshot {
            width: 4,
            height: 4,
            data: vec![0; 10],
        };
        assert!(matches!(
            snap.validate(),
            Err(RasterError::SnapshotSize { expected: 64, actual: 10, .. })
        ));
        assert!(Snapshot::empty(4, 4).validate().is_ok());
    }
}
