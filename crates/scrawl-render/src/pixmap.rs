//! Software rasterizer backed by a tiny-skia `Pixmap`.
//!
//! Used natively and in tests. Pixels are stored premultiplied; snapshots
//! carry that layout verbatim so a snapshot/restore cycle is bit-exact.

use crate::error::RasterError;
use crate::png::transparent_png;
use crate::raster::{Rasterizer, Snapshot, byte_len};
use scrawl_core::{Color, LineCap, PenState, Point};
use tiny_skia::{
    ColorU8, FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke, Transform,
};

/// Draw attributes a freshly sized bitmap starts with.
const BACKEND_DEFAULT_PEN: PenState = PenState {
    color: Color::BLACK,
    width: 1.0,
    cap: LineCap::Round,
};

/// Segments shorter than this are drawn as dots.
const DOT_EPSILON: f64 = 1e-6;

pub struct PixmapRasterizer {
    width: u32,
    height: u32,
    /// `None` while either dimension is zero; tiny-skia has no empty pixmaps.
    pixmap: Option<Pixmap>,
    /// `None` after construction or a resize: the backend default is in effect.
    applied: Option<PenState>,
}

impl PixmapRasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixmap: Pixmap::new(width, height),
            applied: None,
        }
    }

    /// The pen explicitly applied since the last resize, if any.
    pub fn applied_pen(&self) -> Option<&PenState> {
        self.applied.as_ref()
    }

    /// Read a pixel as straight (non-premultiplied) RGBA.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Overwrite a single pixel with straight RGBA. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        if let Some(pixmap) = self.pixmap.as_mut() {
            let [r, g, b, a] = rgba;
            let idx = y as usize * self.width as usize + x as usize;
            pixmap.pixels_mut()[idx] = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted_pixel_count(&self) -> usize {
        self.pixmap.as_ref().map_or(0, |p| {
            p.pixels()
                .iter()
                .filter(|px: &&PremultipliedColorU8| px.alpha() != 0)
                .count()
        })
    }

    fn paint(&self) -> Paint<'static> {
        let pen = self.applied.unwrap_or(BACKEND_DEFAULT_PEN);
        let [r, g, b, a] = pen.color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        paint
    }
}

impl Rasterizer for PixmapRasterizer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn apply_pen(&mut self, pen: &PenState) {
        self.applied = Some(*pen);
    }

    fn stroke_segment(&mut self, from: Point, to: Point) -> Result<(), RasterError> {
        let pen = self.applied.unwrap_or(BACKEND_DEFAULT_PEN);
        let paint = self.paint();
        let Some(pixmap) = self.pixmap.as_mut() else {
            return Ok(());
        };

        if (to - from).hypot() < DOT_EPSILON {
            // A round cap on a zero-length segment is a filled disc.
            let path = PathBuilder::from_circle(from.x as f32, from.y as f32, pen.radius())
                .ok_or(RasterError::EmptyPath)?;
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        } else {
            let mut pb = PathBuilder::new();
            pb.move_to(from.x as f32, from.y as f32);
            pb.line_to(to.x as f32, to.y as f32);
            let path = pb.finish().ok_or(RasterError::EmptyPath)?;
            let stroke = Stroke {
                width: pen.width,
                line_cap: match pen.cap {
                    LineCap::Round => tiny_skia::LineCap::Round,
                },
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
        log::trace!(
            "SEGMENT ({:.1}, {:.1}) -> ({:.1}, {:.1}) w={}",
            from.x,
            from.y,
            to.x,
            to.y,
            pen.width
        );
        Ok(())
    }

    fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(tiny_skia::Color::TRANSPARENT);
        }
    }

    fn snapshot(&self) -> Result<Snapshot, RasterError> {
        Ok(match &self.pixmap {
            Some(p) => Snapshot {
                width: self.width,
                height: self.height,
                data: p.data().to_vec(),
            },
            None => Snapshot::empty(self.width, self.height),
        })
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RasterError> {
        self.width = width;
        self.height = height;
        self.pixmap = Pixmap::new(width, height);
        self.applied = None;
        Ok(())
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), RasterError> {
        snapshot.validate()?;
        let (width, height) = (self.width, self.height);
        if let Some(pixmap) = self.pixmap.as_mut() {
            debug_assert_eq!(pixmap.data().len(), byte_len(width, height));
            snapshot.blit_into(pixmap.data_mut(), width, height);
        }
        Ok(())
    }

    fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        match &self.pixmap {
            Some(p) => p
                .encode_png()
                .map_err(|e| RasterError::Encode(e.to_string())),
            None => transparent_png(),
        }
    }
}
