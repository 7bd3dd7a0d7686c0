//! The stroke surface: pen state, pointer session, and bitmap growth.
//!
//! `StrokeSurface` is the only owner of the bitmap (through its rasterizer).
//! Input points arrive in viewport space and are mapped to bitmap space on
//! every call, because the displayed size can change between events.
//!
//! Per-stroke state machine:
//!
//! ```text
//! Idle --begin_stroke--> Active --extend_stroke*--> Active --end_stroke / cancel_stroke--> Idle
//! ```
//!
//! While idle, `extend_stroke` draws nothing.

use scrawl_core::transform::DeviceToBitmapTransform;
use scrawl_core::{Color, DisplayBox, PenState, Point};
use scrawl_render::{Rasterizer, RasterError, transparent_png};

/// An in-progress stroke gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSession {
    /// Path cursor in bitmap space: where the next segment starts.
    pub last_point: Point,
}

pub struct StrokeSurface<R: Rasterizer> {
    raster: R,
    pen: PenState,
    session: Option<PointerSession>,
    fallback_color: Color,
    min_width: f32,
}

impl<R: Rasterizer> StrokeSurface<R> {
    /// Wrap a rasterizer and apply the initial pen to it.
    pub fn new(mut raster: R, pen: PenState) -> Self {
        raster.apply_pen(&pen);
        Self {
            raster,
            pen,
            session: None,
            fallback_color: Color::BLACK,
            min_width: 1.0,
        }
    }

    /// Override the values bad toolbar input degrades to.
    pub fn with_fallbacks(mut self, color: Color, min_width: f32) -> Self {
        self.fallback_color = color;
        self.min_width = PenState::sanitize_width(min_width, 1.0);
        self
    }

    pub fn pen(&self) -> &PenState {
        &self.pen
    }

    pub fn session(&self) -> Option<&PointerSession> {
        self.session.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_some()
    }

    pub fn size(&self) -> (u32, u32) {
        self.raster.size()
    }

    pub fn raster(&self) -> &R {
        &self.raster
    }

    pub fn raster_mut(&mut self) -> &mut R {
        &mut self.raster
    }

    /// Map a viewport point to bitmap space using the current bitmap size.
    pub fn map_point(&self, raw: Point, display: &DisplayBox) -> Point {
        let (w, h) = self.raster.size();
        DeviceToBitmapTransform::compute(w, h, display).map(raw)
    }

    // ─── Stroke lifecycle ────────────────────────────────────────────────

    /// Start a stroke at `raw` and draw a dot there, so a tap without
    /// movement still leaves a mark. Restarts any session already active.
    pub fn begin_stroke(&mut self, raw: Point, display: &DisplayBox) {
        let p = self.map_point(raw, display);
        self.session = Some(PointerSession { last_point: p });
        self.draw_segment(p, p);
    }

    /// Draw from the path cursor to `raw` and advance the cursor.
    /// Does nothing while no stroke is active.
    pub fn extend_stroke(&mut self, raw: Point, display: &DisplayBox) {
        let Some(from) = self.session.map(|s| s.last_point) else {
            return;
        };
        let to = self.map_point(raw, display);
        self.draw_segment(from, to);
        self.session = Some(PointerSession { last_point: to });
    }

    pub fn end_stroke(&mut self) {
        self.session = None;
    }

    /// Abrupt termination (pointer left the surface). Same effect as `end_stroke`.
    pub fn cancel_stroke(&mut self) {
        if self.session.take().is_some() {
            log::debug!("stroke cancelled by pointer leave");
        }
    }

    fn draw_segment(&mut self, from: Point, to: Point) {
        if let Err(e) = self.raster.stroke_segment(from, to) {
            log::warn!("dropped segment {from:?} -> {to:?}: {e}");
        }
    }

    // ─── Pen ─────────────────────────────────────────────────────────────

    /// Replace the pen. Applies to the next segment, never to existing pixels.
    pub fn set_pen(&mut self, color: &str, width: f32) {
        let pen = PenState::from_input(color, width, self.fallback_color, self.min_width);
        self.apply(pen);
    }

    pub fn set_color(&mut self, color: &str) {
        let pen = PenState {
            color: PenState::sanitize_color(color, self.fallback_color),
            ..self.pen
        };
        self.apply(pen);
    }

    pub fn set_width(&mut self, width: f32) {
        let pen = PenState {
            width: PenState::sanitize_width(width, self.min_width),
            ..self.pen
        };
        self.apply(pen);
    }

    fn apply(&mut self, pen: PenState) {
        self.pen = pen;
        self.raster.apply_pen(&self.pen);
    }

    // ─── Bitmap ──────────────────────────────────────────────────────────

    /// Erase every pixel. Pen and session are untouched.
    pub fn clear(&mut self) {
        self.raster.clear();
        log::debug!("surface cleared");
    }

    /// Encode the bitmap as PNG. An encoder failure degrades to a 1×1
    /// transparent image.
    pub fn export_png(&self) -> Vec<u8> {
        match self.raster.encode_png() {
            Ok(bytes) => {
                let (w, h) = self.raster.size();
                log::debug!("exported {w}x{h} bitmap ({} bytes)", bytes.len());
                bytes
            }
            Err(e) => {
                log::warn!("PNG export failed, emitting transparent image: {e}");
                transparent_png().unwrap_or_default()
            }
        }
    }

    /// Add `delta_px` rows at the bottom, keeping every existing pixel.
    pub fn grow_height(&mut self, delta_px: u32) {
        if delta_px == 0 {
            return;
        }
        let (w, h) = self.raster.size();
        self.resize(w, h.saturating_add(delta_px));
    }

    /// Resize the bitmap, keeping content anchored at the top-left and
    /// cropping whatever falls outside the new bounds.
    ///
    /// Snapshot, resize, restore, and pen re-application run inside this one
    /// call, so no draw can observe the cleared intermediate bitmap.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (old_w, old_h) = self.raster.size();
        if (old_w, old_h) == (width, height) {
            return;
        }
        if let Err(e) = self.try_resize(width, height) {
            log::warn!("resize {old_w}x{old_h} -> {width}x{height} lost content: {e}");
        } else {
            log::debug!("resized {old_w}x{old_h} -> {width}x{height}");
        }
        // A raw resize resets draw attributes; the pen must survive it.
        self.raster.apply_pen(&self.pen);
    }

    fn try_resize(&mut self, width: u32, height: u32) -> Result<(), RasterError> {
        let snapshot = self.raster.snapshot()?;
        self.raster.resize(width, height)?;
        self.raster.restore(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scrawl_render::PixmapRasterizer;

    fn surface(w: u32, h: u32) -> StrokeSurface<PixmapRasterizer> {
        StrokeSurface::new(PixmapRasterizer::new(w, h), PenState::default())
    }

    #[test]
    fn begin_starts_session_at_mapped_point() {
        let mut s = surface(200, 100);
        // Displayed at half size, offset by (10, 10).
        let display = DisplayBox::new(10.0, 10.0, 100.0, 50.0);
        s.begin_stroke(Point::new(20.0, 15.0), &display);
        assert_eq!(s.session().map(|p| p.last_point), Some(Point::new(20.0, 10.0)));
    }

    #[test]
    fn extend_advances_cursor() {
        let mut s = surface(50, 50);
        let display = DisplayBox::unscaled(50, 50);
        s.begin_stroke(Point::new(5.0, 5.0), &display);
        s.extend_stroke(Point::new(30.0, 12.0), &display);
        assert_eq!(s.session().map(|p| p.last_point), Some(Point::new(30.0, 12.0)));
    }

    #[test]
    fn end_is_idempotent() {
        let mut s = surface(10, 10);
        s.end_stroke();
        s.begin_stroke(Point::new(1.0, 1.0), &DisplayBox::unscaled(10, 10));
        s.end_stroke();
        s.end_stroke();
        assert!(!s.is_drawing());
    }

    #[test]
    fn cancel_behaves_like_end() {
        let mut s = surface(10, 10);
        let display = DisplayBox::unscaled(10, 10);
        s.begin_stroke(Point::new(1.0, 1.0), &display);
        s.cancel_stroke();
        assert!(!s.is_drawing());
        let before = s.raster().snapshot().unwrap();
        s.extend_stroke(Point::new(8.0, 8.0), &display);
        assert_eq!(s.raster().snapshot().unwrap(), before);
    }

    #[test]
    fn set_pen_is_applied_to_backend() {
        let mut s = surface(10, 10);
        s.set_pen("#00ff00", 7.0);
        assert_eq!(s.raster().applied_pen(), Some(s.pen()));
        assert_eq!(s.pen().width, 7.0);
    }

    #[test]
    fn single_field_setters_keep_the_other_field() {
        let mut s = surface(10, 10);
        s.set_pen("red", 9.0);
        s.set_width(0.0);
        assert_eq!(s.pen().width, 1.0);
        assert_eq!(s.pen().color.to_hex(), "#ff0000");
        s.set_color("");
        assert_eq!(s.pen().color, Color::BLACK);
        assert_eq!(s.pen().width, 1.0);
    }

    #[test]
    fn fallbacks_can_be_configured() {
        let mut s = surface(10, 10).with_fallbacks(Color::from_rgba8(0, 0, 255, 255), 3.0);
        s.set_pen("???", 1.0);
        assert_eq!(s.pen().color.to_hex(), "#0000ff");
        assert_eq!(s.pen().width, 3.0);
    }

    #[test]
    fn zero_growth_is_a_no_op() {
        let mut s = surface(10, 10);
        s.grow_height(0);
        assert_eq!(s.size(), (10, 10));
    }

    #[test]
    fn shrinking_resize_crops() {
        let mut s = surface(10, 10);
        s.raster_mut().set_pixel(2, 2, [255, 0, 0, 255]);
        s.raster_mut().set_pixel(8, 8, [0, 0, 255, 255]);
        s.resize(5, 10);
        assert_eq!(s.size(), (5, 10));
        assert_eq!(s.raster().pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(s.raster().painted_pixel_count(), 1);
        assert_eq!(s.raster().applied_pen(), Some(s.pen()));
    }
}
