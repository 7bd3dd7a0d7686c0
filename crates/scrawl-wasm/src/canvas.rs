//! Canvas2D rasterizer.
//!
//! Draws into an HTML `<canvas>` via `CanvasRenderingContext2d`. Assigning
//! the canvas width or height wipes its pixels and resets every context
//! attribute; that is the browser behavior `Rasterizer::resize` documents.

use scrawl_core::{PenState, Point};
use scrawl_render::{RasterError, Rasterizer, Snapshot, encode_straight_rgba};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

pub struct CanvasRasterizer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

fn js_err(e: JsValue) -> RasterError {
    RasterError::Backend(format!("{e:?}"))
}

impl CanvasRasterizer {
    /// Acquire the canvas's 2D context.
    pub fn context_of(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, RasterError> {
        canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| RasterError::Backend("canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RasterError::Backend("2d context has unexpected type".into()))
    }

    /// Wrap a canvas and size its bitmap. Sizing clears the canvas.
    pub fn sized(
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        width: u32,
        height: u32,
    ) -> Self {
        canvas.set_width(width);
        canvas.set_height(height);
        Self { canvas, ctx }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Rasterizer for CanvasRasterizer {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn apply_pen(&mut self, pen: &PenState) {
        let color = pen.color.to_hex();
        self.ctx.set_stroke_style_str(&color);
        self.ctx.set_fill_style_str(&color);
        self.ctx.set_line_width(pen.width as f64);
        self.ctx.set_line_cap(pen.cap.as_css());
    }

    fn stroke_segment(&mut self, from: Point, to: Point) -> Result<(), RasterError> {
        self.ctx.begin_path();
        if (to - from).hypot() < 1e-6 {
            // Round cap on a zero-length segment: a disc of the line width.
            let radius = self.ctx.line_width() / 2.0;
            self.ctx
                .arc(from.x, from.y, radius, 0.0, std::f64::consts::TAU)
                .map_err(js_err)?;
            self.ctx.fill();
        } else {
            self.ctx.move_to(from.x, from.y);
            self.ctx.line_to(to.x, to.y);
            self.ctx.stroke();
        }
        Ok(())
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn snapshot(&self) -> Result<Snapshot, RasterError> {
        let (w, h) = self.size();
        if w == 0 || h == 0 {
            return Ok(Snapshot::empty(w, h));
        }
        let image = self
            .ctx
            .get_image_data(0.0, 0.0, w as f64, h as f64)
            .map_err(js_err)?;
        Ok(Snapshot {
            width: w,
            height: h,
            data: image.data().0,
        })
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RasterError> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Ok(())
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), RasterError> {
        snapshot.validate()?;
        if snapshot.width == 0 || snapshot.height == 0 {
            return Ok(());
        }
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(&snapshot.data[..]),
            snapshot.width,
            snapshot.height,
        )
        .map_err(js_err)?;
        // putImageData crops to the canvas on its own.
        self.ctx.put_image_data(&image, 0.0, 0.0).map_err(js_err)
    }

    fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        let snapshot = self.snapshot()?;
        encode_straight_rgba(snapshot.width, snapshot.height, &snapshot.data)
    }
}
