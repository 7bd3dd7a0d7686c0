//! The board: single event dispatcher for one drawing surface.
//!
//! Owns the `StrokeSurface`, the palette, and the configuration, and routes
//! pointer, toolbar, and scroll events to them in arrival order. A page may
//! host any number of independent boards.

use crate::input::InputEvent;
use crate::surface::StrokeSurface;
use crate::toolbar::{Palette, ToolbarEvent};
use scrawl_core::{BoardConfig, DisplayBox, Point};
use scrawl_render::Rasterizer;

/// A finished PNG export, ready for a download action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// What the host should do after a toolbar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardResponse {
    Unchanged,
    /// Pixels or visible toolbar state changed.
    Redraw,
    /// Hand the export to the download mechanism.
    Download(Export),
}

/// Page scroll position, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub viewport_height: f64,
    pub scroll_y: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn is_near_bottom(&self, margin: f64) -> bool {
        self.viewport_height + self.scroll_y >= self.document_height - margin
    }
}

pub struct Board<R: Rasterizer> {
    surface: StrokeSurface<R>,
    palette: Palette,
    config: BoardConfig,
    viewport: (u32, u32),
}

impl<R: Rasterizer> Board<R> {
    /// Create a board for a viewport of `viewport_width × viewport_height`.
    ///
    /// `make_raster` receives the initial bitmap size: the viewport width by
    /// `initial_height_factor` times the viewport height.
    pub fn new(
        config: BoardConfig,
        viewport_width: u32,
        viewport_height: u32,
        make_raster: impl FnOnce(u32, u32) -> R,
    ) -> Self {
        let config = config.normalized();
        let height = config.initial_height(viewport_height);
        let raster = make_raster(viewport_width, height);
        let surface = StrokeSurface::new(raster, config.initial_pen())
            .with_fallbacks(config.fallback_color(), config.min_width);
        let palette = Palette::new(config.palette.clone(), surface.pen().color);
        log::debug!(
            "board created: viewport {viewport_width}x{viewport_height}, bitmap {viewport_width}x{height}"
        );
        Self {
            surface,
            palette,
            config,
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn surface(&self) -> &StrokeSurface<R> {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut StrokeSurface<R> {
        &mut self.surface
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// The value the color picker should display.
    pub fn color_input_value(&self) -> &str {
        self.palette.picker_value()
    }

    /// Route a pointer event. Returns `true` if pixels may have changed.
    pub fn handle_input(&mut self, event: InputEvent, display: &DisplayBox) -> bool {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                self.surface.begin_stroke(Point::new(x, y), display);
                true
            }
            InputEvent::PointerMove { x, y, .. } => {
                let drawing = self.surface.is_drawing();
                self.surface.extend_stroke(Point::new(x, y), display);
                drawing
            }
            InputEvent::PointerUp => {
                self.surface.end_stroke();
                false
            }
            InputEvent::PointerLeave => {
                self.surface.cancel_stroke();
                false
            }
        }
    }

    /// Route a toolbar event. `now_ms` (Unix milliseconds) names exports.
    pub fn handle_toolbar(&mut self, event: ToolbarEvent, now_ms: u64) -> BoardResponse {
        match event {
            ToolbarEvent::ColorChanged { color } => {
                self.surface.set_color(&color);
                self.palette.pick_custom(self.surface.pen().color);
                BoardResponse::Redraw
            }
            ToolbarEvent::WidthChanged { width } => {
                self.surface.set_width(width);
                BoardResponse::Unchanged
            }
            ToolbarEvent::SwatchSelected { color } => {
                self.surface.set_color(&color);
                self.palette.select_swatch(self.surface.pen().color);
                BoardResponse::Redraw
            }
            ToolbarEvent::ClearRequested => {
                self.surface.clear();
                BoardResponse::Redraw
            }
            ToolbarEvent::SaveRequested => BoardResponse::Download(self.export(now_ms)),
            ToolbarEvent::ViewportResized { width, height } => {
                if self.resize_viewport(width, height) {
                    BoardResponse::Redraw
                } else {
                    BoardResponse::Unchanged
                }
            }
        }
    }

    /// Grow the bitmap by one step when the page is scrolled near its bottom.
    /// Returns `true` if the bitmap grew.
    pub fn handle_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        if !metrics.is_near_bottom(self.config.near_bottom_margin) {
            return false;
        }
        self.surface.grow_height(self.config.grow_step);
        true
    }

    /// Follow a window resize. Only the bitmap width tracks the viewport;
    /// the height is owned by scroll growth. Content is preserved either way.
    ///
    /// A zero width (a minimized window) keeps the current bitmap: resizing
    /// to nothing would drop every pixel.
    pub fn resize_viewport(&mut self, width: u32, height: u32) -> bool {
        self.viewport = (width, height);
        let (bitmap_w, bitmap_h) = self.surface.size();
        if width == 0 {
            log::debug!("ignoring zero-width viewport, keeping {bitmap_w}x{bitmap_h} bitmap");
            return false;
        }
        if bitmap_w == width {
            return false;
        }
        self.surface.resize(width, bitmap_h);
        true
    }

    /// Export the current bitmap as a timestamped PNG.
    pub fn export(&self, now_ms: u64) -> Export {
        Export {
            filename: self.config.export_filename(now_ms),
            bytes: self.surface.export_png(),
        }
    }
}
