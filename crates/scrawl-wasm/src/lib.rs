//! WASM bridge for Scrawl: binds a drawing board to an HTML `<canvas>`.
//!
//! Compiled via `wasm-pack build --target web`. The page forwards DOM events
//! to a `ScrawlBoard`; all drawing state lives on that instance.

mod canvas;
mod download;
mod input;

pub use canvas::CanvasRasterizer;

use scrawl_core::{BoardConfig, DisplayBox};
use scrawl_editor::{Board, BoardResponse, InputEvent, ScrollMetrics, ToolbarEvent};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

/// The WASM-facing board controller.
///
/// One instance per canvas. Every DOM listener on the page calls into it.
#[wasm_bindgen]
pub struct ScrawlBoard {
    board: Board<CanvasRasterizer>,
}

#[wasm_bindgen]
impl ScrawlBoard {
    /// Bind a board to `canvas`, sized for the given viewport.
    /// `config_json` may be empty or a partial `BoardConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        viewport_width: u32,
        viewport_height: u32,
        config_json: &str,
    ) -> Result<ScrawlBoard, JsValue> {
        console_error_panic_hook_setup();

        let config = BoardConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e))?;
        let ctx = CanvasRasterizer::context_of(&canvas)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let board = Board::new(config, viewport_width, viewport_height, |w, h| {
            CanvasRasterizer::sized(canvas, ctx, w, h)
        });
        Ok(Self { board })
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    pub fn mouse_down(&mut self, event: &MouseEvent) -> bool {
        self.dispatch_input(InputEvent::down(&input::mouse_sample(event)))
    }

    pub fn mouse_move(&mut self, event: &MouseEvent) -> bool {
        self.dispatch_input(InputEvent::moved(&input::mouse_sample(event)))
    }

    pub fn touch_start(&mut self, event: &TouchEvent) -> bool {
        self.dispatch_input(InputEvent::down(&input::touch_sample(event)))
    }

    /// Touch drawing suppresses page scrolling while a stroke is active.
    pub fn touch_move(&mut self, event: &TouchEvent) -> bool {
        if self.board.surface().is_drawing() {
            event.prevent_default();
        }
        self.dispatch_input(InputEvent::moved(&input::touch_sample(event)))
    }

    /// Mouse up or touch end.
    pub fn pointer_up(&mut self) {
        self.dispatch_input(Some(InputEvent::PointerUp));
    }

    /// Mouse out. Ends the stroke; moves are ignored until the next press.
    pub fn pointer_leave(&mut self) {
        self.dispatch_input(Some(InputEvent::PointerLeave));
    }

    // ─── Page events ─────────────────────────────────────────────────────

    /// Window scroll. Returns `true` if the canvas grew.
    pub fn on_scroll(&mut self, viewport_height: f64, scroll_y: f64, document_height: f64) -> bool {
        self.board.handle_scroll(ScrollMetrics {
            viewport_height,
            scroll_y,
            document_height,
        })
    }

    /// Window resize. Returns `true` if the canvas changed size.
    pub fn resize_viewport(&mut self, width: u32, height: u32) -> bool {
        self.board.resize_viewport(width, height)
    }

    // ─── Toolbar ─────────────────────────────────────────────────────────

    /// Handle a toolbar event given as JSON, e.g.
    /// `{"type":"swatchSelected","color":"#ff0000"}`.
    ///
    /// Returns `{"ok":true,"response":"redraw"}` or `{"ok":false,"error":"..."}`.
    pub fn handle_toolbar(&mut self, json: &str) -> String {
        let result = ToolbarEvent::from_json(json)
            .map_err(|e| JsValue::from_str(&e))
            .and_then(|event| self.dispatch_toolbar(event));
        match result {
            Ok(response) => serde_json::json!({ "ok": true, "response": response }).to_string(),
            Err(e) => error_json(&e.as_string().unwrap_or_else(|| format!("{e:?}"))),
        }
    }

    pub fn set_color(&mut self, color: &str) -> Result<(), JsValue> {
        self.dispatch_toolbar(ToolbarEvent::ColorChanged {
            color: color.to_string(),
        })
        .map(drop)
    }

    pub fn set_width(&mut self, width: f32) -> Result<(), JsValue> {
        self.dispatch_toolbar(ToolbarEvent::WidthChanged { width })
            .map(drop)
    }

    pub fn select_swatch(&mut self, color: &str) -> Result<(), JsValue> {
        self.dispatch_toolbar(ToolbarEvent::SwatchSelected {
            color: color.to_string(),
        })
        .map(drop)
    }

    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.dispatch_toolbar(ToolbarEvent::ClearRequested).map(drop)
    }

    /// Export the drawing and offer it as a download.
    pub fn save(&mut self) -> Result<(), JsValue> {
        self.dispatch_toolbar(ToolbarEvent::SaveRequested).map(drop)
    }

    /// PNG bytes of the current drawing, without downloading.
    pub fn export_png(&self) -> Vec<u8> {
        self.board.surface().export_png()
    }

    // ─── State queries ───────────────────────────────────────────────────

    /// The value the color picker input should show.
    pub fn color_input_value(&self) -> String {
        self.board.color_input_value().to_string()
    }

    /// The highlighted palette swatch, if any.
    pub fn active_swatch(&self) -> Option<String> {
        self.board.palette().active().map(str::to_string)
    }

    /// Palette swatches as a JSON array.
    pub fn swatches_json(&self) -> String {
        serde_json::to_string(self.board.palette().swatches()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn is_drawing(&self) -> bool {
        self.board.surface().is_drawing()
    }

    pub fn bitmap_width(&self) -> u32 {
        self.board.surface().size().0
    }

    pub fn bitmap_height(&self) -> u32 {
        self.board.surface().size().1
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

impl ScrawlBoard {
    /// The canvas's on-screen box, read fresh for every event: a scroll
    /// growth or a layout change may have moved or rescaled it.
    fn display_box(&self) -> DisplayBox {
        let rect = self.board.surface().raster().canvas().get_bounding_client_rect();
        DisplayBox::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn dispatch_input(&mut self, event: Option<InputEvent>) -> bool {
        let Some(event) = event else {
            return false;
        };
        let display = self.display_box();
        self.board.handle_input(event, &display)
    }

    fn dispatch_toolbar(&mut self, event: ToolbarEvent) -> Result<&'static str, JsValue> {
        let response = self.board.handle_toolbar(event, now_ms());
        if let BoardResponse::Download(export) = &response {
            download::download_bytes(&export.filename, &export.bytes, "image/png")?;
        }
        Ok(response_name(&response))
    }
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn response_name(response: &BoardResponse) -> &'static str {
    match response {
        BoardResponse::Unchanged => "unchanged",
        BoardResponse::Redraw => "redraw",
        BoardResponse::Download(_) => "download",
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "ok": false, "error": message }).to_string()
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Scrawl WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
