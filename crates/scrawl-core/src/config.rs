//! Board configuration.
//!
//! Every field has a default so a host page can pass a partial JSON object
//! (or nothing at all) when constructing a board.

use crate::model::{Color, PenState};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

/// Palette swatches. Eight fit inline without a heap allocation.
pub type Swatches = SmallVec<[String; 8]>;

/// Configuration for a drawing board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Initial bitmap height as a multiple of the viewport height.
    pub initial_height_factor: f64,

    /// Pixels added to the bitmap height each time the page scrolls near the bottom.
    pub grow_step: u32,

    /// Distance from the document bottom (in CSS pixels) that counts as "near".
    pub near_bottom_margin: f64,

    /// Pen color used at startup and when a color value cannot be parsed.
    pub default_color: String,

    pub default_width: f32,

    /// Smallest accepted pen width; lower or malformed widths clamp to this.
    pub min_width: f32,

    pub palette: Swatches,

    /// Exported files are named `{filename_prefix}-{unix_ms}.png`.
    pub filename_prefix: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            initial_height_factor: 1.5,
            grow_step: 1000,
            near_bottom_margin: 200.0,
            default_color: "#000000".to_string(),
            default_width: 5.0,
            min_width: 1.0,
            palette: smallvec![
                "#000000".to_string(),
                "#ff0000".to_string(),
                "#00a000".to_string(),
                "#0000ff".to_string(),
                "#ffa500".to_string(),
                "#800080".to_string(),
            ],
            filename_prefix: "my-drawing".to_string(),
        }
    }
}

impl BoardConfig {
    /// Parse a (possibly partial) JSON configuration object.
    ///
    /// # Errors
    /// Returns the serde error message if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, String> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str::<Self>(json)
            .map(Self::normalized)
            .map_err(|e| format!("invalid board config: {e}"))
    }

    /// Replace nonsensical values with their defaults.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.initial_height_factor.is_finite() && self.initial_height_factor >= 1.0) {
            self.initial_height_factor = defaults.initial_height_factor;
        }
        if self.grow_step == 0 {
            self.grow_step = defaults.grow_step;
        }
        if !(self.near_bottom_margin.is_finite() && self.near_bottom_margin >= 0.0) {
            self.near_bottom_margin = defaults.near_bottom_margin;
        }
        if !(self.min_width.is_finite() && self.min_width > 0.0) {
            self.min_width = defaults.min_width;
        }
        if Color::parse(&self.default_color).is_none() {
            log::warn!(
                "default color {:?} is not a color, using {}",
                self.default_color,
                defaults.default_color
            );
            self.default_color = defaults.default_color;
        }
        if self.filename_prefix.trim().is_empty() {
            self.filename_prefix = defaults.filename_prefix;
        }
        self
    }

    /// Fallback color for unparseable color input.
    pub fn fallback_color(&self) -> Color {
        Color::parse(&self.default_color).unwrap_or(Color::BLACK)
    }

    /// The pen a fresh board starts with.
    pub fn initial_pen(&self) -> PenState {
        PenState::from_input(
            &self.default_color,
            self.default_width,
            Color::BLACK,
            self.min_width,
        )
    }

    /// Initial bitmap height for a viewport of the given height.
    pub fn initial_height(&self, viewport_height: u32) -> u32 {
        (viewport_height as f64 * self.initial_height_factor).round() as u32
    }

    pub fn export_filename(&self, unix_ms: u64) -> String {
        format!("{}-{unix_ms}.png", self.filename_prefix)
    }
}
