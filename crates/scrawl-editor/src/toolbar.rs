//! Toolbar events and the color palette.
//!
//! The toolbar and swatches are pure event sources. Their only state worth
//! keeping in Rust is which swatch is highlighted and what the color picker
//! should display, both owned by `Palette`.

use scrawl_core::Color;
use scrawl_core::config::Swatches;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A toolbar interaction, as sent from the page.
///
/// JSON form: `{"type": "colorChanged", "color": "#ff0000"}`.
///
/// Pen payloads are decoded leniently: input elements report their values as
/// strings, and a missing, null, or garbled value must still reach the pen
/// sanitizers instead of failing the whole event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ToolbarEvent {
    /// The color picker changed. Deselects every swatch.
    ColorChanged {
        #[serde(default, deserialize_with = "lenient_color")]
        color: String,
    },
    /// The width input changed. Malformed values clamp to the minimum width.
    WidthChanged {
        #[serde(default = "unset_width", deserialize_with = "lenient_width")]
        width: f32,
    },
    ClearRequested,
    SaveRequested,
    SwatchSelected {
        #[serde(default, deserialize_with = "lenient_color")]
        color: String,
    },
    /// The browser window was resized.
    ViewportResized { width: u32, height: u32 },
}

impl ToolbarEvent {
    /// Decode a toolbar event from its JSON form.
    ///
    /// # Errors
    /// Returns the serde error message for unknown or malformed events.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid toolbar event: {e}"))
    }
}

/// Anything other than a string decodes as `""`, which the pen replaces with
/// its fallback color.
fn lenient_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Numbers and numeric strings (`"7"`, `" 2.5 "`) decode to their value;
/// everything else to NaN, which the pen clamps to its minimum width.
fn lenient_width<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().map_or(f32::NAN, |w| w as f32),
        Value::String(s) => s.trim().parse().unwrap_or(f32::NAN),
        _ => f32::NAN,
    })
}

fn unset_width() -> f32 {
    f32::NAN
}

/// Swatch list with at most one active swatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    swatches: Swatches,
    active: Option<usize>,
    /// What the color picker input should show, always `#rrggbb`.
    picker_value: String,
}

impl Palette {
    pub fn new(swatches: Swatches, initial_color: Color) -> Self {
        let mut palette = Self {
            swatches,
            active: None,
            picker_value: initial_color.to_rgb_hex(),
        };
        palette.active = palette.index_of(initial_color);
        palette
    }

    pub fn swatches(&self) -> &[String] {
        &self.swatches
    }

    pub fn active(&self) -> Option<&str> {
        self.active.map(|i| self.swatches[i].as_str())
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn picker_value(&self) -> &str {
        &self.picker_value
    }

    /// Highlight the swatch matching the applied pen color and sync the
    /// picker to it. A color not in the palette leaves nothing highlighted.
    pub fn select_swatch(&mut self, applied: Color) {
        self.active = self.index_of(applied);
        self.picker_value = applied.to_rgb_hex();
    }

    /// A custom color from the picker: no swatch stays highlighted.
    pub fn pick_custom(&mut self, applied: Color) {
        self.active = None;
        self.picker_value = applied.to_rgb_hex();
    }

    /// Swatches compare by parsed color, so `red` matches `#ff0000`.
    fn index_of(&self, color: Color) -> Option<usize> {
        let wanted = color.to_rgba8();
        self.swatches
            .iter()
            .position(|s| Color::parse(s).is_some_and(|c| c.to_rgba8() == wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smallvec::smallvec;

    fn palette() -> Palette {
        Palette::new(
            smallvec!["#000000".to_string(), "#ff0000".to_string(), "#0000ff".to_string()],
            Color::BLACK,
        )
    }

    fn parsed(color: &str) -> Color {
        Color::parse(color).unwrap()
    }

    fn width_of(json: &str) -> f32 {
        match ToolbarEvent::from_json(json) {
            Ok(ToolbarEvent::WidthChanged { width }) => width,
            other => panic!("expected a width change, got {other:?}"),
        }
    }

    #[test]
    fn initial_color_highlights_matching_swatch() {
        assert_eq!(palette().active(), Some("#000000"));
    }

    #[test]
    fn selecting_swatch_moves_highlight_and_syncs_picker() {
        let mut p = palette();
        p.select_swatch(parsed("#0000ff"));
        assert_eq!(p.active_index(), Some(2));
        assert_eq!(p.picker_value(), "#0000ff");
    }

    #[test]
    fn named_color_matches_hex_swatch() {
        let mut p = palette();
        p.select_swatch(parsed("red"));
        assert_eq!(p.active(), Some("#ff0000"));
        assert_eq!(p.picker_value(), "#ff0000");
    }

    #[test]
    fn custom_color_clears_highlight() {
        let mut p = palette();
        p.pick_custom(parsed("#ff0000"));
        assert_eq!(p.active(), None);
        assert_eq!(p.picker_value(), "#ff0000");
    }

    #[test]
    fn picker_value_drops_alpha() {
        let mut p = palette();
        p.pick_custom(parsed("#12345680"));
        assert_eq!(p.picker_value(), "#123456");
    }

    #[test]
    fn width_accepts_numbers_and_numeric_strings() {
        assert_eq!(width_of(r#"{"type":"widthChanged","width":7}"#), 7.0);
        assert_eq!(width_of(r#"{"type":"widthChanged","width":"7"}"#), 7.0);
        assert_eq!(width_of(r#"{"type":"widthChanged","width":" 2.5 "}"#), 2.5);
    }

    #[test]
    fn garbled_width_decodes_as_nan() {
        for json in [
            r#"{"type":"widthChanged","width":""}"#,
            r#"{"type":"widthChanged","width":"thick"}"#,
            r#"{"type":"widthChanged","width":null}"#,
            r#"{"type":"widthChanged","width":[3]}"#,
            r#"{"type":"widthChanged"}"#,
        ] {
            assert!(width_of(json).is_nan(), "{json}");
        }
    }

    #[test]
    fn missing_or_null_color_decodes_as_empty() {
        for json in [
            r#"{"type":"colorChanged"}"#,
            r#"{"type":"colorChanged","color":null}"#,
            r#"{"type":"swatchSelected","color":42}"#,
        ] {
            let color = match ToolbarEvent::from_json(json) {
                Ok(ToolbarEvent::ColorChanged { color } | ToolbarEvent::SwatchSelected { color }) => {
                    color
                }
                other => panic!("expected a color event, got {other:?}"),
            };
            assert_eq!(color, "", "{json}");
        }
    }

    #[test]
    fn toolbar_events_decode_from_json() {
        assert_eq!(
            ToolbarEvent::from_json(r##"{"type":"swatchSelected","color":"#ff0000"}"##),
            Ok(ToolbarEvent::SwatchSelected {
                color: "#ff0000".to_string()
            })
        );
        assert_eq!(
            ToolbarEvent::from_json(r#"{"type":"viewportResized","width":1024,"height":768}"#),
            Ok(ToolbarEvent::ViewportResized {
                width: 1024,
                height: 768
            })
        );
        assert_eq!(
            ToolbarEvent::from_json(r#"{"type":"clearRequested"}"#),
            Ok(ToolbarEvent::ClearRequested)
        );
        assert!(ToolbarEvent::from_json(r#"{"type":"undo"}"#).is_err());
    }
}
