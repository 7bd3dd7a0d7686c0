//! Pen state and color model.
//!
//! The pen is the only piece of drawing state that outlives a single input
//! event. Toolbar and palette input overwrite it; every drawn segment reads it.

use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// CSS named colors accepted by the color input and palette.
const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xFFFFFF),
    ("red", 0xFF0000),
    ("green", 0x008000),
    ("lime", 0x00FF00),
    ("blue", 0x0000FF),
    ("yellow", 0xFFFF00),
    ("orange", 0xFFA500),
    ("purple", 0x800080),
    ("pink", 0xFFC0CB),
    ("brown", 0xA52A2A),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("cyan", 0x00FFFF),
    ("magenta", 0xFF00FF),
    ("navy", 0x000080),
    ("teal", 0x008080),
    ("maroon", 0x800000),
    ("olive", 0x808000),
    ("silver", 0xC0C0C0),
];

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 | 4 => {
                let r = hex_val(bytes[0])? * 17;
                let g = hex_val(bytes[1])? * 17;
                let b = hex_val(bytes[2])? * 17;
                let a = match bytes.get(3) {
                    Some(&d) => hex_val(d)? * 17,
                    None => 255,
                };
                Some(Self::from_rgba8(r, g, b, a))
            }
            6 | 8 => {
                let byte = |i: usize| -> Option<u8> {
                    Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?)
                };
                let a = if bytes.len() == 8 { byte(6)? } else { 255 };
                Some(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, a))
            }
            _ => None,
        }
    }

    /// Look up a CSS color keyword (case-insensitive). `transparent` is accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name == "transparent" {
            return Some(Self::TRANSPARENT);
        }
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, rgb)| Self::from_rgba8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255))
    }

    /// Parse a color as the toolbar delivers it: hex first, then a named color.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if value.starts_with('#') {
            return Self::from_hex(value);
        }
        Self::from_name(value).or_else(|| Self::from_hex(value))
    }

    /// Quantize to 8-bit straight (non-premultiplied) RGBA.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    /// Opaque `#rrggbb`, the only form an `<input type="color">` accepts.
    pub fn to_rgb_hex(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

// ─── Pen ─────────────────────────────────────────────────────────────────

/// Line cap used for every stroke. Round is the only cap the surface draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Round,
}

impl LineCap {
    /// CSS `lineCap` keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            LineCap::Round => "round",
        }
    }
}

/// Current stroke configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenState {
    pub color: Color,
    /// Line width in bitmap pixels. Always `>= 1.0` after sanitizing.
    pub width: f32,
    pub cap: LineCap,
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 5.0,
            cap: LineCap::Round,
        }
    }
}

impl PenState {
    /// Build a pen from raw toolbar values, degrading bad input instead of
    /// rejecting it: an unparseable color becomes `fallback`, a width below
    /// `min_width` (or NaN) becomes `min_width`.
    pub fn from_input(color: &str, width: f32, fallback: Color, min_width: f32) -> Self {
        Self {
            color: Self::sanitize_color(color, fallback),
            width: Self::sanitize_width(width, min_width),
            cap: LineCap::Round,
        }
    }

    pub fn sanitize_color(value: &str, fallback: Color) -> Color {
        match Color::parse(value) {
            Some(c) => c,
            None => {
                if !value.trim().is_empty() {
                    log::warn!("unrecognized pen color {value:?}, using {}", fallback.to_hex());
                }
                fallback
            }
        }
    }

    pub fn sanitize_width(width: f32, min_width: f32) -> f32 {
        let min_width = if min_width.is_finite() && min_width > 0.0 {
            min_width
        } else {
            1.0
        };
        if width.is_finite() && width >= min_width {
            width
        } else {
            min_width
        }
    }

    pub fn radius(&self) -> f32 {
        self.width / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hex_forms() {
        assert_eq!(Color::from_hex("#f00").map(|c| c.to_rgba8()), Some([255, 0, 0, 255]));
        assert_eq!(Color::from_hex("00ff0080").map(|c| c.to_rgba8()), Some([0, 255, 0, 128]));
        assert_eq!(Color::from_hex("#12345").map(|c| c.to_rgba8()), None);
        assert_eq!(Color::from_hex("#zzzzzz").map(|c| c.to_rgba8()), None);
    }

    #[test]
    fn named_colors_are_case_insensitive() {
        assert_eq!(Color::parse("Red").map(|c| c.to_hex()), Some("#ff0000".to_string()));
        assert_eq!(Color::parse("transparent").map(|c| c.to_rgba8()[3]), Some(0));
        assert!(Color::parse("not-a-color").is_none());
    }

    #[test]
    fn to_hex_emits_alpha_only_when_translucent() {
        assert_eq!(Color::BLACK.to_hex(), "#000000");
        assert_eq!(Color::from_rgba8(255, 255, 255, 0).to_hex(), "#ffffff00");
        assert_eq!(Color::from_rgba8(255, 255, 255, 0).to_rgb_hex(), "#ffffff");
    }

    #[test]
    fn empty_color_falls_back() {
        let pen = PenState::from_input("", 3.0, Color::BLACK, 1.0);
        assert_eq!(pen.color, Color::BLACK);
        assert_eq!(pen.width, 3.0);
    }

    #[test]
    fn width_is_clamped_to_minimum() {
        assert_eq!(PenState::sanitize_width(0.0, 1.0), 1.0);
        assert_eq!(PenState::sanitize_width(-4.0, 1.0), 1.0);
        assert_eq!(PenState::sanitize_width(f32::NAN, 1.0), 1.0);
        assert_eq!(PenState::sanitize_width(f32::INFINITY, 2.0), 2.0);
        assert_eq!(PenState::sanitize_width(12.5, 1.0), 12.5);
    }

    #[test]
    fn cap_is_always_round() {
        let pen = PenState::from_input("#00f", 8.0, Color::BLACK, 1.0);
        assert_eq!(pen.cap.as_css(), "round");
    }
}
