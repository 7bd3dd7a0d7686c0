//! PNG encoding and decoding helpers.

use crate::error::RasterError;
use crate::raster::byte_len;
use tiny_skia::{ColorU8, Pixmap};

/// A decoded image in straight (non-premultiplied) RGBA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]])
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.rgba.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Coordinates of every pixel with non-zero alpha.
    pub fn painted_pixels(&self) -> Vec<(u32, u32)> {
        self.rgba
            .chunks_exact(4)
            .enumerate()
            .filter(|(_, px)| px[3] != 0)
            .map(|(i, _)| ((i as u32) % self.width, (i as u32) / self.width))
            .collect()
    }
}

/// A 1×1 fully transparent PNG, the export of an empty bitmap.
pub fn transparent_png() -> Result<Vec<u8>, RasterError> {
    let pixmap = Pixmap::new(1, 1).ok_or(RasterError::Encode("cannot allocate 1x1 pixmap".into()))?;
    pixmap
        .encode_png()
        .map_err(|e| RasterError::Encode(e.to_string()))
}

/// Encode straight RGBA rows (a browser `ImageData` buffer) as PNG.
///
/// A zero-sized image encodes as a 1×1 transparent PNG.
pub fn encode_straight_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, RasterError> {
    let expected = byte_len(width, height);
    if rgba.len() != expected {
        return Err(RasterError::SnapshotSize {
            width,
            height,
            expected,
            actual: rgba.len(),
        });
    }
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        return transparent_png();
    };
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    pixmap
        .encode_png()
        .map_err(|e| RasterError::Encode(e.to_string()))
}

pub fn decode_png(bytes: &[u8]) -> Result<DecodedImage, RasterError> {
    let pixmap = Pixmap::decode_png(bytes).map_err(|e| RasterError::Decode(e.to_string()))?;
    let mut rgba = Vec::with_capacity(byte_len(pixmap.width(), pixmap.height()));
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(DecodedImage {
        width: pixmap.width(),
        height: pixmap.height(),
        rgba,
    })
}
