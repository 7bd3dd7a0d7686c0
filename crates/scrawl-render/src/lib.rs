pub mod error;
pub mod pixmap;
pub mod png;
pub mod raster;

pub use error::RasterError;
pub use pixmap::PixmapRasterizer;
pub use png::{DecodedImage, decode_png, encode_straight_rgba, transparent_png};
pub use raster::{Rasterizer, Snapshot};
