use thiserror::Error;

/// Failures inside a rasterizer backend.
///
/// None of these reach the user: the stroke surface logs them and degrades
/// to a safe default (skip the segment, emit a transparent image).
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("failed to encode PNG: {0}")]
    Encode(String),

    #[error("failed to decode PNG: {0}")]
    Decode(String),

    #[error("snapshot holds {actual} bytes, expected {expected} for {width}x{height}")]
    SnapshotSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("segment produced an empty path")]
    EmptyPath,

    #[error("canvas backend: {0}")]
    Backend(String),
}
