//! Error types for pixmatch.

use thiserror::Error;

/// Result alias for pixmatch operations.
pub type PixMatchResult<T> = std::result::Result<T, PixMatchError>;

/// Errors surfaced by the matching engine.
///
/// Every variant aborts the call that produced it; nothing is retried
/// internally. An empty result set is not an error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PixMatchError {
    /// A raster was declared with a zero width or height.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A pixel buffer length disagrees with the declared dimensions.
    #[error("pixel buffer holds {got} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, got: usize },
    /// The template does not fit inside the source image.
    #[error("template {tpl_width}x{tpl_height} exceeds source {img_width}x{img_height}")]
    TemplateLargerThanSource {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The template has no contrast, so its correlation is undefined.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// The match threshold lies outside `[0, 1]`.
    #[error("threshold {value} outside [0, 1]")]
    InvalidThreshold { value: f64 },
    /// `max_count` must admit at least one match.
    #[error("max_count {value} must be at least 1")]
    InvalidMaxCount { value: usize },
    /// The global worker pool could not be configured.
    #[error("thread pool: {reason}")]
    ThreadPool { reason: String },
    /// Image decoding failed (feature `image-io`).
    #[cfg(feature = "image-io")]
    #[error("image decode failed: {reason}")]
    Decode { reason: String },
}
