//! Export error types.

use thiserror::Error;

/// Errors raised while preparing or producing a raster image.
#[derive(Debug, Error)]
pub enum ExportError {
    /// An uploaded file is not a PNG or JPEG image.
    #[error("unsupported background image type `{mime}` (expected image/png or image/jpeg)")]
    UnsupportedImage {
        /// Declared or detected media type.
        mime: String,
    },

    /// The background image could not be decoded.
    #[error("failed to decode background image: {0}")]
    Decode(#[source] image::ImageError),

    /// The raster could not be encoded.
    #[error("failed to encode {format} image: {message}")]
    Encode {
        /// Target format.
        format: &'static str,
        /// Encoder message.
        message: String,
    },

    /// The canvas size is zero or too large.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The blocking decode task was cancelled or panicked.
    #[error("background decode task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
