//! Background layer of an exported image.

use std::fmt;
use std::sync::Arc;

use flowdesk_core::Point;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Fill painted across the whole canvas before anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackgroundFill {
    /// One color.
    Solid {
        /// CSS color.
        color: String,
    },
    /// Two-stop linear gradient.
    LinearGradient {
        /// Color at the start.
        from: String,
        /// Color at the end.
        to: String,
        /// Direction in degrees; `0` runs left to right, `90` top to bottom.
        #[serde(default)]
        angle: f64,
    },
}

impl Default for BackgroundFill {
    fn default() -> Self {
        Self::Solid {
            color: "#ffffff".into(),
        }
    }
}

/// Encoded formats accepted for background uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// PNG.
    Png,
    /// JPEG.
    Jpeg,
}

impl ImageFormat {
    /// Detect the format from the leading bytes.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
        if bytes.starts_with(PNG) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// Format named by a media type (`image/png`, `image/jpeg`).
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Format from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Media type.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub(crate) fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// An uploaded background image, still encoded.
///
/// Cloning is cheap; the bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct BackgroundImage {
    bytes: Arc<[u8]>,
    format: ImageFormat,
}

impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl BackgroundImage {
    /// Accept an upload. Anything that is not a PNG or JPEG, by declared
    /// media type and by content, is rejected.
    pub fn from_upload(bytes: impl Into<Arc<[u8]>>, mime: &str) -> Result<Self, ExportError> {
        let bytes = bytes.into();
        let unsupported = || ExportError::UnsupportedImage { mime: mime.to_string() };
        let declared = ImageFormat::from_mime(mime).ok_or_else(unsupported)?;
        let detected = ImageFormat::sniff(&bytes).ok_or_else(unsupported)?;
        if declared != detected {
            tracing::warn!(mime, detected = detected.mime(), "upload content does not match its media type");
            return Err(unsupported());
        }
        tracing::debug!(mime, len = bytes.len(), "background image accepted");
        Ok(Self {
            bytes,
            format: detected,
        })
    }

    /// Accept bytes whose format is detected from content alone.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Result<Self, ExportError> {
        let bytes = bytes.into();
        let format = ImageFormat::sniff(&bytes).ok_or_else(|| ExportError::UnsupportedImage {
            mime: "application/octet-stream".into(),
        })?;
        Ok(Self { bytes, format })
    }

    /// Encoded format.
    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Encoded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }
}

/// Rectangle of the source image to keep, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropWindow {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl CropWindow {
    /// Clamp to an image of `width`×`height`. `None` if nothing remains.
    #[must_use]
    pub fn clamp_to(self, width: u32, height: u32) -> Option<Self> {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let w = self.width.min(width - x);
        let h = self.height.min(height - y);
        (w > 0 && h > 0).then_some(Self {
            x,
            y,
            width: w,
            height: h,
        })
    }
}

/// Where and how the background image is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePlacement {
    /// Top-left corner on the canvas.
    pub offset: Point,
    /// Uniform scale factor.
    pub scale: f64,
    /// Opacity in `0.0..=1.0`.
    pub opacity: f64,
    /// Part of the source to draw; the whole image when `None`.
    pub crop: Option<CropWindow>,
}

impl Default for ImagePlacement {
    fn default() -> Self {
        Self {
            offset: Point::ZERO,
            scale: 1.0,
            opacity: 1.0,
            crop: None,
        }
    }
}

/// Everything drawn beneath the diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundSpec {
    /// Canvas fill.
    pub fill: BackgroundFill,
    /// Optional image drawn over the fill.
    pub image: Option<BackgroundImage>,
    /// Placement of [`BackgroundSpec::image`].
    pub placement: ImagePlacement,
}

impl BackgroundSpec {
    /// A solid fill without image.
    #[must_use]
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            fill: BackgroundFill::Solid { color: color.into() },
            ..Self::default()
        }
    }

    /// A left-to-right gradient without image.
    #[must_use]
    pub fn gradient(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            fill: BackgroundFill::LinearGradient {
                from: from.into(),
                to: to.into(),
                angle: 0.0,
            },
            ..Self::default()
        }
    }

    /// Add an image layer.
    #[must_use]
    pub fn with_image(mut self, image: BackgroundImage, placement: ImagePlacement) -> Self {
        self.image = Some(image);
        self.placement = placement;
        self
    }
}
