#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Flowdesk Export
//!
//! Raster export of a [`Graph`](flowdesk_flow::Graph).
//!
//! Layers, bottom to top:
//!
//! 1. the background fill ([`BackgroundFill`]: solid or linear gradient)
//! 2. an optional uploaded image ([`BackgroundImage`]) placed with an
//!    offset, scale, opacity and crop window ([`ImagePlacement`])
//! 3. edges, routed by [`route_edge`], with their markers and label boxes
//! 4. node bodies
//!
//! ```rust,ignore
//! let image = rasterize(&graph, CanvasSize::new(800, 600)?, &BackgroundSpec::solid("#fafafa")).await?;
//! std::fs::write("flow.png", image.encode(ImageEncoding::Png)?)?;
//! ```

pub mod background;
pub mod color;
pub mod error;
pub mod raster;
pub mod route;

pub use background::{BackgroundFill, BackgroundImage, BackgroundSpec, CropWindow, ImageFormat, ImagePlacement};
pub use color::parse_color;
pub use error::ExportError;
pub use raster::{
    CanvasSize, DEFAULT_JPEG_QUALITY, ImageEncoding, MAX_CANVAS_SIDE, RasterImage, decode_layer, rasterize, render,
};
pub use route::{Route, Segment, boundary_point, route_edge};
