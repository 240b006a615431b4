//! Rasterization of a graph onto a `tiny-skia` pixmap.

use std::io::Cursor;

use flowdesk_core::{Point, Rect};
use flowdesk_flow::{BodyShape, Edge, EdgeLabel, Graph, Marker, Node};
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use serde::{Deserialize, Serialize};
use tiny_skia::{
    Color, FillRule, FilterQuality, GradientStop, IntSize, LinearGradient, Paint, Path, PathBuilder, Pixmap,
    PixmapPaint, SpreadMode, Stroke, StrokeDash, Transform,
};

use crate::background::{BackgroundFill, BackgroundImage, BackgroundSpec, CropWindow, ImagePlacement};
use crate::color::{color_or, with_opacity};
use crate::error::ExportError;
use crate::route::{Route, Segment, route_edge};

/// Largest accepted canvas side, in pixels.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Output canvas extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// A validated canvas size.
    pub fn new(width: u32, height: u32) -> Result<Self, ExportError> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// The smallest canvas showing every node with `margin` pixels to spare,
    /// never smaller than `minimum`.
    #[must_use]
    pub fn fit(graph: &Graph, margin: u32, minimum: Self) -> Self {
        let Some(bounds) = graph.bounds() else {
            return minimum;
        };
        let side = |extent: f64, min: u32| {
            let needed = (extent.max(0.0).ceil() as u32).saturating_add(margin);
            needed.clamp(min.max(1), MAX_CANVAS_SIDE)
        };
        Self {
            width: side(bounds.right(), minimum.width),
            height: side(bounds.bottom(), minimum.height),
        }
    }

    fn validate(self) -> Result<(), ExportError> {
        let ok = |side: u32| (1..=MAX_CANVAS_SIDE).contains(&side);
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(ExportError::InvalidCanvas {
                width: self.width,
                height: self.height,
            })
        }
    }

    fn pixmap(self) -> Result<Pixmap, ExportError> {
        self.validate()?;
        Pixmap::new(self.width, self.height).ok_or(ExportError::InvalidCanvas {
            width: self.width,
            height: self.height,
        })
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum ImageEncoding {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// JPEG composited over white.
    Jpeg {
        /// Quality in `1..=100`.
        quality: u8,
    },
}

impl ImageEncoding {
    /// Conventional file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }

    /// Encoding for a file extension, JPEG at the default quality.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg {
                quality: DEFAULT_JPEG_QUALITY,
            }),
            _ => None,
        }
    }
}

/// A rendered image.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixmap: Pixmap,
}

impl RasterImage {
    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha RGBA of one pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Encode to PNG or JPEG bytes.
    pub fn encode(&self, encoding: ImageEncoding) -> Result<Vec<u8>, ExportError> {
        match encoding {
            ImageEncoding::Png => self.pixmap.encode_png().map_err(|e| ExportError::Encode {
                format: "png",
                message: e.to_string(),
            }),
            ImageEncoding::Jpeg { quality } => {
                // premultiplied source over white: c + (255 - a)
                let rgb: Vec<u8> = self
                    .pixmap
                    .data()
                    .chunks_exact(4)
                    .flat_map(|px| {
                        let back = 255 - px[3];
                        [px[0].saturating_add(back), px[1].saturating_add(back), px[2].saturating_add(back)]
                    })
                    .collect();
                let mut out = Cursor::new(Vec::new());
                JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
                    .encode(&rgb, self.width(), self.height(), ExtendedColorType::Rgb8)
                    .map_err(|e| ExportError::Encode {
                        format: "jpeg",
                        message: e.to_string(),
                    })?;
                Ok(out.into_inner())
            }
        }
    }
}

/// Render `graph` over `background`.
///
/// The background image, if any, is decoded on a blocking task; the rest is
/// drawn on the calling task.
pub async fn rasterize(
    graph: &Graph,
    size: CanvasSize,
    background: &BackgroundSpec,
) -> Result<RasterImage, ExportError> {
    size.validate()?;
    let layer = match &background.image {
        Some(image) => decode_layer(image, background.placement.crop).await?,
        None => None,
    };
    let image = render(graph, size, &background.fill, layer.as_ref().map(|p| (p, &background.placement)))?;
    tracing::debug!(
        width = size.width,
        height = size.height,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph rasterized"
    );
    Ok(image)
}

/// Decode and crop a background image into a premultiplied pixmap.
///
/// `Ok(None)` means the crop window selects nothing.
pub async fn decode_layer(image: &BackgroundImage, crop: Option<CropWindow>) -> Result<Option<Pixmap>, ExportError> {
    let bytes = image.shared_bytes();
    let format = image.format();
    tokio::task::spawn_blocking(move || decode_sync(&bytes, format.to_image_format(), crop)).await?
}

fn decode_sync(bytes: &[u8], format: image::ImageFormat, crop: Option<CropWindow>) -> Result<Option<Pixmap>, ExportError> {
    let mut rgba = image::load_from_memory_with_format(bytes, format)
        .map_err(ExportError::Decode)?
        .to_rgba8();
    if let Some(window) = crop {
        let (w, h) = rgba.dimensions();
        let Some(c) = window.clamp_to(w, h) else {
            tracing::warn!(?window, width = w, height = h, "crop window outside the background image");
            return Ok(None);
        };
        rgba = image::imageops::crop_imm(&rgba, c.x, c.y, c.width, c.height).to_image();
    }
    let (w, h) = rgba.dimensions();
    let mut data = rgba.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
    Ok(IntSize::from_wh(w, h).and_then(|size| Pixmap::from_vec(data, size)))
}

/// Synchronous rendering with an already decoded background layer.
pub fn render(
    graph: &Graph,
    size: CanvasSize,
    fill: &BackgroundFill,
    layer: Option<(&Pixmap, &ImagePlacement)>,
) -> Result<RasterImage, ExportError> {
    let mut pixmap = size.pixmap()?;
    paint_fill(&mut pixmap, fill);
    if let Some((image, placement)) = layer {
        draw_layer(&mut pixmap, image, placement);
    }
    for edge in graph.edges() {
        let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target)) else {
            continue;
        };
        draw_edge(&mut pixmap, edge, &route_edge(edge, source, target));
    }
    for node in graph.nodes() {
        draw_node(&mut pixmap, node);
    }
    Ok(RasterImage { pixmap })
}

fn paint_fill(pixmap: &mut Pixmap, fill: &BackgroundFill) {
    match fill {
        BackgroundFill::Solid { color } => pixmap.fill(color_or(color, Color::WHITE)),
        BackgroundFill::LinearGradient { from, to, angle } => {
            let (from, to) = (color_or(from, Color::WHITE), color_or(to, Color::WHITE));
            let (w, h) = (pixmap.width() as f32, pixmap.height() as f32);
            let radians = angle.to_radians() as f32;
            let (dx, dy) = (radians.cos(), radians.sin());
            let half = (w * dx.abs() + h * dy.abs()) / 2.0;
            let (cx, cy) = (w / 2.0, h / 2.0);
            let shader = LinearGradient::new(
                tiny_skia::Point::from_xy(cx - dx * half, cy - dy * half),
                tiny_skia::Point::from_xy(cx + dx * half, cy + dy * half),
                vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
                SpreadMode::Pad,
                Transform::identity(),
            );
            let (Some(shader), Some(rect)) = (shader, tiny_skia::Rect::from_xywh(0.0, 0.0, w, h)) else {
                pixmap.fill(from);
                return;
            };
            let paint = Paint {
                shader,
                ..Paint::default()
            };
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }
}

fn draw_layer(pixmap: &mut Pixmap, image: &Pixmap, placement: &ImagePlacement) {
    let scale = if placement.scale.is_finite() && placement.scale > 0.0 {
        placement.scale as f32
    } else {
        1.0
    };
    let paint = PixmapPaint {
        opacity: placement.opacity.clamp(0.0, 1.0) as f32,
        quality: if (scale - 1.0).abs() < f32::EPSILON { FilterQuality::Nearest } else { FilterQuality::Bilinear },
        ..PixmapPaint::default()
    };
    let transform = Transform::from_row(
        scale,
        0.0,
        0.0,
        scale,
        placement.offset.x as f32,
        placement.offset.y as f32,
    );
    pixmap.draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

/// `"5 5"` / `"5,5"` into a dash; odd lists repeat as in SVG.
fn dash(pattern: Option<&str>) -> Option<StrokeDash> {
    let mut values: Vec<f32> = pattern?
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    if values.len() % 2 == 1 {
        values.extend_from_within(..);
    }
    StrokeDash::new(values, 0.0)
}

fn stroke(width: f64, pattern: Option<&str>) -> Stroke {
    Stroke {
        width: width as f32,
        dash: dash(pattern),
        ..Stroke::default()
    }
}

fn route_path(route: &Route) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(route.start.x as f32, route.start.y as f32);
    for segment in &route.segments {
        match *segment {
            Segment::Line(p) => pb.line_to(p.x as f32, p.y as f32),
            Segment::Cubic(c1, c2, p) => {
                pb.cubic_to(c1.x as f32, c1.y as f32, c2.x as f32, c2.y as f32, p.x as f32, p.y as f32);
            }
        }
    }
    pb.finish()
}

fn polygon_path(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.close();
    pb.finish()
}

fn rounded_rect(bounds: Rect, rx: f64, ry: f64) -> Option<Path> {
    let rect = tiny_skia::Rect::from_xywh(
        bounds.left() as f32,
        bounds.top() as f32,
        bounds.size.width as f32,
        bounds.size.height as f32,
    )?;
    let rx = (rx.max(0.0) as f32).min(rect.width() / 2.0);
    let ry = (ry.max(0.0) as f32).min(rect.height() / 2.0);
    if rx <= 0.0 || ry <= 0.0 {
        return Some(PathBuilder::from_rect(rect));
    }
    // cubic approximation of a quarter ellipse
    const K: f32 = 0.552_284_8;
    let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let (kx, ky) = (rx * K, ry * K);
    let mut pb = PathBuilder::new();
    pb.move_to(l + rx, t);
    pb.line_to(r - rx, t);
    pb.cubic_to(r - rx + kx, t, r, t + ry - ky, r, t + ry);
    pb.line_to(r, b - ry);
    pb.cubic_to(r, b - ry + ky, r - rx + kx, b, r - rx, b);
    pb.line_to(l + rx, b);
    pb.cubic_to(l + rx - kx, b, l, b - ry + ky, l, b - ry);
    pb.line_to(l, t + ry);
    pb.cubic_to(l, t + ry - ky, l + rx - kx, t, l + rx, t);
    pb.close();
    pb.finish()
}

fn node_path(node: &Node) -> Option<Path> {
    let bounds = node.bounds();
    match &node.shape {
        BodyShape::Rect => rounded_rect(bounds, node.style.rx, node.style.ry),
        BodyShape::Ellipse => tiny_skia::Rect::from_xywh(
            bounds.left() as f32,
            bounds.top() as f32,
            bounds.size.width as f32,
            bounds.size.height as f32,
        )
        .and_then(PathBuilder::from_oval),
        BodyShape::Polygon { .. } => polygon_path(&node.shape.polygon_in(bounds)?),
    }
}

fn draw_node(pixmap: &mut Pixmap, node: &Node) {
    let Some(path) = node_path(node) else {
        tracing::warn!(node = %node.id, "node has no drawable outline");
        return;
    };
    let style = &node.style;
    let shadow = &style.shadow;
    if shadow.enabled {
        let color = with_opacity(color_or(&shadow.color, Color::BLACK), style.opacity);
        let offset = Transform::from_translate(shadow.offset_x as f32, shadow.offset_y as f32);
        pixmap.fill_path(&path, &solid(color), FillRule::Winding, offset, None);
    }
    let fill = with_opacity(color_or(&style.fill, Color::WHITE), style.opacity);
    pixmap.fill_path(&path, &solid(fill), FillRule::Winding, Transform::identity(), None);
    if style.stroke_width > 0.0 {
        let color = with_opacity(color_or(&style.stroke, Color::BLACK), style.opacity);
        pixmap.stroke_path(
            &path,
            &solid(color),
            &stroke(style.stroke_width, style.dasharray.as_deref()),
            Transform::identity(),
            None,
        );
    }
}

fn draw_edge(pixmap: &mut Pixmap, edge: &Edge, route: &Route) {
    let line = &edge.line;
    let color = with_opacity(color_or(&line.stroke, Color::BLACK), line.opacity);
    let paint = solid(color);
    if let Some(path) = route_path(route) {
        pixmap.stroke_path(
            &path,
            &paint,
            &stroke(line.stroke_width, line.dasharray.as_deref()),
            Transform::identity(),
            None,
        );
    }
    let size = 6.0 + 2.0 * line.stroke_width.max(0.0);
    if let Some(marker) = line.target_marker {
        draw_marker(pixmap, marker, route.end(), route.end_direction(), size, &paint);
    }
    if let Some(marker) = line.source_marker {
        draw_marker(pixmap, marker, route.start, route.start_direction(), size, &paint);
    }
    for label in &edge.labels {
        draw_label_background(pixmap, label, route);
    }
}

/// Draw `marker` with its tip at `tip`, pointing along `dir` (a unit vector).
fn draw_marker(pixmap: &mut Pixmap, marker: Marker, tip: Point, dir: Point, size: f64, paint: &Paint<'_>) {
    let back = |k: f64| Point::new(tip.x - dir.x * size * k, tip.y - dir.y * size * k);
    let side = |p: Point, k: f64| Point::new(p.x - dir.y * size * k, p.y + dir.x * size * k);
    let path = match marker {
        Marker::Classic => polygon_path(&[tip, side(back(1.0), 0.5), back(0.7), side(back(1.0), -0.5)]),
        Marker::Block => polygon_path(&[tip, side(back(1.0), 0.5), side(back(1.0), -0.5)]),
        Marker::Diamond => polygon_path(&[tip, side(back(0.5), 0.35), back(1.0), side(back(0.5), -0.35)]),
        Marker::Circle => {
            let c = back(0.5);
            PathBuilder::from_circle(c.x as f32, c.y as f32, (size / 2.0) as f32)
        }
    };
    if let Some(path) = path {
        pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Estimated text box: glyphs are not rasterized, only the box behind them.
fn label_box(label: &EdgeLabel, center: Point) -> Rect {
    let chars = label.text.chars().count() as f64;
    let width = (chars * label.font_size * 0.6).max(label.font_size) + 8.0;
    let height = label.font_size + 6.0;
    Rect::new(
        Point::new(center.x - width / 2.0, center.y - height / 2.0),
        flowdesk_core::Size::new(width, height),
    )
}

fn draw_label_background(pixmap: &mut Pixmap, label: &EdgeLabel, route: &Route) {
    let Some(background) = &label.background else {
        return;
    };
    if label.text.trim().is_empty() {
        return;
    }
    let bounds = label_box(label, route.point_at(label.position));
    let Some(path) = rounded_rect(bounds, background.radius, background.radius) else {
        return;
    };
    let fill = color_or(&background.fill, Color::WHITE);
    pixmap.fill_path(&path, &solid(fill), FillRule::Winding, Transform::identity(), None);
    if background.stroke_width > 0.0 {
        let color = color_or(&background.stroke, Color::BLACK);
        pixmap.stroke_path(
            &path,
            &solid(color),
            &stroke(background.stroke_width, None),
            Transform::identity(),
            None,
        );
    }
}
