//! Node (diagram step) definition.

use flowdesk_core::{CellId, Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::catalog::NodeKind;

/// Semantic role of a node, used by the validator to find entry and exit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// Entry point of the flow.
    Start,
    /// Terminal point of the flow.
    End,
    /// Any other step.
    #[default]
    Step,
}

impl NodeRole {
    /// The role a freshly placed node of `kind` gets.
    #[must_use]
    pub fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Start => Self::Start,
            NodeKind::End => Self::End,
            _ => Self::Step,
        }
    }
}

/// Outline of a node body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodyShape {
    /// Rectangle, rounded by the style's `rx` / `ry`.
    Rect,
    /// Ellipse inscribed in the node bounds.
    Ellipse,
    /// Polygon whose reference points are scaled to the node bounds.
    Polygon {
        /// Reference points; their bounding box maps onto the node bounds.
        points: Vec<Point>,
    },
}

impl BodyShape {
    /// Parse an SVG-style point list such as `"60,0 120,30 60,60 0,30"`.
    ///
    /// Returns `None` if any pair is malformed or fewer than three points are given.
    #[must_use]
    pub fn polygon_from_str(points: &str) -> Option<Self> {
        let parsed = points
            .split_whitespace()
            .map(|pair| {
                let (x, y) = pair.split_once(',')?;
                Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
            })
            .collect::<Option<Vec<_>>>()?;
        (parsed.len() >= 3).then_some(Self::Polygon { points: parsed })
    }

    /// Polygon points mapped into `bounds`, or `None` for non-polygon bodies.
    ///
    /// A degenerate reference box (all points on one line) collapses onto the
    /// corresponding edge of `bounds` instead of dividing by zero.
    #[must_use]
    pub fn polygon_in(&self, bounds: Rect) -> Option<Vec<Point>> {
        let Self::Polygon { points } = self else {
            return None;
        };
        let (min_x, max_x) = min_max(points.iter().map(|p| p.x));
        let (min_y, max_y) = min_max(points.iter().map(|p| p.y));
        let scale = |v: f64, min: f64, max: f64, extent: f64| {
            if max > min {
                (v - min) / (max - min) * extent
            } else {
                0.0
            }
        };
        Some(
            points
                .iter()
                .map(|p| {
                    Point::new(
                        bounds.left() + scale(p.x, min_x, max_x, bounds.size.width),
                        bounds.top() + scale(p.y, min_y, max_y, bounds.size.height),
                    )
                })
                .collect(),
        )
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Drop shadow under a node body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Whether the shadow is drawn.
    pub enabled: bool,
    /// Shadow color.
    pub color: String,
    /// Blur radius in pixels.
    pub blur: f64,
    /// Horizontal offset.
    pub offset_x: f64,
    /// Vertical offset.
    pub offset_y: f64,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            enabled: false,
            color: "rgba(0,0,0,0.25)".into(),
            blur: 4.0,
            offset_x: 2.0,
            offset_y: 2.0,
        }
    }
}

/// Paint attributes of a node body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyStyle {
    /// Fill color.
    pub fill: String,
    /// Outline color.
    pub stroke: String,
    /// Outline width.
    pub stroke_width: f64,
    /// Dash pattern of the outline (`"5 5"`), solid when `None`.
    #[serde(default)]
    pub dasharray: Option<String>,
    /// Horizontal corner radius (rect bodies only).
    #[serde(default)]
    pub rx: f64,
    /// Vertical corner radius (rect bodies only).
    #[serde(default)]
    pub ry: f64,
    /// Overall opacity in `0.0..=1.0`.
    pub opacity: f64,
    /// Drop shadow.
    #[serde(default)]
    pub shadow: Shadow,
}

/// Text drawn inside a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLabel {
    /// Label text.
    pub text: String,
    /// Text color.
    pub fill: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// CSS font family list.
    pub font_family: String,
}

/// Side of a node an attachment point sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortSide {
    /// Middle of the top edge.
    Top,
    /// Middle of the right edge.
    Right,
    /// Middle of the bottom edge.
    Bottom,
    /// Middle of the left edge.
    Left,
}

impl PortSide {
    /// All sides, clockwise from the top.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Position of this side's anchor on `bounds`.
    #[must_use]
    pub fn anchor(self, bounds: Rect) -> Point {
        let c = bounds.center();
        match self {
            Self::Top => Point::new(c.x, bounds.top()),
            Self::Right => Point::new(bounds.right(), c.y),
            Self::Bottom => Point::new(c.x, bounds.bottom()),
            Self::Left => Point::new(bounds.left(), c.y),
        }
    }
}

/// Visual marker of an attachment point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortMarker {
    /// Circle radius.
    pub radius: f64,
    /// Outline color.
    pub stroke: String,
    /// Outline width.
    pub stroke_width: f64,
    /// Fill color.
    pub fill: String,
    /// Whether edges may start or end here.
    pub magnet: bool,
}

impl Default for PortMarker {
    fn default() -> Self {
        Self {
            radius: 4.0,
            stroke: "#1890ff".into(),
            stroke_width: 2.0,
            fill: "#fff".into(),
            magnet: true,
        }
    }
}

/// A named attachment point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Where on the node the port sits.
    pub side: PortSide,
    /// How the port is drawn.
    #[serde(default)]
    pub marker: PortMarker,
}

impl Port {
    /// A port on `side` with the standard marker.
    #[must_use]
    pub fn on(side: PortSide) -> Self {
        Self {
            side,
            marker: PortMarker::default(),
        }
    }
}

/// A single step placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique id within the graph.
    pub id: CellId,
    /// Catalog entry this node was created from.
    pub kind: NodeKind,
    /// Start / end / step marker.
    pub role: NodeRole,
    /// Top-left corner.
    pub position: Point,
    /// Body extent.
    pub size: Size,
    /// Body outline.
    pub shape: BodyShape,
    /// Body paint.
    pub style: BodyStyle,
    /// Text inside the body.
    pub label: NodeLabel,
    /// Attachment points.
    #[serde(default)]
    pub ports: Vec<Port>,
}

impl Node {
    /// Bounding rectangle.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    /// Center of the body.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Anchor of the port on `side`, if this node has one there.
    #[must_use]
    pub fn port_anchor(&self, side: PortSide) -> Option<Point> {
        self.ports
            .iter()
            .any(|p| p.side == side)
            .then(|| side.anchor(self.bounds()))
    }

    /// Label text, or the id when the label is blank.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.label.text.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.label.text
        }
    }
}
