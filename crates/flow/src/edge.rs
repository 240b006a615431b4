//! Edge (connection) types linking diagram nodes.

use flowdesk_core::CellId;
use serde::{Deserialize, Serialize};

use crate::catalog::EdgeKind;
use crate::node::PortSide;

/// Arrow-head style at an edge end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// Filled triangle with a notched back.
    Classic,
    /// Filled triangle.
    Block,
    /// Filled circle.
    Circle,
    /// Filled diamond.
    Diamond,
}

impl Marker {
    /// Marker name as used in snapshots and the property editor.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Block => "block",
            Self::Circle => "circle",
            Self::Diamond => "diamond",
        }
    }

    /// Parse a marker name. `Some(None)` means "no marker" (`""` or `"none"`).
    #[must_use]
    pub fn parse_optional(name: &str) -> Option<Option<Self>> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Some(None),
            "classic" => Some(Some(Self::Classic)),
            "block" => Some(Some(Self::Block)),
            "circle" => Some(Some(Self::Circle)),
            "diamond" => Some(Some(Self::Diamond)),
            _ => None,
        }
    }
}

/// Path routing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Router {
    /// Straight segment between the endpoints.
    #[default]
    Normal,
    /// Axis-aligned route with a single elbow.
    Orth,
    /// Axis-aligned route that leaves and enters perpendicular to the node sides.
    Manhattan,
}

impl Router {
    /// Router name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Orth => "orth",
            Self::Manhattan => "manhattan",
        }
    }

    /// Parse a router name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "orth" => Some(Self::Orth),
            "manhattan" => Some(Self::Manhattan),
            _ => None,
        }
    }
}

impl From<String> for Router {
    fn from(name: String) -> Self {
        Self::from_name(&name).unwrap_or_default()
    }
}

impl From<Router> for &'static str {
    fn from(router: Router) -> Self {
        router.name()
    }
}

/// How consecutive route points are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Connector {
    /// Straight segments.
    #[default]
    Normal,
    /// Smoothed curve through the route points.
    Smooth,
    /// Single cubic curve between the endpoints.
    Curve,
}

impl Connector {
    /// Connector name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Smooth => "smooth",
            Self::Curve => "curve",
        }
    }

    /// Parse a connector name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "smooth" => Some(Self::Smooth),
            "curve" => Some(Self::Curve),
            _ => None,
        }
    }
}

impl From<String> for Connector {
    fn from(name: String) -> Self {
        Self::from_name(&name).unwrap_or_default()
    }
}

impl From<Connector> for &'static str {
    fn from(connector: Connector) -> Self {
        connector.name()
    }
}

/// Paint attributes of an edge line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Line color.
    pub stroke: String,
    /// Line width.
    pub stroke_width: f64,
    /// Dash pattern (`"5 5"`), solid when `None`.
    #[serde(default)]
    pub dasharray: Option<String>,
    /// Marker at the source end.
    #[serde(default)]
    pub source_marker: Option<Marker>,
    /// Marker at the target end.
    #[serde(default)]
    pub target_marker: Option<Marker>,
    /// Overall opacity in `0.0..=1.0`.
    pub opacity: f64,
}

/// Box drawn behind an edge label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelBackground {
    /// Fill color.
    pub fill: String,
    /// Outline color.
    pub stroke: String,
    /// Outline width.
    pub stroke_width: f64,
    /// Corner radius.
    pub radius: f64,
}

impl Default for LabelBackground {
    fn default() -> Self {
        Self {
            fill: "#fff".into(),
            stroke: "#d9d9d9".into(),
            stroke_width: 1.0,
            radius: 3.0,
        }
    }
}

/// Text placed along an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLabel {
    /// Label text.
    pub text: String,
    /// Position along the path, `0.0` at the source and `1.0` at the target.
    pub position: f64,
    /// Text color.
    pub fill: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// CSS font family list.
    pub font_family: String,
    /// Optional box behind the text.
    #[serde(default)]
    pub background: Option<LabelBackground>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: 0.5,
            fill: "#333".into(),
            font_size: 12.0,
            font_family: "Arial, sans-serif".into(),
            background: None,
        }
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique id within the graph.
    pub id: CellId,
    /// Catalog entry this edge was created from.
    pub kind: EdgeKind,
    /// Source node.
    pub source: CellId,
    /// Target node.
    pub target: CellId,
    /// Attachment side on the source node; `None` attaches at the boundary.
    #[serde(default)]
    pub source_side: Option<PortSide>,
    /// Attachment side on the target node; `None` attaches at the boundary.
    #[serde(default)]
    pub target_side: Option<PortSide>,
    /// Line paint.
    pub line: LineStyle,
    /// Labels along the path.
    #[serde(default)]
    pub labels: Vec<EdgeLabel>,
    /// Routing algorithm.
    #[serde(default)]
    pub router: Router,
    /// Connector algorithm.
    #[serde(default)]
    pub connector: Connector,
}

impl Edge {
    /// Returns `true` if `node` is either endpoint.
    #[must_use]
    pub fn touches(&self, node: &CellId) -> bool {
        &self.source == node || &self.target == node
    }

    /// Returns `true` if this edge connects a node to itself.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Text of the first label, empty when there is none.
    #[must_use]
    pub fn label_text(&self) -> &str {
        self.labels.first().map_or("", |l| l.text.as_str())
    }
}
