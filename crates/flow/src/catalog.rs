//! Static shape catalog: one default template per node and edge type tag.
//!
//! Lookups are total. An unknown tag resolves to [`NodeKind::Task`] or
//! [`EdgeKind::Default`] rather than failing, so palettes and snapshots
//! written by other versions always produce a usable cell.

use std::sync::LazyLock;

use flowdesk_core::{CellId, Point, Size};
use serde::{Deserialize, Serialize};

use crate::edge::{Connector, Edge, EdgeLabel, LineStyle, Marker, Router};
use crate::node::{BodyShape, BodyStyle, Node, NodeLabel, NodeRole, Port, PortSide, Shadow};

const LABEL_FONT: &str = "Arial, sans-serif";
const EDGE_STROKE: &str = "#999";

/// Node type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum NodeKind {
    /// Flow entry.
    Start,
    /// Ordinary step.
    #[default]
    Task,
    /// Branching step.
    Decision,
    /// Flow exit.
    End,
    /// Data input / output.
    Data,
    /// Off-page connector.
    Connector,
    /// Sub-process.
    Process,
    /// Data store.
    Database,
    /// Manual input.
    Manual,
    /// Automated operation.
    Auto,
}

impl NodeKind {
    /// Every node kind in palette order.
    pub const ALL: [Self; 10] = [
        Self::Start,
        Self::Task,
        Self::Decision,
        Self::End,
        Self::Data,
        Self::Connector,
        Self::Process,
        Self::Database,
        Self::Manual,
        Self::Auto,
    ];

    /// Type tag.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Task => "task",
            Self::Decision => "decision",
            Self::End => "end",
            Self::Data => "data",
            Self::Connector => "connector",
            Self::Process => "process",
            Self::Database => "database",
            Self::Manual => "manual",
            Self::Auto => "auto",
        }
    }

    /// Parse a tag, `None` if unknown.
    #[must_use]
    pub fn try_from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.tag().eq_ignore_ascii_case(tag.trim()))
    }

    /// Parse a tag, falling back to [`NodeKind::Task`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        Self::try_from_tag(tag).unwrap_or_default()
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<NodeKind> for &'static str {
    fn from(kind: NodeKind) -> Self {
        kind.tag()
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Edge type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum EdgeKind {
    /// Plain arrow.
    #[default]
    Default,
    /// Arrow with a circle at the source.
    Arrow,
    /// Dashed arrow.
    Dashed,
    /// Orthogonally routed arrow.
    Orth,
    /// Manhattan-routed arrow.
    Manhattan,
    /// Smoothed arrow.
    Smooth,
    /// Curved arrow.
    Bezier,
}

impl EdgeKind {
    /// Every edge kind in palette order.
    pub const ALL: [Self; 7] = [
        Self::Default,
        Self::Arrow,
        Self::Dashed,
        Self::Orth,
        Self::Manhattan,
        Self::Smooth,
        Self::Bezier,
    ];

    /// Type tag.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Arrow => "arrow",
            Self::Dashed => "dashed",
            Self::Orth => "orth",
            Self::Manhattan => "manhattan",
            Self::Smooth => "smooth",
            Self::Bezier => "bezier",
        }
    }

    /// Parse a tag, `None` if unknown.
    #[must_use]
    pub fn try_from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.tag().eq_ignore_ascii_case(tag.trim()))
    }

    /// Parse a tag, falling back to [`EdgeKind::Default`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        Self::try_from_tag(tag).unwrap_or_default()
    }
}

impl From<String> for EdgeKind {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<EdgeKind> for &'static str {
    fn from(kind: EdgeKind) -> Self {
        kind.tag()
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Template a node is instantiated from.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDefault {
    /// Kind this template belongs to.
    pub kind: NodeKind,
    /// Default body extent.
    pub size: Size,
    /// Body outline.
    pub shape: BodyShape,
    /// Body paint.
    pub style: BodyStyle,
    /// Label text and font.
    pub label: NodeLabel,
    /// Attachment points.
    pub ports: Vec<Port>,
}

impl NodeDefault {
    /// Create a node from this template with its top-left corner at `position`.
    #[must_use]
    pub fn instantiate(&self, id: CellId, position: Point) -> Node {
        Node {
            id,
            kind: self.kind,
            role: NodeRole::for_kind(self.kind),
            position,
            size: self.size,
            shape: self.shape.clone(),
            style: self.style.clone(),
            label: self.label.clone(),
            ports: self.ports.clone(),
        }
    }
}

/// Template an edge is instantiated from.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDefault {
    /// Kind this template belongs to.
    pub kind: EdgeKind,
    /// Line paint.
    pub line: LineStyle,
    /// Initial labels.
    pub labels: Vec<EdgeLabel>,
    /// Routing algorithm.
    pub router: Router,
    /// Connector algorithm.
    pub connector: Connector,
}

impl EdgeDefault {
    /// Create an edge from this template.
    #[must_use]
    pub fn instantiate(&self, id: CellId, source: CellId, target: CellId) -> Edge {
        Edge {
            id,
            kind: self.kind,
            source,
            target,
            source_side: None,
            target_side: None,
            line: self.line.clone(),
            labels: self.labels.clone(),
            router: self.router,
            connector: self.connector,
        }
    }
}

static NODE_DEFAULTS: LazyLock<[NodeDefault; 10]> = LazyLock::new(|| NodeKind::ALL.map(build_node));
static EDGE_DEFAULTS: LazyLock<[EdgeDefault; 7]> = LazyLock::new(|| EdgeKind::ALL.map(build_edge));

/// Default template for `kind`.
#[must_use]
pub fn node_default(kind: NodeKind) -> &'static NodeDefault {
    &NODE_DEFAULTS[kind as usize]
}

/// Default template for `kind`.
#[must_use]
pub fn edge_default(kind: EdgeKind) -> &'static EdgeDefault {
    &EDGE_DEFAULTS[kind as usize]
}

/// Default template for a node tag; unknown tags yield the `task` template.
#[must_use]
pub fn node_default_for_tag(tag: &str) -> &'static NodeDefault {
    node_default(NodeKind::from_tag(tag))
}

/// Default template for an edge tag; unknown tags yield the `default` template.
#[must_use]
pub fn edge_default_for_tag(tag: &str) -> &'static EdgeDefault {
    edge_default(EdgeKind::from_tag(tag))
}

fn build_node(kind: NodeKind) -> NodeDefault {
    // (width, height, fill, stroke, label, rx, font size)
    let (width, height, fill, stroke, text, radius, font_size) = match kind {
        NodeKind::Start => (120.0, 60.0, "#52c41a", "#389e0d", "开始", 30.0, 14.0),
        NodeKind::Task => (120.0, 60.0, "#1890ff", "#096dd9", "任务", 6.0, 14.0),
        NodeKind::Decision => (120.0, 60.0, "#faad14", "#d48806", "判断", 0.0, 14.0),
        NodeKind::End => (60.0, 60.0, "#ff4d4f", "#cf1322", "结束", 0.0, 14.0),
        NodeKind::Data => (120.0, 60.0, "#722ed1", "#531dab", "数据", 0.0, 14.0),
        NodeKind::Connector => (40.0, 40.0, "#13c2c2", "#08979c", "连接", 0.0, 12.0),
        NodeKind::Process => (140.0, 80.0, "#2f54eb", "#1d39c4", "子流程", 10.0, 14.0),
        NodeKind::Database => (120.0, 80.0, "#fa8c16", "#d46b08", "数据库", 0.0, 14.0),
        NodeKind::Manual => (120.0, 80.0, "#eb2f96", "#c41d7f", "手动输入", 0.0, 14.0),
        NodeKind::Auto => (120.0, 60.0, "#597ef7", "#3c5ce6", "自动操作", 6.0, 14.0),
    };

    let shape = match kind {
        NodeKind::Decision => polygon("60,0 120,30 60,60 0,30"),
        NodeKind::Data => polygon("0,30 60,0 120,30 60,60"),
        NodeKind::Database => polygon("0,20 120,20 120,60 0,60 0,40 120,40"),
        NodeKind::End | NodeKind::Connector => BodyShape::Ellipse,
        NodeKind::Start | NodeKind::Task | NodeKind::Process | NodeKind::Manual | NodeKind::Auto => BodyShape::Rect,
    };

    let sides: &[PortSide] = match kind {
        NodeKind::Start => &[PortSide::Right, PortSide::Bottom],
        NodeKind::End => &[PortSide::Top, PortSide::Left],
        _ => &PortSide::ALL,
    };

    NodeDefault {
        kind,
        size: Size::new(width, height),
        shape,
        style: BodyStyle {
            fill: fill.into(),
            stroke: stroke.into(),
            stroke_width: 2.0,
            dasharray: None,
            rx: radius,
            ry: radius,
            opacity: 1.0,
            shadow: Shadow::default(),
        },
        label: NodeLabel {
            text: text.into(),
            fill: "#fff".into(),
            font_size,
            font_family: LABEL_FONT.into(),
        },
        ports: sides.iter().copied().map(Port::on).collect(),
    }
}

fn polygon(points: &str) -> BodyShape {
    BodyShape::polygon_from_str(points).unwrap_or(BodyShape::Rect)
}

fn build_edge(kind: EdgeKind) -> EdgeDefault {
    let (router, connector) = match kind {
        EdgeKind::Orth => (Router::Orth, Connector::Normal),
        EdgeKind::Manhattan => (Router::Manhattan, Connector::Normal),
        EdgeKind::Smooth => (Router::Normal, Connector::Smooth),
        EdgeKind::Bezier => (Router::Normal, Connector::Curve),
        EdgeKind::Default | EdgeKind::Arrow | EdgeKind::Dashed => {
            (Router::Normal, Connector::Normal)
        }
    };

    EdgeDefault {
        kind,
        line: LineStyle {
            stroke: EDGE_STROKE.into(),
            stroke_width: 2.0,
            dasharray: (kind == EdgeKind::Dashed).then(|| "5 5".to_string()),
            source_marker: (kind == EdgeKind::Arrow).then_some(Marker::Circle),
            target_marker: Some(Marker::Classic),
            opacity: 1.0,
        },
        labels: vec![EdgeLabel::default()],
        router,
        connector,
    }
}
