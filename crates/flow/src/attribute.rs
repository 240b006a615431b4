//! Editable cell properties.
//!
//! Each cell kind exposes a fixed, closed set of fields. The property editor
//! lists them through [`editable_properties`], reads values with
//! [`AttributePath::read_node`] / [`AttributePath::read_edge`] and writes with
//! the matching `apply_*` method. String paths such as `attrs/body/fill` or
//! `router.name` are only parsed at the boundary ([`AttributePath::parse`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::edge::{Connector, Edge, EdgeLabel, Marker, Router};
use crate::node::Node;

/// The two kinds of graph element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// A node.
    Node,
    /// An edge.
    Edge,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Edge => f.write_str("edge"),
        }
    }
}

/// What sort of widget edits a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Free text.
    Text,
    /// CSS color string.
    Color,
    /// Number.
    Number,
    /// Checkbox.
    Boolean,
}

/// A property value coming from or going to the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text or color value.
    Text(String),
}

impl AttrValue {
    fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
            Self::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Number(_) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Editable node fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeField {
    /// Label text.
    Label,
    /// Body fill color.
    BodyFill,
    /// Body outline color.
    BodyStroke,
    /// Body outline width.
    BodyStrokeWidth,
    /// Horizontal corner radius.
    BodyRx,
    /// Vertical corner radius.
    BodyRy,
    /// Body width.
    Width,
    /// Body height.
    Height,
    /// Label color.
    LabelFill,
    /// Label font size.
    LabelFontSize,
    /// Label font family.
    LabelFontFamily,
    /// Shadow on / off.
    Shadow,
    /// Shadow color.
    ShadowColor,
    /// Shadow blur radius.
    ShadowBlur,
    /// Shadow horizontal offset.
    ShadowOffsetX,
    /// Shadow vertical offset.
    ShadowOffsetY,
}

/// Editable edge fields. Label fields address the first label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeField {
    /// Line color.
    LineStroke,
    /// Line width.
    LineStrokeWidth,
    /// Line dash pattern.
    LineDasharray,
    /// Marker at the target end.
    TargetMarker,
    /// Marker at the source end.
    SourceMarker,
    /// First label text.
    LabelText,
    /// First label color.
    LabelFill,
    /// First label font size.
    LabelFontSize,
    /// Routing algorithm.
    RouterName,
    /// Connector algorithm.
    ConnectorName,
}

/// An editable field of either cell kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributePath {
    /// Node field.
    Node(NodeField),
    /// Edge field.
    Edge(EdgeField),
}

/// Node fields in editor order.
pub const NODE_PROPERTIES: [AttributePath; 16] = [
    AttributePath::Node(NodeField::Label),
    AttributePath::Node(NodeField::BodyFill),
    AttributePath::Node(NodeField::BodyStroke),
    AttributePath::Node(NodeField::BodyStrokeWidth),
    AttributePath::Node(NodeField::BodyRx),
    AttributePath::Node(NodeField::BodyRy),
    AttributePath::Node(NodeField::Width),
    AttributePath::Node(NodeField::Height),
    AttributePath::Node(NodeField::LabelFill),
    AttributePath::Node(NodeField::LabelFontSize),
    AttributePath::Node(NodeField::LabelFontFamily),
    AttributePath::Node(NodeField::Shadow),
    AttributePath::Node(NodeField::ShadowColor),
    AttributePath::Node(NodeField::ShadowBlur),
    AttributePath::Node(NodeField::ShadowOffsetX),
    AttributePath::Node(NodeField::ShadowOffsetY),
];

/// Edge fields in editor order.
pub const EDGE_PROPERTIES: [AttributePath; 10] = [
    AttributePath::Edge(EdgeField::LineStroke),
    AttributePath::Edge(EdgeField::LineStrokeWidth),
    AttributePath::Edge(EdgeField::LineDasharray),
    AttributePath::Edge(EdgeField::TargetMarker),
    AttributePath::Edge(EdgeField::SourceMarker),
    AttributePath::Edge(EdgeField::LabelText),
    AttributePath::Edge(EdgeField::LabelFill),
    AttributePath::Edge(EdgeField::LabelFontSize),
    AttributePath::Edge(EdgeField::RouterName),
    AttributePath::Edge(EdgeField::ConnectorName),
];

/// The fixed editable-property list of a cell kind.
#[must_use]
pub fn editable_properties(kind: CellKind) -> &'static [AttributePath] {
    match kind {
        CellKind::Node => &NODE_PROPERTIES,
        CellKind::Edge => &EDGE_PROPERTIES,
    }
}

impl AttributePath {
    /// Cell kind this field belongs to.
    #[must_use]
    pub fn cell_kind(self) -> CellKind {
        match self {
            Self::Node(_) => CellKind::Node,
            Self::Edge(_) => CellKind::Edge,
        }
    }

    /// Canonical slash-separated path.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Node(field) => match field {
                NodeField::Label => "label",
                NodeField::BodyFill => "attrs/body/fill",
                NodeField::BodyStroke => "attrs/body/stroke",
                NodeField::BodyStrokeWidth => "attrs/body/strokeWidth",
                NodeField::BodyRx => "attrs/body/rx",
                NodeField::BodyRy => "attrs/body/ry",
                NodeField::Width => "width",
                NodeField::Height => "height",
                NodeField::LabelFill => "attrs/label/fill",
                NodeField::LabelFontSize => "attrs/label/fontSize",
                NodeField::LabelFontFamily => "attrs/label/fontFamily",
                NodeField::Shadow => "attrs/body/shadow",
                NodeField::ShadowColor => "attrs/body/shadowColor",
                NodeField::ShadowBlur => "attrs/body/shadowBlur",
                NodeField::ShadowOffsetX => "attrs/body/shadowOffsetX",
                NodeField::ShadowOffsetY => "attrs/body/shadowOffsetY",
            },
            Self::Edge(field) => match field {
                EdgeField::LineStroke => "attrs/line/stroke",
                EdgeField::LineStrokeWidth => "attrs/line/strokeWidth",
                EdgeField::LineDasharray => "attrs/line/strokeDasharray",
                EdgeField::TargetMarker => "attrs/line/targetMarker",
                EdgeField::SourceMarker => "attrs/line/sourceMarker",
                EdgeField::LabelText => "labels/0/attrs/label/text",
                EdgeField::LabelFill => "labels/0/attrs/label/fill",
                EdgeField::LabelFontSize => "labels/0/attrs/label/fontSize",
                EdgeField::RouterName => "router/name",
                EdgeField::ConnectorName => "connector/name",
            },
        }
    }

    /// Human-readable name shown next to the editor widget.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Node(field) => match field {
                NodeField::Label => "Name",
                NodeField::BodyFill => "Fill color",
                NodeField::BodyStroke => "Border color",
                NodeField::BodyStrokeWidth => "Border width",
                NodeField::BodyRx => "Corner radius X",
                NodeField::BodyRy => "Corner radius Y",
                NodeField::Width => "Width",
                NodeField::Height => "Height",
                NodeField::LabelFill => "Text color",
                NodeField::LabelFontSize => "Font size",
                NodeField::LabelFontFamily => "Font",
                NodeField::Shadow => "Shadow",
                NodeField::ShadowColor => "Shadow color",
                NodeField::ShadowBlur => "Shadow blur",
                NodeField::ShadowOffsetX => "Shadow offset X",
                NodeField::ShadowOffsetY => "Shadow offset Y",
            },
            Self::Edge(field) => match field {
                EdgeField::LineStroke => "Line color",
                EdgeField::LineStrokeWidth => "Line width",
                EdgeField::LineDasharray => "Dash pattern",
                EdgeField::TargetMarker => "Target marker",
                EdgeField::SourceMarker => "Source marker",
                EdgeField::LabelText => "Label text",
                EdgeField::LabelFill => "Label color",
                EdgeField::LabelFontSize => "Label font size",
                EdgeField::RouterName => "Router",
                EdgeField::ConnectorName => "Connector",
            },
        }
    }

    /// Widget kind for this field.
    #[must_use]
    pub fn value_kind(self) -> ValueKind {
        match self {
            Self::Node(field) => match field {
                NodeField::Label | NodeField::LabelFontFamily => ValueKind::Text,
                NodeField::BodyFill
                | NodeField::BodyStroke
                | NodeField::LabelFill
                | NodeField::ShadowColor => ValueKind::Color,
                NodeField::Shadow => ValueKind::Boolean,
                NodeField::BodyStrokeWidth
                | NodeField::BodyRx
                | NodeField::BodyRy
                | NodeField::Width
                | NodeField::Height
                | NodeField::LabelFontSize
                | NodeField::ShadowBlur
                | NodeField::ShadowOffsetX
                | NodeField::ShadowOffsetY => ValueKind::Number,
            },
            Self::Edge(field) => match field {
                EdgeField::LineStroke | EdgeField::LabelFill => ValueKind::Color,
                EdgeField::LineStrokeWidth | EdgeField::LabelFontSize => ValueKind::Number,
                EdgeField::LineDasharray
                | EdgeField::TargetMarker
                | EdgeField::SourceMarker
                | EdgeField::LabelText
                | EdgeField::RouterName
                | EdgeField::ConnectorName => ValueKind::Text,
            },
        }
    }

    /// Parse a string path for a cell of `kind`.
    ///
    /// `/`, `.` and `-` are accepted as separators, matching is
    /// case-insensitive, and the leading `attrs/` may be omitted
    /// (`body.fill`, `router-name`). Returns `None` for anything not in the
    /// kind's editable list.
    #[must_use]
    pub fn parse(kind: CellKind, raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| if matches!(c, '.' | '-') { '/' } else { c })
            .collect();
        let normalized = normalized.trim_matches('/');
        let prefixed = format!("attrs/{normalized}");

        let aliases: &[(&str, Self)] = match kind {
            CellKind::Node => &[("attrs/label/text", Self::Node(NodeField::Label))],
            CellKind::Edge => &[
                ("label", Self::Edge(EdgeField::LabelText)),
                ("attrs/label/text", Self::Edge(EdgeField::LabelText)),
                ("router", Self::Edge(EdgeField::RouterName)),
                ("connector", Self::Edge(EdgeField::ConnectorName)),
            ],
        };

        let matches = |candidate: &str| {
            candidate.eq_ignore_ascii_case(normalized) || candidate.eq_ignore_ascii_case(&prefixed)
        };

        editable_properties(kind)
            .iter()
            .copied()
            .find(|p| matches(p.path()))
            .or_else(|| {
                aliases
                    .iter()
                    .find(|(alias, _)| matches(alias))
                    .map(|(_, p)| *p)
            })
    }

    /// Read this field from a node. `None` for edge fields.
    #[must_use]
    pub fn read_node(self, node: &Node) -> Option<AttrValue> {
        let Self::Node(field) = self else {
            return None;
        };
        let style = &node.style;
        Some(match field {
            NodeField::Label => node.label.text.clone().into(),
            NodeField::BodyFill => style.fill.clone().into(),
            NodeField::BodyStroke => style.stroke.clone().into(),
            NodeField::BodyStrokeWidth => style.stroke_width.into(),
            NodeField::BodyRx => style.rx.into(),
            NodeField::BodyRy => style.ry.into(),
            NodeField::Width => node.size.width.into(),
            NodeField::Height => node.size.height.into(),
            NodeField::LabelFill => node.label.fill.clone().into(),
            NodeField::LabelFontSize => node.label.font_size.into(),
            NodeField::LabelFontFamily => node.label.font_family.clone().into(),
            NodeField::Shadow => style.shadow.enabled.into(),
            NodeField::ShadowColor => style.shadow.color.clone().into(),
            NodeField::ShadowBlur => style.shadow.blur.into(),
            NodeField::ShadowOffsetX => style.shadow.offset_x.into(),
            NodeField::ShadowOffsetY => style.shadow.offset_y.into(),
        })
    }

    /// Read this field from an edge. `None` for node fields.
    #[must_use]
    pub fn read_edge(self, edge: &Edge) -> Option<AttrValue> {
        let Self::Edge(field) = self else {
            return None;
        };
        let line = &edge.line;
        let first = edge.labels.first();
        let marker_name = |m: Option<Marker>| m.map_or("none", Marker::name).to_string();
        Some(match field {
            EdgeField::LineStroke => line.stroke.clone().into(),
            EdgeField::LineStrokeWidth => line.stroke_width.into(),
            EdgeField::LineDasharray => line.dasharray.clone().unwrap_or_default().into(),
            EdgeField::TargetMarker => marker_name(line.target_marker).into(),
            EdgeField::SourceMarker => marker_name(line.source_marker).into(),
            EdgeField::LabelText => edge.label_text().into(),
            EdgeField::LabelFill => first.map_or_else(|| EdgeLabel::default().fill, |l| l.fill.clone()).into(),
            EdgeField::LabelFontSize => first.map_or(EdgeLabel::default().font_size, |l| l.font_size).into(),
            EdgeField::RouterName => edge.router.name().into(),
            EdgeField::ConnectorName => edge.connector.name().into(),
        })
    }

    /// Write `value` into `node`. Returns `true` if the node changed.
    ///
    /// Edge fields, values of the wrong kind and out-of-range numbers
    /// (non-positive sizes, negative widths) leave the node untouched.
    pub fn apply_node(self, node: &mut Node, value: &AttrValue) -> bool {
        let Self::Node(field) = self else {
            return false;
        };
        let style = &mut node.style;
        match field {
            NodeField::Label => set_text(&mut node.label.text, value),
            NodeField::BodyFill => set_color(&mut style.fill, value),
            NodeField::BodyStroke => set_color(&mut style.stroke, value),
            NodeField::BodyStrokeWidth => set_number(&mut style.stroke_width, value, |n| n >= 0.0),
            NodeField::BodyRx => set_number(&mut style.rx, value, |n| n >= 0.0),
            NodeField::BodyRy => set_number(&mut style.ry, value, |n| n >= 0.0),
            NodeField::Width => set_number(&mut node.size.width, value, |n| n > 0.0),
            NodeField::Height => set_number(&mut node.size.height, value, |n| n > 0.0),
            NodeField::LabelFill => set_color(&mut node.label.fill, value),
            NodeField::LabelFontSize => set_number(&mut node.label.font_size, value, |n| n > 0.0),
            NodeField::LabelFontFamily => set_text(&mut node.label.font_family, value),
            NodeField::Shadow => set_bool(&mut style.shadow.enabled, value),
            NodeField::ShadowColor => set_color(&mut style.shadow.color, value),
            NodeField::ShadowBlur => set_number(&mut style.shadow.blur, value, |n| n >= 0.0),
            NodeField::ShadowOffsetX => set_number(&mut style.shadow.offset_x, value, |_| true),
            NodeField::ShadowOffsetY => set_number(&mut style.shadow.offset_y, value, |_| true),
        }
    }

    /// Write `value` into `edge`. Returns `true` if the edge changed.
    ///
    /// Label fields create the first label when the edge has none. Unknown
    /// marker, router and connector names are rejected.
    pub fn apply_edge(self, edge: &mut Edge, value: &AttrValue) -> bool {
        let Self::Edge(field) = self else {
            return false;
        };
        let line = &mut edge.line;
        match field {
            EdgeField::LineStroke => set_color(&mut line.stroke, value),
            EdgeField::LineStrokeWidth => set_number(&mut line.stroke_width, value, |n| n > 0.0),
            EdgeField::LineDasharray => {
                let Some(text) = value.as_text() else {
                    return false;
                };
                let next = Some(text.trim().to_string()).filter(|s| !s.is_empty() && s != "none");
                replace(&mut line.dasharray, next)
            }
            EdgeField::TargetMarker => set_marker(&mut line.target_marker, value),
            EdgeField::SourceMarker => set_marker(&mut line.source_marker, value),
            EdgeField::LabelText => {
                value.as_text().is_some() && set_text(&mut first_label(edge).text, value)
            }
            EdgeField::LabelFill => {
                value.as_text().is_some_and(|s| !s.trim().is_empty())
                    && set_color(&mut first_label(edge).fill, value)
            }
            EdgeField::LabelFontSize => {
                value.as_number().is_some_and(|n| n > 0.0)
                    && set_number(&mut first_label(edge).font_size, value, |n| n > 0.0)
            }
            EdgeField::RouterName => match value.as_text().and_then(Router::from_name) {
                Some(router) => replace(&mut edge.router, router),
                None => false,
            },
            EdgeField::ConnectorName => match value.as_text().and_then(Connector::from_name) {
                Some(connector) => replace(&mut edge.connector, connector),
                None => false,
            },
        }
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

fn first_label(edge: &mut Edge) -> &mut EdgeLabel {
    if edge.labels.is_empty() {
        edge.labels.push(EdgeLabel::default());
    }
    &mut edge.labels[0]
}

fn replace<T: PartialEq>(slot: &mut T, next: T) -> bool {
    if *slot == next {
        false
    } else {
        *slot = next;
        true
    }
}

fn set_text(slot: &mut String, value: &AttrValue) -> bool {
    match value.as_text() {
        Some(text) => replace(slot, text.to_string()),
        None => false,
    }
}

fn set_color(slot: &mut String, value: &AttrValue) -> bool {
    match value.as_text().map(str::trim) {
        Some(color) if !color.is_empty() => replace(slot, color.to_string()),
        _ => false,
    }
}

fn set_number(slot: &mut f64, value: &AttrValue, accept: impl Fn(f64) -> bool) -> bool {
    match value.as_number() {
        Some(n) if accept(n) => replace(slot, n),
        _ => false,
    }
}

fn set_bool(slot: &mut bool, value: &AttrValue) -> bool {
    match value.as_bool() {
        Some(b) => replace(slot, b),
        None => false,
    }
}

fn set_marker(slot: &mut Option<Marker>, value: &AttrValue) -> bool {
    match value.as_text().and_then(Marker::parse_optional) {
        Some(marker) => replace(slot, marker),
        None => false,
    }
}
