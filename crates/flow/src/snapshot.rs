//! JSON snapshot format.
//!
//! A snapshot is `{ "version": 1, "nodes": [...], "edges": [...] }` with every
//! cell attribute written out. When reading, each record is laid over the
//! catalog default of its kind, so older or hand-written documents with
//! missing fields still load, and unknown fields are ignored.

use std::collections::HashSet;

use flowdesk_core::{CellId, Point};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{EdgeKind, NodeKind, edge_default, node_default};
use crate::edge::Edge;
use crate::error::SnapshotError;
use crate::graph::Graph;
use crate::history::{DEFAULT_HISTORY_LIMIT, GraphState};
use crate::node::Node;

/// Snapshot format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of a [`Graph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializedGraph {
    /// Format version.
    pub version: u32,
    /// Nodes in drawing order.
    pub nodes: Vec<Node>,
    /// Edges in drawing order.
    pub edges: Vec<Edge>,
}

impl Default for SerializedGraph {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default = "current_version")]
    version: u32,
    #[serde(default)]
    nodes: Vec<Value>,
    #[serde(default)]
    edges: Vec<Value>,
}

fn current_version() -> u32 {
    SNAPSHOT_VERSION
}

impl RawSnapshot {
    fn complete(self) -> Result<SerializedGraph, SnapshotError> {
        if self.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        let nodes = self
            .nodes
            .into_iter()
            .enumerate()
            .map(|(i, record)| complete_node(i, record))
            .collect::<Result<Vec<_>, _>>()?;
        let edges = self
            .edges
            .into_iter()
            .enumerate()
            .map(|(i, record)| complete_edge(i, record))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SerializedGraph {
            version: SNAPSHOT_VERSION,
            nodes,
            edges,
        })
    }
}

impl<'de> Deserialize<'de> for SerializedGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawSnapshot::deserialize(deserializer)?
            .complete()
            .map_err(D::Error::custom)
    }
}

fn kind_tag(record: &Map<String, Value>) -> &str {
    record.get("kind").and_then(Value::as_str).unwrap_or_default()
}

fn complete_node(index: usize, record: Value) -> Result<Node, SnapshotError> {
    let Value::Object(record) = record else {
        return Err(malformed_record("node", index, "record is not an object"));
    };
    let kind = NodeKind::from_tag(kind_tag(&record));
    let template = node_default(kind).instantiate(CellId::node(0), Point::ZERO);
    let mut merged = serde_json::to_value(template)?;
    if let Value::Object(fields) = &mut merged {
        fields.remove("id");
    }
    merge(&mut merged, Value::Object(record));
    let node: Node =
        serde_json::from_value(merged).map_err(|e| malformed_record("node", index, e))?;
    if !node.size.is_valid() || !node.position.is_finite() {
        return Err(malformed_record("node", index, format!("{} has invalid geometry", node.id)));
    }
    Ok(node)
}

fn complete_edge(index: usize, record: Value) -> Result<Edge, SnapshotError> {
    let Value::Object(record) = record else {
        return Err(malformed_record("edge", index, "record is not an object"));
    };
    let kind = EdgeKind::from_tag(kind_tag(&record));
    let template = edge_default(kind).instantiate(CellId::edge(0), CellId::node(0), CellId::node(0));
    let mut merged = serde_json::to_value(template)?;
    if let Value::Object(fields) = &mut merged {
        for key in ["id", "source", "target"] {
            fields.remove(key);
        }
    }
    merge(&mut merged, Value::Object(record));
    serde_json::from_value(merged).map_err(|e| malformed_record("edge", index, e))
}

fn malformed_record(what: &str, index: usize, message: impl std::fmt::Display) -> SnapshotError {
    SnapshotError::Malformed {
        what: format!("{what} #{index}"),
        message: message.to_string(),
    }
}

/// Lay `overlay` over `base`: objects merge key by key, everything else
/// (arrays and `null` included) replaces.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

impl SerializedGraph {
    /// Check the structure and build a graph keeping `history_limit` undo steps.
    pub fn into_graph(self, history_limit: usize) -> Result<Graph, SnapshotError> {
        Ok(Graph::from_state(self.into_state()?, history_limit))
    }

    fn into_state(self) -> Result<GraphState, SnapshotError> {
        let mut seen = HashSet::with_capacity(self.nodes.len() + self.edges.len());
        let mut state = GraphState::default();

        for node in self.nodes {
            if !seen.insert(node.id.clone()) {
                return Err(SnapshotError::DuplicateId(node.id));
            }
            state.nodes.insert(node.id.clone(), node);
        }
        for edge in self.edges {
            if !seen.insert(edge.id.clone()) {
                return Err(SnapshotError::DuplicateId(edge.id));
            }
            if edge.is_self_loop() {
                return Err(SnapshotError::SelfLoop(edge.id));
            }
            for end in [&edge.source, &edge.target] {
                if !state.nodes.contains_key(end) {
                    return Err(SnapshotError::DanglingEndpoint {
                        edge: edge.id.clone(),
                        node: end.clone(),
                    });
                }
            }
            state.edges.insert(edge.id.clone(), edge);
        }
        Ok(state)
    }
}

/// Capture every cell of `graph`.
#[must_use]
pub fn to_snapshot(graph: &Graph) -> SerializedGraph {
    SerializedGraph {
        version: SNAPSHOT_VERSION,
        nodes: graph.nodes().cloned().collect(),
        edges: graph.edges().cloned().collect(),
    }
}

/// Rebuild a graph from a snapshot. The result has empty history.
pub fn from_snapshot(snapshot: SerializedGraph) -> Result<Graph, SnapshotError> {
    snapshot.into_graph(DEFAULT_HISTORY_LIMIT)
}

/// Pretty-printed JSON of `graph`'s snapshot.
pub fn to_json(graph: &Graph) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(&to_snapshot(graph))?)
}

/// Parse a JSON snapshot into its completed records.
pub fn parse_json(json: &str) -> Result<SerializedGraph, SnapshotError> {
    let raw: RawSnapshot = serde_json::from_str(json)?;
    raw.complete()
}

/// Parse a JSON snapshot and rebuild the graph.
pub fn from_json(json: &str) -> Result<Graph, SnapshotError> {
    from_snapshot(parse_json(json)?)
}

impl Graph {
    /// Replace the content with `snapshot`.
    ///
    /// On error the graph is untouched; on success the previous content is
    /// one undo step away.
    pub fn replace_with_snapshot(&mut self, snapshot: SerializedGraph) -> Result<(), SnapshotError> {
        let state = snapshot.into_state()?;
        self.replace_state(state);
        tracing::info!(nodes = self.node_count(), edges = self.edge_count(), "graph replaced from snapshot");
        Ok(())
    }

    /// Snapshot of the current content.
    #[must_use]
    pub fn to_snapshot(&self) -> SerializedGraph {
        to_snapshot(self)
    }
}

impl From<Graph> for SerializedGraph {
    fn from(graph: Graph) -> Self {
        let state = graph.into_state();
        Self {
            version: SNAPSHOT_VERSION,
            nodes: state.nodes.into_values().collect(),
            edges: state.edges.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributePath, EdgeField, NodeField};
    use crate::edge::{Marker, Router};
    use crate::node::NodeRole;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Graph {
        let mut g = Graph::new();
        let s = g.add_node(NodeKind::Start, Point::new(40.0, 40.0));
        let d = g.add_node(NodeKind::Decision, Point::new(40.0, 160.0));
        let e = g.add_node(NodeKind::End, Point::new(60.0, 300.0));
        g.add_edge(&s, &d, EdgeKind::Default).unwrap();
        let yes = g.add_edge(&d, &e, EdgeKind::Manhattan).unwrap();
        g.set_label(&yes, "yes").unwrap();
        g.update_attribute(&d, AttributePath::Node(NodeField::Shadow), true);
        g.update_attribute(&yes, AttributePath::Edge(EdgeField::LineDasharray), "");
        g
    }

    #[test]
    fn roundtrip_preserves_graph() {
        let g = sample();
        let back = from_snapshot(to_snapshot(&g)).unwrap();
        assert_eq!(back, g);
        let back = from_json(&to_json(&g).unwrap()).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn roundtrip_keeps_cleared_optional_fields() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Task, Point::ZERO);
        let b = g.add_node(NodeKind::Task, Point::ZERO);
        let e = g.add_edge(&a, &b, EdgeKind::Dashed).unwrap();
        g.update_attribute(&e, AttributePath::Edge(EdgeField::LineDasharray), "");
        g.update_attribute(&e, AttributePath::Edge(EdgeField::TargetMarker), "none");
        let back = from_json(&to_json(&g).unwrap()).unwrap();
        let edge = back.edge(&e).unwrap();
        assert_eq!(edge.line.dasharray, None);
        assert_eq!(edge.line.target_marker, None);
    }

    #[test]
    fn loaded_graph_continues_id_sequence() {
        let g = sample();
        let mut back = from_snapshot(to_snapshot(&g)).unwrap();
        assert!(!back.can_undo());
        assert_eq!(back.add_node(NodeKind::Task, Point::ZERO).as_str(), "n4");
        assert_eq!(back.add_edge(&CellId::node(1), &CellId::node(4), EdgeKind::Default).unwrap().as_str(), "e3");
    }

    #[test]
    fn huge_sequence_numbers_do_not_exhaust_ids() {
        let doc = json!({
            "nodes": [
                { "id": "n18446744073709551615", "kind": "task" },
                { "id": "n1", "kind": "task" }
            ],
            "edges": [
                { "id": "e18446744073709551615", "source": "n1", "target": "n18446744073709551615" }
            ]
        });
        let mut g = from_json(&doc.to_string()).unwrap();
        assert_eq!(g.node_count(), 2);

        let fresh = g.add_node(NodeKind::Task, Point::ZERO);
        assert_eq!(fresh.as_str(), "n2");
        let again = g.add_node(NodeKind::Task, Point::ZERO);
        assert_eq!(again.as_str(), "n3");
        let edge = g.add_edge(&fresh, &again, EdgeKind::Default).unwrap();
        assert_eq!(edge.as_str(), "e1");
    }

    #[test]
    fn sparse_records_fill_from_catalog() {
        let doc = json!({
            "version": 1,
            "nodes": [
                { "id": "a", "kind": "start", "position": { "x": 10.0, "y": 20.0 } },
                { "id": "b", "kind": "end", "label": { "text": "Done" }, "future_field": 7 }
            ],
            "edges": [
                { "id": "ab", "kind": "arrow", "source": "a", "target": "b" }
            ]
        });
        let g = from_json(&doc.to_string()).unwrap();
        let a = g.node(&CellId::new("a").unwrap()).unwrap();
        assert_eq!(a.role, NodeRole::Start);
        assert_eq!(a.style.fill, "#52c41a");
        assert_eq!(a.position, Point::new(10.0, 20.0));
        let b = g.node(&CellId::new("b").unwrap()).unwrap();
        assert_eq!(b.label.text, "Done");
        assert_eq!(b.label.fill, "#fff");
        let edge = g.edge(&CellId::new("ab").unwrap()).unwrap();
        assert_eq!(edge.line.source_marker, Some(Marker::Circle));
        assert_eq!(edge.line.target_marker, Some(Marker::Classic));
        assert_eq!(edge.router, Router::Normal);
    }

    #[test]
    fn unknown_kinds_fall_back() {
        let doc = json!({
            "nodes": [{ "id": "x", "kind": "hexagon" }, { "id": "y" }],
            "edges": [{ "id": "xy", "kind": "zigzag", "source": "x", "target": "y" }]
        });
        let g = from_json(&doc.to_string()).unwrap();
        assert_eq!(g.node(&CellId::new("x").unwrap()).unwrap().kind, NodeKind::Task);
        assert_eq!(g.node(&CellId::new("y").unwrap()).unwrap().kind, NodeKind::Task);
        assert_eq!(g.edge(&CellId::new("xy").unwrap()).unwrap().kind, EdgeKind::Default);
    }

    #[test]
    fn structural_errors() {
        let dup = json!({ "nodes": [{ "id": "a" }, { "id": "a" }] });
        assert!(matches!(from_json(&dup.to_string()), Err(SnapshotError::DuplicateId(id)) if id == "a"));

        let dangling = json!({
            "nodes": [{ "id": "a" }],
            "edges": [{ "id": "e", "source": "a", "target": "ghost" }]
        });
        assert!(matches!(
            from_json(&dangling.to_string()),
            Err(SnapshotError::DanglingEndpoint { node, .. }) if node == "ghost"
        ));

        let looped = json!({
            "nodes": [{ "id": "a" }],
            "edges": [{ "id": "e", "source": "a", "target": "a" }]
        });
        assert!(matches!(from_json(&looped.to_string()), Err(SnapshotError::SelfLoop(_))));

        let shared = json!({
            "nodes": [{ "id": "a" }, { "id": "b" }],
            "edges": [{ "id": "a", "source": "a", "target": "b" }]
        });
        assert!(matches!(from_json(&shared.to_string()), Err(SnapshotError::DuplicateId(_))));
    }

    #[test]
    fn record_errors() {
        let no_id = json!({ "nodes": [{ "kind": "task" }] });
        assert!(matches!(from_json(&no_id.to_string()), Err(SnapshotError::Malformed { .. })));

        let not_object = json!({ "nodes": [42] });
        assert!(matches!(from_json(&not_object.to_string()), Err(SnapshotError::Malformed { .. })));

        let zero_size = json!({ "nodes": [{ "id": "a", "size": { "width": 0.0, "height": 10.0 } }] });
        assert!(matches!(from_json(&zero_size.to_string()), Err(SnapshotError::Malformed { .. })));

        assert!(matches!(from_json("not json"), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn newer_version_rejected() {
        let doc = json!({ "version": 2, "nodes": [] });
        assert!(matches!(
            from_json(&doc.to_string()),
            Err(SnapshotError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn serde_deserialize_goes_through_completion() {
        let doc = json!({ "nodes": [{ "id": "a", "kind": "end" }] });
        let snapshot: SerializedGraph = serde_json::from_value(doc).unwrap();
        assert_eq!(snapshot.nodes[0].size.width, 60.0);
    }

    #[test]
    fn replace_failure_leaves_graph_untouched() {
        let mut g = sample();
        let before = g.state().clone();
        let rev = g.revision();
        let bad = SerializedGraph {
            version: 1,
            nodes: vec![],
            edges: to_snapshot(&g).edges,
        };
        assert!(g.replace_with_snapshot(bad).is_err());
        assert_eq!(g.state(), &before);
        assert_eq!(g.revision(), rev);
    }

    #[test]
    fn replace_is_undoable() {
        let mut g = sample();
        let before = g.state().clone();
        g.replace_with_snapshot(SerializedGraph::default()).unwrap();
        assert!(g.is_empty());
        assert!(g.undo());
        assert_eq!(g.state(), &before);
    }
}
