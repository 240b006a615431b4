//! The editable flow graph.

use flowdesk_core::id::{EDGE_PREFIX, NODE_PREFIX};
use flowdesk_core::{CellId, Point, Rect, Size};
use indexmap::IndexSet;

use crate::attribute::{AttrValue, AttributePath, CellKind, editable_properties};
use crate::catalog::{EdgeKind, NodeKind, edge_default, node_default};
use crate::edge::Edge;
use crate::error::{ConnectionRejection, GraphError};
use crate::history::{DEFAULT_HISTORY_LIMIT, GraphState, History};
use crate::node::{Node, PortSide};

/// Nodes and edges of one diagram, with history and selection.
///
/// Insertion order of both maps is the drawing order. Every mutation either
/// succeeds completely and records one undo entry, or leaves the graph
/// untouched.
#[derive(Debug)]
pub struct Graph {
    state: GraphState,
    history: History,
    selection: IndexSet<CellId>,
    next_node: u64,
    next_edge: u64,
    revision: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Graph {
    /// Graphs compare by structure; history, selection and counters are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl Graph {
    /// An empty graph with the default history depth.
    #[must_use]
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// An empty graph keeping at most `limit` undo steps.
    #[must_use]
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            state: GraphState::default(),
            history: History::new(limit),
            selection: IndexSet::new(),
            next_node: 1,
            next_edge: 1,
            revision: 0,
        }
    }

    /// Build a graph around an existing state. Id counters start past the
    /// highest sequence number found in `state`.
    pub(crate) fn from_state(state: GraphState, history_limit: usize) -> Self {
        let mut graph = Self::with_history_limit(history_limit);
        graph.state = state;
        graph.advance_counters();
        graph
    }

    fn advance_counters(&mut self) {
        let max_node = self
            .state
            .nodes
            .keys()
            .chain(self.state.edges.keys())
            .filter_map(|id| id.sequence(NODE_PREFIX))
            .max()
            .unwrap_or(0);
        let max_edge = self
            .state
            .nodes
            .keys()
            .chain(self.state.edges.keys())
            .filter_map(|id| id.sequence(EDGE_PREFIX))
            .max()
            .unwrap_or(0);
        self.next_node = self.next_node.max(max_node.saturating_add(1));
        self.next_edge = self.next_edge.max(max_edge.saturating_add(1));
    }

    fn mint_node_id(&mut self) -> CellId {
        loop {
            let id = CellId::node(self.next_node);
            // past u64::MAX, search again from the bottom for a free slot
            self.next_node = self.next_node.checked_add(1).unwrap_or(1);
            if !self.state.contains(&id) {
                return id;
            }
        }
    }

    fn mint_edge_id(&mut self) -> CellId {
        loop {
            let id = CellId::edge(self.next_edge);
            self.next_edge = self.next_edge.checked_add(1).unwrap_or(1);
            if !self.state.contains(&id) {
                return id;
            }
        }
    }

    /// Snapshot the current state into history and bump the revision.
    fn checkpoint(&mut self) {
        self.history.record(self.state.clone());
        self.revision += 1;
    }

    fn prune_selection(&mut self) {
        let state = &self.state;
        self.selection.retain(|id| state.contains(id));
    }

    // ---- queries ----------------------------------------------------------

    /// Node by id.
    #[must_use]
    pub fn node(&self, id: &CellId) -> Option<&Node> {
        self.state.nodes.get(id)
    }

    /// Edge by id.
    #[must_use]
    pub fn edge(&self, id: &CellId) -> Option<&Edge> {
        self.state.edges.get(id)
    }

    /// Nodes in drawing order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.state.nodes.values()
    }

    /// Edges in drawing order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.state.edges.values()
    }

    /// Edges that start or end at `node`.
    pub fn incident_edges<'a>(&'a self, node: &'a CellId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.state.edges.values().filter(move |e| e.touches(node))
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.state.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.state.edges.len()
    }

    /// `true` when the graph has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.nodes.is_empty() && self.state.edges.is_empty()
    }

    /// `true` if `id` names a node or an edge.
    #[must_use]
    pub fn contains(&self, id: &CellId) -> bool {
        self.state.contains(id)
    }

    /// Whether `id` is a node or an edge.
    #[must_use]
    pub fn cell_kind(&self, id: &CellId) -> Option<CellKind> {
        if self.state.nodes.contains_key(id) {
            Some(CellKind::Node)
        } else if self.state.edges.contains_key(id) {
            Some(CellKind::Edge)
        } else {
            None
        }
    }

    /// Smallest rectangle covering every node, `None` for a graph without nodes.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.nodes()
            .map(Node::bounds)
            .reduce(|acc, r| acc.union(&r))
    }

    /// Counter bumped by every structural change, including undo and redo.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Structural content.
    #[must_use]
    pub fn state(&self) -> &GraphState {
        &self.state
    }

    // ---- creation ---------------------------------------------------------

    /// Place a node of `kind` with its top-left corner at `position`.
    pub fn add_node(&mut self, kind: NodeKind, position: Point) -> CellId {
        let id = self.mint_node_id();
        let node = node_default(kind).instantiate(id.clone(), position);
        self.checkpoint();
        self.state.nodes.insert(id.clone(), node);
        tracing::debug!(node = %id, %kind, x = position.x, y = position.y, "node added");
        id
    }

    /// Connect `source` to `target` with an edge of `kind`.
    pub fn add_edge(
        &mut self,
        source: &CellId,
        target: &CellId,
        kind: EdgeKind,
    ) -> Result<CellId, GraphError> {
        self.add_edge_between(source, None, target, None, kind)
    }

    /// Connect `source` to `target`, recording the attachment sides.
    pub fn add_edge_between(
        &mut self,
        source: &CellId,
        source_side: Option<PortSide>,
        target: &CellId,
        target_side: Option<PortSide>,
        kind: EdgeKind,
    ) -> Result<CellId, GraphError> {
        let rejection = if source == target {
            Some(ConnectionRejection::SelfLoop)
        } else if !self.state.nodes.contains_key(source) {
            Some(ConnectionRejection::MissingSource)
        } else if !self.state.nodes.contains_key(target) {
            Some(ConnectionRejection::MissingTarget)
        } else {
            None
        };
        if let Some(reason) = rejection {
            tracing::warn!(%source, %target, %reason, "connection rejected");
            return Err(GraphError::InvalidConnection {
                from: source.clone(),
                to: target.clone(),
                reason,
            });
        }

        let id = self.mint_edge_id();
        let mut edge = edge_default(kind).instantiate(id.clone(), source.clone(), target.clone());
        edge.source_side = source_side;
        edge.target_side = target_side;
        self.checkpoint();
        self.state.edges.insert(id.clone(), edge);
        tracing::debug!(edge = %id, %kind, %source, %target, "edge added");
        Ok(id)
    }

    /// Duplicate a cell. A node copy is shifted by `offset` and has no edges;
    /// an edge copy keeps both endpoints.
    pub fn clone_cell(&mut self, id: &CellId, offset: Point) -> Result<CellId, GraphError> {
        if let Some(node) = self.state.nodes.get(id) {
            let mut copy = node.clone();
            let new_id = self.mint_node_id();
            copy.id = new_id.clone();
            copy.position = copy.position + offset;
            self.checkpoint();
            self.state.nodes.insert(new_id.clone(), copy);
            tracing::debug!(from = %id, node = %new_id, "node cloned");
            return Ok(new_id);
        }
        if let Some(edge) = self.state.edges.get(id) {
            let mut copy = edge.clone();
            let new_id = self.mint_edge_id();
            copy.id = new_id.clone();
            self.checkpoint();
            self.state.edges.insert(new_id.clone(), copy);
            tracing::debug!(from = %id, edge = %new_id, "edge cloned");
            return Ok(new_id);
        }
        Err(GraphError::UnknownCell(id.clone()))
    }

    // ---- removal ----------------------------------------------------------

    /// Remove cells, together with every edge incident to a removed node.
    ///
    /// Unknown ids are skipped. Returns the ids actually removed, in the
    /// order they were removed.
    pub fn remove_cells<'a>(&mut self, ids: impl IntoIterator<Item = &'a CellId>) -> Vec<CellId> {
        let requested: IndexSet<&CellId> = ids
            .into_iter()
            .filter(|id| self.state.contains(id))
            .collect();
        if requested.is_empty() {
            return Vec::new();
        }

        self.checkpoint();
        let mut removed = Vec::new();
        for id in requested {
            if self.state.nodes.shift_remove(id).is_some() {
                let incident: Vec<CellId> = self
                    .state
                    .edges
                    .values()
                    .filter(|e| e.touches(id))
                    .map(|e| e.id.clone())
                    .collect();
                for edge in incident {
                    self.state.edges.shift_remove(&edge);
                    removed.push(edge);
                }
                removed.push(id.clone());
            } else if self.state.edges.shift_remove(id).is_some() {
                removed.push(id.clone());
            }
        }
        self.prune_selection();
        tracing::debug!(count = removed.len(), "cells removed");
        removed
    }

    // ---- attributes -------------------------------------------------------

    /// Set one editable field. Returns `true` if the cell changed.
    ///
    /// Unknown ids, fields of the other cell kind and rejected values are
    /// no-ops.
    pub fn update_attribute(
        &mut self,
        id: &CellId,
        path: AttributePath,
        value: impl Into<AttrValue>,
    ) -> bool {
        let value = value.into();
        let changed = match path.cell_kind() {
            CellKind::Node => {
                let Some(mut node) = self.state.nodes.get(id).cloned() else {
                    return false;
                };
                let changed = path.apply_node(&mut node, &value);
                if changed {
                    self.checkpoint();
                    self.state.nodes.insert(id.clone(), node);
                }
                changed
            }
            CellKind::Edge => {
                let Some(mut edge) = self.state.edges.get(id).cloned() else {
                    return false;
                };
                let changed = path.apply_edge(&mut edge, &value);
                if changed {
                    self.checkpoint();
                    self.state.edges.insert(id.clone(), edge);
                }
                changed
            }
        };
        if changed {
            tracing::debug!(cell = %id, %path, %value, "attribute updated");
        } else {
            tracing::debug!(cell = %id, %path, %value, "attribute value rejected");
        }
        changed
    }

    /// Parse `path` for the cell's kind and set it. Unknown paths are no-ops.
    pub fn update_attribute_str(
        &mut self,
        id: &CellId,
        path: &str,
        value: impl Into<AttrValue>,
    ) -> bool {
        let Some(kind) = self.cell_kind(id) else {
            return false;
        };
        match AttributePath::parse(kind, path) {
            Some(path) => self.update_attribute(id, path, value),
            None => {
                tracing::warn!(cell = %id, path, "unknown attribute path");
                false
            }
        }
    }

    /// Current value of one editable field.
    #[must_use]
    pub fn attribute(&self, id: &CellId, path: AttributePath) -> Option<AttrValue> {
        match path.cell_kind() {
            CellKind::Node => path.read_node(self.state.nodes.get(id)?),
            CellKind::Edge => path.read_edge(self.state.edges.get(id)?),
        }
    }

    /// Editable fields of the cell `id`, in editor order.
    #[must_use]
    pub fn editable_properties(&self, id: &CellId) -> Option<&'static [AttributePath]> {
        self.cell_kind(id).map(editable_properties)
    }

    /// Move a node so its top-left corner is at `position`.
    pub fn move_node(&mut self, id: &CellId, position: Point) -> Result<bool, GraphError> {
        let node = self
            .state
            .nodes
            .get(id)
            .ok_or_else(|| GraphError::UnknownCell(id.clone()))?;
        if !position.is_finite() || node.position == position {
            return Ok(false);
        }
        self.checkpoint();
        if let Some(node) = self.state.nodes.get_mut(id) {
            node.position = position;
        }
        tracing::trace!(node = %id, x = position.x, y = position.y, "node moved");
        Ok(true)
    }

    /// Resize a node. Non-positive or non-finite sizes are ignored.
    pub fn resize_node(&mut self, id: &CellId, size: Size) -> Result<bool, GraphError> {
        let node = self
            .state
            .nodes
            .get(id)
            .ok_or_else(|| GraphError::UnknownCell(id.clone()))?;
        if !size.is_valid() || node.size == size {
            return Ok(false);
        }
        self.checkpoint();
        if let Some(node) = self.state.nodes.get_mut(id) {
            node.size = size;
        }
        tracing::debug!(node = %id, width = size.width, height = size.height, "node resized");
        Ok(true)
    }

    /// Set the label of a node, or the first label of an edge.
    pub fn set_label(&mut self, id: &CellId, text: &str) -> Result<bool, GraphError> {
        let path = match self.cell_kind(id) {
            Some(CellKind::Node) => AttributePath::Node(crate::attribute::NodeField::Label),
            Some(CellKind::Edge) => AttributePath::Edge(crate::attribute::EdgeField::LabelText),
            None => return Err(GraphError::UnknownCell(id.clone())),
        };
        Ok(self.update_attribute(id, path, text))
    }

    // ---- history ----------------------------------------------------------

    /// Revert the last mutation. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.history.flush_batch(&self.state);
        if !self.history.undo(&mut self.state) {
            return false;
        }
        self.revision += 1;
        self.prune_selection();
        tracing::debug!(revision = self.revision, "undo");
        true
    }

    /// Re-apply the last undone mutation.
    pub fn redo(&mut self) -> bool {
        self.history.flush_batch(&self.state);
        if !self.history.redo(&mut self.state) {
            return false;
        }
        self.revision += 1;
        self.prune_selection();
        tracing::debug!(revision = self.revision, "redo");
        true
    }

    /// `true` if [`Graph::undo`] would do something.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.undo_len() > 0 || self.history.in_batch()
    }

    /// `true` if [`Graph::redo`] would do something.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.redo_len() > 0
    }

    /// Start coalescing mutations into a single undo entry.
    pub fn begin_batch(&mut self) {
        self.history.begin_batch(&self.state);
    }

    /// Finish a batch started with [`Graph::begin_batch`].
    pub fn end_batch(&mut self) {
        self.history.end_batch(&self.state);
    }

    pub(crate) fn into_state(self) -> GraphState {
        self.state
    }

    /// Replace the whole content, recording one undo entry.
    pub(crate) fn replace_state(&mut self, state: GraphState) {
        self.checkpoint();
        self.state = state;
        self.advance_counters();
        self.prune_selection();
    }

    // ---- selection --------------------------------------------------------

    /// Replace the selection. Ids that are not in the graph are ignored.
    pub fn select<'a>(&mut self, ids: impl IntoIterator<Item = &'a CellId>) {
        self.selection = ids
            .into_iter()
            .filter(|id| self.state.contains(id))
            .cloned()
            .collect();
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected ids in selection order.
    #[must_use]
    pub fn selection(&self) -> &IndexSet<CellId> {
        &self.selection
    }

    /// `true` if `id` is selected.
    #[must_use]
    pub fn is_selected(&self, id: &CellId) -> bool {
        self.selection.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{EdgeField, NodeField};
    use pretty_assertions::assert_eq;

    fn fill() -> AttributePath {
        AttributePath::Node(NodeField::BodyFill)
    }

    #[test]
    fn ids_are_sequential_per_kind() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Start, Point::new(0.0, 0.0));
        let b = g.add_node(NodeKind::End, Point::new(200.0, 0.0));
        let e = g.add_edge(&a, &b, EdgeKind::Default).unwrap();
        assert_eq!(a.as_str(), "n1");
        assert_eq!(b.as_str(), "n2");
        assert_eq!(e.as_str(), "e1");
    }

    #[test]
    fn ids_are_not_reused_after_undo() {
        let mut g = Graph::new();
        g.add_node(NodeKind::Task, Point::ZERO);
        assert!(g.undo());
        let id = g.add_node(NodeKind::Task, Point::ZERO);
        assert_eq!(id.as_str(), "n2");
    }

    #[test]
    fn node_seeds_from_catalog() {
        let mut g = Graph::new();
        let id = g.add_node(NodeKind::Decision, Point::new(40.0, 50.0));
        let node = g.node(&id).unwrap();
        assert_eq!(node.style.fill, "#faad14");
        assert_eq!(node.position, Point::new(40.0, 50.0));
        assert_eq!(node.label.text, "判断");
    }

    #[test]
    fn self_loop_rejected_without_change() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Task, Point::ZERO);
        let rev = g.revision();
        let err = g.add_edge(&a, &a, EdgeKind::Default).unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidConnection {
                from: a.clone(),
                to: a,
                reason: ConnectionRejection::SelfLoop
            }
        );
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.revision(), rev);
    }

    #[test]
    fn missing_endpoints_rejected() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Task, Point::ZERO);
        let ghost = CellId::node(99);
        let err = g.add_edge(&ghost, &a, EdgeKind::Default).unwrap_err();
        assert!(matches!(err, GraphError::InvalidConnection { reason: ConnectionRejection::MissingSource, .. }));
        let err = g.add_edge(&a, &ghost, EdgeKind::Default).unwrap_err();
        assert!(matches!(err, GraphError::InvalidConnection { reason: ConnectionRejection::MissingTarget, .. }));
    }

    #[test]
    fn edge_between_records_sides() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Task, Point::ZERO);
        let b = g.add_node(NodeKind::Task, Point::new(300.0, 0.0));
        let e = g
            .add_edge_between(&a, Some(PortSide::Right), &b, Some(PortSide::Left), EdgeKind::Orth)
            .unwrap();
        let edge = g.edge(&e).unwrap();
        assert_eq!(edge.source_side, Some(PortSide::Right));
        assert_eq!(edge.target_side, Some(PortSide::Left));
    }

    #[test]
    fn removing_node_cascades() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Start, Point::ZERO);
        let b = g.add_node(NodeKind::Task, Point::ZERO);
        let c = g.add_node(NodeKind::End, Point::ZERO);
        let ab = g.add_edge(&a, &b, EdgeKind::Default).unwrap();
        let bc = g.add_edge(&b, &c, EdgeKind::Default).unwrap();
        g.select([&b, &ab]);

        let removed = g.remove_cells([&b]);
        assert_eq!(removed, vec![ab, bc, b.clone()]);
        assert_eq!(g.edge_count(), 0);
        assert!(g.selection().is_empty());
        assert!(g.remove_cells([&b]).is_empty());
    }

    #[test]
    fn remove_is_one_undo_step() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Start, Point::ZERO);
        let b = g.add_node(NodeKind::End, Point::ZERO);
        g.add_edge(&a, &b, EdgeKind::Default).unwrap();
        let before = g.state().clone();
        g.remove_cells([&a, &b]);
        assert!(g.is_empty());
        assert!(g.undo());
        assert_eq!(g.state(), &before);
    }

    #[test]
    fn fill_update_keeps_label() {
        let mut g = Graph::new();
        let id = g.add_node(NodeKind::Task, Point::ZERO);
        let label = g.node(&id).unwrap().label.clone();
        assert!(g.update_attribute(&id, fill(), "#ff0000"));
        let node = g.node(&id).unwrap();
        assert_eq!(node.style.fill, "#ff0000");
        assert_eq!(node.label, label);
    }

    #[test]
    fn update_noops_do_not_touch_history() {
        let mut g = Graph::new();
        let id = g.add_node(NodeKind::Task, Point::ZERO);
        let rev = g.revision();
        assert!(!g.update_attribute(&id, AttributePath::Edge(EdgeField::RouterName), "orth"));
        assert!(!g.update_attribute(&CellId::node(50), fill(), "#000"));
        assert!(!g.update_attribute(&id, AttributePath::Node(NodeField::Width), "wide"));
        assert!(!g.update_attribute_str(&id, "attrs/body/sparkle", "#000"));
        assert_eq!(g.revision(), rev);
    }

    #[test]
    fn update_from_string_path() {
        let mut g = Graph::new();
        let id = g.add_node(NodeKind::Task, Point::ZERO);
        assert!(g.update_attribute_str(&id, "body.stroke", "#000"));
        assert_eq!(
            g.attribute(&id, AttributePath::Node(NodeField::BodyStroke)),
            Some(AttrValue::Text("#000".into()))
        );
    }

    #[test]
    fn clone_node_offsets_without_edges() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Task, Point::new(10.0, 10.0));
        let b = g.add_node(NodeKind::Task, Point::new(200.0, 10.0));
        g.add_edge(&a, &b, EdgeKind::Default).unwrap();
        let copy = g.clone_cell(&a, Point::new(20.0, 20.0)).unwrap();
        assert_eq!(g.node(&copy).unwrap().position, Point::new(30.0, 30.0));
        assert_eq!(g.incident_edges(&copy).count(), 0);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn clone_edge_keeps_endpoints() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Task, Point::ZERO);
        let b = g.add_node(NodeKind::Task, Point::ZERO);
        let e = g.add_edge(&a, &b, EdgeKind::Dashed).unwrap();
        let copy = g.clone_cell(&e, Point::new(20.0, 20.0)).unwrap();
        let edge = g.edge(&copy).unwrap();
        assert_eq!((&edge.source, &edge.target), (&a, &b));
        assert_eq!(edge.line.dasharray.as_deref(), Some("5 5"));
    }

    #[test]
    fn clone_unknown_cell_fails() {
        let mut g = Graph::new();
        let err = g.clone_cell(&CellId::node(1), Point::ZERO).unwrap_err();
        assert_eq!(err, GraphError::UnknownCell(CellId::node(1)));
    }

    #[test]
    fn undo_redo_roundtrip() {
        let mut g = Graph::new();
        let id = g.add_node(NodeKind::Task, Point::new(5.0, 6.0));
        assert!(g.undo());
        assert!(g.is_empty());
        assert!(g.redo());
        let node = g.node(&id).unwrap();
        assert_eq!(node.position, Point::new(5.0, 6.0));
        assert!(!g.redo());
    }

    #[test]
    fn new_mutation_discards_redo() {
        let mut g = Graph::new();
        g.add_node(NodeKind::Task, Point::ZERO);
        g.undo();
        g.add_node(NodeKind::End, Point::ZERO);
        assert!(!g.can_redo());
    }

    #[test]
    fn drag_batch_is_single_undo_step() {
        let mut g = Graph::new();
        let id = g.add_node(NodeKind::Task, Point::ZERO);
        g.begin_batch();
        for step in 1..=5 {
            g.move_node(&id, Point::new(f64::from(step) * 10.0, 0.0)).unwrap();
        }
        g.end_batch();
        assert_eq!(g.node(&id).unwrap().position, Point::new(50.0, 0.0));
        assert!(g.undo());
        assert_eq!(g.node(&id).unwrap().position, Point::ZERO);
    }

    #[test]
    fn undo_prunes_selection() {
        let mut g = Graph::new();
        let id = g.add_node(NodeKind::Task, Point::ZERO);
        g.select([&id]);
        g.undo();
        assert!(g.selection().is_empty());
    }

    #[test]
    fn select_ignores_unknown_ids() {
        let mut g = Graph::new();
        let id = g.add_node(NodeKind::Task, Point::ZERO);
        let ghost = CellId::edge(7);
        g.select([&id, &ghost]);
        assert_eq!(g.selection().len(), 1);
        assert!(g.is_selected(&id));
        g.clear_selection();
        assert!(!g.is_selected(&id));
    }

    #[test]
    fn resize_rejects_invalid_sizes() {
        let mut g = Graph::new();
        let id = g.add_node(NodeKind::Task, Point::ZERO);
        assert!(!g.resize_node(&id, Size::new(0.0, 10.0)).unwrap());
        assert!(g.resize_node(&id, Size::new(200.0, 90.0)).unwrap());
        assert!(g.resize_node(&CellId::node(9), Size::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn set_label_on_edge_creates_label() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Decision, Point::ZERO);
        let b = g.add_node(NodeKind::Task, Point::ZERO);
        let e = g.add_edge(&a, &b, EdgeKind::Default).unwrap();
        assert!(g.set_label(&e, "yes").unwrap());
        assert_eq!(g.edge(&e).unwrap().label_text(), "yes");
    }

    #[test]
    fn bounds_cover_all_nodes() {
        let mut g = Graph::new();
        assert_eq!(g.bounds(), None);
        g.add_node(NodeKind::Task, Point::new(10.0, 10.0));
        g.add_node(NodeKind::End, Point::new(300.0, 100.0));
        let b = g.bounds().unwrap();
        assert_eq!(b, Rect::new(Point::new(10.0, 10.0), Size::new(350.0, 150.0)));
    }
}
