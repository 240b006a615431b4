//! Directed view of a flow built on `petgraph`.

use std::collections::HashMap;

use flowdesk_core::CellId;
use petgraph::Direction;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::graph::Graph;

/// Read-only connectivity of a [`Graph`]: node ids as vertices, edge ids as
/// arcs.
#[derive(Debug)]
pub struct FlowTopology {
    graph: DiGraph<CellId, CellId>,
    index_map: HashMap<CellId, NodeIndex>,
}

impl FlowTopology {
    /// Build the view. Node and arc order follow the graph's drawing order.
    #[must_use]
    pub fn from_graph(flow: &Graph) -> Self {
        let mut graph = DiGraph::with_capacity(flow.node_count(), flow.edge_count());
        let mut index_map = HashMap::with_capacity(flow.node_count());

        for node in flow.nodes() {
            let idx = graph.add_node(node.id.clone());
            index_map.insert(node.id.clone(), idx);
        }

        for edge in flow.edges() {
            if let (Some(&from), Some(&to)) = (index_map.get(&edge.source), index_map.get(&edge.target)) {
                graph.add_edge(from, to, edge.id.clone());
            }
        }

        Self { graph, index_map }
    }

    /// Returns `true` if the flow contains at least one directed cycle.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        algo::is_cyclic_directed(&self.graph)
    }

    /// Topological order of the nodes, or `None` if the flow is cyclic.
    #[must_use]
    pub fn topological_order(&self) -> Option<Vec<CellId>> {
        let sorted = algo::toposort(&self.graph, None).ok()?;
        Some(sorted.into_iter().map(|idx| self.graph[idx].clone()).collect())
    }

    /// Nodes with no incoming edges.
    #[must_use]
    pub fn entry_nodes(&self) -> Vec<CellId> {
        self.nodes_without(Direction::Incoming)
    }

    /// Nodes with no outgoing edges.
    #[must_use]
    pub fn exit_nodes(&self) -> Vec<CellId> {
        self.nodes_without(Direction::Outgoing)
    }

    fn nodes_without(&self, direction: Direction) -> Vec<CellId> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors_directed(idx, direction).next().is_none())
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// Upstream neighbours of `id`.
    #[must_use]
    pub fn predecessors(&self, id: &CellId) -> Vec<CellId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Downstream neighbours of `id`.
    #[must_use]
    pub fn successors(&self, id: &CellId) -> Vec<CellId> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: &CellId, direction: Direction) -> Vec<CellId> {
        let Some(&idx) = self.index_map.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<CellId> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|i| self.graph[i].clone())
            .collect();
        // petgraph yields neighbours newest-first
        out.reverse();
        out.dedup();
        out
    }

    /// Every node reachable from `id` by following edges, excluding `id`
    /// itself unless it lies on a cycle.
    #[must_use]
    pub fn reachable_from(&self, id: &CellId) -> Vec<CellId> {
        let Some(&start) = self.index_map.get(id) else {
            return Vec::new();
        };
        let mut seen = vec![false; self.graph.node_count()];
        let mut stack: Vec<NodeIndex> = self.graph.neighbors(start).collect();
        let mut out = Vec::new();
        while let Some(idx) = stack.pop() {
            if std::mem::replace(&mut seen[idx.index()], true) {
                continue;
            }
            out.push(self.graph[idx].clone());
            stack.extend(self.graph.neighbors(idx));
        }
        out
    }

    /// Number of vertices.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of arcs.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EdgeKind, NodeKind};
    use flowdesk_core::Point;
    use pretty_assertions::assert_eq;

    fn chain() -> (Graph, Vec<CellId>) {
        let mut g = Graph::new();
        let ids: Vec<CellId> = [NodeKind::Start, NodeKind::Task, NodeKind::End]
            .into_iter()
            .map(|k| g.add_node(k, Point::ZERO))
            .collect();
        g.add_edge(&ids[0], &ids[1], EdgeKind::Default).unwrap();
        g.add_edge(&ids[1], &ids[2], EdgeKind::Default).unwrap();
        (g, ids)
    }

    #[test]
    fn chain_is_acyclic() {
        let (g, ids) = chain();
        let topo = FlowTopology::from_graph(&g);
        assert!(!topo.has_cycle());
        assert_eq!(topo.topological_order(), Some(ids.clone()));
        assert_eq!(topo.entry_nodes(), vec![ids[0].clone()]);
        assert_eq!(topo.exit_nodes(), vec![ids[2].clone()]);
    }

    #[test]
    fn closing_the_loop_makes_it_cyclic() {
        let (mut g, ids) = chain();
        g.add_edge(&ids[2], &ids[0], EdgeKind::Default).unwrap();
        let topo = FlowTopology::from_graph(&g);
        assert!(topo.has_cycle());
        assert_eq!(topo.topological_order(), None);
        assert!(topo.entry_nodes().is_empty());
    }

    #[test]
    fn neighbours_and_reachability() {
        let (g, ids) = chain();
        let topo = FlowTopology::from_graph(&g);
        assert_eq!(topo.successors(&ids[0]), vec![ids[1].clone()]);
        assert_eq!(topo.predecessors(&ids[2]), vec![ids[1].clone()]);
        let mut reach = topo.reachable_from(&ids[0]);
        reach.sort();
        assert_eq!(reach, vec![ids[1].clone(), ids[2].clone()]);
        assert!(topo.successors(&CellId::node(42)).is_empty());
    }

    #[test]
    fn counts_match_graph() {
        let (g, _) = chain();
        let topo = FlowTopology::from_graph(&g);
        assert_eq!(topo.node_count(), 3);
        assert_eq!(topo.edge_count(), 2);
    }
}
