//! Structural checks over a flow.
//!
//! Every check always runs; the result lists all findings, sorted so that it
//! depends only on the graph's structure and never on insertion order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use flowdesk_core::CellId;
use serde::Serialize;

use crate::graph::Graph;
use crate::node::NodeRole;

/// One finding of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// The flow has no start node.
    MissingStart,
    /// The flow has more than one start node.
    MultipleStarts {
        /// All start nodes, sorted.
        ids: Vec<CellId>,
    },
    /// The flow has no end node.
    MissingEnd,
    /// A node has no incident edge.
    IsolatedNode {
        /// The node.
        id: CellId,
        /// Its label (or id when the label is blank).
        label: String,
    },
    /// Following edges from a start node leads back to a node on the current path.
    Cycle {
        /// The node where the cycle closes.
        node: CellId,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => f.write_str("missing start node"),
            Self::MultipleStarts { ids } => {
                write!(f, "multiple start nodes: ")?;
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{id}")?;
                }
                Ok(())
            }
            Self::MissingEnd => f.write_str("missing end node"),
            Self::IsolatedNode { id, label } => write!(f, "isolated node \"{label}\" ({id})"),
            Self::Cycle { node } => write!(f, "cycle detected at node {node}"),
        }
    }
}

/// Run every structural check over `graph`.
#[must_use]
pub fn validate(graph: &Graph) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut degree: BTreeMap<&CellId, usize> = graph.nodes().map(|n| (&n.id, 0)).collect();
    for edge in graph.edges() {
        for end in [&edge.source, &edge.target] {
            if let Some(d) = degree.get_mut(end) {
                *d += 1;
            }
        }
    }
    for node in graph.nodes() {
        if degree.get(&node.id).copied().unwrap_or(0) == 0 {
            issues.push(ValidationIssue::IsolatedNode {
                id: node.id.clone(),
                label: node.display_name().to_string(),
            });
        }
    }

    let mut starts: Vec<CellId> = graph
        .nodes()
        .filter(|n| n.role == NodeRole::Start)
        .map(|n| n.id.clone())
        .collect();
    starts.sort();
    match starts.len() {
        0 => issues.push(ValidationIssue::MissingStart),
        1 => {}
        _ => issues.push(ValidationIssue::MultipleStarts { ids: starts.clone() }),
    }

    if !graph.nodes().any(|n| n.role == NodeRole::End) {
        issues.push(ValidationIssue::MissingEnd);
    }

    for node in find_cycles(graph, &starts) {
        issues.push(ValidationIssue::Cycle { node });
    }

    issues.sort();
    tracing::debug!(issues = issues.len(), "flow validated");
    issues
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Iterative three-color DFS from each start node. Returns every gray node
/// reached by an edge, i.e. where a cycle closes.
fn find_cycles(graph: &Graph, starts: &[CellId]) -> BTreeSet<CellId> {
    let mut adjacency: BTreeMap<&CellId, Vec<&CellId>> =
        graph.nodes().map(|n| (&n.id, Vec::new())).collect();
    for edge in graph.edges() {
        if let Some(out) = adjacency.get_mut(&edge.source) {
            out.push(&edge.target);
        }
    }
    for out in adjacency.values_mut() {
        out.sort();
        out.dedup();
    }

    let mut color: BTreeMap<&CellId, Color> =
        adjacency.keys().map(|id| (*id, Color::White)).collect();
    let mut closing = BTreeSet::new();

    for start in starts {
        if color.get(start) != Some(&Color::White) {
            continue;
        }
        // (node, index of the next neighbour to visit)
        let mut stack: Vec<(&CellId, usize)> = vec![(start, 0)];
        color.insert(start, Color::Gray);

        while let Some((node, next)) = stack.last_mut() {
            let neighbours = adjacency.get(*node).map_or(&[][..], Vec::as_slice);
            if let Some(&succ) = neighbours.get(*next) {
                *next += 1;
                match color.get(succ).copied().unwrap_or(Color::Black) {
                    Color::White => {
                        color.insert(succ, Color::Gray);
                        stack.push((succ, 0));
                    }
                    Color::Gray => {
                        closing.insert(succ.clone());
                    }
                    Color::Black => {}
                }
            } else {
                color.insert(*node, Color::Black);
                stack.pop();
            }
        }
    }
    closing
}

/// Aggregated result of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Validate `graph`.
    #[must_use]
    pub fn of(graph: &Graph) -> Self {
        Self {
            issues: validate(graph),
        }
    }

    /// `true` when there are no issues.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// The issues, sorted.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Number of issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// `true` when there are no issues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl From<Vec<ValidationIssue>> for ValidationReport {
    fn from(mut issues: Vec<ValidationIssue>) -> Self {
        issues.sort();
        Self { issues }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return f.write_str("flow is valid");
        }
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {issue}")?;
        }
        Ok(())
    }
}
