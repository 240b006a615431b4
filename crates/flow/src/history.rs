//! Linear undo/redo history.
//!
//! Each entry is a full copy of the node and edge maps taken *before* a
//! mutation. Undo swaps the current state with the newest entry; a new
//! mutation clears everything that could be redone.

use std::collections::VecDeque;

use flowdesk_core::CellId;
use indexmap::IndexMap;

use crate::edge::Edge;
use crate::node::Node;

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// The structural content of a graph: nodes and edges in z-order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphState {
    /// Nodes keyed by id.
    pub nodes: IndexMap<CellId, Node>,
    /// Edges keyed by id.
    pub edges: IndexMap<CellId, Edge>,
}

impl GraphState {
    /// `true` if `id` names a node or an edge.
    #[must_use]
    pub fn contains(&self, id: &CellId) -> bool {
        self.nodes.contains_key(id) || self.edges.contains_key(id)
    }
}

#[derive(Debug)]
struct Batch {
    before: GraphState,
    depth: usize,
}

/// Bounded linear history with batch coalescing.
#[derive(Debug)]
pub struct History {
    undo: VecDeque<GraphState>,
    redo: Vec<GraphState>,
    limit: usize,
    batch: Option<Batch>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// History that keeps at most `limit` undo steps. `0` disables undo.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
            batch: None,
        }
    }

    /// Maximum number of undo steps.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record the state preceding a mutation.
    ///
    /// Inside a batch this is a no-op: the batch already holds the state from
    /// before its first mutation.
    pub fn record(&mut self, before: GraphState) {
        if self.batch.is_some() {
            return;
        }
        self.push(before);
    }

    fn push(&mut self, before: GraphState) {
        self.redo.clear();
        if self.limit == 0 {
            return;
        }
        self.undo.push_back(before);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    /// Open a batch. Batches nest; only the outermost one records.
    pub fn begin_batch(&mut self, current: &GraphState) {
        match &mut self.batch {
            Some(batch) => batch.depth += 1,
            None => {
                self.batch = Some(Batch {
                    before: current.clone(),
                    depth: 1,
                });
            }
        }
    }

    /// Close a batch. When the outermost batch closes and `current` differs
    /// from the state at its start, one entry is recorded. Returns `true` if
    /// an entry was recorded.
    pub fn end_batch(&mut self, current: &GraphState) -> bool {
        let Some(batch) = &mut self.batch else {
            return false;
        };
        batch.depth -= 1;
        if batch.depth > 0 {
            return false;
        }
        let Some(batch) = self.batch.take() else {
            return false;
        };
        if &batch.before == current {
            return false;
        }
        self.push(batch.before);
        true
    }

    /// Close every open batch.
    pub fn flush_batch(&mut self, current: &GraphState) -> bool {
        if let Some(batch) = &mut self.batch {
            batch.depth = 1;
        }
        self.end_batch(current)
    }

    /// `true` while a batch is open.
    #[must_use]
    pub fn in_batch(&self) -> bool {
        self.batch.is_some()
    }

    /// Step back, swapping `current` with the newest undo entry. `current`
    /// becomes redoable. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, current: &mut GraphState) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        self.redo.push(std::mem::replace(current, previous));
        true
    }

    /// Step forward, swapping `current` with the newest redo entry.
    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, current: &mut GraphState) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.undo.push_back(std::mem::replace(current, next));
        true
    }

    /// Number of undo steps available.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo steps available.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.batch = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{NodeKind, node_default};
    use flowdesk_core::Point;

    fn state_with(n: u64) -> GraphState {
        let mut state = GraphState::default();
        for i in 1..=n {
            let id = CellId::node(i);
            let node = node_default(NodeKind::Task).instantiate(id.clone(), Point::ZERO);
            state.nodes.insert(id, node);
        }
        state
    }

    #[test]
    fn undo_then_redo() {
        let mut history = History::new(10);
        history.record(state_with(0));
        let mut current = state_with(1);
        assert!(history.undo(&mut current));
        assert_eq!(current, state_with(0));
        assert_eq!(history.redo_len(), 1);
        assert!(history.redo(&mut current));
        assert_eq!(current, state_with(1));
    }

    #[test]
    fn empty_history_leaves_state_alone() {
        let mut history = History::default();
        let mut current = state_with(2);
        assert!(!history.undo(&mut current));
        assert!(!history.redo(&mut current));
        assert_eq!(current, state_with(2));
    }

    #[test]
    fn new_record_discards_redo() {
        let mut history = History::new(10);
        history.record(state_with(0));
        let mut current = state_with(1);
        history.undo(&mut current);
        history.record(current.clone());
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn limit_drops_oldest() {
        let mut history = History::new(2);
        for i in 0..5 {
            history.record(state_with(i));
        }
        assert_eq!(history.undo_len(), 2);
        let mut current = state_with(5);
        assert!(history.undo(&mut current));
        assert_eq!(current, state_with(4));
        assert!(history.undo(&mut current));
        assert_eq!(current, state_with(3));
        assert!(!history.undo(&mut current));
    }

    #[test]
    fn zero_limit_disables_undo() {
        let mut history = History::new(0);
        history.record(state_with(0));
        assert_eq!(history.undo_len(), 0);
    }

    #[test]
    fn batch_coalesces_into_one_entry() {
        let mut history = History::new(10);
        let start = state_with(0);
        history.begin_batch(&start);
        history.record(state_with(1));
        history.begin_batch(&state_with(1));
        history.record(state_with(2));
        assert!(!history.end_batch(&state_with(3)));
        assert!(history.end_batch(&state_with(3)));
        assert_eq!(history.undo_len(), 1);
        let mut current = state_with(3);
        assert!(history.undo(&mut current));
        assert_eq!(current, start);
    }

    #[test]
    fn unchanged_batch_records_nothing() {
        let mut history = History::new(10);
        let start = state_with(1);
        history.begin_batch(&start);
        assert!(!history.end_batch(&start));
        assert_eq!(history.undo_len(), 0);
        assert!(!history.end_batch(&start));
    }
}
