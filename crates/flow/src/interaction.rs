//! Pointer and keyboard handling.
//!
//! The [`Controller`] owns the placement mode, the clipboard and any drag in
//! progress, and turns input events into [`Graph`] mutations. It never holds
//! on to the graph; every call borrows it.

use flowdesk_core::{CellId, Point};

use crate::attribute::{AttrValue, AttributePath, ValueKind};
use crate::catalog::{EdgeKind, NodeKind, node_default};
use crate::error::GraphError;
use crate::graph::Graph;

/// Placement state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Clicks select.
    #[default]
    Idle,
    /// The next blank click places a node of this kind.
    PlacingNode(NodeKind),
    /// Two node clicks create an edge of this kind.
    AwaitingEdgeTarget {
        /// Edge kind to create.
        kind: EdgeKind,
        /// Node picked by the first click.
        source: Option<CellId>,
    },
}

/// What a pointer event hit.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Empty canvas at a scene position.
    Blank(Point),
    /// A node.
    Node(CellId),
    /// An edge.
    Edge(CellId),
}

/// One row of the property editor.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyField {
    /// Field being edited.
    pub path: AttributePath,
    /// Display name.
    pub label: &'static str,
    /// Widget kind.
    pub kind: ValueKind,
    /// Current value.
    pub value: AttrValue,
}

/// Entries of the per-cell context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    /// Open the property editor.
    Edit,
    /// Clone in place at the paste offset.
    Duplicate,
    /// Put on the clipboard.
    Copy,
    /// Remove (with incident edges for nodes).
    Delete,
}

impl ContextAction {
    /// Menu entries in display order.
    pub const ALL: [Self; 4] = [Self::Edit, Self::Duplicate, Self::Copy, Self::Delete];

    /// Menu text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Duplicate => "Duplicate",
            Self::Copy => "Copy",
            Self::Delete => "Delete",
        }
    }
}

/// Context menu opened on a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    /// Cell the menu belongs to.
    pub target: CellId,
    /// Available actions.
    pub actions: Vec<ContextAction>,
}

/// Keyboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// `ctrl+z`
    Undo,
    /// `ctrl+shift+z` or `ctrl+y`
    Redo,
    /// `ctrl+c`
    Copy,
    /// `ctrl+v`
    Paste,
    /// `delete` or `backspace`
    Delete,
    /// `escape`
    Cancel,
}

impl Shortcut {
    /// Map a key press to a command. `meta` (cmd on macOS) counts as ctrl.
    #[must_use]
    pub fn from_keys(key: &str, ctrl: bool, shift: bool) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        match (key.as_str(), ctrl, shift) {
            ("z", true, false) => Some(Self::Undo),
            ("z", true, true) | ("y", true, false) => Some(Self::Redo),
            ("c", true, false) => Some(Self::Copy),
            ("v", true, false) => Some(Self::Paste),
            ("delete" | "backspace", false, _) => Some(Self::Delete),
            ("escape" | "esc", false, _) => Some(Self::Cancel),
            _ => None,
        }
    }

    /// Parse a combo such as `"ctrl+shift+z"`.
    #[must_use]
    pub fn parse(combo: &str) -> Option<Self> {
        let mut ctrl = false;
        let mut shift = false;
        let mut key = None;
        for part in combo.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "cmd" | "meta" => ctrl = true,
                "shift" => shift = true,
                "" => return None,
                other => {
                    if key.replace(other.to_string()).is_some() {
                        return None;
                    }
                }
            }
        }
        Self::from_keys(&key?, ctrl, shift)
    }
}

/// Result of handling one input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing happened.
    Nothing,
    /// A node was placed.
    NodePlaced(CellId),
    /// The first endpoint of a new edge was picked.
    SourceChosen(CellId),
    /// An edge was created.
    EdgeCreated(CellId),
    /// The edge could not be created; the controller is back to idle.
    ConnectionRejected(GraphError),
    /// A cell was selected; the property editor shows `fields`.
    Selected {
        /// The selected cell.
        id: CellId,
        /// Its editable fields.
        fields: Vec<PropertyField>,
    },
    /// The property editor was opened from the context menu.
    Editing {
        /// Edited cell.
        id: CellId,
        /// Its editable fields.
        fields: Vec<PropertyField>,
    },
    /// The selection was cleared.
    SelectionCleared,
    /// Cells were removed.
    Removed(Vec<CellId>),
    /// A cell was put on the clipboard.
    Copied(CellId),
    /// A copy was inserted.
    Pasted(CellId),
    /// A mutation was undone.
    Undone,
    /// A mutation was redone.
    Redone,
    /// A placement mode was left without effect.
    ModeCancelled,
}

/// Tunables of the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerOptions {
    /// Translation applied to pasted and duplicated cells.
    pub paste_offset: Point,
    /// Grid spacing used when snapping.
    pub grid_size: f64,
    /// Snap placed and dragged nodes to the grid.
    pub snap_to_grid: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            paste_offset: Point::new(20.0, 20.0),
            grid_size: 10.0,
            snap_to_grid: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Drag {
    node: CellId,
    grab: Point,
}

/// Interaction state machine.
#[derive(Debug, Default)]
pub struct Controller {
    mode: Mode,
    options: ControllerOptions,
    clipboard: Option<CellId>,
    pastes: u32,
    drag: Option<Drag>,
}

impl Controller {
    /// Controller with the given options.
    #[must_use]
    pub fn new(options: ControllerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Options in use.
    #[must_use]
    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Cell on the clipboard, if any.
    #[must_use]
    pub fn clipboard(&self) -> Option<&CellId> {
        self.clipboard.as_ref()
    }

    /// Arm node placement. Leaves edge mode.
    pub fn begin_node_placement(&mut self, kind: NodeKind) {
        tracing::debug!(%kind, "placing node");
        self.mode = Mode::PlacingNode(kind);
    }

    /// Arm edge creation. Any previously picked source is forgotten.
    pub fn begin_edge(&mut self, kind: EdgeKind) {
        tracing::debug!(%kind, "awaiting edge endpoints");
        self.mode = Mode::AwaitingEdgeTarget { kind, source: None };
    }

    /// Leave any placement mode. Returns `true` if a mode was active.
    pub fn cancel(&mut self) -> bool {
        !matches!(std::mem::take(&mut self.mode), Mode::Idle)
    }

    fn snap(&self, point: Point) -> Point {
        if self.options.snap_to_grid {
            point.snap(self.options.grid_size)
        } else {
            point
        }
    }

    /// Handle a primary click.
    pub fn click(&mut self, graph: &mut Graph, target: Target) -> Outcome {
        match (&mut self.mode, target) {
            (Mode::PlacingNode(kind), Target::Blank(at)) => {
                let kind = *kind;
                let size = node_default(kind).size;
                let at = self.snap(at);
                let top_left = Point::new(at.x - size.width / 2.0, at.y - size.height / 2.0);
                let id = graph.add_node(kind, top_left);
                self.mode = Mode::Idle;
                graph.select([&id]);
                Outcome::NodePlaced(id)
            }
            (Mode::AwaitingEdgeTarget { source: source @ None, .. }, Target::Node(id)) => {
                *source = Some(id.clone());
                Outcome::SourceChosen(id)
            }
            (Mode::AwaitingEdgeTarget { kind, source: Some(from) }, Target::Node(to)) => {
                let kind = *kind;
                let from = from.clone();
                self.mode = Mode::Idle;
                match graph.add_edge(&from, &to, kind) {
                    Ok(id) => {
                        graph.select([&id]);
                        Outcome::EdgeCreated(id)
                    }
                    Err(err) => Outcome::ConnectionRejected(err),
                }
            }
            (_, Target::Blank(_)) => {
                if graph.selection().is_empty() {
                    Outcome::Nothing
                } else {
                    graph.clear_selection();
                    Outcome::SelectionCleared
                }
            }
            (_, Target::Node(id) | Target::Edge(id)) => self.select(graph, id),
        }
    }

    fn select(&self, graph: &mut Graph, id: CellId) -> Outcome {
        if !graph.contains(&id) {
            return Outcome::Nothing;
        }
        graph.select([&id]);
        let fields = property_fields(graph, &id);
        Outcome::Selected { id, fields }
    }

    /// Open the context menu on a cell. The cell becomes the selection.
    pub fn context_click(&mut self, graph: &mut Graph, id: &CellId) -> Option<ContextMenu> {
        if !graph.contains(id) {
            return None;
        }
        graph.select([id]);
        Some(ContextMenu {
            target: id.clone(),
            actions: ContextAction::ALL.to_vec(),
        })
    }

    /// Run a context-menu entry.
    pub fn context_action(&mut self, graph: &mut Graph, id: &CellId, action: ContextAction) -> Outcome {
        if !graph.contains(id) {
            return Outcome::Nothing;
        }
        match action {
            ContextAction::Edit => Outcome::Editing {
                id: id.clone(),
                fields: property_fields(graph, id),
            },
            ContextAction::Duplicate => match graph.clone_cell(id, self.options.paste_offset) {
                Ok(copy) => {
                    graph.select([&copy]);
                    Outcome::Pasted(copy)
                }
                Err(_) => Outcome::Nothing,
            },
            ContextAction::Copy => self.copy(id.clone()),
            ContextAction::Delete => Outcome::Removed(graph.remove_cells([id])),
        }
    }

    fn copy(&mut self, id: CellId) -> Outcome {
        self.clipboard = Some(id.clone());
        self.pastes = 0;
        Outcome::Copied(id)
    }

    /// Run a keyboard command.
    pub fn shortcut(&mut self, graph: &mut Graph, shortcut: Shortcut) -> Outcome {
        match shortcut {
            Shortcut::Undo => {
                if graph.undo() {
                    Outcome::Undone
                } else {
                    Outcome::Nothing
                }
            }
            Shortcut::Redo => {
                if graph.redo() {
                    Outcome::Redone
                } else {
                    Outcome::Nothing
                }
            }
            Shortcut::Copy => match graph.selection().first() {
                Some(id) => self.copy(id.clone()),
                None => Outcome::Nothing,
            },
            Shortcut::Paste => self.paste(graph),
            Shortcut::Delete => {
                let selected: Vec<CellId> = graph.selection().iter().cloned().collect();
                if selected.is_empty() {
                    return Outcome::Nothing;
                }
                Outcome::Removed(graph.remove_cells(&selected))
            }
            Shortcut::Cancel => {
                if self.cancel() {
                    Outcome::ModeCancelled
                } else {
                    Outcome::Nothing
                }
            }
        }
    }

    /// Parse a key combo and run it. Unbound combos do nothing.
    pub fn key(&mut self, graph: &mut Graph, combo: &str) -> Outcome {
        match Shortcut::parse(combo) {
            Some(shortcut) => self.shortcut(graph, shortcut),
            None => Outcome::Nothing,
        }
    }

    /// Each paste of the same clipboard entry lands one offset further away.
    fn paste(&mut self, graph: &mut Graph) -> Outcome {
        let Some(source) = self.clipboard.clone() else {
            return Outcome::Nothing;
        };
        let step = f64::from(self.pastes + 1);
        let offset = Point::new(self.options.paste_offset.x * step, self.options.paste_offset.y * step);
        match graph.clone_cell(&source, offset) {
            Ok(copy) => {
                self.pastes += 1;
                graph.select([&copy]);
                Outcome::Pasted(copy)
            }
            Err(err) => {
                tracing::warn!(%err, "clipboard cell is gone");
                self.clipboard = None;
                Outcome::Nothing
            }
        }
    }

    /// Begin dragging `node`, grabbed at scene position `pointer`.
    pub fn drag_start(&mut self, graph: &mut Graph, node: &CellId, pointer: Point) -> bool {
        let Some(n) = graph.node(node) else {
            return false;
        };
        let grab = pointer - n.position;
        if self.drag.is_some() {
            graph.end_batch();
        }
        graph.begin_batch();
        self.drag = Some(Drag {
            node: node.clone(),
            grab,
        });
        true
    }

    /// Move the dragged node so the grab point follows `pointer`.
    pub fn drag_move(&mut self, graph: &mut Graph, pointer: Point) -> bool {
        let Some(drag) = &self.drag else {
            return false;
        };
        let position = self.snap(pointer - drag.grab);
        graph.move_node(&drag.node, position).unwrap_or(false)
    }

    /// Finish the drag; all moves since [`Controller::drag_start`] become one
    /// undo step.
    pub fn drag_end(&mut self, graph: &mut Graph) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        graph.end_batch();
        true
    }

    /// Write a property from the editor.
    pub fn edit_property(
        &mut self,
        graph: &mut Graph,
        id: &CellId,
        path: AttributePath,
        value: impl Into<AttrValue>,
    ) -> bool {
        graph.update_attribute(id, path, value)
    }
}

/// Populated property-editor rows for cell `id`; empty for unknown ids.
#[must_use]
pub fn property_fields(graph: &Graph, id: &CellId) -> Vec<PropertyField> {
    graph
        .editable_properties(id)
        .unwrap_or_default()
        .iter()
        .filter_map(|&path| {
            Some(PropertyField {
                path,
                label: path.label(),
                kind: path.value_kind(),
                value: graph.attribute(id, path)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::NodeField;
    use crate::error::ConnectionRejection;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn setup() -> (Controller, Graph) {
        (Controller::default(), Graph::new())
    }

    #[rstest]
    #[case("ctrl+z", Some(Shortcut::Undo))]
    #[case("Ctrl+Shift+Z", Some(Shortcut::Redo))]
    #[case("ctrl+y", Some(Shortcut::Redo))]
    #[case("cmd+c", Some(Shortcut::Copy))]
    #[case("ctrl+v", Some(Shortcut::Paste))]
    #[case("delete", Some(Shortcut::Delete))]
    #[case("backspace", Some(Shortcut::Delete))]
    #[case("escape", Some(Shortcut::Cancel))]
    #[case("z", None)]
    #[case("ctrl+shift+y", None)]
    #[case("ctrl+a+b", None)]
    #[case("ctrl+", None)]
    fn shortcut_parsing(#[case] combo: &str, #[case] expected: Option<Shortcut>) {
        assert_eq!(Shortcut::parse(combo), expected);
    }

    #[test]
    fn placement_centers_node_on_click() {
        let (mut c, mut g) = setup();
        c.begin_node_placement(NodeKind::Task);
        let Outcome::NodePlaced(id) = c.click(&mut g, Target::Blank(Point::new(200.0, 100.0))) else {
            panic!("expected placement");
        };
        assert_eq!(g.node(&id).unwrap().position, Point::new(140.0, 70.0));
        assert_eq!(c.mode(), &Mode::Idle);
        assert!(g.is_selected(&id));
    }

    #[test]
    fn placement_snaps_when_enabled() {
        let mut c = Controller::new(ControllerOptions {
            snap_to_grid: true,
            ..ControllerOptions::default()
        });
        let mut g = Graph::new();
        c.begin_node_placement(NodeKind::End);
        let Outcome::NodePlaced(id) = c.click(&mut g, Target::Blank(Point::new(104.0, 96.0))) else {
            panic!("expected placement");
        };
        assert_eq!(g.node(&id).unwrap().position, Point::new(70.0, 70.0));
    }

    #[test]
    fn edge_mode_connects_two_clicks() {
        let (mut c, mut g) = setup();
        let a = g.add_node(NodeKind::Start, Point::ZERO);
        let b = g.add_node(NodeKind::End, Point::new(200.0, 0.0));
        c.begin_edge(EdgeKind::Smooth);
        assert_eq!(c.click(&mut g, Target::Node(a.clone())), Outcome::SourceChosen(a.clone()));
        let Outcome::EdgeCreated(e) = c.click(&mut g, Target::Node(b.clone())) else {
            panic!("expected edge");
        };
        let edge = g.edge(&e).unwrap();
        assert_eq!((&edge.source, &edge.target, edge.kind), (&a, &b, EdgeKind::Smooth));
        assert_eq!(c.mode(), &Mode::Idle);
    }

    #[test]
    fn edge_mode_self_loop_is_reported_and_resets() {
        let (mut c, mut g) = setup();
        let a = g.add_node(NodeKind::Task, Point::ZERO);
        c.begin_edge(EdgeKind::Default);
        c.click(&mut g, Target::Node(a.clone()));
        let outcome = c.click(&mut g, Target::Node(a.clone()));
        assert_eq!(
            outcome,
            Outcome::ConnectionRejected(GraphError::InvalidConnection {
                from: a.clone(),
                to: a,
                reason: ConnectionRejection::SelfLoop
            })
        );
        assert_eq!(c.mode(), &Mode::Idle);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn choosing_new_edge_kind_resets_source() {
        let (mut c, mut g) = setup();
        let a = g.add_node(NodeKind::Task, Point::ZERO);
        c.begin_edge(EdgeKind::Default);
        c.click(&mut g, Target::Node(a));
        c.begin_edge(EdgeKind::Dashed);
        assert_eq!(
            c.mode(),
            &Mode::AwaitingEdgeTarget {
                kind: EdgeKind::Dashed,
                source: None
            }
        );
    }

    #[test]
    fn entering_one_mode_cancels_the_other() {
        let (mut c, _) = setup();
        c.begin_edge(EdgeKind::Default);
        c.begin_node_placement(NodeKind::Decision);
        assert_eq!(c.mode(), &Mode::PlacingNode(NodeKind::Decision));
        c.begin_edge(EdgeKind::Default);
        assert!(matches!(c.mode(), Mode::AwaitingEdgeTarget { .. }));
    }

    #[test]
    fn blank_click_clears_selection_and_keeps_edge_mode() {
        let (mut c, mut g) = setup();
        let a = g.add_node(NodeKind::Task, Point::ZERO);
        g.select([&a]);
        c.begin_edge(EdgeKind::Default);
        assert_eq!(c.click(&mut g, Target::Blank(Point::ZERO)), Outcome::SelectionCleared);
        assert!(matches!(c.mode(), Mode::AwaitingEdgeTarget { .. }));
        assert_eq!(c.click(&mut g, Target::Blank(Point::ZERO)), Outcome::Nothing);
    }

    #[test]
    fn cell_click_selects_and_populates_fields() {
        let (mut c, mut g) = setup();
        let a = g.add_node(NodeKind::Task, Point::ZERO);
        let Outcome::Selected { id, fields } = c.click(&mut g, Target::Node(a.clone())) else {
            panic!("expected selection");
        };
        assert_eq!(id, a);
        assert_eq!(fields.len(), 16);
        assert_eq!(fields[0].value, AttrValue::Text("任务".into()));
        assert_eq!(fields[1].path, AttributePath::Node(NodeField::BodyFill));
        assert_eq!(fields[1].kind, ValueKind::Color);
    }

    #[test]
    fn escape_cancels_mode() {
        let (mut c, mut g) = setup();
        c.begin_node_placement(NodeKind::Task);
        assert_eq!(c.key(&mut g, "escape"), Outcome::ModeCancelled);
        assert_eq!(c.key(&mut g, "escape"), Outcome::Nothing);
        assert!(g.is_empty());
    }

    #[test]
    fn copy_paste_offsets_accumulate() {
        let (mut c, mut g) = setup();
        let a = g.add_node(NodeKind::Task, Point::new(100.0, 100.0));
        g.select([&a]);
        assert_eq!(c.key(&mut g, "ctrl+c"), Outcome::Copied(a));
        let Outcome::Pasted(first) = c.key(&mut g, "ctrl+v") else {
            panic!("expected paste");
        };
        let Outcome::Pasted(second) = c.key(&mut g, "ctrl+v") else {
            panic!("expected paste");
        };
        assert_eq!(g.node(&first).unwrap().position, Point::new(120.0, 120.0));
        assert_eq!(g.node(&second).unwrap().position, Point::new(140.0, 140.0));
        assert!(g.is_selected(&second));
    }

    #[test]
    fn paste_after_source_removed_does_nothing() {
        let (mut c, mut g) = setup();
        let a = g.add_node(NodeKind::Task, Point::ZERO);
        g.select([&a]);
        c.key(&mut g, "ctrl+c");
        g.remove_cells([&a]);
        assert_eq!(c.key(&mut g, "ctrl+v"), Outcome::Nothing);
        assert_eq!(c.clipboard(), None);
    }

    #[test]
    fn delete_removes_selection_with_edges() {
        let (mut c, mut g) = setup();
        let a = g.add_node(NodeKind::Start, Point::ZERO);
        let b = g.add_node(NodeKind::End, Point::ZERO);
        let e = g.add_edge(&a, &b, EdgeKind::Default).unwrap();
        g.select([&a]);
        assert_eq!(c.key(&mut g, "delete"), Outcome::Removed(vec![e, a]));
        assert_eq!(g.node_count(), 1);
        assert_eq!(c.key(&mut g, "backspace"), Outcome::Nothing);
    }

    #[test]
    fn undo_redo_shortcuts() {
        let (mut c, mut g) = setup();
        g.add_node(NodeKind::Task, Point::ZERO);
        assert_eq!(c.key(&mut g, "ctrl+z"), Outcome::Undone);
        assert!(g.is_empty());
        assert_eq!(c.key(&mut g, "ctrl+shift+z"), Outcome::Redone);
        assert_eq!(g.node_count(), 1);
        assert_eq!(c.key(&mut g, "ctrl+y"), Outcome::Nothing);
    }

    #[test]
    fn context_menu_actions() {
        let (mut c, mut g) = setup();
        let a = g.add_node(NodeKind::Task, Point::ZERO);
        let menu = c.context_click(&mut g, &a).unwrap();
        assert_eq!(menu.actions, ContextAction::ALL.to_vec());
        assert!(g.is_selected(&a));

        assert!(matches!(c.context_action(&mut g, &a, ContextAction::Edit), Outcome::Editing { .. }));
        let Outcome::Pasted(dup) = c.context_action(&mut g, &a, ContextAction::Duplicate) else {
            panic!("expected duplicate");
        };
        assert_eq!(g.node(&dup).unwrap().position, Point::new(20.0, 20.0));
        assert_eq!(c.context_action(&mut g, &a, ContextAction::Copy), Outcome::Copied(a.clone()));
        assert_eq!(c.context_action(&mut g, &a, ContextAction::Delete), Outcome::Removed(vec![a.clone()]));
        assert!(c.context_click(&mut g, &a).is_none());
    }

    #[test]
    fn drag_is_one_undo_step() {
        let (mut c, mut g) = setup();
        let a = g.add_node(NodeKind::Task, Point::new(0.0, 0.0));
        assert!(c.drag_start(&mut g, &a, Point::new(10.0, 10.0)));
        for x in [20.0, 40.0, 60.0] {
            c.drag_move(&mut g, Point::new(x, 10.0));
        }
        assert!(c.drag_end(&mut g));
        assert_eq!(g.node(&a).unwrap().position, Point::new(50.0, 0.0));
        g.undo();
        assert_eq!(g.node(&a).unwrap().position, Point::ZERO);
        assert!(!c.drag_end(&mut g));
        assert!(!c.drag_move(&mut g, Point::ZERO));
    }

    #[test]
    fn edit_property_updates_graph() {
        let (mut c, mut g) = setup();
        let a = g.add_node(NodeKind::Task, Point::ZERO);
        assert!(c.edit_property(&mut g, &a, AttributePath::Node(NodeField::LabelFill), "#000"));
        assert_eq!(g.node(&a).unwrap().label.fill, "#000");
    }
}
