//! End-to-end editing scenarios.

use flowdesk_core::{CellId, Point};
use flowdesk_flow::{
    AttrValue, AttributePath, Controller, EdgeKind, Graph, NodeField, NodeKind, Outcome, Target, ValidationIssue,
    from_json, to_json, validate,
};
use pretty_assertions::assert_eq;

#[test]
fn start_task_edge_reports_missing_end() {
    let mut graph = Graph::new();
    let start = graph.add_node(NodeKind::Start, Point::new(0.0, 0.0));
    let task = graph.add_node(NodeKind::Task, Point::new(100.0, 0.0));
    let edge = graph.add_edge(&start, &task, EdgeKind::Default).unwrap();

    assert_eq!(start, "n1");
    assert_eq!(task, "n2");
    assert_eq!(edge, "e1");
    let issues = validate(&graph);
    assert_eq!(issues, vec![ValidationIssue::MissingEnd]);
    assert_eq!(issues[0].to_string(), "missing end node");
}

#[test]
fn undo_single_add_then_redo() {
    let mut graph = Graph::new();
    let id = graph.add_node(NodeKind::Task, Point::new(30.0, 40.0));
    assert!(graph.undo());
    assert!(graph.is_empty());
    assert!(graph.redo());
    let node = graph.node(&id).unwrap();
    assert_eq!(node.id, id);
    assert_eq!(node.position, Point::new(30.0, 40.0));
}

#[test]
fn fill_update_leaves_label() {
    let mut graph = Graph::new();
    let n1 = graph.add_node(NodeKind::Start, Point::ZERO);
    let label = AttributePath::Node(NodeField::Label);
    let before = graph.attribute(&n1, label);

    assert!(graph.update_attribute_str(&n1, "attrs/body/fill", "#ff0000"));
    assert_eq!(
        graph.attribute(&n1, AttributePath::Node(NodeField::BodyFill)),
        Some(AttrValue::Text("#ff0000".into()))
    );
    assert_eq!(graph.attribute(&n1, label), before);
}

#[test]
fn build_flow_through_the_controller() {
    let mut graph = Graph::new();
    let mut controller = Controller::default();

    let place = |graph: &mut Graph, controller: &mut Controller, kind, x, y| {
        controller.begin_node_placement(kind);
        match controller.click(graph, Target::Blank(Point::new(x, y))) {
            Outcome::NodePlaced(id) => id,
            other => panic!("expected placement, got {other:?}"),
        }
    };
    let start = place(&mut graph, &mut controller, NodeKind::Start, 100.0, 60.0);
    let check = place(&mut graph, &mut controller, NodeKind::Decision, 100.0, 200.0);
    let end = place(&mut graph, &mut controller, NodeKind::End, 100.0, 340.0);

    for (from, to) in [(&start, &check), (&check, &end)] {
        controller.begin_edge(EdgeKind::Orth);
        controller.click(&mut graph, Target::Node(from.clone()));
        assert!(matches!(
            controller.click(&mut graph, Target::Node(to.clone())),
            Outcome::EdgeCreated(_)
        ));
    }
    assert!(validate(&graph).is_empty());

    // the saved document reloads into the same flow
    let reloaded = from_json(&to_json(&graph).unwrap()).unwrap();
    assert_eq!(reloaded, graph);

    // deleting the decision isolates both ends
    graph.select([&check]);
    controller.key(&mut graph, "delete");
    let issues = validate(&graph);
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().all(|i| matches!(i, ValidationIssue::IsolatedNode { .. })));

    controller.key(&mut graph, "ctrl+z");
    assert!(validate(&graph).is_empty());
    assert!(graph.node(&CellId::node(2)).is_some());
}
