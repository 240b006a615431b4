#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Flowdesk Flow
//!
//! The editable flow-diagram model.
//!
//! This crate provides everything that runs without a canvas:
//!
//! - [`catalog`]: immutable per-kind defaults for nodes ([`NodeKind`]) and edges ([`EdgeKind`])
//! - [`Graph`]: nodes and edges with linear undo/redo, batching and selection
//! - [`AttributePath`]: the closed table of editable cell properties
//! - [`validate`]: structural checks (isolated nodes, start/end cardinality, cycles)
//! - [`FlowTopology`]: a `petgraph` view for ordering and reachability queries
//! - [`snapshot`]: the versioned JSON format
//! - [`Controller`]: pointer and keyboard handling on top of the graph

pub mod attribute;
pub mod catalog;
pub mod edge;
pub mod error;
pub mod graph;
pub mod history;
pub mod interaction;
pub mod node;
pub mod snapshot;
pub mod topology;
pub mod validate;

pub use attribute::{AttrValue, AttributePath, CellKind, EdgeField, NodeField, ValueKind, editable_properties};
pub use catalog::{EdgeDefault, EdgeKind, NodeDefault, NodeKind, edge_default, node_default};
pub use edge::{Connector, Edge, EdgeLabel, LabelBackground, LineStyle, Marker, Router};
pub use error::{ConnectionRejection, GraphError, SnapshotError};
pub use graph::Graph;
pub use history::{DEFAULT_HISTORY_LIMIT, GraphState};
pub use interaction::{
    ContextAction, ContextMenu, Controller, ControllerOptions, Mode, Outcome, PropertyField, Shortcut, Target,
};
pub use node::{BodyShape, BodyStyle, Node, NodeLabel, NodeRole, Port, PortSide, Shadow};
pub use snapshot::{SNAPSHOT_VERSION, SerializedGraph, from_json, from_snapshot, to_json, to_snapshot};
pub use topology::FlowTopology;
pub use validate::{ValidationIssue, ValidationReport, validate};
