//! Flow-model error types.

use std::fmt;

use flowdesk_core::CellId;
use thiserror::Error;

/// Why a connection was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRejection {
    /// Source and target are the same node.
    SelfLoop,
    /// The source node does not exist.
    MissingSource,
    /// The target node does not exist.
    MissingTarget,
}

impl fmt::Display for ConnectionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SelfLoop => "a node cannot connect to itself",
            Self::MissingSource => "source node does not exist",
            Self::MissingTarget => "target node does not exist",
        })
    }
}

/// Errors raised by graph mutations. The graph is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An edge could not be created between the given nodes.
    #[error("cannot connect {from} to {to}: {reason}")]
    InvalidConnection {
        /// Requested source node.
        from: CellId,
        /// Requested target node.
        to: CellId,
        /// Rejection reason.
        reason: ConnectionRejection,
    },

    /// No node or edge with this id exists.
    #[error("unknown cell: {0}")]
    UnknownCell(CellId),
}

/// Errors raised while reading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The document is not valid JSON or does not have the snapshot shape.
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot was written by a newer format.
    #[error("unsupported snapshot version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
        /// Highest version this build reads.
        supported: u32,
    },

    /// Two cells share an id.
    #[error("duplicate cell id: {0}")]
    DuplicateId(CellId),

    /// An edge references a node that is not in the snapshot.
    #[error("edge {edge} references unknown node {node}")]
    DanglingEndpoint {
        /// Offending edge.
        edge: CellId,
        /// Missing endpoint.
        node: CellId,
    },

    /// An edge connects a node to itself.
    #[error("edge {0} connects a node to itself")]
    SelfLoop(CellId),

    /// A record could not be completed from its catalog default.
    #[error("malformed {what}: {message}")]
    Malformed {
        /// Which record was malformed.
        what: String,
        /// Details.
        message: String,
    },
}
