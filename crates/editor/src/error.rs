//! Session error types.

use flowdesk_config::ConfigError;
use flowdesk_export::ExportError;
use flowdesk_flow::{GraphError, SnapshotError};
use flowdesk_storage::StorageError;

/// Errors from an editing session. The session state is unchanged when one
/// is returned.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A graph mutation was rejected.
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// A snapshot could not be read.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Background upload or raster export failed.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// The store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The configuration is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias of this crate.
pub type EditorResult<T> = Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use flowdesk_core::CellId;

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err: EditorError = GraphError::UnknownCell(CellId::node(7)).into();
        assert_eq!(err.to_string(), "graph error: unknown cell: n7");

        let err: EditorError = StorageError::Closed.into();
        assert!(matches!(err, EditorError::Storage(StorageError::Closed)));
    }
}
