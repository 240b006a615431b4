#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Flowdesk Editor
//!
//! [`EditorSession`] ties the pieces of one open document together: the
//! [`Graph`](flowdesk_flow::Graph) and its history, the interaction
//! [`Controller`](flowdesk_flow::Controller), a
//! [`SnapshotStore`](flowdesk_storage::SnapshotStore) with debounced
//! autosave, and the uploaded background image used by raster export.
//!
//! ```no_run
//! # async fn demo() -> flowdesk_editor::EditorResult<()> {
//! use flowdesk_config::EditorConfig;
//! use flowdesk_editor::EditorSession;
//!
//! let session = EditorSession::open_directory(EditorConfig::load(None)?).await?;
//! let png = session.export().await?;
//! session.close().await;
//! # Ok(()) }
//! ```

pub mod error;
pub mod session;

pub use error::{EditorError, EditorResult};
pub use session::EditorSession;
