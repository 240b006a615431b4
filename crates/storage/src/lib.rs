#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Flowdesk Storage
//!
//! Where snapshots live between sessions.
//!
//! - [`SnapshotStore`]: async key → snapshot backend
//! - [`MemoryStore`]: process-local, for tests and embedding
//! - [`DirectoryStore`]: one `<key>.json` file per key
//! - [`AutoSaver`]: background task writing the latest snapshot once edits
//!   pause for the quiet interval

pub mod autosave;
pub mod error;
pub mod store;

pub use autosave::{AutoSaveStats, AutoSaver, DEFAULT_QUIET};
pub use error::StorageError;
pub use store::{DEFAULT_KEY, DirectoryStore, MemoryStore, SnapshotStore, validate_key};
