#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Flowdesk Config
//!
//! [`EditorConfig`] merged from, in order of precedence (last wins):
//!
//! 1. built-in defaults
//! 2. TOML files ([`ConfigLoader::file`], [`ConfigLoader::optional_file`])
//! 3. `FLOWDESK_` environment variables, `__` separating sections
//!    (`FLOWDESK_AUTOSAVE__QUIET_MS=250`)
//!
//! ```toml
//! [storage]
//! key = "flowchart"
//! dir = "flowdesk-data"
//!
//! [autosave]
//! enabled = true
//! quiet_ms = 500
//!
//! [grid]
//! size = 10.0
//! snap = false
//!
//! [export]
//! format = "png"
//! quality = 90
//! ```

pub mod editor;
pub mod error;
pub mod loader;

pub use editor::{
    AutosaveConfig, CanvasConfig, ClipboardConfig, EditorConfig, ExportConfig, ExportFormat, GridConfig,
    HistoryConfig, StorageConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, ConfigSource, ENV_PREFIX};
