#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Flowdesk Log
//!
//! `tracing-subscriber` setup shared by the Flowdesk binaries.
//!
//! ```rust,ignore
//! let _guard = flowdesk_log::init()?; // FLOWDESK_LOG / RUST_LOG, FLOWDESK_LOG_FORMAT
//! ```
//!
//! Library crates only emit `tracing` events; installing a subscriber is
//! left to the application.

pub mod builder;
pub mod config;
pub mod error;
pub mod reload;

pub use builder::{LoggerBuilder, LoggerGuard, init, init_with};
pub use config::{Config, DisplayConfig, Format, LOG_ENV, LOG_FORMAT_ENV, Writer};
pub use error::{LogError, LogResult};
pub use reload::ReloadHandle;
