//! Logger error types.

use thiserror::Error;

/// Errors raised while installing or reconfiguring the logger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    /// The filter directive string does not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),

    /// The subscriber could not be installed or updated.
    #[error("logger configuration error: {0}")]
    Config(String),
}

/// Result alias for logger operations.
pub type LogResult<T> = Result<T, LogError>;

pub(crate) fn parse_filter(directives: &str) -> LogResult<tracing_subscriber::EnvFilter> {
    tracing_subscriber::EnvFilter::try_new(directives).map_err(|e| LogError::Filter(format!("{directives}: {e}")))
}
