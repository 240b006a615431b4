//! Changing the log filter of a running editor.
//!
//! The usual use is raising one crate's verbosity while chasing a problem,
//! say `flowdesk_storage=trace` to watch autosave, then dropping back to the
//! filter the logger started with.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing_subscriber::{EnvFilter, Registry, reload};

use crate::error::{LogError, LogResult, parse_filter};

/// Boxed filter layer sitting directly on the registry.
pub(crate) type FilterLayer = Box<dyn tracing_subscriber::Layer<Registry> + Send + Sync + 'static>;

/// Live view of the installed level filter.
#[derive(Clone)]
pub struct ReloadHandle {
    inner: reload::Handle<EnvFilter, Registry>,
    startup: Arc<str>,
    active: Arc<ArcSwap<String>>,
}

impl std::fmt::Debug for ReloadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadHandle")
            .field("startup", &self.startup)
            .field("active", &self.active.load())
            .finish_non_exhaustive()
    }
}

impl ReloadHandle {
    /// Wrap `filter` so it can be swapped later. `directives` is the text it
    /// was parsed from.
    pub(crate) fn wrap(filter: EnvFilter, directives: &str) -> (FilterLayer, Self) {
        let (layer, inner) = reload::Layer::new(filter);
        let handle = Self {
            inner,
            startup: Arc::from(directives),
            active: Arc::new(ArcSwap::from_pointee(directives.to_string())),
        };
        (Box::new(layer), handle)
    }

    /// Replace the whole filter. An invalid `directives` leaves the active
    /// filter in place.
    pub fn reload(&self, directives: &str) -> LogResult<()> {
        let filter = parse_filter(directives)?;
        self.inner
            .reload(filter)
            .map_err(|e| LogError::Config(format!("log filter not swapped: {e}")))?;
        self.active.store(Arc::new(directives.to_string()));
        tracing::debug!(filter = directives, "log filter changed");
        Ok(())
    }

    /// Log `target` (a crate or module path such as `flowdesk_storage`) at
    /// `level`, on top of the active filter.
    pub fn focus(&self, target: &str, level: tracing::Level) -> LogResult<()> {
        let level = level.as_str().to_ascii_lowercase();
        let current = self.active.load();
        let directives = if current.is_empty() {
            format!("{target}={level}")
        } else {
            format!("{current},{target}={level}")
        };
        self.reload(&directives)
    }

    /// Go back to the filter the logger was installed with.
    pub fn reset(&self) -> LogResult<()> {
        let startup = Arc::clone(&self.startup);
        self.reload(&startup)
    }

    /// Directives of the active filter.
    #[must_use]
    pub fn current_filter(&self) -> Arc<String> {
        self.active.load_full()
    }

    /// Directives the logger was installed with.
    #[must_use]
    pub fn startup_filter(&self) -> &str {
        &self.startup
    }
}

/// The filter layer, with a [`ReloadHandle`] when `reloadable`.
pub(crate) fn filter_layer(filter: EnvFilter, directives: &str, reloadable: bool) -> (FilterLayer, Option<ReloadHandle>) {
    if reloadable {
        let (layer, handle) = ReloadHandle::wrap(filter, directives);
        (layer, Some(handle))
    } else {
        (Box::new(filter), None)
    }
}
