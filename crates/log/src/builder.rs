//! Subscriber assembly.

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry, fmt};

use crate::config::{Config, Format, Writer};
use crate::error::{LogError, LogResult, parse_filter};
use crate::reload::{FilterLayer, ReloadHandle, filter_layer};

type Filtered = Layered<FilterLayer, Registry>;

/// Builds and installs the global subscriber.
#[derive(Debug, Clone, Default)]
pub struct LoggerBuilder {
    config: Config,
}

/// Keeps the logger's handles alive.
#[derive(Debug)]
#[must_use = "dropping the guard discards the reload handle"]
pub struct LoggerGuard {
    reload: Option<ReloadHandle>,
}

impl LoggerGuard {
    /// Handle for changing the filter, present when the config was reloadable.
    #[must_use]
    pub fn reload_handle(&self) -> Option<&ReloadHandle> {
        self.reload.as_ref()
    }
}

impl LoggerBuilder {
    /// Builder for `config`.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// The subscriber without installing it.
    pub fn subscriber(&self) -> LogResult<(impl tracing::Subscriber + Send + Sync + 'static, Option<ReloadHandle>)> {
        let filter = parse_filter(&self.config.level)?;
        let (filter, reload) = filter_layer(filter, &self.config.level, self.config.reloadable);
        let subscriber = Registry::default().with(filter).with(format_layer(&self.config));
        Ok((subscriber, reload))
    }

    /// Install as the global default subscriber.
    ///
    /// Fails when the filter does not parse or a global subscriber is
    /// already set.
    pub fn build(self) -> LogResult<LoggerGuard> {
        let (subscriber, reload) = self.subscriber()?;
        subscriber
            .try_init()
            .map_err(|e| LogError::Config(e.to_string()))?;
        tracing::debug!(level = %self.config.level, format = ?self.config.format, "logger installed");
        Ok(LoggerGuard { reload })
    }
}

fn format_layer(config: &Config) -> Box<dyn Layer<Filtered> + Send + Sync + 'static> {
    let display = &config.display;
    let writer = match config.writer {
        Writer::Stderr => BoxMakeWriter::new(std::io::stderr),
        Writer::Stdout => BoxMakeWriter::new(std::io::stdout),
    };
    let layer = fmt::layer()
        .with_ansi(display.colors)
        .with_target(display.target)
        .with_file(display.source)
        .with_line_number(display.source)
        .with_thread_ids(display.thread_ids)
        .with_writer(writer);
    match (config.format, display.time) {
        (Format::Pretty, true) => layer.pretty().boxed(),
        (Format::Pretty, false) => layer.pretty().without_time().boxed(),
        (Format::Compact, true) => layer.compact().boxed(),
        (Format::Compact, false) => layer.compact().without_time().boxed(),
        (Format::Json, true) => layer.json().boxed(),
        (Format::Json, false) => layer.json().without_time().boxed(),
    }
}

/// Install a logger configured from the environment.
pub fn init() -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(Config::from_env()).build()
}

/// Install a logger with `config`.
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn invalid_filter_is_rejected_before_install() {
        let builder = LoggerBuilder::from_config(Config::default().with_level("flowdesk=loud"));
        assert!(matches!(builder.subscriber(), Err(LogError::Filter(_))));
    }

    #[test]
    fn every_format_builds() {
        for format in [Format::Pretty, Format::Compact, Format::Json] {
            let mut config = Config::quiet().with_format(format);
            config.display.time = format != Format::Json;
            let (subscriber, reload) = LoggerBuilder::from_config(config).subscriber().unwrap();
            assert!(reload.is_none());
            tracing::subscriber::with_default(subscriber, || tracing::trace!("not shown"));
        }
    }

    #[test]
    fn reload_swaps_the_filter() {
        let config = Config {
            reloadable: true,
            ..Config::quiet()
        };
        let (subscriber, reload) = LoggerBuilder::from_config(config).subscriber().unwrap();
        let reload = reload.unwrap();
        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(*reload.current_filter(), "warn");
            reload.reload("debug,flowdesk_flow=trace").unwrap();
            assert_eq!(*reload.current_filter(), "debug,flowdesk_flow=trace");
            assert!(matches!(reload.reload("flowdesk=loud"), Err(LogError::Filter(_))));
            assert_eq!(*reload.current_filter(), "debug,flowdesk_flow=trace");
        });
    }

    #[test]
    fn global_install_happens_once() {
        let guard = init_with(Config {
            reloadable: true,
            ..Config::quiet()
        })
        .unwrap();
        assert!(guard.reload_handle().is_some());
        assert!(matches!(init_with(Config::quiet()), Err(LogError::Config(_))));
    }
}
