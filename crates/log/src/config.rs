//! Logger configuration and presets.

use serde::{Deserialize, Serialize};

/// Primary level filter variable.
pub const LOG_ENV: &str = "FLOWDESK_LOG";
/// Output format variable.
pub const LOG_FORMAT_ENV: &str = "FLOWDESK_LOG_FORMAT";

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Multi-line, human oriented.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

impl Format {
    /// Parse a format name; anything unknown is compact.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Where events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Writer {
    /// Standard error.
    #[default]
    Stderr,
    /// Standard output.
    Stdout,
}

/// What each event line shows besides the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// ANSI colors.
    pub colors: bool,
    /// Timestamp.
    pub time: bool,
    /// Event target (module path).
    pub target: bool,
    /// Source file and line.
    pub source: bool,
    /// Thread ids.
    pub thread_ids: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: true,
            time: true,
            target: true,
            source: false,
            thread_ids: false,
        }
    }
}

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `EnvFilter` directive string, e.g. `info,flowdesk_flow=debug`.
    pub level: String,
    /// Output format.
    pub format: Format,
    /// Output stream.
    pub writer: Writer,
    /// Line decorations.
    pub display: DisplayConfig,
    /// Keep a [`ReloadHandle`](crate::ReloadHandle) to change the filter at runtime.
    pub reloadable: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::default(),
            writer: Writer::default(),
            display: DisplayConfig::default(),
            reloadable: false,
        }
    }
}

impl Config {
    /// Configuration from `FLOWDESK_LOG` (falling back to `RUST_LOG`) and
    /// `FLOWDESK_LOG_FORMAT`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`] with a custom variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(level) = lookup(LOG_ENV).or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            config.format = Format::from_name(&format);
            if config.format == Format::Json {
                config.display.colors = false;
            }
        }
        config
    }

    /// Debug level, pretty output with source locations.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Info level, JSON without colors.
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Warnings only, compact, no colors; for command-line tools.
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            level: "warn".to_string(),
            display: DisplayConfig {
                colors: false,
                time: false,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Replace the level filter.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Replace the format.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_prefers_flowdesk_log_over_rust_log() {
        let config = Config::from_lookup(lookup(&[("FLOWDESK_LOG", "debug"), ("RUST_LOG", "trace")]));
        assert_eq!(config.level, "debug");
        let config = Config::from_lookup(lookup(&[("RUST_LOG", "trace")]));
        assert_eq!(config.level, "trace");
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn json_format_turns_colors_off() {
        let config = Config::from_lookup(lookup(&[("FLOWDESK_LOG_FORMAT", "JSON")]));
        assert_eq!(config.format, Format::Json);
        assert!(!config.display.colors);
    }

    #[rstest]
    #[case("pretty", Format::Pretty)]
    #[case("json", Format::Json)]
    #[case("compact", Format::Compact)]
    #[case("logfmt", Format::Compact)]
    fn format_names(#[case] name: &str, #[case] expected: Format) {
        assert_eq!(Format::from_name(name), expected);
    }

    #[test]
    fn partial_serde_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"level":"warn","format":"json"}"#).unwrap();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, Format::Json);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn presets() {
        assert_eq!(Config::development().format, Format::Pretty);
        assert_eq!(Config::production().format, Format::Json);
        assert_eq!(Config::quiet().with_level("error").level, "error");
    }
}
