//! Layered loading: defaults, then files, then environment.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use crate::editor::EditorConfig;
use crate::error::{ConfigError, ConfigResult};

/// Environment prefix of configuration variables.
pub const ENV_PREFIX: &str = "FLOWDESK_";

/// One layer of configuration, later layers win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in defaults.
    Defaults,
    /// A TOML file that must exist.
    File(PathBuf),
    /// A TOML file used only if present.
    OptionalFile(PathBuf),
    /// `PREFIX_SECTION__KEY` variables.
    Env(String),
}

impl ConfigSource {
    fn describe(&self) -> String {
        match self {
            Self::Defaults => "defaults".to_string(),
            Self::File(path) | Self::OptionalFile(path) => path.display().to_string(),
            Self::Env(prefix) => format!("{prefix}* environment"),
        }
    }
}

/// Builder assembling the layers.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Defaults only.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: vec![ConfigSource::Defaults],
        }
    }

    /// Layer a required TOML file.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(ConfigSource::File(path.into()));
        self
    }

    /// Layer a TOML file if it exists.
    #[must_use]
    pub fn optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(ConfigSource::OptionalFile(path.into()));
        self
    }

    /// Layer `FLOWDESK_*` variables.
    #[must_use]
    pub fn env(self) -> Self {
        self.env_prefixed(ENV_PREFIX)
    }

    /// Layer variables with a custom prefix.
    #[must_use]
    pub fn env_prefixed(mut self, prefix: impl Into<String>) -> Self {
        self.sources.push(ConfigSource::Env(prefix.into()));
        self
    }

    /// Layers in merge order.
    #[must_use]
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// The merged figment, before extraction.
    pub fn figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::new();
        for source in &self.sources {
            figment = match source {
                ConfigSource::Defaults => figment.merge(Serialized::defaults(EditorConfig::default())),
                ConfigSource::File(path) => {
                    if !path.is_file() {
                        return Err(ConfigError::MissingFile(path.clone()));
                    }
                    figment.merge(Toml::file_exact(path))
                }
                ConfigSource::OptionalFile(path) => figment.merge(Toml::file_exact(path)),
                ConfigSource::Env(prefix) => figment.merge(env_provider(prefix)),
            };
        }
        Ok(figment)
    }

    /// Merge, extract and validate.
    pub fn load(&self) -> ConfigResult<EditorConfig> {
        let config: EditorConfig = self.figment()?.extract()?;
        config.validate()?;
        tracing::debug!(
            sources = ?self.sources.iter().map(ConfigSource::describe).collect::<Vec<_>>(),
            "configuration loaded"
        );
        Ok(config)
    }
}

/// `FLOWDESK_AUTOSAVE__QUIET_MS` → `autosave.quiet_ms`. The logger's own
/// `FLOWDESK_LOG` / `FLOWDESK_LOG_FORMAT` variables are left to it, and
/// `FLOWDESK_CONFIG` names the file rather than a setting.
fn env_provider(prefix: &str) -> Env {
    Env::prefixed(prefix).split("__").ignore(&["log", "log_format", "config"])
}

impl EditorConfig {
    /// Defaults, then `path` (required) if given, then the environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let loader = match path {
            Some(path) => ConfigLoader::new().file(path),
            None => ConfigLoader::new(),
        };
        loader.env().load()
    }
}
