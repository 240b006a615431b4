//! The editor configuration document.

use std::path::PathBuf;
use std::time::Duration;

use flowdesk_core::Point;
use flowdesk_flow::{ControllerOptions, DEFAULT_HISTORY_LIMIT};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Largest canvas side accepted for export.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// Where snapshots are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key of the working document.
    pub key: String,
    /// Directory of the file store.
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: "flowchart".to_string(),
            dir: PathBuf::from("flowdesk-data"),
        }
    }
}

/// Debounced background saving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Save automatically after edits.
    pub enabled: bool,
    /// Milliseconds without edits before a save.
    pub quiet_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            quiet_ms: 500,
        }
    }
}

impl AutosaveConfig {
    /// Quiet interval as a duration.
    #[must_use]
    pub fn quiet(&self) -> Duration {
        Duration::from_millis(self.quiet_ms)
    }
}

/// Undo history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Undo steps kept; `0` disables history.
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Placement grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Spacing in pixels.
    pub size: f64,
    /// Snap placed and dragged nodes.
    pub snap: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 10.0,
            snap: false,
        }
    }
}

/// Copy / paste behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Horizontal paste offset.
    pub paste_offset_x: f64,
    /// Vertical paste offset.
    pub paste_offset_y: f64,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            paste_offset_x: 20.0,
            paste_offset_y: 20.0,
        }
    }
}

/// Default export canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

/// Raster output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PNG.
    #[default]
    Png,
    /// JPEG.
    #[serde(alias = "jpg")]
    Jpeg,
}

/// Raster export defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output format.
    pub format: ExportFormat,
    /// JPEG quality in `1..=100`.
    pub quality: u8,
    /// Background color.
    pub background: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 90,
            background: "#ffffff".to_string(),
        }
    }
}

/// Everything an editing session can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Persistence.
    pub storage: StorageConfig,
    /// Autosave.
    pub autosave: AutosaveConfig,
    /// Undo history.
    pub history: HistoryConfig,
    /// Grid.
    pub grid: GridConfig,
    /// Clipboard.
    pub clipboard: ClipboardConfig,
    /// Export canvas.
    pub canvas: CanvasConfig,
    /// Export format.
    pub export: ExportConfig,
    /// Logging.
    pub log: flowdesk_log::Config,
}

impl EditorConfig {
    /// Reject values no session can work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::invalid("storage.key", "must not be empty"));
        }
        if self.autosave.enabled && self.autosave.quiet_ms == 0 {
            return Err(ConfigError::invalid("autosave.quiet_ms", "must be positive"));
        }
        if !self.grid.size.is_finite() || self.grid.size < 0.0 {
            return Err(ConfigError::invalid("grid.size", format!("{} is not a spacing", self.grid.size)));
        }
        if !(self.clipboard.paste_offset_x.is_finite() && self.clipboard.paste_offset_y.is_finite()) {
            return Err(ConfigError::invalid("clipboard", "paste offset must be finite"));
        }
        for (field, side) in [("canvas.width", self.canvas.width), ("canvas.height", self.canvas.height)] {
            if !(1..=MAX_CANVAS_SIDE).contains(&side) {
                return Err(ConfigError::invalid(field, format!("{side} is outside 1..={MAX_CANVAS_SIDE}")));
            }
        }
        if !(1..=100).contains(&self.export.quality) {
            return Err(ConfigError::invalid("export.quality", format!("{} is outside 1..=100", self.export.quality)));
        }
        Ok(())
    }

    /// Interaction options derived from the grid and clipboard sections.
    #[must_use]
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            paste_offset: Point::new(self.clipboard.paste_offset_x, self.clipboard.paste_offset_y),
            grid_size: self.grid.size,
            snap_to_grid: self.grid.snap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid_and_match_the_controller() {
        let config = EditorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.controller_options(), ControllerOptions::default());
        assert_eq!(config.storage.key, "flowchart");
        assert_eq!(config.autosave.quiet(), Duration::from_millis(500));
    }

    #[rstest]
    #[case::empty_key(|c: &mut EditorConfig| c.storage.key = " ".into(), "storage.key")]
    #[case::zero_quiet(|c: &mut EditorConfig| c.autosave.quiet_ms = 0, "autosave.quiet_ms")]
    #[case::negative_grid(|c: &mut EditorConfig| c.grid.size = -1.0, "grid.size")]
    #[case::nan_offset(|c: &mut EditorConfig| c.clipboard.paste_offset_y = f64::NAN, "clipboard")]
    #[case::zero_width(|c: &mut EditorConfig| c.canvas.width = 0, "canvas.width")]
    #[case::huge_height(|c: &mut EditorConfig| c.canvas.height = MAX_CANVAS_SIDE + 1, "canvas.height")]
    #[case::zero_quality(|c: &mut EditorConfig| c.export.quality = 0, "export.quality")]
    fn out_of_range_values(#[case] tweak: fn(&mut EditorConfig), #[case] expected: &str) {
        let mut config = EditorConfig::default();
        tweak(&mut config);
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid {expected}, got {other:?}"),
        }
    }

    #[test]
    fn zero_quiet_is_fine_when_autosave_is_off() {
        let mut config = EditorConfig::default();
        config.autosave.enabled = false;
        config.autosave.quiet_ms = 0;
        assert!(config.validate().is_ok());
    }
}
