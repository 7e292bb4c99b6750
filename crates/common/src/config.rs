//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CogniscriptError, CogniscriptResult};

/// COCO class labels accepted as stand-ins for a writing tool.
///
/// The detector has no "pen" class, so objects of similar shape are taken
/// as proxies. `pen` is kept for detectors that do know it.
pub const DEFAULT_TOOL_CLASSES: &[&str] = &[
    "toothbrush",
    "scissors",
    "knife",
    "fork",
    "spoon",
    "remote",
    "cell phone",
    "tie",
    "pencil",
    "pen",
];

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Per-frame analysis tuning.
    pub analysis: AnalysisConfig,

    /// Overlay drawing toggles.
    pub overlay: OverlayConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Tuning for the per-frame pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// EMA factor for the ink point, in (0, 1]. Higher tracks faster.
    pub smoothing_alpha: f64,

    /// Velocity (normalized units per ms) below which the hand is hesitating.
    pub hesitation_velocity_threshold: f64,

    /// Minimum time between two counted hesitation events.
    pub hesitation_debounce_ms: u64,

    /// Thumb-to-index distance (display pixels) below which the pen is inking.
    pub pinch_threshold_px: f64,

    /// Minimum interval between object detection requests.
    pub detection_interval_ms: u64,

    /// Ink line width in surface pixels.
    pub stroke_width: f64,

    /// Gain applied to velocity before mapping it onto the color scale.
    pub velocity_color_gain: f64,

    /// Mirror hand points and object boxes horizontally (selfie view).
    pub mirror_horizontal: bool,

    /// Detected classes treated as a writing tool.
    pub tool_classes: Vec<String>,
}

/// Overlay drawing toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Draw hand landmarks and the cursor ring.
    pub show_skeleton: bool,

    /// Draw detected object boxes.
    pub show_objects: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "cogniscript=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.4,
            hesitation_velocity_threshold: 0.000_05,
            hesitation_debounce_ms: 1_000,
            pinch_threshold_px: 50.0,
            detection_interval_ms: 500,
            stroke_width: 4.0,
            velocity_color_gain: 2_000.0,
            mirror_horizontal: true,
            tool_classes: DEFAULT_TOOL_CLASSES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show_skeleton: true,
            show_objects: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AnalysisConfig {
    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> CogniscriptResult<()> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(CogniscriptError::config(format!(
                "smoothing_alpha must be in (0, 1], got {}",
                self.smoothing_alpha
            )));
        }
        if self.hesitation_velocity_threshold <= 0.0 {
            return Err(CogniscriptError::config(
                "hesitation_velocity_threshold must be positive",
            ));
        }
        if self.pinch_threshold_px <= 0.0 {
            return Err(CogniscriptError::config(
                "pinch_threshold_px must be positive",
            ));
        }
        if self.detection_interval_ms == 0 {
            return Err(CogniscriptError::config(
                "detection_interval_ms must be at least 1",
            ));
        }
        if self.stroke_width <= 0.0 {
            return Err(CogniscriptError::config("stroke_width must be positive"));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> CogniscriptResult<Self> {
        if !path.exists() {
            return Err(CogniscriptError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.analysis.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Where `load` and `save` look for the config file.
    pub fn default_path() -> PathBuf {
        config_file_path()
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("cogniscript").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.analysis.validate().is_ok());
        assert_eq!(config.analysis.detection_interval_ms, 500);
        assert!(config.analysis.tool_classes.iter().any(|c| c == "pencil"));
    }

    #[test]
    fn test_alpha_out_of_range_is_rejected() {
        let mut analysis = AnalysisConfig::default();
        analysis.smoothing_alpha = 0.0;
        assert!(analysis.validate().is_err());
        analysis.smoothing_alpha = 1.5;
        assert!(analysis.validate().is_err());
        analysis.smoothing_alpha = 1.0;
        assert!(analysis.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{ "analysis": { "pinch_threshold_px": 35.0 } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.analysis.pinch_threshold_px, 35.0);
        assert_eq!(config.analysis.hesitation_debounce_ms, 1_000);
        assert!(config.overlay.show_objects);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir()
            .join(format!("cogniscript_missing_config_{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(CogniscriptError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = std::env::temp_dir()
            .join(format!("cogniscript_test_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{ "analysis": { "stroke_width": -1.0 } }"#).unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(CogniscriptError::Config { .. })
        ));

        std::fs::remove_dir_all(&dir).ok();
    }
}
