//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the `.blend` warp presets.
    pub presets_dir: PathBuf,

    /// Default sink for batch dataset generation.
    pub dataset_dir: PathBuf,

    /// External renderer settings.
    pub renderer: RendererConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Settings for the external scene renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Blender executable (bare name resolved on `PATH`, or a full path).
    pub blender_binary: PathBuf,

    /// Name of the scene object that receives the document texture.
    pub target_object: String,

    /// Fixed scratch file every render writes to. Defaults to a
    /// per-process file in the system temp directory.
    pub temp_output: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "docwarp=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            presets_dir: PathBuf::from("warp presets"),
            dataset_dir: PathBuf::from("dataset"),
            renderer: RendererConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            blender_binary: PathBuf::from("blender"),
            target_object: "demo for blender".to_string(),
            temp_output: None,
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

impl RendererConfig {
    /// The scratch render path for this process.
    pub fn resolved_temp_output(&self) -> PathBuf {
        self.temp_output.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!("docwarp-render-{}.png", std::process::id()))
        })
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit file, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("docwarp").join("config.json")
}
