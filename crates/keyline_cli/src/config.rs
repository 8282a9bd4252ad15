//! Keyline configuration file handling

use anyhow::{Context, Result};
use keyline_editor::EditorLayout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = "keyline.toml";

/// Top-level configuration (keyline.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct KeylineConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub store: StoreConfig,
    /// Panel geometry overrides
    #[serde(default)]
    pub editor: EditorLayout,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

/// Engine settings for the demo scene
#[derive(Debug, Deserialize, Serialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// `-1` loops forever, `0` runs on, `n` loops `n` times
    #[serde(default)]
    pub loop_mode: i32,
    /// Seconds of simulated time for `keyline demo`
    #[serde(default = "default_duration")]
    pub duration: f64,
}

fn default_fps() -> f64 {
    30.0
}

fn default_duration() -> f64 {
    5.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            loop_mode: 0,
            duration: default_duration(),
        }
    }
}

/// Where saved keys and settings live
#[derive(Debug, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("keyline-store.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Size of the headless render surface
#[derive(Debug, Deserialize, Serialize)]
pub struct SurfaceConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    200
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Demo scene starting values
#[derive(Debug, Deserialize, Serialize)]
pub struct SceneConfig {
    /// Property name to textual value, e.g. `x = "50px"`
    #[serde(default = "default_initial")]
    pub initial: BTreeMap<String, String>,
}

fn default_initial() -> BTreeMap<String, String> {
    [("x", "0px"), ("y", "0px"), ("angle", "0deg"), ("rounded", "0px")]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            initial: default_initial(),
        }
    }
}

impl KeylineConfig {
    /// Load configuration from a file, or from keyline.toml in a directory
    ///
    /// A missing file yields the defaults. A relative store path is resolved
    /// against the directory holding the configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let mut config: KeylineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        if config.store.path.is_relative() {
            if let Some(dir) = config_path.parent() {
                config.store.path = dir.join(&config.store.path);
            }
        }
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
