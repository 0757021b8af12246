//! Startup configuration, read from a JSON file.
//!
//! Every field is optional in the file:
//!
//! ```json
//! { "title": "Asteroids", "width": 0, "height": 0, "target_fps": 60,
//!   "background": [20, 20, 30, 255], "exit_key": "escape" }
//! ```
//!
//! A `0 x 0` size means "fit the primary display".

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::color::Color;
use crate::error::{FraxError, Result};
use crate::input::Key;
use crate::scene::DEFAULT_BACKGROUND;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FraxConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub target_fps: Option<u32>,
    pub background: Color,
    /// Key that closes the window. No exit key unless set.
    pub exit_key: Option<String>,
    /// `env_logger` filter, e.g. `"info,wgpu_core=warn"`. `RUST_LOG` wins.
    pub log_filter: Option<String>,
    pub vsync: bool,
}

impl Default for FraxConfig {
    fn default() -> Self {
        Self {
            title: "Frax".to_string(),
            width: 1280,
            height: 720,
            target_fps: Some(60),
            background: DEFAULT_BACKGROUND,
            exit_key: None,
            log_filter: None,
            vsync: true,
        }
    }
}

impl FraxConfig {
    pub fn fits_display(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    /// The configured exit key, parsed. Unknown names were rejected by `validate`.
    pub fn exit_key(&self) -> Option<Key> {
        self.exit_key.as_deref().and_then(Key::from_name)
    }

    pub fn validate(&self) -> Result<()> {
        if (self.width == 0) != (self.height == 0) {
            return Err(FraxError::Config(format!(
                "window size {}x{} has exactly one zero dimension; use 0x0 to fit the display",
                self.width, self.height
            )));
        }
        if self.target_fps == Some(0) {
            return Err(FraxError::Config(
                "target_fps must be positive; omit it for an unlimited frame rate".to_string(),
            ));
        }
        if let Some(name) = &self.exit_key {
            if Key::from_name(name).is_none() {
                return Err(FraxError::Config(format!("unknown exit_key '{name}'")));
            }
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<FraxConfig> {
    let raw = fs::read_to_string(path).map_err(|e| {
        FraxError::Config(format!("Failed to read config {}: {e}", path.display()))
    })?;
    let config: FraxConfig = serde_json::from_str(&raw).map_err(|e| {
        FraxError::Config(format!("Failed to parse config {}: {e}", path.display()))
    })?;
    config.validate()?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}
