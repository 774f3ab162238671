// ── Editor configuration ──────────────────────────────────────────────────────
//
// Loaded from an optional JSON file.  Every field has a default, so a config
// file only needs the keys it wants to change.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::Modifier;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables shared by the controller, camera, tile store and palette.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Edge of one atlas sprite in pixels.
    pub sprite_size: u32,
    /// Integer zoom applied to sprites in the map view.
    pub scale_factor: u32,
    /// World spans `-world_offset ..= world_offset - 1` tiles per axis.
    pub world_offset: i32,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Width of the side panel; decides how many palette cells fit per row.
    pub palette_width: u32,
    /// Modifier that turns a primary drag into a view pan.
    pub pan_modifier: Modifier,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            sprite_size:     crate::SPRITE_SIZE,
            scale_factor:    crate::SCALE_FACTOR,
            world_offset:    crate::WORLD_OFFSET,
            viewport_width:  1024,
            viewport_height: 768,
            palette_width:   200,
            pan_modifier:    Modifier::Ctrl,
        }
    }
}

impl EditorConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config = Self::from_json(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sprite_size == 0 {
            return Err(ConfigError::Invalid("sprite_size must be non-zero".into()));
        }
        if self.scale_factor == 0 {
            return Err(ConfigError::Invalid("scale_factor must be non-zero".into()));
        }
        if self.world_offset <= 0 {
            return Err(ConfigError::Invalid("world_offset must be positive".into()));
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ConfigError::Invalid("viewport must be non-empty".into()));
        }
        if i32::try_from(self.viewport_width).is_err() || i32::try_from(self.viewport_height).is_err() {
            return Err(ConfigError::Invalid("viewport is too large".into()));
        }
        // Every view pixel of the world must fit in an i32.
        let display = self
            .sprite_size
            .checked_mul(self.scale_factor)
            .and_then(|d| i32::try_from(d).ok())
            .ok_or_else(|| ConfigError::Invalid("sprite_size * scale_factor is too large".into()))?;
        self.world_offset
            .checked_mul(2)
            .and_then(|w| w.checked_mul(display))
            .ok_or_else(|| ConfigError::Invalid("world_offset is too large for the display size".into()))?;
        Ok(())
    }

    /// On-screen size of one tile.  Only overflow-free on a validated config.
    pub fn display_size(&self) -> u32 {
        self.sprite_size * self.scale_factor
    }
}
