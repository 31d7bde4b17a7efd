//! Game configuration loaded from `assets/config/game.json`.
//!
//! Every field has a default, so the file may set only what it wants to
//! change. A missing file is not an error; a malformed or invalid one is.

use std::path::{Path, PathBuf};

use alien_core::error::read_json;
use alien_core::LoadError;
use alien_platform::window::PlatformConfig;
use serde::Deserialize;

use crate::animation::HeroSprites;
use crate::audio::AudioSettings;
use crate::physics::PhysicsConfig;

pub const DEFAULT_CONFIG_PATH: &str = "assets/config/game.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        let platform = PlatformConfig::default();
        Self {
            title: platform.title,
            width: platform.width,
            height: platform.height,
        }
    }
}

impl WindowConfig {
    pub fn to_platform(&self) -> PlatformConfig {
        PlatformConfig {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            ..PlatformConfig::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub tick_rate_hz: u32,
    pub physics: PhysicsConfig,
    pub sprites: HeroSprites,
    /// Initial toggles; the mode driver owns them after startup.
    pub audio: AudioSettings,
    pub assets_root: PathBuf,
    pub level_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            tick_rate_hz: 60,
            physics: PhysicsConfig::default(),
            sprites: HeroSprites::default(),
            audio: AudioSettings::default(),
            assets_root: PathBuf::from("assets"),
            level_path: PathBuf::from("assets/levels/default.json"),
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, LoadError> {
    let mut config: GameConfig = read_json(path)?;
    config.sprites = config.sprites.with_walk_ids();
    validate_config(&config).map_err(|reason| LoadError::invalid(path, reason))?;
    Ok(config)
}

/// Like `load_config_from_path`, but a missing file yields the defaults.
pub fn load_config_or_default(path: &Path) -> Result<GameConfig, LoadError> {
    match load_config_from_path(path) {
        Err(err) if err.is_not_found() => {
            log::warn!("Config '{}' not found, using defaults", path.display());
            Ok(GameConfig::default())
        }
        other => other,
    }
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.window.width == 0 || config.window.height == 0 {
        return Err("window.width and window.height must be > 0".to_string());
    }
    if !(1..=1000).contains(&config.tick_rate_hz) {
        return Err(format!(
            "tick_rate_hz must be within 1..=1000 (got {})",
            config.tick_rate_hz
        ));
    }
    config.physics.validate()?;
    if config.sprites.walk_prefix.is_empty() || config.sprites.walk_left_prefix.is_empty() {
        return Err("sprites.walk_prefix and walk_left_prefix must not be empty".to_string());
    }
    Ok(())
}
