//! Level content: the ordered platform set the hero collides with.
//!
//! Levels are authored as JSON so geometry can be tweaked (and hot reloaded)
//! without recompiling:
//!
//! ```json
//! { "version": "0.1", "level_id": "default",
//!   "platforms": [ { "x": 0, "y": 448, "width": 800, "height": 32 } ] }
//! ```

use std::path::Path;

use alien_core::error::read_json;
use alien_core::LoadError;
use serde::Deserialize;

use crate::draw::DrawList;
use crate::platform::Platform;

const SUPPORTED_VERSION: &str = "0.1";

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Clone)]
pub struct Level {
    pub level_id: String,
    platforms: Vec<Platform>,
}

impl Level {
    /// A single ground platform spanning the bottom of the world.
    pub fn default_ground(world_width: f32, world_height: f32) -> Self {
        Self {
            level_id: "builtin_ground".to_string(),
            platforms: vec![Platform::new(0.0, world_height - 32.0, world_width, 32.0)],
        }
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn draw(&self, list: &mut DrawList) {
        for platform in &self.platforms {
            platform.draw(list);
        }
    }
}

impl From<LevelFile> for Level {
    fn from(file: LevelFile) -> Self {
        Self {
            level_id: file.level_id,
            platforms: file.platforms,
        }
    }
}

pub fn load_level_from_path(path: &Path) -> Result<Level, LoadError> {
    let file: LevelFile = read_json(path)?;
    validate_level(&file).map_err(|reason| LoadError::invalid(path, reason))?;
    Ok(Level::from(file))
}

fn validate_level(file: &LevelFile) -> Result<(), String> {
    if file.version != SUPPORTED_VERSION {
        return Err(format!("unsupported version '{}'", file.version));
    }
    if file.level_id.is_empty() {
        return Err("level_id is empty".to_string());
    }
    if file.platforms.is_empty() {
        return Err("platforms array is empty".to_string());
    }
    for (i, platform) in file.platforms.iter().enumerate() {
        let rect = platform.rect();
        if !rect.is_finite() {
            return Err(format!("platform {i} has a non-finite coordinate"));
        }
        if rect.w <= 0.0 || rect.h <= 0.0 {
            return Err(format!(
                "platform {i} must have positive size (got {}x{})",
                rect.w, rect.h
            ));
        }
    }
    Ok(())
}
