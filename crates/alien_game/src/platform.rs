use alien_core::Rect;
use serde::Deserialize;

use crate::draw::DrawList;

pub const PLATFORM_SPRITE: &str = "platform";

/// Static, axis-aligned collision geometry. Created with the level and never
/// mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "Rect")]
pub struct Platform {
    rect: Rect,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn draw(&self, list: &mut DrawList) {
        list.sprite(PLATFORM_SPRITE, self.rect);
    }
}

impl From<Rect> for Platform {
    fn from(rect: Rect) -> Self {
        Self { rect }
    }
}
