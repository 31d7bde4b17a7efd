//! Renderer-agnostic draw list.
//!
//! Game code never touches the GPU. Entities push commands in painter's order
//! (first pushed is drawn first); the binary turns sprites and fills into
//! textured quads and hands text to the egui overlay.

use alien_core::Rect;
use glam::Vec2;

pub type Color = [f32; 4];

pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];

pub fn rgb(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Image looked up by sprite id, stretched over `rect`.
    Sprite { sprite_id: String, rect: Rect },
    Fill { rect: Rect, color: Color },
    Outline {
        rect: Rect,
        color: Color,
        thickness: f32,
    },
    Text {
        text: String,
        center: Vec2,
        font_size: f32,
        color: Color,
    },
}

#[derive(Debug, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprite(&mut self, sprite_id: &str, rect: Rect) {
        self.cmds.push(DrawCmd::Sprite {
            sprite_id: sprite_id.to_string(),
            rect,
        });
    }

    pub fn fill(&mut self, rect: Rect, color: Color) {
        self.cmds.push(DrawCmd::Fill { rect, color });
    }

    pub fn outline(&mut self, rect: Rect, color: Color) {
        self.cmds.push(DrawCmd::Outline {
            rect,
            color,
            thickness: 1.0,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, center: Vec2, font_size: f32, color: Color) {
        self.cmds.push(DrawCmd::Text {
            text: text.into(),
            center,
            font_size,
            color,
        });
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Sprite ids in draw order, used by tests and texture preloading.
    pub fn sprite_ids(&self) -> impl Iterator<Item = &str> {
        self.cmds.iter().filter_map(|cmd| match cmd {
            DrawCmd::Sprite { sprite_id, .. } => Some(sprite_id.as_str()),
            _ => None,
        })
    }

    #[allow(dead_code)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cmds.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
