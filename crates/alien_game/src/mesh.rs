//! CPU-side sprite mesh built from a `DrawList` every frame.
//!
//! Sprites and fills become textured quads; text is split off for the egui
//! overlay. Quads are emitted in draw-list order, and consecutive quads that
//! share a texture collapse into one draw call.

use std::sync::Arc;

use alien_core::Rect;
use alien_devtools::TextLabel;
use alien_render::SpriteVertex;
use glam::Vec2;

use crate::draw::{rgb, Color, DrawCmd, DrawList, WHITE};
use crate::mode::BACKGROUND_SPRITE;
use crate::platform::PLATFORM_SPRITE;

/// Texture key of the 1x1 white texture used for fills, outlines and
/// placeholders for sprites whose image is missing.
pub const WHITE_TEXTURE: &str = "__white";

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct SpriteMesh {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
    pub labels: Vec<TextLabel>,
}

impl SpriteMesh {
    /// `has_texture` reports whether a sprite id has a loaded image; sprites
    /// without one are drawn as flat quads in their placeholder color.
    pub fn build(list: &DrawList, has_texture: impl Fn(&str) -> bool) -> Self {
        let mut mesh = Self {
            vertices: Vec::with_capacity(list.len() * 4),
            indices: Vec::with_capacity(list.len() * 6),
            ..Self::default()
        };

        for cmd in list.commands() {
            match cmd {
                DrawCmd::Sprite { sprite_id, rect } => {
                    if has_texture(sprite_id) {
                        mesh.add_quad(sprite_id, *rect, WHITE);
                    } else {
                        mesh.add_quad(WHITE_TEXTURE, *rect, placeholder_color(sprite_id));
                    }
                }
                DrawCmd::Fill { rect, color } => mesh.add_quad(WHITE_TEXTURE, *rect, *color),
                DrawCmd::Outline {
                    rect,
                    color,
                    thickness,
                } => {
                    for edge in outline_edges(rect, *thickness) {
                        mesh.add_quad(WHITE_TEXTURE, edge, *color);
                    }
                }
                DrawCmd::Text {
                    text,
                    center,
                    font_size,
                    color,
                } => mesh.labels.push(TextLabel {
                    text: text.clone(),
                    center: center.to_array(),
                    font_size: *font_size,
                    color: *color,
                }),
            }
        }
        mesh
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    fn add_quad(&mut self, texture_key: &str, rect: Rect, color: Color) {
        let base_index = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&SpriteVertex::quad(
            Vec2::new(rect.x, rect.y),
            Vec2::new(rect.w, rect.h),
            color,
        ));
        let draw_start = self.indices.len() as u32;
        self.indices
            .extend_from_slice(&SpriteVertex::quad_indices(base_index));
        push_draw_call(&mut self.draw_calls, texture_key, draw_start, 6);
    }
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous.
fn push_draw_call(draw_calls: &mut Vec<DrawCall>, texture_key: &str, index_start: u32, index_count: u32) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if &*last.texture_key == texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key: Arc::from(texture_key),
        index_start,
        index_count,
    });
}

fn outline_edges(rect: &Rect, thickness: f32) -> [Rect; 4] {
    let t = thickness.min(rect.w / 2.0).min(rect.h / 2.0);
    [
        Rect::new(rect.x, rect.y, rect.w, t),
        Rect::new(rect.x, rect.bottom() - t, rect.w, t),
        Rect::new(rect.x, rect.y + t, t, rect.h - 2.0 * t),
        Rect::new(rect.right() - t, rect.y + t, t, rect.h - 2.0 * t),
    ]
}

/// Flat color shown in place of a sprite image that could not be loaded.
pub fn placeholder_color(sprite_id: &str) -> Color {
    match sprite_id {
        BACKGROUND_SPRITE => rgb(100, 149, 237),
        PLATFORM_SPRITE => rgb(96, 72, 48),
        _ => rgb(120, 200, 90),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite_list() -> DrawList {
        let mut list = DrawList::new();
        list.sprite("background", Rect::new(0.0, 0.0, 800.0, 480.0));
        list.sprite("platform", Rect::new(0.0, 448.0, 400.0, 32.0));
        list.sprite("platform", Rect::new(400.0, 448.0, 400.0, 32.0));
        list.sprite("alien_idle", Rect::new(76.0, 384.0, 48.0, 64.0));
        list
    }

    #[test]
    fn consecutive_same_texture_quads_merge() {
        let mesh = SpriteMesh::build(&sprite_list(), |_| true);
        assert_eq!(mesh.quad_count(), 4);
        assert_eq!(mesh.indices.len(), 24);
        let keys: Vec<&str> = mesh.draw_calls.iter().map(|d| &*d.texture_key).collect();
        assert_eq!(keys, vec!["background", "platform", "alien_idle"]);
        assert_eq!(mesh.draw_calls[1].index_start, 6);
        assert_eq!(mesh.draw_calls[1].index_count, 12);
    }

    #[test]
    fn missing_images_fall_back_to_white_quads() {
        let mesh = SpriteMesh::build(&sprite_list(), |id| id == "alien_idle");
        assert_eq!(mesh.draw_calls.len(), 2);
        assert_eq!(&*mesh.draw_calls[0].texture_key, WHITE_TEXTURE);
        assert_eq!(mesh.draw_calls[0].index_count, 18);
        assert_eq!(mesh.vertices[0].color, placeholder_color("background"));
        assert_eq!(mesh.vertices[4].color, placeholder_color("platform"));
    }

    #[test]
    fn outline_emits_four_edges_inside_rect() {
        let mut list = DrawList::new();
        list.outline(Rect::new(300.0, 200.0, 200.0, 50.0), WHITE);
        let mesh = SpriteMesh::build(&list, |_| false);
        assert_eq!(mesh.quad_count(), 4);
        for v in &mesh.vertices {
            assert!(v.position[0] >= 300.0 && v.position[0] <= 500.0);
            assert!(v.position[1] >= 200.0 && v.position[1] <= 250.0);
        }
        assert_eq!(mesh.draw_calls.len(), 1);
    }

    #[test]
    fn text_becomes_labels_not_quads() {
        let mut list = DrawList::new();
        list.fill(Rect::new(0.0, 0.0, 10.0, 10.0), WHITE);
        list.text("Alien Adventure", Vec2::new(400.0, 100.0), 64.0, WHITE);
        let mesh = SpriteMesh::build(&list, |_| true);
        assert_eq!(mesh.quad_count(), 1);
        assert_eq!(mesh.labels.len(), 1);
        assert_eq!(mesh.labels[0].center, [400.0, 100.0]);
        assert_eq!(mesh.labels[0].font_size, 64.0);
    }

    #[test]
    fn non_contiguous_runs_do_not_merge() {
        let mut calls = Vec::new();
        push_draw_call(&mut calls, "a", 0, 6);
        push_draw_call(&mut calls, "a", 12, 6);
        assert_eq!(calls.len(), 2);
    }
}
