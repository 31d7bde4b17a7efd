//! Hero animation state machine.
//!
//! Sprite selection is a pure function of the just-resolved body: airborne
//! bodies show the jump pose, grounded moving bodies cycle through the walk
//! frames, grounded idle bodies show the idle pose. Only the walk branch
//! advances the timer and frame index; every pose is mirrored by facing.
//!
//! Timing is counted in whole ticks so the cadence is identical on every run.

use serde::Deserialize;

use crate::physics::{Body, Facing};

pub const WALK_CYCLE_LENGTH: usize = 11;
/// Walk frames advance when the tick counter is a multiple of this.
pub const WALK_FRAME_TICKS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Idle,
    Jump,
    /// Walk-cycle frame, always `< WALK_CYCLE_LENGTH`.
    Walk(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteKey {
    pub pose: Pose,
    pub facing: Facing,
}

impl Default for SpriteKey {
    fn default() -> Self {
        Self {
            pose: Pose::Idle,
            facing: Facing::Right,
        }
    }
}

/// Select the sprite for this tick and advance walk bookkeeping on `body`.
pub fn animate(body: &mut Body) -> SpriteKey {
    let facing = body.facing;

    if !body.on_ground {
        return SpriteKey {
            pose: Pose::Jump,
            facing,
        };
    }

    if !body.moving {
        return SpriteKey {
            pose: Pose::Idle,
            facing,
        };
    }

    body.animation_timer = body.animation_timer.wrapping_add(1);
    if body.animation_timer % WALK_FRAME_TICKS == 0 {
        body.animation_frame_index = (body.animation_frame_index + 1) % WALK_CYCLE_LENGTH;
    }
    SpriteKey {
        pose: Pose::Walk(body.animation_frame_index % WALK_CYCLE_LENGTH),
        facing,
    }
}

/// Sprite id naming for the hero. Walk frames are generated as
/// `<prefix>1 ..= <prefix>11`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeroSprites {
    pub idle: String,
    pub idle_left: String,
    pub jump: String,
    pub jump_left: String,
    pub walk_prefix: String,
    pub walk_left_prefix: String,
    #[serde(skip)]
    walk_right_ids: Vec<String>,
    #[serde(skip)]
    walk_left_ids: Vec<String>,
}

impl Default for HeroSprites {
    fn default() -> Self {
        Self {
            idle: "alien_idle".to_string(),
            idle_left: "alien_idle_left".to_string(),
            jump: "alien_jump".to_string(),
            jump_left: "alien_jump_left".to_string(),
            walk_prefix: "alien_walk".to_string(),
            walk_left_prefix: "alien_walk_left".to_string(),
            walk_right_ids: Vec::new(),
            walk_left_ids: Vec::new(),
        }
        .with_walk_ids()
    }
}

impl HeroSprites {
    /// Expand the walk prefixes into per-frame ids. Called after
    /// deserialization, since serde only fills the prefixes.
    pub fn with_walk_ids(mut self) -> Self {
        self.walk_right_ids = (1..=WALK_CYCLE_LENGTH)
            .map(|i| format!("{}{}", self.walk_prefix, i))
            .collect();
        self.walk_left_ids = (1..=WALK_CYCLE_LENGTH)
            .map(|i| format!("{}{}", self.walk_left_prefix, i))
            .collect();
        self
    }

    pub fn sprite_id(&self, key: SpriteKey) -> &str {
        match (key.pose, key.facing) {
            (Pose::Idle, Facing::Right) => &self.idle,
            (Pose::Idle, Facing::Left) => &self.idle_left,
            (Pose::Jump, Facing::Right) => &self.jump,
            (Pose::Jump, Facing::Left) => &self.jump_left,
            (Pose::Walk(i), Facing::Right) => self
                .walk_right_ids
                .get(i)
                .map(String::as_str)
                .unwrap_or(&self.idle),
            (Pose::Walk(i), Facing::Left) => self
                .walk_left_ids
                .get(i)
                .map(String::as_str)
                .unwrap_or(&self.idle_left),
        }
    }

    /// Every id the hero can display, for texture preloading.
    pub fn all_ids(&self) -> impl Iterator<Item = &str> {
        [&self.idle, &self.idle_left, &self.jump, &self.jump_left]
            .into_iter()
            .chain(self.walk_right_ids.iter())
            .chain(self.walk_left_ids.iter())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn grounded_body() -> Body {
        let mut body = Body::new(Vec2::new(100.0, 416.0), Vec2::new(48.0, 64.0));
        body.on_ground = true;
        body
    }

    #[test]
    fn airborne_selects_jump_without_advancing() {
        let mut body = grounded_body();
        body.on_ground = false;
        body.moving = true;
        body.facing = Facing::Left;
        body.animation_frame_index = 3;

        for _ in 0..12 {
            let key = animate(&mut body);
            assert_eq!(
                key,
                SpriteKey {
                    pose: Pose::Jump,
                    facing: Facing::Left
                }
            );
        }
        assert_eq!(body.animation_frame_index, 3);
        assert_eq!(body.animation_timer, 0);
    }

    #[test]
    fn idle_never_changes_frame_index() {
        let mut body = grounded_body();
        body.animation_frame_index = 5;
        body.animation_timer = 22;
        for _ in 0..100 {
            let key = animate(&mut body);
            assert_eq!(key.pose, Pose::Idle);
        }
        assert_eq!(body.animation_frame_index, 5);
        assert_eq!(body.animation_timer, 22);
    }

    #[test]
    fn walk_advances_once_every_four_ticks() {
        let mut body = grounded_body();
        body.moving = true;

        let mut advances = 0;
        let mut last = body.animation_frame_index;
        for tick in 1..=40u32 {
            let key = animate(&mut body);
            if body.animation_frame_index != last {
                advances += 1;
                assert_eq!(tick % WALK_FRAME_TICKS, 0, "advanced on tick {tick}");
                last = body.animation_frame_index;
            }
            assert_eq!(key.pose, Pose::Walk(body.animation_frame_index));
        }
        assert_eq!(advances, 10);
    }

    #[test]
    fn walk_cycle_wraps_after_eleven_frames() {
        let mut body = grounded_body();
        body.moving = true;
        for _ in 0..(WALK_FRAME_TICKS as usize * WALK_CYCLE_LENGTH) {
            animate(&mut body);
            assert!(body.animation_frame_index < WALK_CYCLE_LENGTH);
        }
        assert_eq!(body.animation_frame_index, 0);
    }

    #[test]
    fn stopping_preserves_walk_position() {
        let mut body = grounded_body();
        body.moving = true;
        for _ in 0..8 {
            animate(&mut body);
        }
        assert_eq!(body.animation_frame_index, 2);

        body.moving = false;
        assert_eq!(animate(&mut body).pose, Pose::Idle);
        body.moving = true;
        // Resumes from frame 2; tick 9 is not a multiple of 4.
        assert_eq!(animate(&mut body).pose, Pose::Walk(2));
    }

    #[test]
    fn timer_wraparound_keeps_cadence() {
        let mut body = grounded_body();
        body.moving = true;
        body.animation_timer = u32::MAX;
        animate(&mut body);
        assert_eq!(body.animation_timer, 0);
        assert_eq!(body.animation_frame_index, 1);
    }

    #[test]
    fn sprite_ids_follow_pose_and_facing() {
        let sprites = HeroSprites::default();
        let key = |pose, facing| SpriteKey { pose, facing };
        assert_eq!(sprites.sprite_id(key(Pose::Idle, Facing::Right)), "alien_idle");
        assert_eq!(sprites.sprite_id(key(Pose::Idle, Facing::Left)), "alien_idle_left");
        assert_eq!(sprites.sprite_id(key(Pose::Jump, Facing::Right)), "alien_jump");
        assert_eq!(sprites.sprite_id(key(Pose::Jump, Facing::Left)), "alien_jump_left");
        assert_eq!(sprites.sprite_id(key(Pose::Walk(0), Facing::Right)), "alien_walk1");
        assert_eq!(
            sprites.sprite_id(key(Pose::Walk(10), Facing::Left)),
            "alien_walk_left11"
        );
    }

    #[test]
    fn all_ids_lists_every_frame() {
        let sprites = HeroSprites::default();
        assert_eq!(sprites.all_ids().count(), 4 + 2 * WALK_CYCLE_LENGTH);
    }

    #[test]
    fn deserialized_sprites_expand_custom_prefixes() {
        let sprites: HeroSprites = serde_json::from_str(r#"{ "walk_prefix": "hero_run_" }"#)
            .map(HeroSprites::with_walk_ids)
            .expect("sprites json");
        let walk = SpriteKey {
            pose: Pose::Walk(4),
            facing: Facing::Right,
        };
        assert_eq!(sprites.sprite_id(walk), "hero_run_5");
        assert_eq!(sprites.idle, "alien_idle");
    }
}
