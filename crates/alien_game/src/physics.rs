//! Per-tick motion and collision for the player body.
//!
//! Resolution is axis-separated: horizontal movement is applied and pushed out
//! of platforms first, then gravity is integrated and the vertical axis is
//! resolved against the already-corrected x. The order is part of the contract;
//! swapping it changes which contacts count as walls and which as floors.
//!
//! All constants are per tick. There is no delta-time scaling.

use alien_core::Rect;
use glam::Vec2;
use serde::Deserialize;

use crate::controller::ControllerInput;
use crate::platform::Platform;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to vertical velocity every tick. Positive is downward.
    pub gravity: f32,
    pub move_speed: f32,
    /// Vertical velocity set by a jump. Must be negative (upward).
    pub jump_speed: f32,
    pub world_width: f32,
    pub world_height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub body_width: f32,
    pub body_height: f32,
    /// How far below the bottom of the world the body's top may drop before
    /// it is respawned.
    pub fall_margin: f32,
    /// Vertical overlap a platform must exceed on both edges before it can
    /// block horizontal movement, so standing on a floor never counts as a wall.
    pub side_epsilon: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            move_speed: 3.0,
            jump_speed: -11.0,
            world_width: 800.0,
            world_height: 480.0,
            spawn_x: 100.0,
            spawn_y: 360.0,
            body_width: 48.0,
            body_height: 64.0,
            fall_margin: 200.0,
            side_epsilon: 1.0,
        }
    }
}

impl PhysicsConfig {
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.spawn_x, self.spawn_y)
    }

    pub fn body_size(&self) -> Vec2 {
        Vec2::new(self.body_width, self.body_height)
    }

    pub fn validate(&self) -> Result<(), String> {
        let values = [
            ("gravity", self.gravity),
            ("move_speed", self.move_speed),
            ("jump_speed", self.jump_speed),
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("spawn_x", self.spawn_x),
            ("spawn_y", self.spawn_y),
            ("body_width", self.body_width),
            ("body_height", self.body_height),
            ("fall_margin", self.fall_margin),
            ("side_epsilon", self.side_epsilon),
        ];
        if let Some((name, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("physics.{name} must be finite"));
        }
        if self.gravity <= 0.0 {
            return Err("physics.gravity must be > 0".to_string());
        }
        if self.move_speed <= 0.0 {
            return Err("physics.move_speed must be > 0".to_string());
        }
        if self.jump_speed >= 0.0 {
            return Err("physics.jump_speed must be < 0 (upward)".to_string());
        }
        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            return Err("physics.world_width and world_height must be > 0".to_string());
        }
        if self.body_width <= 0.0 || self.body_height <= 0.0 {
            return Err("physics.body_width and body_height must be > 0".to_string());
        }
        if self.fall_margin < 0.0 || self.side_epsilon < 0.0 {
            return Err("physics.fall_margin and side_epsilon must be >= 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Physical and animation state of the single playable character.
///
/// `position` is the body's center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub size: Vec2,
    pub vertical_velocity: f32,
    pub on_ground: bool,
    pub facing: Facing,
    pub moving: bool,
    pub animation_timer: u32,
    pub animation_frame_index: usize,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            vertical_velocity: 0.0,
            on_ground: false,
            facing: Facing::Right,
            moving: false,
            animation_timer: 0,
            animation_frame_index: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.position, self.size)
    }

    pub fn left(&self) -> f32 {
        self.position.x - self.size.x * 0.5
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x * 0.5
    }

    pub fn top(&self) -> f32 {
        self.position.y - self.size.y * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y * 0.5
    }

    pub fn set_left(&mut self, left: f32) {
        self.position.x = left + self.size.x * 0.5;
    }

    pub fn set_right(&mut self, right: f32) {
        self.position.x = right - self.size.x * 0.5;
    }

    pub fn set_top(&mut self, top: f32) {
        self.position.y = top + self.size.y * 0.5;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.position.y = bottom - self.size.y * 0.5;
    }

    /// Move back to the spawn point with no vertical motion. Facing and
    /// animation bookkeeping are kept. Safe to call any number of times.
    pub fn respawn(&mut self, spawn: Vec2) {
        self.position = spawn;
        self.vertical_velocity = 0.0;
        self.on_ground = false;
    }
}

/// Which contacts occurred during one tick. Informational only: the state
/// transition is fully described by the returned body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactReport {
    pub blocked_left: bool,
    pub blocked_right: bool,
    pub landed: bool,
    pub hit_ceiling: bool,
    pub respawned: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ResolveResult {
    pub body: Body,
    pub contacts: ContactReport,
}

/// Advance `body` by one tick against `platforms`.
#[allow(dead_code)]
pub fn resolve(
    body: Body,
    input: ControllerInput,
    platforms: &[Platform],
    config: &PhysicsConfig,
) -> Body {
    resolve_detailed(body, input, platforms, config).body
}

pub fn resolve_detailed(
    mut body: Body,
    input: ControllerInput,
    platforms: &[Platform],
    config: &PhysicsConfig,
) -> ResolveResult {
    let mut contacts = ContactReport::default();

    resolve_horizontal(&mut body, input, platforms, config, &mut contacts);
    resolve_vertical(&mut body, platforms, config, &mut contacts);

    // f32::clamp panics on NaN bounds; max/min never does.
    body.position.x = body.position.x.max(0.0).min(config.world_width);

    if body.top() > config.world_height + config.fall_margin {
        body.respawn(config.spawn_point());
        contacts.respawned = true;
    }

    ResolveResult { body, contacts }
}

fn resolve_horizontal(
    body: &mut Body,
    input: ControllerInput,
    platforms: &[Platform],
    config: &PhysicsConfig,
    contacts: &mut ContactReport,
) {
    let old_x = body.position.x;
    body.moving = false;

    // Both directions held: the deltas cancel and the last one applied wins
    // the facing.
    if input.left {
        body.position.x -= config.move_speed;
        body.facing = Facing::Left;
        body.moving = true;
    }
    if input.right {
        body.position.x += config.move_speed;
        body.facing = Facing::Right;
        body.moving = true;
    }

    for platform in platforms {
        let p = platform.rect();
        if !body.rect().intersects(p) {
            continue;
        }
        let vertical_overlap = body.bottom() > p.top() + config.side_epsilon
            && body.top() < p.bottom() - config.side_epsilon;
        if !vertical_overlap {
            continue;
        }
        if body.position.x > old_x {
            body.set_right(p.left());
            contacts.blocked_right = true;
        } else if body.position.x < old_x {
            body.set_left(p.right());
            contacts.blocked_left = true;
        }
    }
}

fn resolve_vertical(
    body: &mut Body,
    platforms: &[Platform],
    config: &PhysicsConfig,
    contacts: &mut ContactReport,
) {
    let old_top = body.top();
    let old_bottom = body.bottom();

    body.vertical_velocity += config.gravity;
    body.position.y += body.vertical_velocity;
    body.on_ground = false;

    // Pre-move extents separate "came from above" from side or ceiling
    // contact. A body fast enough to pass fully through a platform in one
    // tick is not caught.
    for platform in platforms {
        let p = platform.rect();
        if !body.rect().intersects(p) {
            continue;
        }
        if body.vertical_velocity > 0.0 && old_bottom <= p.top() {
            body.set_bottom(p.top());
            body.vertical_velocity = 0.0;
            body.on_ground = true;
            contacts.landed = true;
        } else if body.vertical_velocity < 0.0 && old_top >= p.bottom() {
            body.set_top(p.bottom());
            body.vertical_velocity = 0.0;
            contacts.hit_ceiling = true;
        }
    }
}
