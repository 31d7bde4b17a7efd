use alien_core::input::{InputState, Key};
use alien_core::Rect;

use crate::animation::{animate, HeroSprites, SpriteKey};
use crate::draw::DrawList;
use crate::effect::{Effect, Sound};
use crate::physics::{resolve_detailed, Body, ContactReport, PhysicsConfig};
use crate::platform::Platform;

/// Held directional keys for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerInput {
    pub left: bool,
    pub right: bool,
}

impl ControllerInput {
    pub fn sample(input: &InputState) -> Self {
        Self {
            left: input.is_held(Key::Left),
            right: input.is_held(Key::Right),
        }
    }
}

/// Owns the single player body and runs its per-tick pipeline:
/// resolve motion, then pick the sprite.
#[derive(Debug, Clone)]
pub struct CharacterController {
    pub body: Body,
    pub config: PhysicsConfig,
    sprite: SpriteKey,
    contacts: ContactReport,
}

impl CharacterController {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            body: Body::new(config.spawn_point(), config.body_size()),
            config,
            sprite: SpriteKey::default(),
            contacts: ContactReport::default(),
        }
    }

    pub fn update(&mut self, input: ControllerInput, platforms: &[Platform]) -> SpriteKey {
        let was_grounded = self.body.on_ground;
        let result = resolve_detailed(self.body, input, platforms, &self.config);
        self.body = result.body;
        self.contacts = result.contacts;

        if result.contacts.respawned {
            log::debug!("Fell out of the world, respawned at {:?}", self.body.position);
        } else if result.contacts.landed && !was_grounded {
            log::debug!("Landed at y={:.1}", self.body.bottom());
        }

        self.sprite = animate(&mut self.body);
        self.sprite
    }

    /// Start a jump if standing on something. The body stays `on_ground`
    /// until the next vertical pass moves it.
    pub fn jump(&mut self) -> Vec<Effect> {
        if !self.body.on_ground {
            return Vec::new();
        }
        self.body.vertical_velocity = self.config.jump_speed;
        vec![Effect::PlaySound(Sound::Jump)]
    }

    #[allow(dead_code)]
    pub fn respawn(&mut self) {
        self.body.respawn(self.config.spawn_point());
    }

    /// Swap physics constants, e.g. after a config reload. The body keeps its
    /// state but takes the new size, anchored at its feet so a grounded body
    /// stays on its platform.
    pub fn set_config(&mut self, config: PhysicsConfig) {
        let bottom = self.body.bottom();
        self.body.size = config.body_size();
        self.body.set_bottom(bottom);
        self.config = config;
    }

    #[allow(dead_code)]
    pub fn sprite(&self) -> SpriteKey {
        self.sprite
    }

    pub fn sprite_id<'a>(&self, sprites: &'a HeroSprites) -> &'a str {
        sprites.sprite_id(self.sprite)
    }

    #[allow(dead_code)]
    pub fn contacts(&self) -> ContactReport {
        self.contacts
    }

    pub fn bounds(&self) -> Rect {
        self.body.rect()
    }

    pub fn draw(&self, sprites: &HeroSprites, list: &mut DrawList) {
        list.sprite(self.sprite_id(sprites), self.bounds());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Pose;
    use crate::physics::Facing;

    const IDLE: ControllerInput = ControllerInput {
        left: false,
        right: false,
    };

    fn ground() -> Vec<Platform> {
        vec![Platform::new(0.0, 448.0, 800.0, 32.0)]
    }

    fn settled_controller() -> CharacterController {
        let mut controller = CharacterController::new(PhysicsConfig::default());
        let platforms = ground();
        for _ in 0..120 {
            controller.update(IDLE, &platforms);
        }
        assert!(controller.body.on_ground);
        controller
    }

    #[test]
    fn resizing_a_grounded_body_keeps_its_feet_on_the_floor() {
        let mut controller = settled_controller();
        let x = controller.body.position.x;
        controller.set_config(PhysicsConfig {
            body_height: 80.0,
            ..PhysicsConfig::default()
        });
        assert_eq!(controller.body.size.y, 80.0);
        assert_eq!(controller.body.bottom(), 448.0);
        assert_eq!(controller.body.position.x, x);

        let platforms = ground();
        for _ in 0..60 {
            controller.update(IDLE, &platforms);
            assert!(!controller.contacts().respawned);
        }
        assert!(controller.body.on_ground);
        assert_eq!(controller.body.bottom(), 448.0);
    }

    #[test]
    fn shrinking_a_grounded_body_does_not_lift_it() {
        let mut controller = settled_controller();
        controller.set_config(PhysicsConfig {
            body_height: 40.0,
            ..PhysicsConfig::default()
        });
        controller.update(IDLE, &ground());
        assert!(controller.body.on_ground);
        assert_eq!(controller.body.bottom(), 448.0);
    }

    #[test]
    fn spawns_at_configured_point() {
        let cfg = PhysicsConfig::default();
        let controller = CharacterController::new(cfg);
        assert_eq!(controller.body.position, cfg.spawn_point());
        assert!(!controller.body.on_ground);
    }

    #[test]
    fn falls_from_spawn_and_settles_on_ground() {
        let controller = settled_controller();
        assert_eq!(controller.body.bottom(), 448.0);
        assert_eq!(controller.body.vertical_velocity, 0.0);
        assert_eq!(controller.sprite().pose, Pose::Idle);
    }

    #[test]
    fn jump_from_ground_sets_velocity_and_requests_sound() {
        let mut controller = settled_controller();
        let effects = controller.jump();
        assert_eq!(effects, vec![Effect::PlaySound(Sound::Jump)]);
        assert_eq!(controller.body.vertical_velocity, -11.0);
        // Still grounded until the next vertical pass runs.
        assert!(controller.body.on_ground);

        controller.update(IDLE, &ground());
        assert!(!controller.body.on_ground);
        assert_eq!(controller.body.vertical_velocity, -10.5);
        assert_eq!(controller.sprite().pose, Pose::Jump);
    }

    #[test]
    fn jump_while_airborne_is_a_no_op() {
        let mut controller = settled_controller();
        controller.jump();
        controller.update(IDLE, &ground());
        let velocity = controller.body.vertical_velocity;

        let effects = controller.jump();
        assert!(effects.is_empty());
        assert_eq!(controller.body.vertical_velocity, velocity);
    }

    #[test]
    fn full_jump_returns_to_ground() {
        let mut controller = settled_controller();
        controller.jump();
        let platforms = ground();
        let mut airborne_ticks = 0;
        loop {
            controller.update(IDLE, &platforms);
            if controller.body.on_ground {
                break;
            }
            airborne_ticks += 1;
            assert!(airborne_ticks < 200, "never landed");
        }
        assert_eq!(controller.body.bottom(), 448.0);
        // -11 + 0.5 per tick: apex after 22 ticks, symmetric fall.
        assert!((40..=46).contains(&airborne_ticks), "{airborne_ticks}");
    }

    #[test]
    fn walking_left_flips_sprite() {
        let mut controller = settled_controller();
        let left = ControllerInput {
            left: true,
            right: false,
        };
        let key = controller.update(left, &ground());
        assert_eq!(key.facing, Facing::Left);
        assert!(matches!(key.pose, Pose::Walk(_)));
        assert!(controller
            .sprite_id(&HeroSprites::default())
            .starts_with("alien_walk_left"));
    }

    #[test]
    fn respawn_keeps_facing() {
        let mut controller = settled_controller();
        controller.body.facing = Facing::Left;
        controller.body.position.x = 700.0;
        controller.respawn();
        controller.respawn();
        assert_eq!(controller.body.position, controller.config.spawn_point());
        assert_eq!(controller.body.facing, Facing::Left);
    }

    #[test]
    fn walking_off_the_edge_falls_and_respawns() {
        let mut controller = settled_controller();
        let short_ledge = vec![Platform::new(0.0, 448.0, 200.0, 32.0)];
        let right = ControllerInput {
            left: false,
            right: true,
        };
        let mut respawned = false;
        for _ in 0..400 {
            controller.update(right, &short_ledge);
            if controller.contacts().respawned {
                respawned = true;
                break;
            }
        }
        assert!(respawned);
        assert_eq!(controller.body.position, controller.config.spawn_point());
    }

    #[test]
    fn draw_pushes_current_sprite_over_body() {
        let controller = settled_controller();
        let mut list = DrawList::new();
        controller.draw(&HeroSprites::default(), &mut list);
        assert_eq!(list.sprite_ids().collect::<Vec<_>>(), vec!["alien_idle"]);
    }

    #[test]
    fn sample_reads_held_arrows() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        assert_eq!(
            ControllerInput::sample(&input),
            ControllerInput {
                left: false,
                right: true
            }
        );
    }
}
