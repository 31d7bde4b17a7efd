use crate::controller::{CharacterController, ControllerInput};
use crate::platform::Platform;
use alien_core::error::read_json;
use alien_core::LoadError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    /// Space pressed on the first tick of this frame group.
    #[serde(default)]
    pub jump: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayTick {
    pub input: ControllerInput,
    pub jump: bool,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<ReplayTick> {
        let mut out = Vec::new();
        for frame in &self.frames {
            let input = ControllerInput {
                left: frame.left,
                right: frame.right,
            };
            for i in 0..frame.repeat.max(1) {
                out.push(ReplayTick {
                    input,
                    jump: frame.jump && i == 0,
                });
            }
        }
        out
    }
}

/// Drive a controller through the ticks in the same order the game loop
/// does: discrete key actions first, then the physics tick.
pub fn run(controller: &mut CharacterController, ticks: &[ReplayTick], platforms: &[Platform]) {
    for tick in ticks {
        if tick.jump {
            controller.jump();
        }
        controller.update(tick.input, platforms);
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, LoadError> {
    let replay: ReplaySequence = read_json(path)?;
    validate_replay(&replay).map_err(|reason| LoadError::invalid(path, reason))?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frames.is_empty() {
        return Err("frames list is empty".to_string());
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Facing, PhysicsConfig};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "alien_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn ground() -> Vec<Platform> {
        vec![Platform::new(0.0, 448.0, 800.0, 32.0)]
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "right": true, "repeat": 3 },
                { "jump": true, "repeat": 2 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[0].input.right);
        assert!(expanded[3].jump);
        assert!(!expanded[4].jump, "jump is a press, not a hold");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn zero_repeat_counts_as_one() {
        let replay = ReplaySequence {
            frames: vec![ReplayFrame {
                left: true,
                right: false,
                jump: false,
                repeat: 0,
            }],
        };
        assert_eq!(replay.expanded_inputs().len(), 1);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(matches!(err, LoadError::Invalid { .. }));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "repeat": 90 },
                { "right": true, "repeat": 60 },
                { "right": true, "jump": true, "repeat": 1 },
                { "right": true, "repeat": 120 },
                { "left": true, "repeat": 45 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let ticks = replay.expanded_inputs();
        let platforms = vec![
            Platform::new(0.0, 448.0, 800.0, 32.0),
            Platform::new(420.0, 360.0, 120.0, 20.0),
        ];

        let mut run_a = CharacterController::new(PhysicsConfig::default());
        let mut run_b = CharacterController::new(PhysicsConfig::default());
        run(&mut run_a, &ticks, &platforms);
        run(&mut run_b, &ticks, &platforms);

        assert_eq!(run_a.body, run_b.body);
        assert_eq!(run_a.sprite(), run_b.sprite());
        assert_eq!(run_a.body.facing, Facing::Left);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn walking_into_a_wall_stops_at_its_left_edge() {
        // Hero spawns at x=100 (right edge 124) and walks toward a block at 400.
        let platforms = vec![
            Platform::new(0.0, 448.0, 800.0, 32.0),
            Platform::new(400.0, 300.0, 50.0, 148.0),
        ];
        let replay = ReplaySequence {
            frames: vec![
                ReplayFrame {
                    left: false,
                    right: false,
                    jump: false,
                    repeat: 90,
                },
                ReplayFrame {
                    left: false,
                    right: true,
                    jump: false,
                    repeat: 200,
                },
            ],
        };
        let mut controller = CharacterController::new(PhysicsConfig::default());
        run(&mut controller, &replay.expanded_inputs(), &platforms);

        assert_eq!(controller.body.right(), 400.0);
        assert!(controller.body.on_ground);
        assert_eq!(controller.body.bottom(), 448.0);
    }

    #[test]
    fn bundled_replay_loads_and_lands() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets/replays/walk_and_jump.json");
        let replay = load_replay_from_path(&path).expect("bundled replay should load");
        let mut controller = CharacterController::new(PhysicsConfig::default());
        run(&mut controller, &replay.expanded_inputs(), &ground());
        assert!(controller.body.on_ground);
        assert_eq!(controller.body.bottom(), 448.0);
    }
}
