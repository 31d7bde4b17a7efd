//! Menu/play state machine.
//!
//! The driver owns which mode the game is in and the audio toggles. It turns
//! raw input events into controller calls and effect descriptors, and builds
//! the draw list for the current mode. The character core only runs in
//! `GameMode::Play`.

use alien_core::input::Key;
use alien_core::Rect;
use glam::Vec2;

use crate::animation::{HeroSprites, SpriteKey};
use crate::audio::AudioSettings;
use crate::controller::{CharacterController, ControllerInput};
use crate::draw::{rgb, DrawList, WHITE, YELLOW};
use crate::effect::{Effect, Music};
use crate::level::Level;

pub const BACKGROUND_SPRITE: &str = "background";
pub const TITLE: &str = "Alien Adventure";
pub const HELP_TEXT: &str = "Arrows to move \u{2022} Space to jump";

const BUTTON_WIDTH: f32 = 200.0;
const BUTTON_HEIGHT: f32 = 50.0;
const BUTTON_TOPS: [f32; 3] = [200.0, 270.0, 340.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Menu,
    Play,
}

impl GameMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Play => "play",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    Start,
    Sound,
    Quit,
}

impl MenuButton {
    pub const ALL: [MenuButton; 3] = [MenuButton::Start, MenuButton::Sound, MenuButton::Quit];

    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Sound => "Sound",
            Self::Quit => "Quit",
        }
    }
}

pub struct ModeDriver {
    mode: GameMode,
    settings: AudioSettings,
    world_size: Vec2,
    buttons: [(MenuButton, Rect); 3],
}

impl ModeDriver {
    pub fn new(world_width: f32, world_height: f32, settings: AudioSettings) -> Self {
        Self {
            mode: GameMode::Menu,
            settings,
            world_size: Vec2::new(world_width, world_height),
            buttons: layout_buttons(world_width),
        }
    }

    /// Re-center the menu after the world size changed.
    pub fn set_world_size(&mut self, world_width: f32, world_height: f32) {
        self.world_size = Vec2::new(world_width, world_height);
        self.buttons = layout_buttons(world_width);
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    #[allow(dead_code)]
    pub fn button_rect(&self, button: MenuButton) -> Rect {
        self.buttons
            .iter()
            .find(|(b, _)| *b == button)
            .map(|(_, rect)| *rect)
            .unwrap_or_default()
    }

    pub fn button_at(&self, pos: Vec2) -> Option<MenuButton> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains_point(pos))
            .map(|(button, _)| *button)
    }

    /// Handle a click at world position `pos`. Only the menu reacts to clicks.
    pub fn on_mouse_down(&mut self, pos: Vec2) -> Vec<Effect> {
        if self.mode != GameMode::Menu {
            return Vec::new();
        }
        match self.button_at(pos) {
            Some(MenuButton::Start) => {
                self.set_mode(GameMode::Play);
                if self.settings.music_enabled {
                    vec![Effect::PlayMusic(Music::Theme)]
                } else {
                    Vec::new()
                }
            }
            Some(MenuButton::Sound) => {
                self.settings.music_enabled = !self.settings.music_enabled;
                self.settings.sound_enabled = !self.settings.sound_enabled;
                log::info!(
                    "Audio toggled: music {}, sound {}",
                    on_off(self.settings.music_enabled),
                    on_off(self.settings.sound_enabled)
                );
                if self.settings.music_enabled {
                    vec![Effect::PlayMusic(Music::Theme)]
                } else {
                    vec![Effect::StopMusic]
                }
            }
            Some(MenuButton::Quit) => {
                log::info!("Quit selected from menu");
                vec![Effect::Quit]
            }
            None => Vec::new(),
        }
    }

    /// Handle a discrete key press. Only play mode reacts to keys.
    pub fn on_key_down(&mut self, key: Key, controller: &mut CharacterController) -> Vec<Effect> {
        if self.mode != GameMode::Play {
            return Vec::new();
        }
        match key {
            Key::Space => controller.jump(),
            Key::Escape => {
                self.set_mode(GameMode::Menu);
                vec![Effect::StopMusic]
            }
            _ => Vec::new(),
        }
    }

    /// Run one simulation tick if playing.
    pub fn update(
        &self,
        controller: &mut CharacterController,
        input: ControllerInput,
        level: &Level,
    ) -> Option<SpriteKey> {
        match self.mode {
            GameMode::Play => Some(controller.update(input, level.platforms())),
            GameMode::Menu => None,
        }
    }

    pub fn draw(
        &self,
        controller: &CharacterController,
        sprites: &HeroSprites,
        level: &Level,
    ) -> DrawList {
        let mut list = DrawList::new();
        list.sprite(
            BACKGROUND_SPRITE,
            Rect::new(0.0, 0.0, self.world_size.x, self.world_size.y),
        );
        match self.mode {
            GameMode::Menu => self.draw_menu(&mut list),
            GameMode::Play => {
                level.draw(&mut list);
                controller.draw(sprites, &mut list);
            }
        }
        list
    }

    fn draw_menu(&self, list: &mut DrawList) {
        let center_x = self.world_size.x / 2.0;
        list.text(TITLE, Vec2::new(center_x, 100.0), 64.0, WHITE);
        for (button, rect) in &self.buttons {
            list.fill(*rect, rgb(30, 30, 60));
            list.outline(*rect, rgb(255, 255, 255));
            let label = match button {
                MenuButton::Sound => format!(
                    "{}: {}",
                    button.label(),
                    on_off(self.settings.sound_enabled)
                ),
                _ => button.label().to_string(),
            };
            list.text(label, rect.center(), 32.0, YELLOW);
        }
        list.text(HELP_TEXT, Vec2::new(center_x, 430.0), 28.0, WHITE);
    }

    fn set_mode(&mut self, mode: GameMode) {
        if self.mode != mode {
            log::info!("Mode: {} -> {}", self.mode.label(), mode.label());
            self.mode = mode;
        }
    }
}

fn layout_buttons(world_width: f32) -> [(MenuButton, Rect); 3] {
    let left = world_width / 2.0 - BUTTON_WIDTH / 2.0;
    [0, 1, 2].map(|i| {
        (
            MenuButton::ALL[i],
            Rect::new(left, BUTTON_TOPS[i], BUTTON_WIDTH, BUTTON_HEIGHT),
        )
    })
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "On"
    } else {
        "Off"
    }
}
