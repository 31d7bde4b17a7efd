//! Side effects requested by game logic.
//!
//! Controller and mode driver never call the audio device or the event loop
//! directly; they return these descriptors and the main loop carries them out.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Jump,
}

impl Sound {
    pub fn id(self) -> &'static str {
        match self {
            Self::Jump => "jump",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Music {
    Theme,
}

impl Music {
    pub fn id(self) -> &'static str {
        match self {
            Self::Theme => "music",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    PlaySound(Sound),
    PlayMusic(Music),
    StopMusic,
    Quit,
}

pub fn wants_quit(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::Quit))
}
