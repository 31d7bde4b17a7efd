//! Audio collaborator: effect dispatch plus a `rodio` backend.
//!
//! Playback is fire-and-forget. A missing file, an undecodable file, or a
//! machine without an output device produces a warning and silence, never an
//! error visible to game logic.

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use serde::Deserialize;

use crate::effect::{Effect, Music, Sound};

const SOUND_EXTENSIONS: &[&str] = &["wav", "ogg"];
const MUSIC_EXTENSIONS: &[&str] = &["ogg", "wav"];

/// Sound and music toggles owned by the mode driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub music_enabled: bool,
    pub sound_enabled: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            sound_enabled: true,
        }
    }
}

pub trait AudioSink {
    fn play_sound(&mut self, sound: Sound);
    fn play_music(&mut self, music: Music);
    fn stop_music(&mut self);
}

/// Forward audio effects to `sink`, honoring the current toggles. Non-audio
/// effects are ignored here.
pub fn dispatch(effects: &[Effect], settings: &AudioSettings, sink: &mut dyn AudioSink) {
    for effect in effects {
        match *effect {
            Effect::PlaySound(sound) if settings.sound_enabled => sink.play_sound(sound),
            Effect::PlayMusic(music) if settings.music_enabled => sink.play_music(music),
            Effect::StopMusic => sink.stop_music(),
            Effect::PlaySound(_) | Effect::PlayMusic(_) | Effect::Quit => {}
        }
    }
}

/// Sink used when no output device is available.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_sound(&mut self, sound: Sound) {
        log::trace!("(muted) sound '{}'", sound.id());
    }

    fn play_music(&mut self, music: Music) {
        log::trace!("(muted) music '{}'", music.id());
    }

    fn stop_music(&mut self) {}
}

pub struct RodioAudio {
    stream: OutputStream,
    music_sink: Option<Sink>,
    sounds_dir: PathBuf,
    music_dir: PathBuf,
    /// Cached file bytes per id; `None` records a failed lookup.
    cache: HashMap<&'static str, Option<Vec<u8>>>,
    warned: HashSet<&'static str>,
}

impl RodioAudio {
    pub fn new(assets_root: &Path) -> Option<Self> {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(err) => {
                log::warn!("No audio output device, running muted: {err}");
                return None;
            }
        };
        Some(Self {
            stream,
            music_sink: None,
            sounds_dir: assets_root.join("sounds"),
            music_dir: assets_root.join("music"),
            cache: HashMap::new(),
            warned: HashSet::new(),
        })
    }

    fn bytes_for(&mut self, id: &'static str, dir: &Path, extensions: &[&str]) -> Option<Vec<u8>> {
        let entry = self
            .cache
            .entry(id)
            .or_insert_with(|| find_asset(dir, id, extensions).and_then(|p| std::fs::read(p).ok()));
        if entry.is_none() && self.warned.insert(id) {
            log::warn!(
                "Audio asset '{}' not found in {} ({})",
                id,
                dir.display(),
                extensions.join("/")
            );
        }
        entry.clone()
    }
}

impl AudioSink for RodioAudio {
    fn play_sound(&mut self, sound: Sound) {
        let dir = self.sounds_dir.clone();
        let Some(bytes) = self.bytes_for(sound.id(), &dir, SOUND_EXTENSIONS) else {
            return;
        };
        match Decoder::new(Cursor::new(bytes)) {
            Ok(source) => {
                let sink = Sink::connect_new(self.stream.mixer());
                sink.append(source);
                sink.detach();
            }
            Err(err) => log::warn!("Failed to decode sound '{}': {err}", sound.id()),
        }
    }

    fn play_music(&mut self, music: Music) {
        if self.music_sink.as_ref().is_some_and(|sink| !sink.empty()) {
            return;
        }
        let dir = self.music_dir.clone();
        let Some(bytes) = self.bytes_for(music.id(), &dir, MUSIC_EXTENSIONS) else {
            return;
        };
        match Decoder::new(Cursor::new(bytes)) {
            Ok(source) => {
                let sink = Sink::connect_new(self.stream.mixer());
                sink.append(source.repeat_infinite());
                self.music_sink = Some(sink);
                log::debug!("Music '{}' started", music.id());
            }
            Err(err) => log::warn!("Failed to decode music '{}': {err}", music.id()),
        }
    }

    fn stop_music(&mut self) {
        if let Some(sink) = self.music_sink.take() {
            sink.stop();
            log::debug!("Music stopped");
        }
    }
}

fn find_asset(dir: &Path, id: &str, extensions: &[&str]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| dir.join(format!("{id}.{ext}")))
        .find(|path| path.is_file())
}
