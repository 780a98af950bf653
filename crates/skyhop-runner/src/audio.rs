use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use skyhop_core::events::{GameEvent, SoundCue};

/// Audio settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub gameplay_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            gameplay_volume: 0.8,
            muted: false,
        }
    }
}

impl AudioSettings {
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = clamp_volume(volume);
    }

    pub fn set_gameplay_volume(&mut self, volume: f32) {
        self.gameplay_volume = clamp_volume(volume);
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Copy with both volumes forced into [0, 1].
    pub fn clamped(&self) -> Self {
        Self {
            master_volume: clamp_volume(self.master_volume),
            gameplay_volume: clamp_volume(self.gameplay_volume),
            muted: self.muted,
        }
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// How a cue is played: logical asset name and its own volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundSpec {
    pub asset: &'static str,
    pub volume: f32,
}

pub fn sound_spec(cue: SoundCue) -> SoundSpec {
    let (asset, volume) = match cue {
        SoundCue::Jump => ("PLAYER_JUMP", 1.0),
        SoundCue::Land => ("PLAYER_LAND", 0.8),
        SoundCue::Die => ("PLAYER_DIE", 1.0),
        SoundCue::PlatformMove => ("PLATFORM_MOVE", 0.7),
        SoundCue::LevelComplete => ("LEVEL_COMPLETE", 1.0),
        SoundCue::GameStart => ("GAME_START", 1.0),
        SoundCue::Restart => ("RESTART_LEVEL", 0.9),
    };
    SoundSpec { asset, volume }
}

/// A cue that made it past the mixer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayedSound {
    pub cue: SoundCue,
    pub asset: &'static str,
    pub volume: f32,
}

/// Queue of sound cues to be processed each frame.
#[derive(Debug, Default)]
pub struct AudioEventQueue {
    settings: AudioSettings,
    cues: Vec<SoundCue>,
    played: BTreeMap<&'static str, u64>,
}

impl AudioEventQueue {
    pub fn new(settings: AudioSettings) -> Self {
        Self {
            settings: settings.clamped(),
            cues: Vec::new(),
            played: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    /// Queue every sound cue found in `events`.
    pub fn extend_from_events(&mut self, events: &[GameEvent]) {
        self.cues.extend(events.iter().filter_map(GameEvent::sound));
    }

    pub fn settings_mut(&mut self) -> &mut AudioSettings {
        &mut self.settings
    }

    /// Drain the queue, returning the cues that are audible.
    pub fn process(&mut self) -> Vec<PlayedSound> {
        let mut played = Vec::new();
        for cue in self.cues.drain(..) {
            let spec = sound_spec(cue);
            let volume = self.settings.master_volume * self.settings.gameplay_volume * spec.volume;
            if self.settings.muted || volume <= 0.001 {
                continue;
            }
            tracing::trace!(cue = cue.as_str(), asset = spec.asset, volume, "Play sound");
            *self.played.entry(cue.as_str()).or_default() += 1;
            played.push(PlayedSound {
                cue,
                asset: spec.asset,
                volume,
            });
        }
        played
    }

    /// How many times each cue was played, keyed by trigger name.
    pub fn play_counts(&self) -> &BTreeMap<&'static str, u64> {
        &self.played
    }
}
