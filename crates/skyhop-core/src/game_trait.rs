use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::events::{GameEvent, SessionEnd};
use crate::input::Intent;

/// Core trait the surrounding shell drives.
///
/// The shell owns menus, rendering, audio playback and the frame clock;
/// the game only owns simulation state and reports what happened as events.
pub trait SkyhopGame {
    /// Game metadata for the map selection screen.
    fn metadata(&self) -> GameMetadata;

    /// Start a fresh session with the given configuration.
    fn init(&mut self, config: &GameConfig);

    /// Restart with the parameters of the last `init`.
    fn retry(&mut self);

    /// Queue an input intent for the next simulation tick.
    fn apply_intent(&mut self, intent: Intent);

    /// Called each frame with the elapsed wall time. Returns the events
    /// raised by every simulation tick that ran.
    fn update(&mut self, dt: f32) -> Vec<GameEvent>;

    /// Serialize the current frame snapshot for the rendering collaborator.
    fn serialize_state(&self) -> Vec<u8>;

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Freeze the simulation (the shell's pause screen).
    fn pause(&mut self);

    /// Unfreeze the simulation.
    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    /// Whether the current session reached a terminal state.
    fn is_session_over(&self) -> bool {
        self.session_end().is_some()
    }

    /// Terminal reason and score, once the session has ended.
    fn session_end(&self) -> Option<SessionEnd>;
}

/// Game metadata for the map selection screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    /// World height (positive, in pixels) the player must climb to win.
    pub target_climb: u64,
}

/// Configuration for a game session.
///
/// `custom` carries the game's parameter bundle as loose JSON so that a
/// partially-specified bundle can fall back to defaults field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    pub seed: u64,
    pub custom: HashMap<String, serde_json::Value>,
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            custom: HashMap::new(),
        }
    }

    /// Insert a single custom parameter, returning the updated config.
    pub fn with_param(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.custom.insert(key.to_string(), value.into());
        self
    }

    /// The custom map as a JSON object, ready for `serde_json::from_value`.
    pub fn custom_object(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.custom
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

/// Generates the boilerplate `SkyhopGame` methods shared by every game:
/// `serialize_state`, `pause`, `resume`, `is_paused`.
///
/// Requires the implementing struct to have a `paused: bool` field and a
/// `snapshot()` method returning a serializable value.
#[macro_export]
macro_rules! skyhop_game_boilerplate {
    () => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.snapshot()).expect("frame snapshot serialization must succeed")
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    };
}
