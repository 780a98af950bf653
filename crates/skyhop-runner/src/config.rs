use serde::{Deserialize, Serialize};

use skyhop_climber::config::GameParams;
use skyhop_climber::presets::find_preset;

use crate::audio::AudioSettings;
use crate::error::RunnerError;

const DEFAULT_PATH: &str = "skyhop.toml";

/// Per-field overrides layered on top of the selected preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamOverrides {
    pub gravity: Option<f32>,
    pub player_speed: Option<f32>,
    pub jump_strength: Option<f32>,
    pub platform_density: Option<f32>,
    pub moving_pct: Option<f32>,
    pub disappearing_pct: Option<f32>,
    pub dangerous_pct: Option<f32>,
}

impl ParamOverrides {
    pub fn apply(&self, base: &GameParams) -> GameParams {
        GameParams {
            gravity: self.gravity.unwrap_or(base.gravity),
            player_speed: self.player_speed.unwrap_or(base.player_speed),
            jump_strength: self.jump_strength.unwrap_or(base.jump_strength),
            platform_density: self.platform_density.unwrap_or(base.platform_density),
            moving_pct: self.moving_pct.unwrap_or(base.moving_pct),
            disappearing_pct: self.disappearing_pct.unwrap_or(base.disappearing_pct),
            dangerous_pct: self.dangerous_pct.unwrap_or(base.dangerous_pct),
        }
        .sanitized()
    }
}

/// Headless runner configuration, loaded from `skyhop.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Fixed seed; a time-derived seed is used when unset.
    pub seed: Option<u64>,
    pub max_ticks: u64,
    pub preset: String,
    pub params: ParamOverrides,
    /// Drive the player with the built-in bot.
    pub autopilot: bool,
    /// Sleep between ticks to run at wall-clock speed.
    pub realtime: bool,
    pub summary_every_ticks: u64,
    pub audio: AudioSettings,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_ticks: 36_000,
            preset: "meadow".to_string(),
            params: ParamOverrides::default(),
            autopilot: true,
            realtime: false,
            summary_every_ticks: 600,
            audio: AudioSettings::default(),
        }
    }
}

impl RunnerConfig {
    /// Load config from `SKYHOP_RUNNER_CONFIG` or `skyhop.toml`, then apply
    /// env var overrides. A missing default file means defaults; a missing
    /// file named explicitly is an error.
    pub fn load() -> Result<Self, RunnerError> {
        let explicit = std::env::var("SKYHOP_RUNNER_CONFIG")
            .ok()
            .filter(|p| !p.is_empty());
        let path = explicit.clone().unwrap_or_else(|| DEFAULT_PATH.to_string());

        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    RunnerConfig::default()
                },
            },
            Err(e) if explicit.is_some() => return Err(RunnerError::Io(e)),
            Err(_) => {
                tracing::info!("No {path} found, using defaults");
                RunnerConfig::default()
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RunnerConfig>(content)
    }

    /// Apply `SKYHOP_SEED` and `SKYHOP_MAX_TICKS` from `lookup`.
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("SKYHOP_SEED")
            && !val.is_empty()
        {
            match val.parse::<u64>() {
                Ok(seed) => self.seed = Some(seed),
                Err(e) => tracing::warn!(value = %val, "Ignoring SKYHOP_SEED: {e}"),
            }
        }
        if let Some(val) = lookup("SKYHOP_MAX_TICKS")
            && !val.is_empty()
        {
            match val.parse::<u64>() {
                Ok(n) => self.max_ticks = n,
                Err(e) => tracing::warn!(value = %val, "Ignoring SKYHOP_MAX_TICKS: {e}"),
            }
        }
    }

    /// Reject values the loop cannot run with.
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.max_ticks == 0 {
            return Err(RunnerError::Config("max_ticks must be > 0".to_string()));
        }
        if self.summary_every_ticks == 0 {
            return Err(RunnerError::Config(
                "summary_every_ticks must be > 0".to_string(),
            ));
        }
        if find_preset(&self.preset).is_none() {
            return Err(RunnerError::UnknownPreset(self.preset.clone()));
        }
        if !self.audio.master_volume.is_finite() || !self.audio.gameplay_volume.is_finite() {
            return Err(RunnerError::Config("audio volumes must be finite".to_string()));
        }
        Ok(())
    }

    /// Preset params with the configured overrides on top.
    pub fn game_params(&self) -> Result<GameParams, RunnerError> {
        let preset =
            find_preset(&self.preset).ok_or_else(|| RunnerError::UnknownPreset(self.preset.clone()))?;
        Ok(self.params.apply(&preset.params))
    }

    /// The configured seed, or one derived from the wall clock.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }
}
