use serde::{Deserialize, Serialize};

/// Gravity acceleration (pixels/tick^2, downward is +y).
pub const GRAVITY: f32 = 0.5;
/// Horizontal speed set by a move intent (pixels/tick).
pub const PLAYER_SPEED: f32 = 5.0;
/// Upward launch speed of a jump (pixels/tick); negated internally.
pub const JUMP_STRENGTH: f32 = 10.0;
/// Default platform density; higher means tighter vertical spacing.
pub const PLATFORM_DENSITY: f32 = 2.0;
pub const MOVING_PCT: f32 = 25.0;
pub const DISAPPEARING_PCT: f32 = 15.0;
pub const DANGEROUS_PCT: f32 = 10.0;

/// Parameter bundle supplied by the configuration collaborator at
/// new-game/retry time. Percentages are 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameParams {
    pub gravity: f32,
    pub player_speed: f32,
    pub jump_strength: f32,
    pub platform_density: f32,
    pub moving_pct: f32,
    pub disappearing_pct: f32,
    pub dangerous_pct: f32,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            player_speed: PLAYER_SPEED,
            jump_strength: JUMP_STRENGTH,
            platform_density: PLATFORM_DENSITY,
            moving_pct: MOVING_PCT,
            disappearing_pct: DISAPPEARING_PCT,
            dangerous_pct: DANGEROUS_PCT,
        }
    }
}

impl GameParams {
    /// Parse a loose JSON object. Missing or mistyped fields fall back to
    /// their defaults individually; the result is always sanitized.
    pub fn from_custom(value: &serde_json::Value) -> Self {
        match serde_json::from_value::<GameParams>(value.clone()) {
            Ok(params) => params.sanitized(),
            Err(e) => {
                tracing::warn!(error = %e, "Malformed game params, falling back per field");
                let defaults = GameParams::default();
                let field = |key: &str, fallback: f32| {
                    value
                        .get(key)
                        .and_then(serde_json::Value::as_f64)
                        .map(|v| v as f32)
                        .unwrap_or(fallback)
                };
                GameParams {
                    gravity: field("gravity", defaults.gravity),
                    player_speed: field("player_speed", defaults.player_speed),
                    jump_strength: field("jump_strength", defaults.jump_strength),
                    platform_density: field("platform_density", defaults.platform_density),
                    moving_pct: field("moving_pct", defaults.moving_pct),
                    disappearing_pct: field("disappearing_pct", defaults.disappearing_pct),
                    dangerous_pct: field("dangerous_pct", defaults.dangerous_pct),
                }
                .sanitized()
            },
        }
    }

    /// Clamp every field into its playable range. Non-finite values become
    /// the default for that field.
    pub fn sanitized(&self) -> Self {
        let d = GameParams::default();
        Self {
            gravity: clamp_or(self.gravity, 0.05, 5.0, d.gravity),
            player_speed: clamp_or(self.player_speed, 0.0, 30.0, d.player_speed),
            jump_strength: clamp_or(self.jump_strength, 1.0, 50.0, d.jump_strength),
            platform_density: clamp_or(self.platform_density, 0.1, 20.0, d.platform_density),
            moving_pct: clamp_or(self.moving_pct, 0.0, 100.0, d.moving_pct),
            disappearing_pct: clamp_or(self.disappearing_pct, 0.0, 100.0, d.disappearing_pct),
            dangerous_pct: clamp_or(self.dangerous_pct, 0.0, 100.0, d.dangerous_pct),
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// Normalized type-draw probabilities. Always sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationWeights {
    pub regular: f32,
    pub moving: f32,
    pub disappearing: f32,
    pub dangerous: f32,
}

impl Default for GenerationWeights {
    fn default() -> Self {
        Self::from_params(&GameParams::default())
    }
}

impl GenerationWeights {
    /// Regular is the remainder after the three configured percentages.
    /// If those already exceed 100% they are scaled down proportionally.
    pub fn from_params(params: &GameParams) -> Self {
        let p = params.sanitized();
        let mut moving = p.moving_pct / 100.0;
        let mut disappearing = p.disappearing_pct / 100.0;
        let mut dangerous = p.dangerous_pct / 100.0;
        let special = moving + disappearing + dangerous;
        if special > 1.0 {
            moving /= special;
            disappearing /= special;
            dangerous /= special;
        }
        let regular = (1.0 - (moving + disappearing + dangerous)).max(0.0);
        Self {
            regular,
            moving,
            disappearing,
            dangerous,
        }
    }

    pub fn sum(&self) -> f32 {
        self.regular + self.moving + self.disappearing + self.dangerous
    }
}

/// Player tunables that are not part of the per-session bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub radius: f32,
    /// Bounce launch speed as a multiple of jump strength.
    pub bounce_multiplier: f32,
    /// Fraction of horizontal velocity kept each tick.
    pub horizontal_damping: f32,
    pub jump_cooldown_ticks: u32,
    pub bounce_cooldown_ticks: u32,
    pub auto_jump_default: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            radius: 15.0,
            bounce_multiplier: 1.3,
            horizontal_damping: 0.9,
            jump_cooldown_ticks: 10,
            bounce_cooldown_ticks: 3,
            auto_jump_default: true,
        }
    }
}

/// Screen geometry and world generation tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub initial_platform_count: u32,
    pub platform_width: f32,
    pub platform_height: f32,
    /// Gap at density 1.0; the effective gap is `base_gap / density`.
    pub base_gap: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    pub batch_size: u32,
    /// How far below the visible bottom a platform survives before culling.
    pub cull_margin: f32,
    /// Generate more when the highest platform is this close above the camera top.
    pub generation_buffer: f32,
    /// World-Y the camera must reach to win (negative is up).
    pub target_height: f32,
    pub moving_speed_min: f32,
    pub moving_speed_max: f32,
    pub disappearing_jumps: u32,
    pub generated_width_min: f32,
    pub generated_width_max: f32,
    /// Inset from the edges of each horizontal third.
    pub section_padding: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            initial_platform_count: 10,
            platform_width: 100.0,
            platform_height: 20.0,
            base_gap: 140.0,
            min_gap: 40.0,
            max_gap: 100.0,
            batch_size: 10,
            cull_margin: 200.0,
            generation_buffer: 600.0,
            target_height: -5000.0,
            moving_speed_min: 1.0,
            moving_speed_max: 3.0,
            disappearing_jumps: 2,
            generated_width_min: 80.0,
            generated_width_max: 120.0,
            section_padding: 20.0,
        }
    }
}

/// Landing-detection tolerances (pixels, except `rising_cutoff` in pixels/tick).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Players rising faster than this (more negative vel_y) never land.
    pub rising_cutoff: f32,
    /// How far above a platform top the feet may be and still be considered.
    pub top_tolerance: f32,
    /// How far below a platform top the feet may sink and still land.
    pub landing_tolerance: f32,
    /// Also land when the feet crossed the top during the tick, however
    /// far they sank. Off keeps the plain tolerance band, which a fall
    /// faster than `landing_tolerance` per tick passes straight through.
    pub swept_landing: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            rising_cutoff: -2.0,
            top_tolerance: 2.0,
            landing_tolerance: 15.0,
            swept_landing: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Scroll when the player rises above this fraction of the screen height.
    pub scroll_threshold_ratio: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            scroll_threshold_ratio: 1.0 / 3.0,
        }
    }
}

/// Platform timers, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTiming {
    pub collision_flash_ticks: u32,
    pub bounce_ready_cooldown_ticks: u32,
}

impl Default for PlatformTiming {
    fn default() -> Self {
        Self {
            collision_flash_ticks: 10,
            bounce_ready_cooldown_ticks: 5,
        }
    }
}

/// Top-level climber configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimberConfig {
    pub physics: PhysicsConfig,
    pub world: WorldConfig,
    pub collision: CollisionConfig,
    pub camera: CameraConfig,
    pub platform: PlatformTiming,
    pub tick_rate_hz: f32,
    pub max_substeps: u32,
}

impl Default for ClimberConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            world: WorldConfig::default(),
            collision: CollisionConfig::default(),
            camera: CameraConfig::default(),
            platform: PlatformTiming::default(),
            tick_rate_hz: 60.0,
            max_substeps: 8,
        }
    }
}

impl ClimberConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("SKYHOP_CLIMBER_CONFIG")
            .unwrap_or_else(|_| "config/climber.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                ClimberConfig::default()
            }),
            Err(_) => ClimberConfig::default(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<ClimberConfig>(content).map(|cfg| cfg.sanitized())
    }

    /// Repair orderings and ranges that would make generation or clamping
    /// impossible (e.g. a min above its max).
    pub fn sanitized(mut self) -> Self {
        let d = ClimberConfig::default();
        let w = &mut self.world;
        w.screen_width = clamp_or(w.screen_width, 200.0, 10_000.0, d.world.screen_width);
        w.screen_height = clamp_or(w.screen_height, 200.0, 10_000.0, d.world.screen_height);
        w.platform_width = clamp_or(w.platform_width, 10.0, w.screen_width / 3.0, d.world.platform_width);
        w.platform_height = clamp_or(w.platform_height, 1.0, 100.0, d.world.platform_height);
        w.base_gap = clamp_or(w.base_gap, 1.0, 10_000.0, d.world.base_gap);
        w.min_gap = clamp_or(w.min_gap, 1.0, 10_000.0, d.world.min_gap);
        w.max_gap = clamp_or(w.max_gap, 1.0, 10_000.0, d.world.max_gap);
        if w.min_gap > w.max_gap {
            std::mem::swap(&mut w.min_gap, &mut w.max_gap);
        }
        w.batch_size = w.batch_size.max(1);
        w.cull_margin = clamp_or(w.cull_margin, 0.0, 100_000.0, d.world.cull_margin);
        w.generation_buffer =
            clamp_or(w.generation_buffer, 0.0, 100_000.0, d.world.generation_buffer);
        if !w.target_height.is_finite() || w.target_height >= 0.0 {
            w.target_height = d.world.target_height;
        }
        w.moving_speed_min = clamp_or(w.moving_speed_min, 0.0, 100.0, d.world.moving_speed_min);
        w.moving_speed_max = clamp_or(w.moving_speed_max, 0.0, 100.0, d.world.moving_speed_max);
        if w.moving_speed_min > w.moving_speed_max {
            std::mem::swap(&mut w.moving_speed_min, &mut w.moving_speed_max);
        }
        w.disappearing_jumps = w.disappearing_jumps.max(1);
        let max_width = w.screen_width / 3.0;
        w.generated_width_min =
            clamp_or(w.generated_width_min, 10.0, max_width, d.world.generated_width_min);
        w.generated_width_max =
            clamp_or(w.generated_width_max, 10.0, max_width, d.world.generated_width_max);
        if w.generated_width_min > w.generated_width_max {
            std::mem::swap(&mut w.generated_width_min, &mut w.generated_width_max);
        }
        w.section_padding = clamp_or(w.section_padding, 0.0, max_width, d.world.section_padding);

        let p = &mut self.physics;
        p.radius = clamp_or(p.radius, 1.0, 100.0, d.physics.radius);
        p.bounce_multiplier = clamp_or(p.bounce_multiplier, 1.0, 5.0, d.physics.bounce_multiplier);
        p.horizontal_damping = clamp_or(p.horizontal_damping, 0.0, 1.0, d.physics.horizontal_damping);

        let c = &mut self.collision;
        c.rising_cutoff = clamp_or(c.rising_cutoff, -100.0, 0.0, d.collision.rising_cutoff);
        c.top_tolerance = clamp_or(c.top_tolerance, 0.0, 100.0, d.collision.top_tolerance);
        c.landing_tolerance =
            clamp_or(c.landing_tolerance, 1.0, 100.0, d.collision.landing_tolerance);

        self.camera.scroll_threshold_ratio = clamp_or(
            self.camera.scroll_threshold_ratio,
            0.05,
            0.95,
            d.camera.scroll_threshold_ratio,
        );
        self.tick_rate_hz = clamp_or(self.tick_rate_hz, 1.0, 1000.0, d.tick_rate_hz);
        self.max_substeps = self.max_substeps.max(1);
        self
    }

    /// Merge this file config with a per-session parameter bundle into the
    /// immutable settings a session runs with.
    pub fn resolve(&self, params: &GameParams) -> SessionSettings {
        let config = self.clone().sanitized();
        let params = params.sanitized();
        let vertical_gap = (config.world.base_gap / params.platform_density)
            .clamp(config.world.min_gap, config.world.max_gap);
        let player = PlayerTuning {
            radius: config.physics.radius,
            gravity: params.gravity,
            jump_strength: params.jump_strength,
            move_speed: params.player_speed,
            bounce_strength: params.jump_strength * config.physics.bounce_multiplier,
            damping: config.physics.horizontal_damping,
            jump_cooldown_ticks: config.physics.jump_cooldown_ticks,
            bounce_cooldown_ticks: config
                .physics
                .bounce_cooldown_ticks
                .min(config.physics.jump_cooldown_ticks),
            auto_jump_default: config.physics.auto_jump_default,
        };
        SessionSettings {
            player,
            weights: GenerationWeights::from_params(&params),
            vertical_gap,
            scroll_threshold: config.world.screen_height * config.camera.scroll_threshold_ratio,
            world: config.world,
            collision: config.collision,
            platform: config.platform,
            tick_rate_hz: config.tick_rate_hz,
            max_substeps: config.max_substeps,
            params,
        }
    }
}

/// Player constants for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerTuning {
    pub radius: f32,
    pub gravity: f32,
    pub jump_strength: f32,
    pub move_speed: f32,
    pub bounce_strength: f32,
    pub damping: f32,
    pub jump_cooldown_ticks: u32,
    /// Never longer than `jump_cooldown_ticks`.
    pub bounce_cooldown_ticks: u32,
    pub auto_jump_default: bool,
}

/// Everything a session needs, fixed at new-game/retry time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    pub player: PlayerTuning,
    pub world: WorldConfig,
    pub weights: GenerationWeights,
    pub vertical_gap: f32,
    pub collision: CollisionConfig,
    pub scroll_threshold: f32,
    pub platform: PlatformTiming,
    pub tick_rate_hz: f32,
    pub max_substeps: u32,
    pub params: GameParams,
}

impl Default for SessionSettings {
    fn default() -> Self {
        ClimberConfig::default().resolve(&GameParams::default())
    }
}
