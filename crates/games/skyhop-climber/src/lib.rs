pub mod bot;
pub mod camera;
pub mod collision;
pub mod config;
pub mod map;
pub mod physics;
pub mod platform;
pub mod presets;
pub mod scoring;

use serde::{Deserialize, Serialize};

use skyhop_core::events::{GameEvent, SessionEnd, SoundCue, TerminalReason};
use skyhop_core::game_trait::{GameConfig, GameMetadata, SkyhopGame};
use skyhop_core::input::{Intent, TickIntents};
use skyhop_core::skyhop_game_boilerplate;

use camera::Camera;
use config::{ClimberConfig, GameParams, SessionSettings};
use map::{Map, MapStats};
use physics::Player;
use platform::{Platform, PlatformTag};

/// Odd 64-bit constant used to spread retry seeds.
const RETRY_SEED_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

/// Player fields exposed to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub on_ground: bool,
    pub is_jumping: bool,
    pub auto_jump_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformTag,
    pub colliding: bool,
    /// Only set for Disappearing platforms.
    pub jumps_remaining: Option<u32>,
}

impl From<&Platform> for PlatformSnapshot {
    fn from(p: &Platform) -> Self {
        Self {
            id: p.id,
            x: p.x,
            y: p.y,
            width: p.width,
            height: p.height,
            kind: p.tag(),
            colliding: p.colliding,
            jumps_remaining: p.jumps_remaining(),
        }
    }
}

/// Read-only view of one tick, serialized for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub player: PlayerSnapshot,
    pub platforms: Vec<PlatformSnapshot>,
    pub camera_y: f32,
    pub score: u64,
    /// Climb completed toward the target height, in [0, 1].
    pub progress: f32,
    pub terminal: Option<TerminalReason>,
    pub stats: MapStats,
}

/// Session controller for the endless climber.
pub struct ClimberGame {
    config: ClimberConfig,
    settings: SessionSettings,
    base_seed: u64,
    seed: u64,
    attempt: u32,
    tick: u64,
    player: Player,
    map: Map,
    camera: Camera,
    intents: TickIntents,
    accumulator: f32,
    paused: bool,
    terminal: Option<SessionEnd>,
    /// Events raised outside `update` (new game, retry), delivered with the
    /// next unpaused update.
    pending: Vec<GameEvent>,
}

impl ClimberGame {
    /// Build a game from the on-disk config (see [`ClimberConfig::load`]).
    pub fn new() -> Self {
        Self::with_config(ClimberConfig::load())
    }

    pub fn with_config(config: ClimberConfig) -> Self {
        let config = config.sanitized();
        let settings = config.resolve(&GameParams::default());
        let mut map = Map::new(settings.clone(), 0);
        let (spawn_x, spawn_y) = map.generate_initial();
        Self {
            player: Player::new(spawn_x, spawn_y, settings.player),
            camera: Camera::new(settings.scroll_threshold),
            map,
            settings,
            config,
            base_seed: 0,
            seed: 0,
            attempt: 0,
            tick: 0,
            intents: TickIntents::default(),
            accumulator: 0.0,
            paused: false,
            terminal: None,
            pending: Vec::new(),
        }
    }

    /// Start a fresh session with a parameter bundle and seed.
    pub fn new_game(&mut self, params: &GameParams, seed: u64) {
        self.base_seed = seed;
        self.attempt = 0;
        self.start_session(params, seed);
        tracing::info!(seed, ?params, "New game");
        self.pending.push(GameEvent::GameStarted { seed });
        self.pending.push(GameEvent::Sound(SoundCue::GameStart));
    }

    fn start_session(&mut self, params: &GameParams, seed: u64) {
        self.settings = self.config.resolve(params);
        self.seed = seed;
        self.map = Map::new(self.settings.clone(), seed);
        let (spawn_x, spawn_y) = self.map.generate_initial();
        self.player = Player::new(spawn_x, spawn_y, self.settings.player);
        self.camera = Camera::new(self.settings.scroll_threshold);
        self.tick = 0;
        self.intents = TickIntents::default();
        self.accumulator = 0.0;
        self.paused = false;
        self.terminal = None;
        self.pending.clear();
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn params(&self) -> &GameParams {
        &self.settings.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn score(&self) -> u64 {
        self.camera.score()
    }

    /// Run exactly one simulation tick, in the fixed order: intents,
    /// integration, wraparound, world update, collision, camera, terminal
    /// checks. A no-op once the session has ended.
    pub fn step(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.terminal.is_some() {
            return events;
        }
        self.tick += 1;

        let intents = self.intents.take();
        if intents.wants_toggle() {
            let enabled = self.player.toggle_auto_jump();
            tracing::debug!(enabled, "Auto-jump toggled");
            events.push(GameEvent::AutoJumpToggled { enabled });
        }
        self.player.set_horizontal_intent(intents.horizontal);
        if intents.jump && self.player.request_manual_jump() {
            events.push(GameEvent::Sound(SoundCue::Jump));
        }

        if self.player.integrate() {
            events.push(GameEvent::Sound(SoundCue::Jump));
        }
        self.player.wrap_horizontal(self.settings.world.screen_width);

        let update = self.map.update(self.camera.y);
        if self.any_visible(&update.reflected_ids) {
            events.push(GameEvent::Sound(SoundCue::PlatformMove));
        }

        match collision::resolve(&mut self.player, &mut self.map, &self.settings.collision) {
            Some(contact) => {
                let cue = if contact.bounced {
                    SoundCue::Jump
                } else {
                    SoundCue::Land
                };
                events.push(GameEvent::Sound(cue));
                if contact.tag == PlatformTag::Dangerous {
                    self.end_session(TerminalReason::Danger, &mut events);
                    return events;
                }
            },
            None => {
                if self.player.on_ground {
                    self.player.leave_ground();
                }
            },
        }

        self.camera.update(self.player.y);

        if let Some(reason) = self.check_terminal() {
            self.end_session(reason, &mut events);
        }
        events
    }

    /// Fall and Victory predicates, in that order. Danger is raised by
    /// collision resolution.
    pub fn check_terminal(&self) -> Option<TerminalReason> {
        if let Some(end) = self.terminal {
            return Some(end.reason);
        }
        let screen_y = self.camera.world_to_screen(self.player.y);
        if screen_y > self.settings.world.screen_height + self.player.radius {
            return Some(TerminalReason::Fall);
        }
        if self.camera.y <= self.map.target_height() {
            return Some(TerminalReason::Victory);
        }
        None
    }

    fn end_session(&mut self, reason: TerminalReason, events: &mut Vec<GameEvent>) {
        let end = SessionEnd {
            reason,
            score: self.camera.score(),
        };
        match reason {
            TerminalReason::Danger => events.push(GameEvent::Sound(SoundCue::Die)),
            TerminalReason::Victory => events.push(GameEvent::Sound(SoundCue::LevelComplete)),
            TerminalReason::Fall => {},
        }
        self.terminal = Some(end);
        tracing::info!(
            reason = reason.as_str(),
            score = end.score,
            tick = self.tick,
            seed = self.seed,
            "Session ended"
        );
        events.push(GameEvent::SessionEnded(end));
    }

    fn any_visible(&self, ids: &[u64]) -> bool {
        if ids.is_empty() {
            return false;
        }
        let top = self.camera.y;
        let bottom = self.camera.y + self.settings.world.screen_height;
        self.map
            .platforms()
            .iter()
            .any(|p| ids.contains(&p.id) && p.y >= top && p.y <= bottom)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            player: PlayerSnapshot {
                x: self.player.x,
                y: self.player.y,
                radius: self.player.radius,
                on_ground: self.player.on_ground,
                is_jumping: self.player.is_jumping,
                auto_jump_enabled: self.player.auto_jump_enabled,
            },
            platforms: self.map.platforms().iter().map(PlatformSnapshot::from).collect(),
            camera_y: self.camera.y,
            score: self.camera.score(),
            progress: scoring::progress(self.camera.y, self.map.target_height()),
            terminal: self.terminal.map(|end| end.reason),
            stats: self.map.stats(),
        }
    }
}

impl Default for ClimberGame {
    fn default() -> Self {
        Self::new()
    }
}

impl SkyhopGame for ClimberGame {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Skyhop Climber".to_string(),
            description: "Bounce from platform to platform and climb as high as you can!"
                .to_string(),
            target_climb: self.map.target_height().abs() as u64,
        }
    }

    fn tick_rate(&self) -> f32 {
        self.settings.tick_rate_hz
    }

    fn init(&mut self, config: &GameConfig) {
        let params = GameParams::from_custom(&config.custom_object());
        self.new_game(&params, config.seed);
    }

    fn retry(&mut self) {
        self.attempt = self.attempt.wrapping_add(1);
        let seed = self
            .base_seed
            .wrapping_add(u64::from(self.attempt).wrapping_mul(RETRY_SEED_STEP));
        let params = self.settings.params.clone();
        self.start_session(&params, seed);
        tracing::info!(seed, attempt = self.attempt, "Retry");
        self.pending.push(GameEvent::GameStarted { seed });
        self.pending.push(GameEvent::Sound(SoundCue::Restart));
    }

    fn apply_intent(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }
        let mut events = std::mem::take(&mut self.pending);
        if self.terminal.is_some() || !dt.is_finite() || dt <= 0.0 {
            return events;
        }

        let tick_dt = 1.0 / self.settings.tick_rate_hz;
        self.accumulator += dt;
        let mut steps = 0;
        // Tolerate float drift so that exactly one tick of dt runs one step.
        while self.accumulator + 1e-6 >= tick_dt && steps < self.settings.max_substeps {
            self.accumulator = (self.accumulator - tick_dt).max(0.0);
            events.extend(self.step());
            steps += 1;
            if self.terminal.is_some() {
                break;
            }
        }
        if self.accumulator >= tick_dt {
            tracing::trace!(
                backlog = self.accumulator,
                "Dropping simulation backlog past max substeps"
            );
            self.accumulator = 0.0;
        }
        events
    }

    fn session_end(&self) -> Option<SessionEnd> {
        self.terminal
    }

    skyhop_game_boilerplate!();
}
