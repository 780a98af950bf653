use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use skyhop_climber::ClimberGame;
use skyhop_climber::bot::generate_bot_intents;
use skyhop_core::events::TerminalReason;
use skyhop_core::game_trait::SkyhopGame;

use crate::audio::AudioEventQueue;
use crate::config::RunnerConfig;
use crate::error::RunnerError;

/// What happened during one headless session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub preset: String,
    pub ticks: u64,
    /// `None` when the tick budget ran out first.
    pub outcome: Option<TerminalReason>,
    pub final_score: u64,
    pub max_score: u64,
    pub platforms_generated: u64,
    pub sounds: BTreeMap<String, u64>,
}

/// Start a new game from `config` and drive it frame by frame until it ends
/// or the tick budget runs out.
pub fn run_session(
    game: &mut ClimberGame,
    config: &RunnerConfig,
    audio: &mut AudioEventQueue,
) -> Result<RunSummary, RunnerError> {
    config.validate()?;
    let params = config.game_params()?;
    let seed = config.resolve_seed();
    game.new_game(&params, seed);
    tracing::info!(seed, preset = %config.preset, autopilot = config.autopilot, "Session starting");

    let dt = 1.0 / game.tick_rate();
    let frame = Duration::from_secs_f32(dt);
    let mut max_score = 0;
    let mut next_summary = config.summary_every_ticks;

    while game.tick() < config.max_ticks && !game.is_session_over() {
        if config.autopilot {
            for intent in generate_bot_intents(game) {
                game.apply_intent(intent);
            }
        }
        let events = game.update(dt);
        audio.extend_from_events(&events);
        audio.process();
        max_score = max_score.max(game.score());

        if game.tick() >= next_summary {
            let stats = game.map().stats();
            tracing::info!(
                tick = game.tick(),
                score = game.score(),
                camera_y = game.camera().y,
                platforms = stats.count,
                "Progress"
            );
            next_summary += config.summary_every_ticks;
        }
        if config.realtime {
            std::thread::sleep(frame);
        }
    }

    let summary = RunSummary {
        seed,
        preset: config.preset.clone(),
        ticks: game.tick(),
        outcome: game.session_end().map(|end| end.reason),
        final_score: game.score(),
        max_score,
        platforms_generated: game.map().total_generated(),
        sounds: audio
            .play_counts()
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
    };
    tracing::info!(
        ticks = summary.ticks,
        outcome = summary.outcome.map(|r| r.as_str()).unwrap_or("TimeLimit"),
        won = summary.outcome.is_some_and(|r| r.is_win()),
        score = summary.final_score,
        "Session finished"
    );
    Ok(summary)
}
