//! Headless smoke tests: run whole sessions through the runner loop with the
//! autopilot and check the summary stays consistent with the game.

use skyhop_climber::ClimberGame;
use skyhop_climber::config::ClimberConfig;
use skyhop_core::events::TerminalReason;
use skyhop_core::game_trait::SkyhopGame;
use skyhop_runner::audio::{AudioEventQueue, AudioSettings};
use skyhop_runner::config::{ParamOverrides, RunnerConfig};
use skyhop_runner::error::RunnerError;
use skyhop_runner::game_loop::run_session;

fn runner_config(seed: u64, max_ticks: u64) -> RunnerConfig {
    RunnerConfig {
        seed: Some(seed),
        max_ticks,
        ..Default::default()
    }
}

fn run(config: &RunnerConfig) -> (ClimberGame, skyhop_runner::game_loop::RunSummary) {
    let mut game = ClimberGame::with_config(ClimberConfig::default());
    let mut audio = AudioEventQueue::new(config.audio.clone());
    let summary = run_session(&mut game, config, &mut audio).unwrap();
    (game, summary)
}

#[test]
fn session_respects_tick_budget() {
    let config = runner_config(42, 300);
    let (game, summary) = run(&config);
    assert!(summary.ticks <= 300);
    assert_eq!(summary.ticks, game.tick());
    assert_eq!(summary.seed, 42);
    if summary.outcome.is_none() {
        assert_eq!(summary.ticks, 300);
    }
    assert!(summary.max_score >= summary.final_score);
    assert!(summary.platforms_generated >= 11);
    assert_eq!(summary.sounds.get("game_start"), Some(&1));
}

#[test]
fn same_seed_same_summary() {
    let config = runner_config(7, 2_000);
    let (_, a) = run(&config);
    let (_, b) = run(&config);
    assert_eq!(a, b);
}

#[test]
fn ended_session_reports_its_reason() {
    // Every generated platform is dangerous, so the first landing above the
    // starter ends the run unless the player falls first.
    let config = RunnerConfig {
        params: ParamOverrides {
            moving_pct: Some(0.0),
            disappearing_pct: Some(0.0),
            dangerous_pct: Some(100.0),
            ..Default::default()
        },
        autopilot: false,
        ..runner_config(3, 20_000)
    };
    let (game, summary) = run(&config);
    let outcome = summary.outcome.expect("session must end");
    assert!(matches!(outcome, TerminalReason::Danger | TerminalReason::Fall));
    assert_eq!(game.session_end().map(|e| e.reason), Some(outcome));
    assert_eq!(game.session_end().map(|e| e.score), Some(summary.final_score));
}

#[test]
fn muted_audio_counts_nothing() {
    let config = RunnerConfig {
        audio: AudioSettings {
            muted: true,
            ..Default::default()
        },
        ..runner_config(5, 200)
    };
    let (_, summary) = run(&config);
    assert!(summary.sounds.is_empty());
}

#[test]
fn invalid_config_is_an_error() {
    let config = RunnerConfig {
        preset: "nowhere".to_string(),
        ..runner_config(1, 10)
    };
    let mut game = ClimberGame::with_config(ClimberConfig::default());
    let mut audio = AudioEventQueue::default();
    let err = run_session(&mut game, &config, &mut audio).unwrap_err();
    assert!(matches!(err, RunnerError::UnknownPreset(_)));
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn summary_serializes_to_json() {
    let (_, summary) = run(&runner_config(9, 120));
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["seed"], 9);
    assert_eq!(json["preset"], "meadow");
    assert!(json["ticks"].as_u64().is_some());
}
