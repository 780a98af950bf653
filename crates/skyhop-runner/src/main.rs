use std::process::ExitCode;

use skyhop_climber::ClimberGame;
use skyhop_runner::audio::AudioEventQueue;
use skyhop_runner::config::RunnerConfig;
use skyhop_runner::error::RunnerError;
use skyhop_runner::game_loop::{RunSummary, run_session};

fn main() -> ExitCode {
    skyhop_runner::init_tracing();
    tracing::info!("Skyhop runner starting");

    match run() {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            },
            Err(e) => {
                tracing::error!("Failed to encode summary: {e}");
                ExitCode::FAILURE
            },
        },
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(e.exit_code())
        },
    }
}

fn run() -> Result<RunSummary, RunnerError> {
    let config = RunnerConfig::load()?;
    config.validate()?;
    let mut game = ClimberGame::new();
    let mut audio = AudioEventQueue::new(config.audio.clone());
    run_session(&mut game, &config, &mut audio)
}
