pub mod events;
pub mod game_trait;
pub mod input;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::events::GameEvent;
    use crate::game_trait::{GameConfig, SkyhopGame};
    use crate::input::Intent;

    /// Create a default GameConfig with the given seed and no custom params.
    pub fn default_config(seed: u64) -> GameConfig {
        GameConfig::with_seed(seed)
    }

    /// Run N frames of `dt` seconds, returning all accumulated events.
    pub fn run_game_ticks(game: &mut dyn SkyhopGame, n: usize, dt: f32) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt));
        }
        all_events
    }

    /// Duration of exactly one simulation tick for `game`.
    pub fn one_tick(game: &dyn SkyhopGame) -> f32 {
        1.0 / game.tick_rate()
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed(game: &dyn SkyhopGame, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every SkyhopGame implementation must pass these. Game crates call them
    // from their own #[cfg(test)] modules with a concrete game instance.

    /// After init(), serialize_state() must return non-empty bytes and the
    /// session must not be over yet.
    pub fn contract_init_creates_state(game: &mut dyn SkyhopGame) {
        game.init(&default_config(42));
        let state = game.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
        assert!(
            !game.is_session_over(),
            "A fresh session must not start in a terminal state"
        );
    }

    /// update() with at least one tick of dt must change state.
    pub fn contract_update_advances_state(game: &mut dyn SkyhopGame) {
        game.init(&default_config(42));
        let before = game.serialize_state();
        let dt = one_tick(game);
        game.update(dt);
        assert_game_state_changed(game, &before);
    }

    /// An intent followed by update() must change state.
    pub fn contract_intent_changes_state(game: &mut dyn SkyhopGame, intent: Intent) {
        game.init(&default_config(42));
        let before = game.serialize_state();
        game.apply_intent(intent);
        let dt = one_tick(game);
        game.update(dt);
        assert_game_state_changed(game, &before);
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn SkyhopGame) {
        game.init(&default_config(42));
        let dt = one_tick(game);
        game.pause();
        assert!(game.is_paused());
        let before = game.serialize_state();
        let events = game.update(dt * 4.0);
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");
        assert!(events.is_empty(), "No events while paused");

        game.resume();
        game.update(dt);
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// retry() must produce a live session again.
    pub fn contract_retry_restarts(game: &mut dyn SkyhopGame) {
        game.init(&default_config(42));
        let dt = one_tick(game);
        run_game_ticks(game, 30, dt);
        game.retry();
        assert!(!game.is_session_over(), "retry must clear the terminal state");
        assert!(!game.is_paused(), "retry must not start paused");
    }
}
