use skyhop_core::game_trait::SkyhopGame;
use skyhop_core::input::Intent;

use crate::ClimberGame;
use crate::physics::Player;
use crate::platform::{Platform, PlatformTag};

/// Horizontal distance (pixels) considered "on target".
const STEER_DEADZONE: f32 = 8.0;
/// Fraction of the remaining rise the bot trusts when picking a target.
const REACH_MARGIN: f32 = 0.9;
/// Ticks of descent to look ahead for dangerous platforms.
const DANGER_LOOK_AHEAD_TICKS: f32 = 12.0;
/// Minimum look-ahead distance below the feet (pixels).
const DANGER_MIN_LOOK_AHEAD: f32 = 40.0;

/// Generate this tick's intents for an autopilot player.
///
/// Rising: steer toward the lowest safe platform still reachable above the
/// feet. Falling: steer onto the nearest safe platform below, dodging any
/// dangerous platform in the way.
pub fn generate_bot_intents(game: &ClimberGame) -> Vec<Intent> {
    if game.is_session_over() {
        return Vec::new();
    }
    let player = game.player();
    let platforms = game.map().platforms();
    let width = game.settings().world.screen_width;

    let mut intents = Vec::with_capacity(2);
    let steer = match danger_below(player, platforms) {
        Some(danger) => away_from(player.x, danger.center_x(), width),
        None => match pick_target(player, platforms, width) {
            Some(target) => toward(player.x, target.center_x(), width),
            None => Intent::MoveNone,
        },
    };
    intents.push(steer);

    if player.on_ground && !player.auto_jump_enabled {
        intents.push(Intent::JumpPressed);
    }
    intents
}

/// Height the player can still gain before its apex.
fn remaining_rise(player: &Player) -> f32 {
    if player.on_ground {
        return player.bounce_apex();
    }
    if player.vel_y < 0.0 {
        player.vel_y * player.vel_y / (2.0 * player.tuning.gravity)
    } else {
        0.0
    }
}

fn pick_target<'a>(player: &Player, platforms: &'a [Platform], width: f32) -> Option<&'a Platform> {
    let feet = player.feet();
    let reach = remaining_rise(player) * REACH_MARGIN;
    let dist = |p: &Platform| wrapped_dx(player.x, p.center_x(), width).abs();
    let safe = || platforms.iter().filter(|p| p.tag() != PlatformTag::Dangerous);

    // Lowest platform above the feet that the current rise clears.
    let above = safe()
        .filter(|p| p.y < feet && feet - p.y < reach)
        .max_by(|a, b| a.y.total_cmp(&b.y).then(dist(*b).total_cmp(&dist(*a))));
    if above.is_some() {
        return above;
    }

    // Otherwise the nearest platform below to land on.
    safe()
        .filter(|p| p.y >= feet)
        .min_by(|a, b| a.y.total_cmp(&b.y).then(dist(*a).total_cmp(&dist(*b))))
}

fn danger_below<'a>(player: &Player, platforms: &'a [Platform]) -> Option<&'a Platform> {
    if player.vel_y <= 0.0 {
        return None;
    }
    let feet = player.feet();
    let look_ahead = (player.vel_y * DANGER_LOOK_AHEAD_TICKS).max(DANGER_MIN_LOOK_AHEAD);
    platforms
        .iter()
        .filter(|p| p.tag() == PlatformTag::Dangerous)
        .filter(|p| p.y >= feet - 2.0 && p.y <= feet + look_ahead)
        .filter(|p| {
            player.x + player.radius > p.x - STEER_DEADZONE
                && player.x - player.radius < p.x + p.width + STEER_DEADZONE
        })
        .min_by(|a, b| a.y.total_cmp(&b.y).then(a.id.cmp(&b.id)))
}

/// Signed shortest horizontal distance from `from` to `to` on a wrapping
/// screen of the given width.
pub fn wrapped_dx(from: f32, to: f32, width: f32) -> f32 {
    let mut dx = to - from;
    if dx > width / 2.0 {
        dx -= width;
    } else if dx < -width / 2.0 {
        dx += width;
    }
    dx
}

fn toward(x: f32, target_x: f32, width: f32) -> Intent {
    let dx = wrapped_dx(x, target_x, width);
    if dx > STEER_DEADZONE {
        Intent::MoveRight
    } else if dx < -STEER_DEADZONE {
        Intent::MoveLeft
    } else {
        Intent::MoveNone
    }
}

fn away_from(x: f32, hazard_x: f32, width: f32) -> Intent {
    if wrapped_dx(x, hazard_x, width) >= 0.0 {
        Intent::MoveLeft
    } else {
        Intent::MoveRight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClimberConfig, GameParams};
    use crate::map::Map;
    use crate::platform::PlatformKind;

    fn bare_game() -> ClimberGame {
        let mut game = ClimberGame::with_config(ClimberConfig::default());
        game.new_game(&GameParams::default(), 3);
        game.map = Map::new(game.settings.clone(), 3);
        game
    }

    #[test]
    fn wrapped_distance_takes_short_way() {
        assert_eq!(wrapped_dx(10.0, 790.0, 800.0), -20.0);
        assert_eq!(wrapped_dx(790.0, 10.0, 800.0), 20.0);
        assert_eq!(wrapped_dx(100.0, 300.0, 800.0), 200.0);
    }

    #[test]
    fn steers_toward_reachable_platform() {
        let mut game = bare_game();
        game.map.insert(600.0, 300.0, 100.0, PlatformKind::Regular);
        game.player.x = 400.0;
        game.player.y = 400.0;
        game.player.vel_y = -13.0;
        assert_eq!(generate_bot_intents(&game), vec![Intent::MoveRight]);
    }

    #[test]
    fn ignores_platforms_out_of_reach() {
        let mut game = bare_game();
        game.map.insert(600.0, 300.0, 100.0, PlatformKind::Regular);
        game.map.insert(100.0, -200.0, 100.0, PlatformKind::Regular);
        game.player.x = 400.0;
        game.player.y = 400.0;
        game.player.vel_y = -13.0;
        // -200 is 615px above the feet, far past the apex.
        assert_eq!(generate_bot_intents(&game), vec![Intent::MoveRight]);
    }

    #[test]
    fn prefers_lowest_platform_above() {
        let mut game = bare_game();
        game.map.insert(600.0, 300.0, 100.0, PlatformKind::Regular);
        game.map.insert(100.0, 340.0, 100.0, PlatformKind::Regular);
        game.player.x = 400.0;
        game.player.y = 400.0;
        game.player.vel_y = -13.0;
        assert_eq!(generate_bot_intents(&game), vec![Intent::MoveLeft]);
    }

    #[test]
    fn skips_dangerous_targets() {
        let mut game = bare_game();
        game.map.insert(100.0, 340.0, 100.0, PlatformKind::Dangerous);
        game.map.insert(600.0, 300.0, 100.0, PlatformKind::Regular);
        game.player.x = 400.0;
        game.player.y = 400.0;
        game.player.vel_y = -13.0;
        assert_eq!(generate_bot_intents(&game), vec![Intent::MoveRight]);
    }

    #[test]
    fn dodges_danger_while_falling() {
        let mut game = bare_game();
        game.map.insert(380.0, 450.0, 100.0, PlatformKind::Dangerous);
        game.map.insert(100.0, 500.0, 100.0, PlatformKind::Regular);
        game.player.x = 450.0;
        game.player.y = 400.0;
        game.player.vel_y = 4.0;
        // Danger centre (430) is left of the player: move right.
        assert_eq!(generate_bot_intents(&game), vec![Intent::MoveRight]);
    }

    #[test]
    fn lands_on_platform_below_when_falling() {
        let mut game = bare_game();
        game.map.insert(100.0, 500.0, 100.0, PlatformKind::Regular);
        game.player.x = 400.0;
        game.player.y = 300.0;
        game.player.vel_y = 4.0;
        assert_eq!(generate_bot_intents(&game), vec![Intent::MoveLeft]);
    }

    #[test]
    fn presses_jump_when_auto_jump_is_off() {
        let mut game = bare_game();
        game.player.auto_jump_enabled = false;
        game.player.land(400.0);
        let intents = generate_bot_intents(&game);
        assert!(intents.contains(&Intent::JumpPressed));

        game.player.auto_jump_enabled = true;
        assert!(!generate_bot_intents(&game).contains(&Intent::JumpPressed));
    }

    #[test]
    fn no_intents_after_session_end() {
        let mut game = bare_game();
        game.player.y = 10_000.0;
        game.step();
        assert!(game.is_session_over());
        assert!(generate_bot_intents(&game).is_empty());
    }

    #[test]
    fn autopilot_run_is_deterministic() {
        let run = |seed: u64| {
            let mut game = ClimberGame::with_config(ClimberConfig::default());
            game.new_game(&GameParams::default(), seed);
            for _ in 0..1200 {
                for intent in generate_bot_intents(&game) {
                    game.apply_intent(intent);
                }
                game.step();
            }
            game.snapshot()
        };
        assert_eq!(run(8), run(8));
    }
}
