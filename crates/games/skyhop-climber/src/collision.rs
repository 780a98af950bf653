use serde::{Deserialize, Serialize};

use crate::config::CollisionConfig;
use crate::map::Map;
use crate::physics::Player;
use crate::platform::{Platform, PlatformTag};

/// Outcome of a landing resolved this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub platform_id: u64,
    pub tag: PlatformTag,
    /// The player was launched upward by the landing.
    pub bounced: bool,
    /// The platform used up its last jump and left the map.
    pub removed: bool,
}

/// Whether `player` is landing on top of `platform` this tick.
pub fn is_landing(player: &Player, platform: &Platform, tol: &CollisionConfig) -> bool {
    if player.vel_y < tol.rising_cutoff {
        return false;
    }
    let feet = player.feet();
    if feet < platform.y - tol.top_tolerance || feet <= platform.y {
        return false;
    }
    let horizontal = player.x + player.radius > platform.x
        && player.x - player.radius < platform.x + platform.width;
    if !horizontal {
        return false;
    }
    let in_band = player.y - player.radius < platform.y + platform.height
        && feet <= platform.y + tol.landing_tolerance;
    in_band || (tol.swept_landing && player.prev_feet() <= platform.y)
}

/// Index of the platform the player lands on, if any.
///
/// The topmost qualifying platform wins; equal heights go to the lower id so
/// the result never depends on insertion order.
pub fn find_landing(player: &Player, platforms: &[Platform], tol: &CollisionConfig) -> Option<usize> {
    platforms
        .iter()
        .enumerate()
        .filter(|(_, p)| is_landing(player, p, tol))
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then(a.id.cmp(&b.id)))
        .map(|(idx, _)| idx)
}

/// Land the player on the winning platform, bounce, and drop exhausted
/// platforms from the map.
pub fn resolve(player: &mut Player, map: &mut Map, tol: &CollisionConfig) -> Option<Contact> {
    let idx = find_landing(player, map.platforms(), tol)?;
    let was_falling = player.vel_y > 0.0;

    let platform = map.platform_mut(idx)?;
    let bounce_ready = platform.bounce_ready;
    let platform_top = platform.y;
    platform.on_collision();
    let platform_id = platform.id;
    let tag = platform.tag();
    let exhausted = platform.should_remove();

    player.land(platform_top);
    let bounced = was_falling || bounce_ready;
    if bounced {
        player.bounce(None);
    }

    let removed = exhausted && map.remove_platform(platform_id);
    tracing::trace!(platform_id, ?tag, bounced, removed, "Landed");
    Some(Contact {
        platform_id,
        tag,
        bounced,
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClimberConfig, GameParams, SessionSettings};
    use crate::platform::{PlatformKind, PlatformTag};

    fn settings() -> SessionSettings {
        ClimberConfig::default().resolve(&GameParams::default())
    }

    fn player_at(x: f32, feet: f32, vel_y: f32) -> Player {
        let mut p = Player::new(x, 0.0, settings().player);
        p.y = feet - p.radius;
        p.vel_y = vel_y;
        p
    }

    fn empty_map() -> Map {
        Map::new(settings(), 1)
    }

    #[test]
    fn lands_within_tolerance() {
        let mut map = empty_map();
        map.insert(100.0, 300.0, 100.0, PlatformKind::Regular);
        let tol = CollisionConfig::default();
        assert!(find_landing(&player_at(150.0, 305.0, 3.0), map.platforms(), &tol).is_some());
        assert!(find_landing(&player_at(150.0, 315.0, 3.0), map.platforms(), &tol).is_some());
        // Too deep: passing through from the side or below.
        assert!(find_landing(&player_at(150.0, 316.0, 3.0), map.platforms(), &tol).is_none());
        // Feet exactly on top do not overlap yet.
        assert!(find_landing(&player_at(150.0, 300.0, 3.0), map.platforms(), &tol).is_none());
    }

    #[test]
    fn rising_fast_never_lands() {
        let mut map = empty_map();
        map.insert(100.0, 300.0, 100.0, PlatformKind::Regular);
        let tol = CollisionConfig::default();
        assert!(find_landing(&player_at(150.0, 305.0, -2.5), map.platforms(), &tol).is_none());
        assert!(find_landing(&player_at(150.0, 305.0, -2.0), map.platforms(), &tol).is_some());
    }

    #[test]
    fn horizontal_miss() {
        let mut map = empty_map();
        map.insert(100.0, 300.0, 100.0, PlatformKind::Regular);
        let tol = CollisionConfig::default();
        assert!(find_landing(&player_at(86.0, 305.0, 3.0), map.platforms(), &tol).is_some());
        assert!(find_landing(&player_at(85.0, 305.0, 3.0), map.platforms(), &tol).is_none());
        assert!(find_landing(&player_at(214.0, 305.0, 3.0), map.platforms(), &tol).is_some());
        assert!(find_landing(&player_at(215.0, 305.0, 3.0), map.platforms(), &tol).is_none());
    }

    #[test]
    fn fast_fall_skips_band_without_swept_landing() {
        let mut map = empty_map();
        map.insert(100.0, 400.0, 100.0, PlatformKind::Regular);
        let mut player = player_at(150.0, 399.0, 17.0);
        player.prev_y = player.y;
        player.integrate();
        assert!((player.feet() - 416.5).abs() < 1e-4);

        let tol = CollisionConfig::default();
        assert!(!tol.swept_landing);
        assert!(resolve(&mut player, &mut map, &tol).is_none());
        assert!(!player.on_ground);
        assert_eq!(player.vel_y, 17.5);
    }

    #[test]
    fn swept_landing_catches_fast_fall() {
        let mut map = empty_map();
        map.insert(100.0, 400.0, 100.0, PlatformKind::Regular);
        let mut player = player_at(150.0, 399.0, 17.0);
        player.prev_y = player.y;
        player.integrate();

        let tol = CollisionConfig {
            swept_landing: true,
            ..Default::default()
        };
        let contact = resolve(&mut player, &mut map, &tol).unwrap();
        assert!(contact.bounced);
        assert!(player.vel_y < 0.0);
        assert_eq!(player.feet(), 400.0);
    }

    #[test]
    fn swept_landing_needs_feet_above_top_before_tick() {
        let mut map = empty_map();
        map.insert(100.0, 400.0, 100.0, PlatformKind::Regular);
        // Started the tick already below the top: passing up through or
        // dropping out the bottom is not a landing.
        let mut player = player_at(150.0, 420.0, 4.0);
        player.prev_y = player.y - 4.0;
        let tol = CollisionConfig {
            swept_landing: true,
            ..Default::default()
        };
        assert!(find_landing(&player, map.platforms(), &tol).is_none());
    }

    #[test]
    fn swept_landing_picks_first_top_crossed() {
        let mut map = empty_map();
        map.insert(100.0, 430.0, 100.0, PlatformKind::Regular);
        let upper = map.insert(100.0, 405.0, 100.0, PlatformKind::Regular);
        let mut player = player_at(150.0, 399.0, 40.0);
        player.prev_y = player.y;
        player.integrate();
        let tol = CollisionConfig {
            swept_landing: true,
            ..Default::default()
        };
        let contact = resolve(&mut player, &mut map, &tol).unwrap();
        assert_eq!(contact.platform_id, upper);
    }

    #[test]
    fn topmost_platform_wins() {
        let mut map = empty_map();
        map.insert(100.0, 310.0, 100.0, PlatformKind::Regular);
        map.insert(100.0, 300.0, 100.0, PlatformKind::Regular);
        let tol = CollisionConfig::default();
        let idx = find_landing(&player_at(150.0, 312.0, 3.0), map.platforms(), &tol).unwrap();
        assert_eq!(map.platforms()[idx].y, 300.0);
    }

    #[test]
    fn falling_player_bounces() {
        let mut map = empty_map();
        map.insert(100.0, 300.0, 100.0, PlatformKind::Regular);
        let mut player = player_at(150.0, 305.0, 4.0);
        player.auto_jump_enabled = false;
        let contact = resolve(&mut player, &mut map, &CollisionConfig::default()).unwrap();
        assert!(contact.bounced);
        assert!(player.vel_y < 0.0);
        assert_eq!(player.y, 300.0 - player.radius);
        assert!(map.platforms()[0].colliding);
        assert!(!map.platforms()[0].bounce_ready);
    }

    #[test]
    fn resting_contact_after_cooldown_lands_without_bounce() {
        let mut map = empty_map();
        map.insert(100.0, 300.0, 100.0, PlatformKind::Regular);
        let tol = CollisionConfig::default();
        let mut player = player_at(150.0, 305.0, 4.0);
        resolve(&mut player, &mut map, &tol).unwrap();
        // Same contact again while the platform is still on cooldown and the
        // player is not falling: no double trigger.
        let mut resting = player_at(150.0, 301.0, 0.0);
        let contact = resolve(&mut resting, &mut map, &tol).unwrap();
        assert!(!contact.bounced);
        assert_eq!(resting.vel_y, 0.0);
        assert!(resting.on_ground);
    }

    #[test]
    fn disappearing_removed_after_budget() {
        let mut map = empty_map();
        let id = map.insert(100.0, 300.0, 100.0, PlatformKind::Disappearing { jumps_remaining: 2 });
        let tol = CollisionConfig::default();

        let mut player = player_at(150.0, 305.0, 4.0);
        let first = resolve(&mut player, &mut map, &tol).unwrap();
        assert!(!first.removed);
        assert_eq!(map.platforms()[0].jumps_remaining(), Some(1));

        let mut player = player_at(150.0, 305.0, 4.0);
        let second = resolve(&mut player, &mut map, &tol).unwrap();
        assert!(second.removed);
        assert_eq!(second.platform_id, id);
        assert!(map.platforms().is_empty());
    }

    #[test]
    fn dangerous_contact_is_tagged() {
        let mut map = empty_map();
        map.insert(100.0, 300.0, 100.0, PlatformKind::Dangerous);
        let mut player = player_at(150.0, 305.0, 4.0);
        let contact = resolve(&mut player, &mut map, &CollisionConfig::default()).unwrap();
        assert_eq!(contact.tag, PlatformTag::Dangerous);
        assert!(!contact.removed);
        assert_eq!(map.platforms().len(), 1);
    }

    #[test]
    fn no_contact_leaves_player_untouched() {
        let mut map = empty_map();
        map.insert(500.0, 300.0, 100.0, PlatformKind::Regular);
        let mut player = player_at(150.0, 305.0, 4.0);
        let before = player.clone();
        assert!(resolve(&mut player, &mut map, &CollisionConfig::default()).is_none());
        assert_eq!(player, before);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn bounce_from_ground_contact_always_launches(
                vel_y in 0.0f32..12.0,
                depth in 0.5f32..14.5,
                auto in any::<bool>(),
            ) {
                let mut map = empty_map();
                map.insert(100.0, 300.0, 100.0, PlatformKind::Regular);
                let mut player = player_at(150.0, 300.0 + depth, vel_y);
                player.auto_jump_enabled = auto;
                let contact = resolve(&mut player, &mut map, &CollisionConfig::default());
                prop_assert!(contact.is_some_and(|c| c.bounced));
                prop_assert!(player.vel_y < 0.0);
            }

            #[test]
            fn tie_break_ignores_insertion_order(
                y_a in 295.0f32..310.0,
                y_b in 295.0f32..310.0,
                swap in any::<bool>(),
            ) {
                let player = player_at(150.0, 311.0, 3.0);
                let tol = CollisionConfig::default();
                let mut map = empty_map();
                let (first, second) = if swap { (y_b, y_a) } else { (y_a, y_b) };
                map.insert(100.0, first, 100.0, PlatformKind::Regular);
                map.insert(100.0, second, 100.0, PlatformKind::Regular);
                let qualifying: Vec<f32> = map
                    .platforms()
                    .iter()
                    .filter(|p| is_landing(&player, p, &tol))
                    .map(|p| p.y)
                    .collect();
                let winner = find_landing(&player, map.platforms(), &tol)
                    .map(|idx| map.platforms()[idx].y);
                let expected = qualifying.into_iter().min_by(f32::total_cmp);
                prop_assert_eq!(winner, expected);
            }

            #[test]
            fn disappearing_survives_until_kth_contact(k in 1u32..6) {
                let mut map = empty_map();
                map.insert(100.0, 300.0, 100.0, PlatformKind::Disappearing { jumps_remaining: k });
                let tol = CollisionConfig::default();
                for hit in 1..=k {
                    prop_assert_eq!(map.platforms().len(), 1);
                    let mut player = player_at(150.0, 305.0, 4.0);
                    let contact = resolve(&mut player, &mut map, &tol).unwrap();
                    prop_assert_eq!(contact.removed, hit == k);
                }
                prop_assert!(map.platforms().is_empty());
            }
        }
    }
}
