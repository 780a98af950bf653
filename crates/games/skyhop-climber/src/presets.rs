use serde::{Deserialize, Serialize};

use crate::config::GameParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }
}

/// A named parameter bundle offered on the map selection screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPreset {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub params: GameParams,
}

/// The four official maps, easiest first.
pub fn official_presets() -> Vec<MapPreset> {
    vec![
        MapPreset {
            key: "meadow",
            name: "Meadow",
            description: "Basic level with standard platforms. Perfect for beginners!",
            difficulty: Difficulty::Easy,
            params: GameParams {
                platform_density: 2.5,
                moving_pct: 10.0,
                disappearing_pct: 5.0,
                dangerous_pct: 0.0,
                ..Default::default()
            },
        },
        MapPreset {
            key: "breeze",
            name: "Breeze",
            description: "Faster platforms and moving obstacles. Test your reflexes!",
            difficulty: Difficulty::Medium,
            params: GameParams {
                player_speed: 6.0,
                moving_pct: 40.0,
                disappearing_pct: 10.0,
                dangerous_pct: 5.0,
                ..Default::default()
            },
        },
        MapPreset {
            key: "crumble",
            name: "Crumble",
            description: "Challenging level with disappearing platforms. Timing is key!",
            difficulty: Difficulty::Hard,
            params: GameParams {
                platform_density: 1.8,
                moving_pct: 15.0,
                disappearing_pct: 45.0,
                dangerous_pct: 10.0,
                ..Default::default()
            },
        },
        MapPreset {
            key: "gauntlet",
            name: "Gauntlet",
            description: "Ultimate challenge with all platform types and obstacles!",
            difficulty: Difficulty::Expert,
            params: GameParams {
                gravity: 0.6,
                jump_strength: 11.0,
                platform_density: 1.6,
                moving_pct: 30.0,
                disappearing_pct: 25.0,
                dangerous_pct: 20.0,
                ..Default::default()
            },
        },
    ]
}

/// Look up an official map by key (case-insensitive).
pub fn find_preset(key: &str) -> Option<MapPreset> {
    official_presets()
        .into_iter()
        .find(|p| p.key.eq_ignore_ascii_case(key))
}
