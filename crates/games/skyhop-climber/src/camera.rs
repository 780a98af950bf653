use serde::{Deserialize, Serialize};

use crate::scoring::score_from_camera;

/// Vertical camera. `y` is the world-Y of the top screen edge and only
/// ever decreases during play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub y: f32,
    /// Screen-Y above which the player drags the camera up.
    pub scroll_threshold: f32,
}

impl Camera {
    pub fn new(scroll_threshold: f32) -> Self {
        Self {
            y: 0.0,
            scroll_threshold,
        }
    }

    /// Follow the player upward. Only the camera moves; the player's world
    /// position is left alone. Returns the scroll distance (>= 0).
    pub fn update(&mut self, player_y: f32) -> f32 {
        let screen_y = self.world_to_screen(player_y);
        if screen_y < self.scroll_threshold {
            let shift = self.scroll_threshold - screen_y;
            self.y -= shift;
            shift
        } else {
            0.0
        }
    }

    pub fn world_to_screen(&self, world_y: f32) -> f32 {
        world_y - self.y
    }

    pub fn screen_to_world(&self, screen_y: f32) -> f32 {
        screen_y + self.y
    }

    pub fn score(&self) -> u64 {
        score_from_camera(self.y)
    }
}
