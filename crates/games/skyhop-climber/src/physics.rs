use serde::{Deserialize, Serialize};
use skyhop_core::input::HorizontalIntent;

use crate::config::PlayerTuning;

/// The bouncing ball. World coordinates, y grows downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// `y` before the last `integrate`.
    pub prev_y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub radius: f32,
    pub on_ground: bool,
    pub is_jumping: bool,
    pub auto_jump_enabled: bool,
    /// Ticks until another jump may fire; saturates at 0.
    pub jump_cooldown: u32,
    pub tuning: PlayerTuning,
}

impl Player {
    pub fn new(x: f32, y: f32, tuning: PlayerTuning) -> Self {
        Self {
            x,
            y,
            prev_y: y,
            vel_x: 0.0,
            vel_y: 0.0,
            radius: tuning.radius,
            on_ground: false,
            is_jumping: false,
            auto_jump_enabled: tuning.auto_jump_default,
            jump_cooldown: 0,
            tuning,
        }
    }

    /// Y of the bottom of the ball.
    pub fn feet(&self) -> f32 {
        self.y + self.radius
    }

    /// Feet position at the start of the current tick.
    pub fn prev_feet(&self) -> f32 {
        self.prev_y + self.radius
    }

    pub fn set_horizontal_intent(&mut self, direction: HorizontalIntent) {
        match direction {
            // Damping in integrate() slows the ball down.
            HorizontalIntent::None => {},
            dir => self.vel_x = dir.sign() * self.tuning.move_speed,
        }
    }

    /// Jump if grounded. Returns whether the jump happened.
    pub fn request_manual_jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel_y = -self.tuning.jump_strength;
        self.on_ground = false;
        self.is_jumping = true;
        self.jump_cooldown = self.tuning.jump_cooldown_ticks;
        true
    }

    /// Advance one tick. Returns true if an auto-jump fired.
    pub fn integrate(&mut self) -> bool {
        self.prev_y = self.y;
        self.vel_y += self.tuning.gravity;
        self.x += self.vel_x;
        self.y += self.vel_y;
        self.vel_x *= self.tuning.damping;
        self.jump_cooldown = self.jump_cooldown.saturating_sub(1);

        if self.auto_jump_enabled && self.on_ground && self.jump_cooldown == 0 {
            return self.request_manual_jump();
        }
        false
    }

    /// Rest on a platform whose top is at `platform_top`.
    pub fn land(&mut self, platform_top: f32) {
        self.y = platform_top - self.radius;
        self.vel_y = 0.0;
        self.on_ground = true;
        self.is_jumping = false;
    }

    /// Launch upward at `strength`, or the session bounce strength when
    /// `None`. Works regardless of auto-jump.
    pub fn bounce(&mut self, strength: Option<f32>) {
        let strength = strength
            .filter(|s| s.is_finite())
            .unwrap_or(self.tuning.bounce_strength)
            .abs();
        self.vel_y = -strength;
        self.is_jumping = true;
        self.on_ground = false;
        self.jump_cooldown = self.tuning.bounce_cooldown_ticks;
    }

    /// Drop ground contact when the supporting platform is gone.
    pub fn leave_ground(&mut self) {
        self.on_ground = false;
    }

    pub fn toggle_auto_jump(&mut self) -> bool {
        self.auto_jump_enabled = !self.auto_jump_enabled;
        self.auto_jump_enabled
    }

    /// Wrap around the horizontal screen edges.
    pub fn wrap_horizontal(&mut self, screen_width: f32) {
        if self.x < 0.0 {
            self.x = screen_width;
        } else if self.x > screen_width {
            self.x = 0.0;
        }
    }

    /// Highest climb (pixels) a bounce can reach from rest.
    pub fn bounce_apex(&self) -> f32 {
        let v = self.tuning.bounce_strength;
        v * v / (2.0 * self.tuning.gravity)
    }
}
