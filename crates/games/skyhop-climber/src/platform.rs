use serde::{Deserialize, Serialize};

use crate::config::PlatformTiming;

/// Kind-specific platform state. The set is closed; every dispatch is a
/// single exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    Regular,
    /// Slides horizontally, reflecting at the screen edges.
    Moving { speed: f32, direction: i8 },
    /// Removed once the jump budget reaches zero.
    Disappearing { jumps_remaining: u32 },
    /// Landing here ends the session.
    Dangerous,
}

/// Payload-free discriminant of [`PlatformKind`], used in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformTag {
    Regular,
    Moving,
    Disappearing,
    Dangerous,
}

/// A platform in world coordinates; `y` is the top edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
    /// Set on contact, cleared after `collision_timer` runs out.
    pub colliding: bool,
    pub collision_timer: u32,
    pub bounce_ready: bool,
    pub bounce_cooldown: u32,
    timing: PlatformTiming,
}

impl Platform {
    pub fn new(
        id: u64,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        kind: PlatformKind,
        timing: PlatformTiming,
    ) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            kind,
            colliding: false,
            collision_timer: 0,
            bounce_ready: true,
            bounce_cooldown: 0,
            timing,
        }
    }

    pub fn tag(&self) -> PlatformTag {
        match self.kind {
            PlatformKind::Regular => PlatformTag::Regular,
            PlatformKind::Moving { .. } => PlatformTag::Moving,
            PlatformKind::Disappearing { .. } => PlatformTag::Disappearing,
            PlatformKind::Dangerous => PlatformTag::Dangerous,
        }
    }

    pub fn jumps_remaining(&self) -> Option<u32> {
        match self.kind {
            PlatformKind::Disappearing { jumps_remaining } => Some(jumps_remaining),
            _ => None,
        }
    }

    /// Advance timers and motion by one tick. Returns true when a Moving
    /// platform reflected off a screen edge.
    pub fn update(&mut self, screen_width: f32) -> bool {
        if self.colliding {
            self.collision_timer = self.collision_timer.saturating_sub(1);
            if self.collision_timer == 0 {
                self.colliding = false;
            }
        }
        if !self.bounce_ready {
            self.bounce_cooldown = self.bounce_cooldown.saturating_sub(1);
            if self.bounce_cooldown == 0 {
                self.bounce_ready = true;
            }
        }

        match &mut self.kind {
            PlatformKind::Moving { speed, direction } => {
                self.x += *speed * f32::from(*direction);
                let max_x = (screen_width - self.width).max(0.0);
                if self.x < 0.0 {
                    self.x = 0.0;
                    *direction = 1;
                    true
                } else if self.x > max_x {
                    self.x = max_x;
                    *direction = -1;
                    true
                } else {
                    false
                }
            },
            PlatformKind::Regular
            | PlatformKind::Disappearing { .. }
            | PlatformKind::Dangerous => false,
        }
    }

    /// Register a player contact.
    pub fn on_collision(&mut self) {
        self.colliding = true;
        self.collision_timer = self.timing.collision_flash_ticks.max(1);
        self.bounce_ready = false;
        self.bounce_cooldown = self.timing.bounce_ready_cooldown_ticks.max(1);

        match &mut self.kind {
            PlatformKind::Disappearing { jumps_remaining } => {
                *jumps_remaining = jumps_remaining.saturating_sub(1);
            },
            // Danger is raised by the session from the contact's tag.
            PlatformKind::Regular | PlatformKind::Moving { .. } | PlatformKind::Dangerous => {},
        }
    }

    pub fn should_remove(&self) -> bool {
        matches!(self.kind, PlatformKind::Disappearing { jumps_remaining: 0 })
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}
