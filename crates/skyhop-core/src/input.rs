use serde::{Deserialize, Serialize};

/// Discrete intents delivered by the input collaborator.
///
/// The core never polls devices; a key press becomes one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    MoveLeft,
    MoveRight,
    MoveNone,
    JumpPressed,
    ToggleAutoJump,
}

/// Horizontal movement direction requested for a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalIntent {
    Left,
    Right,
    #[default]
    None,
}

impl HorizontalIntent {
    /// Signed unit direction (-1, 0, +1).
    pub fn sign(&self) -> f32 {
        match self {
            HorizontalIntent::Left => -1.0,
            HorizontalIntent::Right => 1.0,
            HorizontalIntent::None => 0.0,
        }
    }
}

/// Intents gathered between two simulation ticks.
///
/// Transient flags (jump, toggle) latch until consumed so that a press in
/// frame N is not lost when frame N+1 arrives before the tick runs. The
/// movement direction is continuous and always takes the latest value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickIntents {
    pub horizontal: HorizontalIntent,
    pub jump: bool,
    /// Number of toggle presses; only its parity matters.
    pub toggle_auto_jump: u8,
}

impl TickIntents {
    pub fn push(&mut self, intent: Intent) {
        match intent {
            Intent::MoveLeft => self.horizontal = HorizontalIntent::Left,
            Intent::MoveRight => self.horizontal = HorizontalIntent::Right,
            Intent::MoveNone => self.horizontal = HorizontalIntent::None,
            Intent::JumpPressed => self.jump = true,
            Intent::ToggleAutoJump => {
                self.toggle_auto_jump = self.toggle_auto_jump.wrapping_add(1);
            },
        }
    }

    /// Take the transient flags, leaving the held direction in place.
    pub fn take(&mut self) -> TickIntents {
        let taken = self.clone();
        self.jump = false;
        self.toggle_auto_jump = 0;
        taken
    }

    pub fn wants_toggle(&self) -> bool {
        self.toggle_auto_jump % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_takes_latest_value() {
        let mut intents = TickIntents::default();
        intents.push(Intent::MoveLeft);
        intents.push(Intent::MoveRight);
        assert_eq!(intents.horizontal, HorizontalIntent::Right);
        intents.push(Intent::MoveNone);
        assert_eq!(intents.horizontal, HorizontalIntent::None);
    }

    #[test]
    fn jump_latches_until_taken() {
        let mut intents = TickIntents::default();
        intents.push(Intent::JumpPressed);
        intents.push(Intent::MoveLeft);
        let taken = intents.take();
        assert!(taken.jump);
        assert!(!intents.jump, "jump must reset after take");
        assert_eq!(
            intents.horizontal,
            HorizontalIntent::Left,
            "held direction survives take"
        );
    }

    #[test]
    fn double_toggle_cancels_out() {
        let mut intents = TickIntents::default();
        intents.push(Intent::ToggleAutoJump);
        assert!(intents.wants_toggle());
        intents.push(Intent::ToggleAutoJump);
        assert!(!intents.wants_toggle());
    }

    #[test]
    fn horizontal_sign() {
        assert_eq!(HorizontalIntent::Left.sign(), -1.0);
        assert_eq!(HorizontalIntent::Right.sign(), 1.0);
        assert_eq!(HorizontalIntent::None.sign(), 0.0);
    }
}
