use serde::{Deserialize, Serialize};

/// Why a play session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalReason {
    /// The player dropped below the bottom of the screen.
    Fall,
    /// The player landed on a dangerous platform.
    Danger,
    /// The camera reached the map's target height.
    Victory,
}

impl TerminalReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalReason::Fall => "Fall",
            TerminalReason::Danger => "Danger",
            TerminalReason::Victory => "Victory",
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, TerminalReason::Victory)
    }
}

/// The terminal event a session raises exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEnd {
    pub reason: TerminalReason,
    pub score: u64,
}

/// Fire-and-forget audio triggers. The core never waits for playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Jump,
    Land,
    Die,
    PlatformMove,
    LevelComplete,
    GameStart,
    Restart,
}

impl SoundCue {
    pub const ALL: [SoundCue; 7] = [
        SoundCue::Jump,
        SoundCue::Land,
        SoundCue::Die,
        SoundCue::PlatformMove,
        SoundCue::LevelComplete,
        SoundCue::GameStart,
        SoundCue::Restart,
    ];

    /// Trigger name as understood by the audio collaborator.
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Land => "land",
            SoundCue::Die => "die",
            SoundCue::PlatformMove => "platform_move",
            SoundCue::LevelComplete => "level_complete",
            SoundCue::GameStart => "game_start",
            SoundCue::Restart => "restart",
        }
    }
}

/// Events emitted by a game during update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCue),
    AutoJumpToggled { enabled: bool },
    GameStarted { seed: u64 },
    SessionEnded(SessionEnd),
}

impl GameEvent {
    pub fn sound(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Sound(cue) => Some(*cue),
            _ => None,
        }
    }

    pub fn session_end(&self) -> Option<SessionEnd> {
        match self {
            GameEvent::SessionEnded(end) => Some(*end),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sound_cue_names_are_unique() {
        let mut names: Vec<_> = SoundCue::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SoundCue::ALL.len());
    }

    #[test]
    fn sound_cue_serde_matches_trigger_name() {
        for cue in SoundCue::ALL {
            let json = serde_json::to_string(&cue).unwrap();
            assert_eq!(json, format!("\"{}\"", cue.as_str()));
        }
    }

    #[test]
    fn event_accessors() {
        let end = SessionEnd {
            reason: TerminalReason::Victory,
            score: 5001,
        };
        assert_eq!(GameEvent::SessionEnded(end).session_end(), Some(end));
        assert_eq!(GameEvent::Sound(SoundCue::Die).sound(), Some(SoundCue::Die));
        assert_eq!(GameEvent::GameStarted { seed: 1 }.sound(), None);
        assert!(TerminalReason::Victory.is_win());
        assert!(!TerminalReason::Danger.is_win());
    }
}
