#[derive(Debug)]
pub enum RunnerError {
    /// The runner config was read but is not usable.
    Config(String),
    Io(std::io::Error),
    UnknownPreset(String),
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(m) => write!(f, "invalid runner config: {m}"),
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::UnknownPreset(key) => write!(f, "unknown map preset '{key}'"),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Config(_) | Self::UnknownPreset(_) => None,
        }
    }
}

impl From<std::io::Error> for RunnerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl RunnerError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::UnknownPreset(_) => 2,
            Self::Io(_) => 1,
        }
    }
}
