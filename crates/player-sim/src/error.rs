use std::fmt::{Display, Formatter};

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, SimPlayerError>;

/// Error type for simulated player control operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SimPlayerError {
    NotLoaded,
    NotReady,
    Disposed,
    InvalidPosition(f64),
}

impl Display for SimPlayerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotLoaded => write!(f, "no video loaded"),
            Self::NotReady => write!(f, "player has not signalled ready"),
            Self::Disposed => write!(f, "player already disposed"),
            Self::InvalidPosition(seconds) => {
                write!(f, "invalid playback position: {seconds}")
            }
        }
    }
}

impl std::error::Error for SimPlayerError {}
