use std::fmt::{Display, Formatter};

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors produced at the editor's fallible seams.
///
/// Editing commands themselves are total: refused operations are logged
/// no-ops. Errors surface only from player backends and remote payload
/// decoding.
#[derive(Debug)]
pub enum EditorError {
    Player(player_sim::SimPlayerError),
    PlayerBackend {
        context: &'static str,
        message: String,
    },
    RemotePayload {
        source: serde_json::Error,
    },
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player(err) => write!(f, "video player error: {err}"),
            Self::PlayerBackend { context, message } => write!(f, "{context}: {message}"),
            Self::RemotePayload { source } => {
                write!(f, "remote step payload decode failed ({source})")
            }
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Player(err) => Some(err),
            Self::RemotePayload { source } => Some(source),
            _ => None,
        }
    }
}

impl From<player_sim::SimPlayerError> for EditorError {
    fn from(value: player_sim::SimPlayerError) -> Self {
        Self::Player(value)
    }
}
