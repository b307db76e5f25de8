//! UI-agnostic editing engine for recipe step/video timelines.

pub mod debounce;
pub mod editor;
pub mod error;
pub mod playback;
pub mod remote;
pub mod step;
pub mod timefmt;

pub use editor::{
    Command, Editor, EditorSnapshot, Event, SLIDER_COMMIT_QUIET_PERIOD, StepSummary,
};
pub use error::{EditorError, Result};
pub use playback::{Playback, PlayerEvent, SimulatedVideoPlayer, VideoPlayer};
pub use remote::{RemoteStep, steps_from_json, steps_from_remote, steps_to_remote};
pub use step::{DEFAULT_STEP_SPAN_SECONDS, Step, StepId, StepList, TimeWindow};
pub use timefmt::{format_hours, format_minutes};
