use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::debounce::DebounceTimer;
use crate::playback::{Playback, PlayerEvent, SimulatedVideoPlayer, VideoPlayer};
use crate::step::{DEFAULT_STEP_SPAN_SECONDS, Step, StepId, StepList, TimeWindow};
use player_sim::SimPlayer;

/// Quiet period after the last slider movement before the staged time range
/// is written to the current step.
pub const SLIDER_COMMIT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Commands accepted by the editor.
///
/// Every command is total: an operation that would break an invariant
/// (deleting the last step, navigating past a boundary, editing before the
/// steps have loaded) is logged and refused rather than returned as an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replaces the whole collection and selects the first step.
    LoadSteps { steps: Vec<Step> },
    /// Appends a placeholder step with id `max + 1`.
    ///
    /// The new list is published immediately; the cursor advance stays
    /// pending until [`Command::CompleteTransition`], so consumers observe
    /// the grown list before the selection moves.
    AddStep,
    /// Removes the selected step unless it is the last one remaining.
    DeleteCurrentStep,
    /// Overwrites every step's window with the fixed five-second grid.
    ResetAllSteps,
    /// Rewrites the selected step's description.
    UpdateDescription { text: String },
    /// Stages a live slider window without persisting it.
    ///
    /// The write lands on the current step once the quiet period elapses;
    /// rapid re-stages collapse into a single trailing commit.
    StageTimeRange { start: f64, end: f64 },
    /// Acknowledges a cursor transition; the consumer calls this once its
    /// re-render has settled.
    CompleteTransition,
    NextStep,
    PrevStep,
    /// Single play/pause toggle, deferred while the player is not ready.
    SetPlaying { playing: bool },
    /// Acquires the player for a hosted video; failure leaves the video
    /// surface inert.
    BindVideo { video_id: String },
}

/// Events emitted by the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StepsChanged(EditorSnapshot),
    CursorChanged { position: usize, window: TimeWindow },
    TimeRangeStaged { window: TimeWindow },
    TimeRangeCommitted { position: usize, window: TimeWindow },
    DurationChanged { seconds: f64 },
    PlaybackChanged { playing: bool },
    PlayerError { message: String },
}

/// Immutable editor state consumed by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSnapshot {
    pub steps: Vec<StepSummary>,
    /// 1-based position of the selected step; zero while no steps are loaded.
    pub position: usize,
    /// True while a cursor transition awaits [`Command::CompleteTransition`].
    pub is_changing: bool,
    pub is_dragging: bool,
    pub staged_window: Option<TimeWindow>,
    pub playing: bool,
    pub video_duration: Option<f64>,
    pub player_failed: bool,
}

/// Snapshot representation of one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSummary {
    pub id: StepId,
    pub description: String,
    pub start_time: f64,
    pub end_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Stable,
    /// Structural phase applied; the cursor notification fires on completion.
    Pending { cursor: usize },
    /// Cursor already moved; the flag clears on completion.
    Settling,
}

/// Single authority over the step collection, the cursor, and the playback
/// binding.
///
/// Time is injected: commands and [`Editor::tick`] receive the caller's
/// `Instant`, and [`Editor::next_deadline`] tells the runtime when to wake
/// for the trailing slider commit.
#[derive(Debug)]
pub struct Editor<P: VideoPlayer> {
    steps: StepList,
    cursor: usize,
    transition: Transition,
    staged: Option<TimeWindow>,
    commit_timer: DebounceTimer,
    playback: Playback<P>,
}

impl<P> Editor<P>
where
    P: VideoPlayer,
{
    pub fn new(player: P) -> Self {
        Self {
            steps: StepList::default(),
            cursor: 0,
            transition: Transition::Stable,
            staged: None,
            commit_timer: DebounceTimer::new(SLIDER_COMMIT_QUIET_PERIOD),
            playback: Playback::new(player),
        }
    }

    /// Applies one command and returns emitted events.
    pub fn handle_command(&mut self, command: Command, now: Instant) -> Vec<Event> {
        match command {
            Command::LoadSteps { steps } => self.load_steps(steps),
            Command::AddStep => self.add_step(),
            Command::DeleteCurrentStep => self.delete_current_step(),
            Command::ResetAllSteps => self.reset_all_steps(),
            Command::UpdateDescription { text } => self.update_description(text),
            Command::StageTimeRange { start, end } => self.stage_time_range(start, end, now),
            Command::CompleteTransition => self.settle_transition(),
            Command::NextStep => self.go_to_next_step(),
            Command::PrevStep => self.go_to_prev_step(),
            Command::SetPlaying { playing } => self.set_playing(playing),
            Command::BindVideo { video_id } => self.bind_video(&video_id),
        }
    }

    /// Fires the trailing slider commit when its quiet period has elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<Event> {
        if !self.commit_timer.fire_due(now) {
            return Vec::new();
        }
        self.commit_staged()
    }

    /// Returns the instant the runtime must call [`Editor::tick`] by.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.commit_timer.deadline()
    }

    /// Feeds one player notification through the playback adapter.
    pub fn on_player_event(&mut self, event: PlayerEvent) -> Vec<Event> {
        let mut events = Vec::new();
        match &event {
            PlayerEvent::Ready { duration } => {
                events.push(Event::DurationChanged { seconds: *duration });
            }
            PlayerEvent::Failed { message } => {
                events.push(Event::PlayerError {
                    message: message.clone(),
                });
            }
            _ => {}
        }
        self.playback.handle_event(event);
        events
    }

    /// Cancels the pending commit without flushing and releases the player.
    pub fn shutdown(&mut self) {
        self.commit_timer.cancel();
        self.staged = None;
        self.playback.dispose();
        debug!("editor shut down");
    }

    /// Creates an immutable snapshot for the UI.
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            steps: self
                .steps
                .steps()
                .iter()
                .map(|step| StepSummary {
                    id: step.id,
                    description: step.description.clone(),
                    start_time: step.start_time,
                    end_time: step.end_time,
                })
                .collect(),
            position: self.position(),
            is_changing: self.transition != Transition::Stable,
            is_dragging: self.staged.is_some(),
            staged_window: self.staged,
            playing: self.playback.is_playing(),
            video_duration: self.playback.duration(),
            player_failed: self.playback.is_failed(),
        }
    }

    fn load_steps(&mut self, steps: Vec<Step>) -> Vec<Event> {
        self.discard_drag();
        self.transition = Transition::Stable;
        self.steps = StepList::new(steps);
        self.cursor = 0;
        info!(step_count = self.steps.len(), "steps loaded");

        let mut events = vec![Event::StepsChanged(self.snapshot())];
        let Some(window) = self.current_window() else {
            return events;
        };
        self.playback.set_window(window);
        events.push(Event::CursorChanged {
            position: 1,
            window,
        });
        events
    }

    fn add_step(&mut self) -> Vec<Event> {
        let mut events = self.settle_transition();
        self.discard_drag();

        let step_id = self.steps.append_default();
        self.transition = Transition::Pending {
            cursor: self.steps.len() - 1,
        };
        info!(step_id, step_count = self.steps.len(), "step appended");
        events.push(Event::StepsChanged(self.snapshot()));
        events
    }

    fn delete_current_step(&mut self) -> Vec<Event> {
        let mut events = self.settle_transition();
        self.discard_drag();

        if self.steps.len() <= 1 {
            warn!(
                step_count = self.steps.len(),
                "delete refused: a recipe keeps at least one step"
            );
            return events;
        }
        let Some(removed) = self.steps.remove_at(self.cursor) else {
            return events;
        };
        self.cursor = self.cursor.min(self.steps.len() - 1);
        self.transition = Transition::Pending {
            cursor: self.cursor,
        };
        info!(
            step_id = removed.id,
            step_count = self.steps.len(),
            "step removed"
        );
        events.push(Event::StepsChanged(self.snapshot()));
        events
    }

    fn reset_all_steps(&mut self) -> Vec<Event> {
        let mut events = self.settle_transition();
        self.discard_drag();

        if self.steps.is_empty() {
            warn!("grid reset ignored: no steps loaded");
            return events;
        }
        self.steps.reset_grid(DEFAULT_STEP_SPAN_SECONDS);
        info!(
            step_count = self.steps.len(),
            span = DEFAULT_STEP_SPAN_SECONDS,
            "time grid reset"
        );
        events.push(Event::StepsChanged(self.snapshot()));

        let Some(window) = self.current_window() else {
            return events;
        };
        self.playback.set_window(window);
        events.push(Event::CursorChanged {
            position: self.cursor + 1,
            window,
        });
        events
    }

    fn update_description(&mut self, text: String) -> Vec<Event> {
        let Some(step) = self.steps.get_mut(self.cursor) else {
            warn!("description update ignored: no steps loaded");
            return Vec::new();
        };
        step.description = text;
        vec![Event::StepsChanged(self.snapshot())]
    }

    fn stage_time_range(&mut self, start: f64, end: f64, now: Instant) -> Vec<Event> {
        if self.steps.is_empty() {
            warn!("time range ignored: no steps loaded");
            return Vec::new();
        }
        if !start.is_finite() || !end.is_finite() {
            warn!(start, end, "time range ignored: non-finite bounds");
            return Vec::new();
        }

        let mut window = TimeWindow {
            start: start.max(0.0),
            end: end.max(0.0),
        };
        if window.end < window.start {
            std::mem::swap(&mut window.start, &mut window.end);
        }
        if let Some(duration) = self.playback.duration() {
            window.start = window.start.min(duration);
            window.end = window.end.min(duration);
        }

        self.staged = Some(window);
        self.commit_timer.arm(now);
        self.playback.set_window(window);
        debug!(start = window.start, end = window.end, "time range staged");
        vec![Event::TimeRangeStaged { window }]
    }

    fn commit_staged(&mut self) -> Vec<Event> {
        let Some(window) = self.staged.take() else {
            return Vec::new();
        };
        let position = self.position();
        let Some(step) = self.steps.get_mut(self.cursor) else {
            return Vec::new();
        };
        step.start_time = window.start;
        step.end_time = window.end;
        info!(
            position,
            start = window.start,
            end = window.end,
            "time range committed"
        );
        self.playback.set_window(window);
        vec![
            Event::TimeRangeCommitted { position, window },
            Event::StepsChanged(self.snapshot()),
        ]
    }

    fn go_to_next_step(&mut self) -> Vec<Event> {
        let mut events = self.settle_transition();
        self.discard_drag();

        if self.steps.is_empty() || self.cursor + 1 >= self.steps.len() {
            debug!("next step ignored: already at the last step");
            return events;
        }
        events.extend(self.move_cursor(self.cursor + 1));
        events
    }

    fn go_to_prev_step(&mut self) -> Vec<Event> {
        let mut events = self.settle_transition();
        self.discard_drag();

        if self.cursor == 0 {
            debug!("previous step ignored: already at the first step");
            return events;
        }
        events.extend(self.move_cursor(self.cursor - 1));
        events
    }

    fn move_cursor(&mut self, cursor: usize) -> Vec<Event> {
        self.cursor = cursor;
        self.transition = Transition::Settling;
        let Some(window) = self.current_window() else {
            return Vec::new();
        };
        self.playback.set_window(window);
        vec![Event::CursorChanged {
            position: self.cursor + 1,
            window,
        }]
    }

    /// Applies whatever the previous transition left pending.
    ///
    /// A command arriving mid-transition settles first, so the editor never
    /// stays in `Changing` indefinitely.
    fn settle_transition(&mut self) -> Vec<Event> {
        match self.transition {
            Transition::Stable => Vec::new(),
            Transition::Settling => {
                self.transition = Transition::Stable;
                Vec::new()
            }
            Transition::Pending { cursor } => self.apply_cursor(cursor),
        }
    }

    fn apply_cursor(&mut self, cursor: usize) -> Vec<Event> {
        self.transition = Transition::Stable;
        if self.steps.is_empty() {
            return Vec::new();
        }
        self.cursor = cursor.min(self.steps.len() - 1);
        let Some(window) = self.current_window() else {
            return Vec::new();
        };
        self.playback.set_window(window);
        vec![Event::CursorChanged {
            position: self.cursor + 1,
            window,
        }]
    }

    fn set_playing(&mut self, playing: bool) -> Vec<Event> {
        self.playback.set_playing(playing);
        vec![Event::PlaybackChanged { playing }]
    }

    fn bind_video(&mut self, video_id: &str) -> Vec<Event> {
        self.playback.bind(video_id);
        match self.playback.failure() {
            Some(message) => vec![Event::PlayerError {
                message: message.to_string(),
            }],
            None => Vec::new(),
        }
    }

    fn discard_drag(&mut self) {
        if self.staged.is_some() || self.commit_timer.is_armed() {
            debug!("staged time range discarded");
        }
        self.staged = None;
        self.commit_timer.cancel();
    }

    fn current_window(&self) -> Option<TimeWindow> {
        self.staged
            .or_else(|| self.steps.get(self.cursor).map(Step::window))
    }

    fn position(&self) -> usize {
        if self.steps.is_empty() {
            0
        } else {
            self.cursor + 1
        }
    }
}

impl Editor<SimulatedVideoPlayer> {
    /// Creates an editor wired to the simulated streaming player.
    pub fn with_simulated_player(player: Arc<Mutex<SimPlayer>>) -> Self {
        Self::new(SimulatedVideoPlayer::new(player))
    }
}
