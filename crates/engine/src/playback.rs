use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::Result;
use crate::step::TimeWindow;
use player_sim::SimPlayer;

/// Control surface of a streaming video player.
///
/// Calls return as soon as the request is issued; completions arrive later as
/// [`PlayerEvent`]s. Any conforming implementation is substitutable.
pub trait VideoPlayer {
    /// Binds the player to a hosted video.
    fn load(&mut self, video_id: &str) -> Result<()>;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Requests a jump to `seconds`; completion is reported asynchronously.
    fn seek(&mut self, seconds: f64) -> Result<()>;

    /// Releases the player handle.
    fn dispose(&mut self) -> Result<()>;
}

/// Asynchronous notifications delivered by a player implementation.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Ready { duration: f64 },
    TimeUpdate { seconds: f64 },
    SeekCompleted { seconds: f64 },
    SeekFailed { message: String },
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeekState {
    Idle,
    Seeking,
}

/// Bridges step time-window semantics to a player's native controls.
///
/// Owns the player handle and its ready/error lifecycle; never owns step
/// state. Loops playback inside the bound window: when a time update reaches
/// the window end and no seek is in flight, the adapter seeks back to the
/// window start. The seek state machine admits one in-flight seek; time
/// updates arriving mid-seek are absorbed, and a window change retargets the
/// seek (latest target wins).
#[derive(Debug)]
pub struct Playback<P: VideoPlayer> {
    player: P,
    window: Option<TimeWindow>,
    seek: SeekState,
    ready: bool,
    playing: bool,
    duration: Option<f64>,
    failure: Option<String>,
    disposed: bool,
}

impl<P: VideoPlayer> Playback<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            window: None,
            seek: SeekState::Idle,
            ready: false,
            playing: false,
            duration: None,
            failure: None,
            disposed: false,
        }
    }

    /// Acquires the player handle for `video_id`.
    ///
    /// Failure leaves the adapter inert rather than propagating: playback
    /// calls become no-ops and the consumer renders a blank video area.
    pub fn bind(&mut self, video_id: &str) {
        if self.disposed {
            warn!(video_id, "bind ignored: player disposed");
            return;
        }
        self.failure = None;
        self.ready = false;
        self.duration = None;
        self.seek = SeekState::Idle;
        if let Err(error) = self.player.load(video_id) {
            warn!(video_id, %error, "player initialization failed");
            self.failure = Some(error.to_string());
        }
    }

    /// Rebinds the playback loop to a new window and re-seeks to its start.
    pub fn set_window(&mut self, window: TimeWindow) {
        self.window = Some(window);
        if !self.ready || self.disposed || self.failure.is_some() {
            return;
        }
        // Retargets any in-flight seek; latest window wins.
        self.begin_seek(window.start);
    }

    /// Requests play or pause, deferring until the player signals ready.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        if self.disposed || self.failure.is_some() {
            return;
        }
        if !self.ready {
            debug!(playing, "play/pause deferred until the player is ready");
            return;
        }
        let result = if playing {
            self.player.play()
        } else {
            self.player.pause()
        };
        if let Err(error) = result {
            warn!(%error, playing, "play/pause failed");
        }
    }

    /// Feeds one asynchronous player notification into the adapter.
    pub fn handle_event(&mut self, event: PlayerEvent) {
        if self.disposed {
            return;
        }
        match event {
            PlayerEvent::Ready { duration } => {
                self.ready = true;
                self.duration = Some(duration);
                debug!(duration, "player ready");
                if let Some(window) = self.window {
                    self.begin_seek(window.start);
                }
                if self.playing
                    && let Err(error) = self.player.play()
                {
                    warn!(%error, "deferred play failed");
                }
            }
            PlayerEvent::TimeUpdate { seconds } => self.on_time_update(seconds),
            PlayerEvent::SeekCompleted { seconds } => {
                debug!(seconds, "seek completed");
                self.seek = SeekState::Idle;
            }
            PlayerEvent::SeekFailed { message } => {
                warn!(%message, "seek failed");
                self.seek = SeekState::Idle;
            }
            PlayerEvent::Failed { message } => {
                warn!(%message, "player failed");
                self.failure = Some(message);
            }
        }
    }

    /// Releases the player exactly once; later calls and drop are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Err(error) = self.player.dispose() {
            warn!(%error, "player disposal failed");
        }
    }

    pub fn window(&self) -> Option<TimeWindow> {
        self.window
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Requested play state; the player may still be catching up.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    fn on_time_update(&mut self, seconds: f64) {
        if self.failure.is_some() {
            return;
        }
        let Some(window) = self.window else {
            return;
        };
        if seconds < window.end {
            return;
        }
        if self.seek != SeekState::Idle {
            return;
        }
        debug!(
            seconds,
            start = window.start,
            end = window.end,
            "window end reached, looping"
        );
        self.begin_seek(window.start);
    }

    fn begin_seek(&mut self, target: f64) {
        if !self.ready || self.disposed || self.failure.is_some() {
            return;
        }
        // The guard is taken before the request goes out and released only by
        // the completion or failure continuation.
        self.seek = SeekState::Seeking;
        if let Err(error) = self.player.seek(target) {
            warn!(%error, target, "seek could not be issued");
            self.seek = SeekState::Idle;
        }
    }
}

impl<P: VideoPlayer> Drop for Playback<P> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Production wiring around the simulated streaming player.
///
/// The handle is shared: the runtime keeps a clone to poll [`SimPlayer`] for
/// events while the adapter drives its controls.
#[derive(Debug, Clone)]
pub struct SimulatedVideoPlayer {
    inner: Arc<Mutex<SimPlayer>>,
}

impl SimulatedVideoPlayer {
    pub fn new(inner: Arc<Mutex<SimPlayer>>) -> Self {
        Self { inner }
    }

    fn player(&self) -> MutexGuard<'_, SimPlayer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VideoPlayer for SimulatedVideoPlayer {
    fn load(&mut self, video_id: &str) -> Result<()> {
        self.player().load(video_id, Instant::now())?;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.player().play(Instant::now())?;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.player().pause(Instant::now())?;
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        self.player().seek(seconds, Instant::now())?;
        Ok(())
    }

    fn dispose(&mut self) -> Result<()> {
        self.player().dispose()?;
        Ok(())
    }
}

impl From<player_sim::SimPlayerEvent> for PlayerEvent {
    fn from(value: player_sim::SimPlayerEvent) -> Self {
        match value {
            player_sim::SimPlayerEvent::Ready { duration } => Self::Ready { duration },
            player_sim::SimPlayerEvent::TimeUpdate { seconds } => Self::TimeUpdate { seconds },
            player_sim::SimPlayerEvent::SeekCompleted { seconds } => {
                Self::SeekCompleted { seconds }
            }
        }
    }
}
