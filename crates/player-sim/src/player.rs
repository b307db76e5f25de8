use std::time::{Duration, Instant};

use crate::error::{Result, SimPlayerError};

const DEFAULT_READY_LATENCY: Duration = Duration::from_millis(50);
const DEFAULT_SEEK_LATENCY: Duration = Duration::from_millis(40);

/// Notifications reported by [`SimPlayer::poll`].
#[derive(Debug, Clone, PartialEq)]
pub enum SimPlayerEvent {
    Ready { duration: f64 },
    TimeUpdate { seconds: f64 },
    SeekCompleted { seconds: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingSeek {
    target: f64,
    complete_at: Instant,
}

/// Clock-driven video player with asynchronous ready and seek completion.
///
/// Control calls take the caller's `Instant` and return immediately;
/// completions surface from [`SimPlayer::poll`]. Readiness and seeks resolve
/// after configurable latencies so callers observe the same deferred
/// lifecycle a hosted streaming player exhibits. The playback position
/// advances with the polling clock while playing, holds while a seek is in
/// flight, and saturates at the video duration.
///
/// # Example
/// ```
/// use std::time::{Duration, Instant};
///
/// use player_sim::{SimPlayer, SimPlayerEvent};
///
/// let mut player = SimPlayer::with_latencies(30.0, Duration::ZERO, Duration::ZERO);
/// let now = Instant::now();
/// player.load("recipe-demo", now).expect("load should succeed");
///
/// assert_eq!(
///     player.poll(now),
///     vec![SimPlayerEvent::Ready { duration: 30.0 }]
/// );
/// ```
#[derive(Debug)]
pub struct SimPlayer {
    duration: f64,
    video: Option<String>,
    ready: bool,
    ready_at: Option<Instant>,
    playing: bool,
    position: f64,
    pending_seek: Option<PendingSeek>,
    last_advance: Option<Instant>,
    disposed: bool,
    ready_latency: Duration,
    seek_latency: Duration,
}

impl SimPlayer {
    /// Creates a player for a video of `duration` seconds.
    pub fn new(duration: f64) -> Self {
        Self::with_latencies(duration, DEFAULT_READY_LATENCY, DEFAULT_SEEK_LATENCY)
    }

    /// Creates a player with explicit ready/seek latencies.
    pub fn with_latencies(duration: f64, ready_latency: Duration, seek_latency: Duration) -> Self {
        Self {
            duration: duration.max(0.0),
            video: None,
            ready: false,
            ready_at: None,
            playing: false,
            position: 0.0,
            pending_seek: None,
            last_advance: None,
            disposed: false,
            ready_latency,
            seek_latency,
        }
    }

    /// Binds the player to a video; readiness is signalled by a later poll.
    ///
    /// Rebinding resets position, readiness, and any pending seek.
    pub fn load(&mut self, video_id: &str, now: Instant) -> Result<()> {
        self.ensure_not_disposed()?;
        self.video = Some(video_id.to_string());
        self.ready = false;
        self.ready_at = Some(now + self.ready_latency);
        self.playing = false;
        self.position = 0.0;
        self.pending_seek = None;
        self.last_advance = None;
        Ok(())
    }

    pub fn play(&mut self, now: Instant) -> Result<()> {
        self.ensure_controllable()?;
        self.playing = true;
        self.last_advance = Some(now);
        Ok(())
    }

    pub fn pause(&mut self, now: Instant) -> Result<()> {
        self.ensure_controllable()?;
        self.advance_position(now);
        self.playing = false;
        self.last_advance = None;
        Ok(())
    }

    /// Requests a jump; completion surfaces after the seek latency.
    ///
    /// A new request supersedes a pending one.
    pub fn seek(&mut self, seconds: f64, now: Instant) -> Result<()> {
        self.ensure_controllable()?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(SimPlayerError::InvalidPosition(seconds));
        }
        self.pending_seek = Some(PendingSeek {
            target: seconds.min(self.duration),
            complete_at: now + self.seek_latency,
        });
        Ok(())
    }

    /// Releases the player; safe to call more than once.
    pub fn dispose(&mut self) -> Result<()> {
        self.disposed = true;
        self.playing = false;
        self.pending_seek = None;
        Ok(())
    }

    /// Advances the simulation to `now` and drains pending notifications.
    pub fn poll(&mut self, now: Instant) -> Vec<SimPlayerEvent> {
        if self.disposed || self.video.is_none() {
            return Vec::new();
        }

        let mut events = Vec::new();
        if !self.ready {
            match self.ready_at {
                Some(ready_at) if now >= ready_at => {
                    self.ready = true;
                    events.push(SimPlayerEvent::Ready {
                        duration: self.duration,
                    });
                }
                _ => return events,
            }
        }

        if let Some(seek) = self.pending_seek {
            // Position holds while the seek is in flight.
            if now >= seek.complete_at {
                self.pending_seek = None;
                self.position = seek.target;
                self.last_advance = self.playing.then_some(now);
                events.push(SimPlayerEvent::SeekCompleted {
                    seconds: self.position,
                });
                events.push(SimPlayerEvent::TimeUpdate {
                    seconds: self.position,
                });
            }
        } else if self.playing {
            self.advance_position(now);
            events.push(SimPlayerEvent::TimeUpdate {
                seconds: self.position,
            });
        }

        events
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn advance_position(&mut self, now: Instant) {
        let Some(last) = self.last_advance else {
            return;
        };
        let elapsed = now.saturating_duration_since(last).as_secs_f64();
        self.position = (self.position + elapsed).min(self.duration);
        self.last_advance = Some(now);
    }

    fn ensure_not_disposed(&self) -> Result<()> {
        if self.disposed {
            return Err(SimPlayerError::Disposed);
        }
        Ok(())
    }

    fn ensure_controllable(&self) -> Result<()> {
        self.ensure_not_disposed()?;
        if self.video.is_none() {
            return Err(SimPlayerError::NotLoaded);
        }
        if !self.ready {
            return Err(SimPlayerError::NotReady);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{SimPlayer, SimPlayerEvent};
    use crate::error::SimPlayerError;

    const SEEK_LATENCY: Duration = Duration::from_millis(40);

    fn ready_player(now: Instant) -> SimPlayer {
        let mut player = SimPlayer::with_latencies(30.0, Duration::ZERO, SEEK_LATENCY);
        player.load("recipe-demo", now).expect("load should succeed");
        let events = player.poll(now);
        assert_eq!(events, vec![SimPlayerEvent::Ready { duration: 30.0 }]);
        player
    }

    #[test]
    fn ready_is_signalled_only_after_the_latency() {
        let mut player =
            SimPlayer::with_latencies(30.0, Duration::from_millis(50), SEEK_LATENCY);
        let t0 = Instant::now();
        player.load("recipe-demo", t0).expect("load should succeed");

        assert!(player.poll(t0 + Duration::from_millis(49)).is_empty());
        assert_eq!(
            player.poll(t0 + Duration::from_millis(50)),
            vec![SimPlayerEvent::Ready { duration: 30.0 }]
        );
        assert!(player.is_ready());
    }

    #[test]
    fn controls_before_load_or_ready_are_rejected() {
        let mut player = SimPlayer::with_latencies(30.0, Duration::from_millis(50), SEEK_LATENCY);
        let t0 = Instant::now();

        assert_eq!(player.play(t0), Err(SimPlayerError::NotLoaded));

        player.load("recipe-demo", t0).expect("load should succeed");
        assert_eq!(player.seek(1.0, t0), Err(SimPlayerError::NotReady));
    }

    #[test]
    fn play_advances_the_position_with_the_polling_clock() {
        let t0 = Instant::now();
        let mut player = ready_player(t0);
        player.play(t0).expect("play should succeed");

        let events = player.poll(t0 + Duration::from_secs(2));

        assert_eq!(events.len(), 1);
        let SimPlayerEvent::TimeUpdate { seconds } = events[0] else {
            panic!("playing poll must report a time update");
        };
        assert!((seconds - 2.0).abs() < 1e-6);
    }

    #[test]
    fn position_saturates_at_the_video_duration() {
        let t0 = Instant::now();
        let mut player = ready_player(t0);
        player.play(t0).expect("play should succeed");

        player.poll(t0 + Duration::from_secs(90));

        assert_eq!(player.position(), 30.0);
    }

    #[test]
    fn seek_completes_after_the_latency_and_holds_position_until_then() {
        let t0 = Instant::now();
        let mut player = ready_player(t0);
        player.play(t0).expect("play should succeed");
        player.seek(12.0, t0).expect("seek should succeed");

        assert!(player.poll(t0 + Duration::from_millis(39)).is_empty());
        assert_eq!(player.position(), 0.0);

        let events = player.poll(t0 + SEEK_LATENCY);
        assert_eq!(
            events,
            vec![
                SimPlayerEvent::SeekCompleted { seconds: 12.0 },
                SimPlayerEvent::TimeUpdate { seconds: 12.0 },
            ]
        );
    }

    #[test]
    fn a_new_seek_supersedes_the_pending_one() {
        let t0 = Instant::now();
        let mut player = ready_player(t0);
        player.seek(5.0, t0).expect("first seek should succeed");
        player
            .seek(20.0, t0 + Duration::from_millis(10))
            .expect("second seek should succeed");

        let events = player.poll(t0 + Duration::from_millis(60));

        assert_eq!(
            events,
            vec![
                SimPlayerEvent::SeekCompleted { seconds: 20.0 },
                SimPlayerEvent::TimeUpdate { seconds: 20.0 },
            ]
        );
    }

    #[test]
    fn seek_rejects_non_finite_or_negative_targets() {
        let t0 = Instant::now();
        let mut player = ready_player(t0);

        assert!(matches!(
            player.seek(f64::NAN, t0),
            Err(SimPlayerError::InvalidPosition(_))
        ));
        assert!(matches!(
            player.seek(-1.0, t0),
            Err(SimPlayerError::InvalidPosition(_))
        ));
    }

    #[test]
    fn dispose_is_idempotent_and_silences_polls() {
        let t0 = Instant::now();
        let mut player = ready_player(t0);

        player.dispose().expect("first dispose should succeed");
        player.dispose().expect("second dispose should succeed");

        assert!(player.is_disposed());
        assert_eq!(player.play(t0), Err(SimPlayerError::Disposed));
        assert!(player.poll(t0 + Duration::from_secs(1)).is_empty());
    }
}
