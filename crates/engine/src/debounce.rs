use std::time::{Duration, Instant};

/// Cancellable trailing-edge timer for debounced commits.
///
/// Each `arm` pushes the deadline a full quiet period past `now`; the timer
/// fires once when polled at or after the deadline. Time is injected by the
/// caller, so the timer itself never reads a clock.
///
/// # Example
/// ```
/// use std::time::{Duration, Instant};
///
/// use engine::debounce::DebounceTimer;
///
/// let mut timer = DebounceTimer::new(Duration::from_millis(300));
/// let start = Instant::now();
///
/// timer.arm(start);
/// assert!(!timer.fire_due(start + Duration::from_millis(299)));
/// assert!(timer.fire_due(start + Duration::from_millis(300)));
/// assert!(!timer.fire_due(start + Duration::from_millis(301)));
/// ```
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    quiet_period: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
        }
    }

    /// Starts or re-starts the quiet period from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet_period);
    }

    /// Discards any pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns the pending deadline, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fires at most once per armed deadline: returns true and disarms when
    /// `now` has reached the deadline.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
