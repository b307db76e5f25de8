use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use engine::{Command, Editor, Event, PlayerEvent, VideoPlayer};

const COMMAND_CHANNEL_CAPACITY: usize = 32;
const EVENT_CHANNEL_CAPACITY: usize = 32;
const PLAYER_POLL_INTERVAL: Duration = Duration::from_millis(33);

/// Sender used by the driver thread to dispatch commands to the editor thread.
pub type EditorCommandSender = mpsc::SyncSender<Command>;

/// Receiver used by the driver thread to read events emitted by the editor thread.
pub type EditorEventReceiver = mpsc::Receiver<Event>;

/// Spawns the editor worker thread.
///
/// The worker sleeps until the next command, the debounce deadline, or the
/// player poll interval, whichever comes first, so the trailing slider commit
/// fires on time without further input. Dropping the command sender shuts the
/// editor down (pending commit cancelled, player disposed).
pub fn spawn_editor_bridge<P, F>(
    mut editor: Editor<P>,
    mut poll_player: F,
) -> (EditorCommandSender, EditorEventReceiver)
where
    P: VideoPlayer + Send + 'static,
    F: FnMut(Instant) -> Vec<PlayerEvent> + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::sync_channel::<Command>(COMMAND_CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::sync_channel::<Event>(EVENT_CHANNEL_CAPACITY);

    thread::spawn(move || {
        'run: loop {
            let wait = next_wait(editor.next_deadline(), Instant::now());
            let command = match command_rx.recv_timeout(wait) {
                Ok(command) => Some(command),
                Err(mpsc::RecvTimeoutError::Timeout) => None,
                Err(mpsc::RecvTimeoutError::Disconnected) => break 'run,
            };

            let now = Instant::now();
            let mut events = Vec::new();
            for player_event in poll_player(now) {
                events.extend(editor.on_player_event(player_event));
            }
            events.extend(editor.tick(now));
            if let Some(command) = command {
                events.extend(editor.handle_command(command, now));
            }
            for event in events {
                if event_tx.send(event).is_err() {
                    break 'run;
                }
            }
        }
        editor.shutdown();
    });

    (command_tx, event_rx)
}

fn next_wait(deadline: Option<Instant>, now: Instant) -> Duration {
    match deadline {
        Some(deadline) => deadline.saturating_duration_since(now).min(PLAYER_POLL_INTERVAL),
        None => PLAYER_POLL_INTERVAL,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use engine::{Command, Editor, Event, Step, VideoPlayer};

    use super::spawn_editor_bridge;

    #[derive(Debug, Default)]
    struct NullPlayer;

    impl VideoPlayer for NullPlayer {
        fn load(&mut self, _video_id: &str) -> engine::Result<()> {
            Ok(())
        }

        fn play(&mut self) -> engine::Result<()> {
            Ok(())
        }

        fn pause(&mut self) -> engine::Result<()> {
            Ok(())
        }

        fn seek(&mut self, _seconds: f64) -> engine::Result<()> {
            Ok(())
        }

        fn dispose(&mut self) -> engine::Result<()> {
            Ok(())
        }
    }

    fn sample_steps() -> Vec<Step> {
        vec![
            Step {
                id: 1,
                description: "Cut the vegetables".to_string(),
                start_time: 0.0,
                end_time: 12.0,
            },
            Step {
                id: 2,
                description: "Heat the wok".to_string(),
                start_time: 12.0,
                end_time: 20.0,
            },
        ]
    }

    #[test]
    fn bridge_forwards_editor_events_for_a_load_command() {
        let (command_tx, event_rx) =
            spawn_editor_bridge(Editor::new(NullPlayer), |_now| Vec::new());

        command_tx
            .send(Command::LoadSteps {
                steps: sample_steps(),
            })
            .expect("send load command");

        let first = event_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("first event");
        let second = event_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("second event");

        assert!(matches!(first, Event::StepsChanged(_)));
        assert!(matches!(second, Event::CursorChanged { position: 1, .. }));
    }

    #[test]
    fn bridge_fires_the_trailing_commit_without_further_commands() {
        let (command_tx, event_rx) =
            spawn_editor_bridge(Editor::new(NullPlayer), |_now| Vec::new());

        command_tx
            .send(Command::LoadSteps {
                steps: sample_steps(),
            })
            .expect("send load command");
        command_tx
            .send(Command::StageTimeRange {
                start: 2.0,
                end: 7.5,
            })
            .expect("send stage command");

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        loop {
            let remaining = deadline
                .checked_duration_since(std::time::Instant::now())
                .expect("commit must land within two seconds");
            let event = event_rx.recv_timeout(remaining).expect("bridge event");
            if let Event::TimeRangeCommitted { position, window } = event {
                assert_eq!(position, 1);
                assert_eq!(window.start, 2.0);
                assert_eq!(window.end, 7.5);
                break;
            }
        }
    }
}
