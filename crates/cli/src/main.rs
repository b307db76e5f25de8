mod bridge;

use std::io::{self, BufRead};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use std::{env, fs};

use bridge::{EditorCommandSender, EditorEventReceiver, spawn_editor_bridge};
use engine::{
    Command, Editor, EditorSnapshot, Event, PlayerEvent, format_minutes, steps_from_json,
};
use player_sim::SimPlayer;

const DEFAULT_VIDEO_DURATION_SECONDS: f64 = 90.0;
const EVENT_DRAIN_WINDOW: Duration = Duration::from_millis(150);

fn main() {
    init_tracing();

    let player = Arc::new(Mutex::new(SimPlayer::new(DEFAULT_VIDEO_DURATION_SECONDS)));
    let editor = Editor::with_simulated_player(Arc::clone(&player));
    let poll_handle = Arc::clone(&player);
    let (command_tx, event_rx) = spawn_editor_bridge(editor, move |now| {
        poll_handle
            .lock()
            .map(|mut player| player.poll(now))
            .unwrap_or_default()
            .into_iter()
            .map(PlayerEvent::from)
            .collect()
    });

    if let Some(path) = env::args().nth(1) {
        load_steps_file(&command_tx, &path);
        drain_events(&event_rx);
    }

    print_help();
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if !dispatch_line(line.trim(), &command_tx) {
            break;
        }
        drain_events(&event_rx);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

fn dispatch_line(line: &str, commands: &EditorCommandSender) -> bool {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return true;
    };

    let command = match verb {
        "quit" | "exit" => return false,
        "help" => {
            print_help();
            return true;
        }
        "load" => {
            match parts.next() {
                Some(path) => load_steps_file(commands, path),
                None => eprintln!("usage: load <steps.json>"),
            }
            return true;
        }
        "add" => Command::AddStep,
        "del" => Command::DeleteCurrentStep,
        "reset" => Command::ResetAllSteps,
        "next" => Command::NextStep,
        "prev" => Command::PrevStep,
        "done" => Command::CompleteTransition,
        "desc" => Command::UpdateDescription {
            text: parts.collect::<Vec<_>>().join(" "),
        },
        "drag" => {
            let (Some(start), Some(end)) = (parse_seconds(parts.next()), parse_seconds(parts.next()))
            else {
                eprintln!("usage: drag <start-seconds> <end-seconds>");
                return true;
            };
            Command::StageTimeRange { start, end }
        }
        "play" => Command::SetPlaying { playing: true },
        "pause" => Command::SetPlaying { playing: false },
        "bind" => match parts.next() {
            Some(video_id) => Command::BindVideo {
                video_id: video_id.to_string(),
            },
            None => {
                eprintln!("usage: bind <video-id>");
                return true;
            }
        },
        other => {
            eprintln!("unknown command: {other} (try `help`)");
            return true;
        }
    };

    if commands.send(command).is_err() {
        eprintln!("editor is gone");
        return false;
    }
    true
}

fn parse_seconds(raw: Option<&str>) -> Option<f64> {
    raw?.parse().ok()
}

fn load_steps_file(commands: &EditorCommandSender, path: &str) {
    let payload = match fs::read_to_string(path) {
        Ok(payload) => payload,
        Err(error) => {
            eprintln!("cannot read {path}: {error}");
            return;
        }
    };
    match steps_from_json(&payload) {
        Ok(steps) => {
            let _ = commands.send(Command::LoadSteps { steps });
        }
        Err(error) => eprintln!("cannot decode {path}: {error}"),
    }
}

fn drain_events(events: &EditorEventReceiver) {
    while let Ok(event) = events.recv_timeout(EVENT_DRAIN_WINDOW) {
        render_event(&event);
    }
}

fn render_event(event: &Event) {
    match event {
        Event::StepsChanged(snapshot) => render_snapshot(snapshot),
        Event::CursorChanged { position, window } => println!(
            "-> step {position} [{} - {}]",
            format_minutes(window.start),
            format_minutes(window.end)
        ),
        Event::TimeRangeStaged { window } => println!(
            "   staging [{} - {}]",
            format_minutes(window.start),
            format_minutes(window.end)
        ),
        Event::TimeRangeCommitted { position, window } => println!(
            "   committed step {position} [{} - {}]",
            format_minutes(window.start),
            format_minutes(window.end)
        ),
        Event::DurationChanged { seconds } => {
            println!("   video duration {}", format_minutes(*seconds));
        }
        Event::PlaybackChanged { playing } => {
            println!("   {}", if *playing { "playing" } else { "paused" });
        }
        Event::PlayerError { message } => println!("   player error: {message}"),
    }
}

fn render_snapshot(snapshot: &EditorSnapshot) {
    for (index, step) in snapshot.steps.iter().enumerate() {
        let marker = if index + 1 == snapshot.position { '>' } else { ' ' };
        println!(
            "{marker} {:>2}. [{} - {}] {}",
            index + 1,
            format_minutes(step.start_time),
            format_minutes(step.end_time),
            step.description
        );
    }
}

fn print_help() {
    println!("commands:");
    println!("  load <steps.json>   replace the step list from a backend payload");
    println!("  add | del | reset   edit the step list");
    println!("  next | prev | done  move the selection / acknowledge a transition");
    println!("  desc <text>         rewrite the current step's description");
    println!("  drag <start> <end>  stage a time range (commits after the quiet period)");
    println!("  bind <video-id>     attach the video player");
    println!("  play | pause        toggle playback");
    println!("  quit");
}
