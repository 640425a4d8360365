use std::sync::Arc;

use clap::Args;
use pomotec_core::{
    Config, LogSink, NotificationSink, PermissionGate, PhaseTimer, TimerController, TimerHandle,
    TimerState, TimerStatus,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use crate::desktop::DesktopSink;

const HELP: &str =
    "commands: s=start focus  r=resume  p=pause  x=reset  b=skip break  ?=status  q=quit";

#[derive(Args)]
pub struct RunArgs {
    /// Start a focus session immediately
    #[arg(long)]
    autostart: bool,
    /// Log alerts instead of showing desktop notifications
    #[arg(long)]
    no_notify: bool,
    /// Print timer events as JSON lines instead of a status line
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    StartFocus,
    Resume,
    Pause,
    Reset,
    SkipBreak,
    Status,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    let input = match line.trim().to_ascii_lowercase().as_str() {
        "s" | "start" => Input::StartFocus,
        "r" | "resume" => Input::Resume,
        "p" | "pause" => Input::Pause,
        "x" | "reset" => Input::Reset,
        "b" | "skip" => Input::SkipBreak,
        "?" | "status" => Input::Status,
        "h" | "help" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        _ => return None,
    };
    Some(input)
}

fn render(state: &TimerState) -> String {
    let status = match state.status() {
        TimerStatus::FocusRunning | TimerStatus::BreakRunning => "running",
        TimerStatus::FocusPaused | TimerStatus::BreakPaused => "paused",
    };
    let skip = if state.skip_visible { "  [b] skip break" } else { "" };
    format!("{:<5} {} {status}{skip}", state.phase, state.display)
}

async fn apply(handle: &TimerHandle, input: Input) {
    match input {
        Input::StartFocus => handle.start_focus_session().await,
        Input::Resume => handle.start_timer().await,
        Input::Pause => handle.pause_timer().await,
        Input::Reset => handle.reset_timer().await,
        Input::SkipBreak => handle.skip_break().await,
        Input::Status | Input::Help | Input::Quit => None,
    };
}

pub async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let sink: Arc<dyn NotificationSink> = if args.no_notify {
        Arc::new(LogSink)
    } else {
        Arc::new(PermissionGate::new(DesktopSink, config.permission()))
    };

    let handle = TimerController::spawn(PhaseTimer::new(config.durations()), sink);
    let mut states = handle.subscribe();
    let mut events = handle.events();

    if args.autostart {
        handle.start_focus_session().await;
    }

    eprintln!("{HELP}");
    if !args.json {
        println!("{}", render(&states.borrow_and_update()));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Some(Input::Quit) => break,
                    Some(Input::Help) => eprintln!("{HELP}"),
                    Some(Input::Status) => println!("{}", render(&handle.state())),
                    Some(input) => apply(&handle, input).await,
                    None if line.trim().is_empty() => {}
                    None => eprintln!("unknown command: {}", line.trim()),
                }
            }
            changed = states.changed(), if !args.json => {
                if changed.is_err() {
                    break;
                }
                println!("{}", render(&states.borrow_and_update()));
            }
            event = events.recv(), if args.json => match event {
                Ok(event) => println!("{}", serde_json::to_string(&event)?),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomotec_core::Phase;

    #[test]
    fn parses_short_and_long_commands() {
        assert_eq!(parse_input("s"), Some(Input::StartFocus));
        assert_eq!(parse_input(" Pause \n"), Some(Input::Pause));
        assert_eq!(parse_input("skip"), Some(Input::SkipBreak));
        assert_eq!(parse_input("q"), Some(Input::Quit));
        assert_eq!(parse_input("nope"), None);
    }

    #[test]
    fn renders_skip_hint_only_during_break() {
        let mut state = TimerState {
            phase: Phase::Break,
            remaining_ms: 125_000,
            is_running: true,
            skip_visible: true,
            display: "02:05".into(),
        };
        assert_eq!(render(&state), "BREAK 02:05 running  [b] skip break");

        state.phase = Phase::Focus;
        state.skip_visible = false;
        state.is_running = false;
        assert_eq!(render(&state), "FOCUS 02:05 paused");
    }
}
