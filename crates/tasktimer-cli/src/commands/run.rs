//! Interactive run loop.
//!
//! Reads one command per line from stdin while the countdown ticks. An
//! empty line toggles play/pause, standing in for Shift+Enter.

use std::io::Write;

use clap::Args;
use tasktimer_core::storage::Config;
use tasktimer_core::{
    format_clock, Database, Event, Session, SystemClock, TimerEngine, TimerState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use super::unescape_newlines;
use crate::driver::{DesktopNotifier, IntervalScheduler};

type CliSession = Session<Database, IntervalScheduler, DesktopNotifier, SystemClock>;

#[derive(Args)]
pub struct RunArgs {
    /// Task text to start with; "\n" separates lines
    #[arg(long)]
    tasks: Option<String>,
    /// Shareable link whose `tasks` query parameter seeds the run
    #[arg(long, conflicts_with = "tasks")]
    link: Option<String>,
    /// Abandon the queue when a task runs out
    #[arg(long)]
    hard: bool,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    TogglePlayPause,
    Play,
    Pause,
    Next,
    Done,
    Previous,
    Restore,
    Reset,
    ClearAll,
    Add(String),
    Edit(String),
    Hard(bool),
    Tasks,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line
            .split_once(' ')
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));
        match word {
            "" | "toggle" | "t" => Command::TogglePlayPause,
            "play" => Command::Play,
            "pause" => Command::Pause,
            "next" | "n" => Command::Next,
            "done" | "d" => Command::Done,
            "prev" | "p" => Command::Previous,
            "back" | "restore" => Command::Restore,
            "reset" | "r" => Command::Reset,
            "clear" => Command::ClearAll,
            "add" | "a" if !rest.is_empty() => Command::Add(rest.to_string()),
            "edit" | "e" if !rest.is_empty() => Command::Edit(unescape_newlines(rest)),
            "hard" => match rest {
                "on" => Command::Hard(true),
                "off" => Command::Hard(false),
                _ => Command::Unknown(line.to_string()),
            },
            "tasks" | "ls" => Command::Tasks,
            "status" | "s" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

const HELP: &str = "\
commands:
  <enter> | toggle     play/pause (Shift+Enter)
  play | pause         start or resume / pause
  next | done          finish the current task
  prev                 restart the previous task
  back                 give back 10% of the task time
  reset                restart the current task
  clear                stop and clear all tasks
  add <line>           append a task line (e.g. add Write 25)
  edit <text>          replace all task text (\\n between lines; use clear to empty)
  hard on|off          toggle hard mode
  tasks | status       show the queue / current state
  quit";

struct Output {
    json: bool,
}

impl Output {
    fn event(&self, event: Option<Event>) {
        let Some(event) = event else {
            return;
        };
        if self.json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("error: {e}"),
            }
            return;
        }
        if let Some(line) = describe(&event) {
            println!("\r{line}");
        }
    }

    fn line(&self, text: &str) {
        if !self.json {
            println!("{text}");
        }
    }

    /// Redraw the clock in place.
    fn clock(&self, session: &CliSession) {
        if self.json {
            return;
        }
        let engine = session.engine();
        let label = engine.current_task_label().unwrap_or_default();
        print!("\r{}  {label}   ", engine.clock_label());
        let _ = std::io::stdout().flush();
    }
}

fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::TimerStarted {
            task_name,
            remaining_secs,
            ..
        } => format!("started {task_name} ({})", format_clock(*remaining_secs)),
        Event::TimerPaused { remaining_secs, .. } => {
            format!("paused at {}", format_clock(*remaining_secs))
        }
        Event::TaskAdvanced { message, .. } | Event::TaskAbandoned { message, .. } => {
            message.clone()
        }
        Event::TaskRestarted { remaining_secs, .. } => {
            format!("restarted ({})", format_clock(*remaining_secs))
        }
        Event::TimeRestored { remaining_secs, .. } => {
            format!("restored to {}", format_clock(*remaining_secs))
        }
        Event::AllTasksCompleted { .. } => tasktimer_core::timer::ALL_TASKS_COMPLETED.to_string(),
        Event::Cleared { .. } => "cleared".to_string(),
        Event::StateSnapshot {
            state,
            task_label,
            clock,
            task_index,
            task_count,
            ..
        } => match state {
            TimerState::Completed => "all tasks completed".to_string(),
            TimerState::Idle => format!("idle, {task_count} task(s) queued"),
            _ => format!(
                "{state:?} {clock} {} [{}/{task_count}]",
                task_label.as_deref().unwrap_or(""),
                task_index + 1
            )
            .to_lowercase(),
        },
    };
    Some(line)
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_loop(args))
}

async fn run_loop(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let engine = TimerEngine::new(
        IntervalScheduler::new(),
        DesktopNotifier::new(&config.notifications),
        SystemClock,
    )
    .with_tick_interval(config.timer.tick_interval())
    .with_hard_mode(args.hard || config.timer.hard_mode);
    let mut session = Session::open(Database::open()?, engine)?;
    let out = Output { json: args.json };

    if let Some(link) = &args.link {
        out.event(session.bootstrap_from_link(link)?);
    } else if let Some(text) = &args.tasks {
        out.event(session.bootstrap(unescape_newlines(text)));
    }
    let shortcut = config.shortcut("toggle_play_pause").unwrap_or("Shift+Enter");
    out.line(&format!("press <enter> to play/pause ({shortcut}), `help` for commands"));
    info!(hard_mode = session.engine().hard_mode(), "run loop started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut read_error = None;
    loop {
        tokio::select! {
            id = session.engine_mut().scheduler_mut().next_tick() => {
                out.event(session.engine_mut().tick(id));
                if session.engine().state() == TimerState::Running {
                    out.clock(&session);
                }
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        read_error = Some(e);
                        break;
                    }
                };
                if !apply(&mut session, Command::parse(&line), &out) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    shut_down(&mut session, read_error)
}

/// Flush the task text, then report any stdin failure that ended the loop.
fn shut_down(
    session: &mut CliSession,
    read_error: Option<std::io::Error>,
) -> Result<(), Box<dyn std::error::Error>> {
    session.flush()?;
    info!("task text flushed");
    match read_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Returns false when the loop should stop.
fn apply(session: &mut CliSession, command: Command, out: &Output) -> bool {
    let controls = session.engine().controls();
    let allowed = match &command {
        Command::Next => controls.skip_next,
        Command::Done => controls.done,
        Command::Previous => controls.skip_previous,
        Command::Restore => controls.restore,
        Command::ClearAll => controls.clear,
        _ => true,
    };
    if !allowed {
        let mode = if session.engine().hard_mode() { "hard" } else { "normal" };
        out.line(&format!("not available in {mode} mode"));
        return true;
    }

    let event = match command {
        Command::TogglePlayPause => session.toggle_play_pause(),
        Command::Play => session.play(),
        Command::Pause => session.engine_mut().pause(),
        Command::Next => session.engine_mut().skip_next(),
        Command::Done => session.engine_mut().done(),
        Command::Previous => session.engine_mut().skip_previous(),
        Command::Restore => session.engine_mut().restore_ten_percent(),
        Command::Reset => session.engine_mut().reset_current_task_time(),
        Command::ClearAll => session.clear_all(),
        Command::Add(line) => session.append_task_line(&line),
        Command::Edit(text) => session.edit_tasks(text),
        Command::Hard(enabled) => {
            session.engine_mut().set_hard_mode(enabled);
            out.line(&format!("hard mode {}", if enabled { "on" } else { "off" }));
            None
        }
        Command::Tasks => {
            let engine = session.engine();
            for (i, task) in engine.tasks().iter().enumerate() {
                let marker = if i == engine.task_index() && engine.in_progress() {
                    ">"
                } else {
                    " "
                };
                out.line(&format!("{marker} {task}"));
            }
            if engine.tasks().is_empty() {
                out.line(&format!("no tasks committed; input:\n{}", engine.input()));
            }
            None
        }
        Command::Status => Some(session.engine().snapshot()),
        Command::Help => {
            out.line(HELP);
            None
        }
        Command::Quit => return false,
        Command::Unknown(line) => {
            out.line(&format!("unknown command: {line} (try `help`)"));
            None
        }
    };
    out.event(event);
    true
}
