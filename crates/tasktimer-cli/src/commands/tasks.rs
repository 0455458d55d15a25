//! Saved task text commands.

use clap::Subcommand;
use tasktimer_core::storage::TASKS_KEY;
use tasktimer_core::task::format_minutes;
use tasktimer_core::{parse_tasks, Database, Store, Task};

use super::unescape_newlines;

#[derive(Subcommand)]
pub enum TasksAction {
    /// Print the saved task text
    Show,
    /// Replace the saved task text
    Set {
        /// New text; "\n" separates lines
        text: String,
    },
    /// Append one line to the saved task text
    Add {
        /// Task line (e.g. "Write 25" or "Review 5r3")
        line: String,
    },
    /// Parse task text into the queue a run would use
    Parse {
        /// Text to parse instead of the saved text
        #[arg(long)]
        text: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: TasksAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TasksAction::Show => {
            let db = Database::open()?;
            println!("{}", db.get(TASKS_KEY)?.unwrap_or_default());
        }
        TasksAction::Set { text } => {
            let mut db = Database::open()?;
            db.set(TASKS_KEY, &unescape_newlines(&text))?;
            println!("ok");
        }
        TasksAction::Add { line } => {
            let mut db = Database::open()?;
            let mut text = db.get(TASKS_KEY)?.unwrap_or_default();
            let trimmed = text.trim_end_matches('\n').len();
            text.truncate(trimmed);
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&line);
            db.set(TASKS_KEY, &text)?;
            println!("ok");
        }
        TasksAction::Parse { text, json } => {
            let text = match text {
                Some(text) => unescape_newlines(&text),
                None => Database::open()?.get(TASKS_KEY)?.unwrap_or_default(),
            };
            let tasks = parse_tasks(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print_queue(&tasks);
            }
        }
    }
    Ok(())
}

fn print_queue(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }
    for (i, task) in tasks.iter().enumerate() {
        println!("{:>3}. {task}", i + 1);
    }
    println!("total: {}", format_minutes(total_secs(tasks)));
}

/// Sum of task times, saturating at `i64::MAX`.
fn total_secs(tasks: &[Task]) -> i64 {
    tasks
        .iter()
        .fold(0i64, |acc, t| acc.saturating_add(t.time_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_adds_task_times() {
        assert_eq!(total_secs(&parse_tasks("A 1\nB 2r2")), 60 + 2 * 120);
        assert_eq!(total_secs(&[]), 0);
    }

    #[test]
    fn huge_durations_saturate_instead_of_overflowing() {
        let tasks = parse_tasks("A 1e300\nB 1e300");
        assert_eq!(tasks.len(), 2);
        assert_eq!(total_secs(&tasks), i64::MAX);
        print_queue(&tasks);
    }
}
