use clap::Subcommand;
use tasktimer_core::storage::NOTES_KEY;
use tasktimer_core::{Database, Store};

use super::unescape_newlines;

#[derive(Subcommand)]
pub enum NotesAction {
    /// Print the saved notes
    Show,
    /// Replace the saved notes
    Set {
        /// Notes text; "\n" separates lines
        text: String,
    },
}

pub fn run(action: NotesAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;
    match action {
        NotesAction::Show => println!("{}", db.get(NOTES_KEY)?.unwrap_or_default()),
        NotesAction::Set { text } => {
            db.set(NOTES_KEY, &unescape_newlines(&text))?;
            println!("ok");
        }
    }
    Ok(())
}
