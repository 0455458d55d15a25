//! Binds a [`TimerEngine`] to a key-value [`Store`].
//!
//! The raw task text is hydrated from the store at startup and written
//! back on every edit, after play normalizes it, and on exit. Writes are
//! fire-and-forget: a failed write is logged and the engine carries on.

use tracing::{debug, warn};
use url::Url;

use crate::error::Result;
use crate::events::Event;
use crate::storage::{Store, NOTES_KEY, TASKS_KEY};
use crate::timer::{Clock, Notifier, Scheduler, TimerEngine};

/// Query parameter carrying task text in a shareable link.
pub const TASKS_QUERY_PARAM: &str = "tasks";

pub struct Session<St, S, N, C> {
    store: St,
    engine: TimerEngine<S, N, C>,
}

impl<St: Store, S: Scheduler, N: Notifier, C: Clock> Session<St, S, N, C> {
    /// Hydrate the engine's input from the store.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn open(store: St, engine: TimerEngine<S, N, C>) -> Result<Self> {
        let saved = store.get(TASKS_KEY)?.unwrap_or_default();
        debug!(bytes = saved.len(), "hydrated task text");
        Ok(Self {
            store,
            engine: engine.with_input(saved),
        })
    }

    pub fn engine(&self) -> &TimerEngine<S, N, C> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TimerEngine<S, N, C> {
        &mut self.engine
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Seed the input from a link's `tasks` query parameter and play.
    ///
    /// Returns `Ok(None)` when the link carries no tasks.
    ///
    /// # Errors
    /// Returns an error if the link is not a valid URL.
    pub fn bootstrap_from_link(&mut self, link: &str) -> Result<Option<Event>> {
        let url = Url::parse(link)?;
        let Some(text) = url
            .query_pairs()
            .find(|(key, _)| key == TASKS_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
        else {
            return Ok(None);
        };
        Ok(self.bootstrap(text))
    }

    /// Seed the input with `text`, persist it and play.
    pub fn bootstrap(&mut self, text: impl Into<String>) -> Option<Event> {
        self.engine.set_input(text);
        self.persist_input();
        self.play()
    }

    /// Replace the raw task text (runs the edit-while-typing guard).
    pub fn edit_tasks(&mut self, text: impl Into<String>) -> Option<Event> {
        let event = self.engine.set_input(text);
        self.persist_input();
        event
    }

    /// Append one line to the raw task text.
    pub fn append_task_line(&mut self, line: &str) -> Option<Event> {
        let mut text = self.engine.input().trim_end_matches('\n').to_string();
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line);
        self.edit_tasks(text)
    }

    pub fn play(&mut self) -> Option<Event> {
        let event = self.engine.play();
        if event.is_some() {
            self.persist_input();
        }
        event
    }

    pub fn toggle_play_pause(&mut self) -> Option<Event> {
        let event = self.engine.toggle_play_pause();
        if self.engine.is_playing() {
            self.persist_input();
        }
        event
    }

    /// The clear-all control: stops the run and wipes the task text.
    pub fn clear_all(&mut self) -> Option<Event> {
        let event = self.engine.clear(true);
        self.persist_input();
        event
    }

    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn notes(&self) -> Result<String> {
        Ok(self.store.get(NOTES_KEY)?.unwrap_or_default())
    }

    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn set_notes(&mut self, notes: &str) -> Result<()> {
        self.store.set(NOTES_KEY, notes)
    }

    /// Write the task text one last time (application exit).
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn flush(&mut self) -> Result<()> {
        self.store.set(TASKS_KEY, self.engine.input())
    }

    fn persist_input(&mut self) {
        if let Err(err) = self.store.set(TASKS_KEY, self.engine.input()) {
            warn!(error = %err, "failed to persist task text");
        }
    }
}
