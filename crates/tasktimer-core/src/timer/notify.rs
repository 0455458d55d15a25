//! Notification sinks for task transitions.
//!
//! Delivery is fire-and-forget: the engine logs a failed notification and
//! carries on with the transition that triggered it.

use tracing::info;

use crate::error::NotifyError;

pub trait Notifier {
    fn notify(&mut self, message: &str) -> Result<(), NotifyError>;
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, message: &str) -> Result<(), NotifyError> {
        info!(target: "tasktimer::notify", "{message}");
        Ok(())
    }
}

/// Keeps every message in memory. Can be told to refuse delivery.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    messages: Vec<String>,
    deny: bool,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records nothing and reports permission denied.
    pub fn denying() -> Self {
        Self {
            messages: Vec::new(),
            deny: true,
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&mut self, message: &str) -> Result<(), NotifyError> {
        if self.deny {
            return Err(NotifyError::PermissionDenied);
        }
        self.messages.push(message.to_string());
        Ok(())
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, message: &str) -> Result<(), NotifyError> {
        (**self).notify(message)
    }
}
