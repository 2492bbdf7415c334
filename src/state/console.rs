// Console tab state.
// Activity log of loads, refreshes, exports, and errors.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

/// Keep the log bounded; older entries fall off the front.
const MAX_MESSAGES: usize = 200;

/// Console message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Warn,
    Error,
}

/// A console message for the activity log.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ConsoleLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(ConsoleLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ConsoleLevel::Error, message)
    }

    fn new(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConsoleState {
    pub messages: Vec<ConsoleMessage>,
    /// Warnings and errors not yet seen (tab badge).
    pub unread: usize,
    pub list_state: ListState,
}

impl ConsoleState {
    pub fn push(&mut self, message: ConsoleMessage) {
        if message.level != ConsoleLevel::Info {
            self.unread += 1;
        }
        self.messages.push(message);
        if self.messages.len() > MAX_MESSAGES {
            let overflow = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..overflow);
        }
    }

    pub fn mark_read(&mut self) {
        self.unread = 0;
    }
}
