//! Fire-and-forget message sink used by measures to report what they did.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
    FinalCondition,
    NotApplicable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait MessageSink {
    fn info(&mut self, msg: &str);
    fn warn(&mut self, msg: &str);
    fn error(&mut self, msg: &str);
    fn register_final_condition(&mut self, msg: &str);
    fn register_not_applicable(&mut self, msg: &str);
}

/// Forwards every message to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn info(&mut self, msg: &str) {
        info!("{msg}");
    }

    fn warn(&mut self, msg: &str) {
        warn!("{msg}");
    }

    fn error(&mut self, msg: &str) {
        error!("{msg}");
    }

    fn register_final_condition(&mut self, msg: &str) {
        info!(final_condition = true, "{msg}");
    }

    fn register_not_applicable(&mut self, msg: &str) {
        info!(not_applicable = true, "{msg}");
    }
}

/// Keeps messages for reports without logging them; the sink they are
/// forwarded to does the logging.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    messages: Vec<Message>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn take(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    pub fn final_condition(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.level == MessageLevel::FinalCondition)
            .map(|m| m.text.as_str())
    }

    pub fn has(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }

    fn push(&mut self, level: MessageLevel, text: &str) {
        self.messages.push(Message {
            level,
            text: text.to_string(),
        });
    }
}

impl MessageSink for RecordingSink {
    fn info(&mut self, msg: &str) {
        self.push(MessageLevel::Info, msg);
    }

    fn warn(&mut self, msg: &str) {
        self.push(MessageLevel::Warning, msg);
    }

    fn error(&mut self, msg: &str) {
        self.push(MessageLevel::Error, msg);
    }

    fn register_final_condition(&mut self, msg: &str) {
        self.push(MessageLevel::FinalCondition, msg);
    }

    fn register_not_applicable(&mut self, msg: &str) {
        self.push(MessageLevel::NotApplicable, msg);
    }
}
