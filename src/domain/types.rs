//! # Domain Types
//!
//! Common data structures and enums used across the application logic.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A text message received from a chat service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Room / channel identifier the message was posted in.
    pub channel: String,
    pub sender: String,
    pub text: String,
    /// Thread root, when the service supports threads.
    pub thread: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(channel: impl Into<String>, sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            sender: sender.into(),
            text: text.into(),
            thread: None,
            timestamp: Utc::now(),
        }
    }
}

/// What `start` does when the key already has a running flow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartPolicy {
    /// Discard the running instance and start over.
    #[default]
    Replace,
    /// Refuse with `FlowError::AlreadyRunning`.
    Reject,
}
