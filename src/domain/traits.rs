//! # Domain Traits
//!
//! Abstract interfaces for core system components (Chat, Plugins).
//! Allows for pluggable implementations in the Infrastructure and Interface layers.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::types::IncomingMessage;

/// Abstract interface for a Chat Provider bound to one room (e.g., Matrix, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room, returning its event id
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Send a notification (not tracked)
    async fn send_notification(&self, content: &str) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Chat handles of every room the bot has heard from, keyed by room id.
pub type Rooms = HashMap<String, Arc<dyn ChatProvider>>;

/// A bot feature. Plugins are offered every step tick and every message, in
/// registration order, until one of them reports the event as handled.
#[async_trait]
pub trait Plugin: Send {
    fn name(&self) -> &'static str;

    /// Called on every tick of the dispatch loop. `rooms` is how a plugin
    /// speaks without a message to answer.
    async fn on_step(&mut self, _rooms: &Rooms) -> Result<bool> {
        Ok(false)
    }

    /// Returns `true` if the message was handled and should not reach later plugins.
    async fn on_message(&mut self, chat: &dyn ChatProvider, message: &IncomingMessage) -> Result<bool>;
}
