//! # Plugin Dispatcher
//!
//! Offers step ticks and incoming messages to the registered plugins in order.
//! The first plugin that reports an event as handled stops further dispatch
//! for it. Plugin failures are logged and never stop the dispatcher.
//!
//! The dispatcher also remembers the chat handle of every room a message came
//! from, so plugins can speak on step ticks.

use std::sync::Arc;

use crate::domain::traits::{ChatProvider, Plugin, Rooms};
use crate::domain::types::IncomingMessage;
use crate::strings::logs;

#[derive(Default)]
pub struct Dispatcher {
    plugins: Vec<Box<dyn Plugin>>,
    rooms: Rooms,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        tracing::info!("{}", logs::plugin_registered(plugin.name()));
        self.plugins.push(plugin);
    }

    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Makes `chat` reachable from step ticks under its room id.
    pub fn track(&mut self, chat: Arc<dyn ChatProvider>) {
        let room = chat.room_id();
        if !self.rooms.contains_key(&room) {
            tracing::debug!("{}", logs::room_tracked(&room));
        }
        self.rooms.insert(room, chat);
    }

    /// Runs one step tick. Returns the plugin that claimed it, if any.
    pub async fn dispatch_step(&mut self) -> Option<&'static str> {
        for plugin in self.plugins.iter_mut() {
            match plugin.on_step(&self.rooms).await {
                Ok(true) => return Some(plugin.name()),
                Ok(false) => {}
                Err(e) => tracing::error!("{}", logs::step_failed(plugin.name(), &format!("{e:#}"))),
            }
        }
        None
    }

    /// Offers `message` to each plugin until one handles it. Returns that plugin's name.
    pub async fn dispatch_message(
        &mut self,
        chat: &dyn ChatProvider,
        message: &IncomingMessage,
    ) -> Option<&'static str> {
        tracing::debug!("Dispatching message from {} in {}", message.sender, message.channel);
        for plugin in self.plugins.iter_mut() {
            match plugin.on_message(chat, message).await {
                Ok(true) => {
                    tracing::info!("{}", logs::message_handled(plugin.name(), &message.text));
                    return Some(plugin.name());
                }
                Ok(false) => {}
                Err(e) => tracing::error!(
                    "{}",
                    logs::message_failed(plugin.name(), &format!("{e:#}"), &message.text)
                ),
            }
        }
        None
    }
}
