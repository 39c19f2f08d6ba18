//! # Plugins
//!
//! Bundled plugins, in dispatch order. Flow-backed plugins use [`Reply`] as
//! the value their flow bodies offer back to the handler.

pub mod personality;
pub mod poll;
pub mod reminders;
pub mod wizard;

use anyhow::Result;
use std::time::Duration;

use crate::application::dispatch::Dispatcher;
use crate::domain::config::AppConfig;
use crate::domain::traits::ChatProvider;

/// What a flow body hands back for one input: whether it consumed the input,
/// and optionally something to say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub handled: bool,
    pub text: Option<String>,
}

impl Reply {
    pub fn handled() -> Self {
        Self {
            handled: true,
            text: None,
        }
    }

    pub fn say(text: impl Into<String>) -> Self {
        Self {
            handled: true,
            text: Some(text.into()),
        }
    }

    /// Sends the text, if any, and returns whether the input was handled.
    pub async fn deliver(&self, chat: &dyn ChatProvider) -> Result<bool> {
        if let Some(text) = &self.text {
            chat.send_message(text).await.map_err(|e| anyhow::anyhow!(e))?;
        }
        Ok(self.handled)
    }
}

/// Builds the dispatcher with every bundled plugin.
pub fn dispatcher(config: &AppConfig) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(Box::new(wizard::WizardPlugin::new(config.flows.on_restart)));
    dispatcher.register(Box::new(poll::PollPlugin::new()));
    dispatcher.register(Box::new(reminders::RemindersPlugin::new(Duration::from_secs(
        config.plugins.reminder_check_secs,
    ))));
    dispatcher.register(Box::new(personality::PersonalityPlugin::new(
        config.plugins.repeat_threshold,
    )));
    dispatcher
}
