//! # Personality Plugin
//!
//! Help text, good manners, and joining in when a room keeps repeating itself.

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::traits::{ChatProvider, Plugin};
use crate::domain::types::IncomingMessage;
use crate::interface::plugins::Reply;
use crate::strings::{help, messages};

static HELP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bbotty\s+(?:(?:help|halp)\b|\?+)").unwrap());
static THANKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(?:thanks|thx|ty)\b.*\bbotty\b").unwrap());

pub struct PersonalityPlugin {
    /// room -> (last message, times said in a row)
    last_message: HashMap<String, (String, usize)>,
    repeat_threshold: usize,
}

impl PersonalityPlugin {
    pub fn new(repeat_threshold: usize) -> Self {
        Self {
            last_message: HashMap::new(),
            repeat_threshold,
        }
    }
}

#[async_trait]
impl Plugin for PersonalityPlugin {
    fn name(&self) -> &'static str {
        "personality"
    }

    async fn on_message(&mut self, chat: &dyn ChatProvider, message: &IncomingMessage) -> Result<bool> {
        let text = message.text.as_str();

        if HELP.is_match(text) {
            return Reply::say(help::MAIN).deliver(chat).await;
        }
        if THANKS.is_match(text) {
            return Reply::say(messages::THANKS_REPLY).deliver(chat).await;
        }

        // Repeat the message once enough people have said it in a row
        let repeated = match self.last_message.get_mut(&message.channel) {
            Some((last, count)) if last.as_str() == text => {
                *count += 1;
                *count >= self.repeat_threshold
            }
            _ => {
                self.last_message
                    .insert(message.channel.clone(), (text.to_string(), 1));
                false
            }
        };
        if repeated {
            self.last_message.remove(&message.channel);
            chat.send_message(text).await.map_err(|e| anyhow::anyhow!(e))?;
        }

        // Never claims the message
        Ok(false)
    }
}
