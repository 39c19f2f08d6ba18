//! # Wizard Plugin
//!
//! `.new` walks the sender through naming and describing a project. The
//! whole conversation is one flow body; each sender in each room gets an
//! independent instance. `.cancel` ends it at any step.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::flow::{Flow, FlowError, Suspender};
use crate::domain::traits::{ChatProvider, Plugin};
use crate::domain::types::{IncomingMessage, RestartPolicy};
use crate::interface::plugins::Reply;
use crate::strings::wizard;

pub const START: &str = ".new";
pub const CANCEL: &str = ".cancel";
pub const CONFIRM: &str = ".ok";

/// (room, sender)
type ConversationKey = (String, String);

async fn project_wizard(co: Suspender<String, Reply>, _: ()) -> anyhow::Result<Reply> {
    let mut input = co.suspend(Reply::say(wizard::NAME_PROMPT)).await;
    let name = loop {
        let text = input.trim();
        if text == CANCEL {
            return Ok(Reply::say(wizard::CANCELLED));
        }
        if !text.is_empty() {
            break text.to_string();
        }
        input = co.suspend(Reply::handled()).await;
    };

    // Accumulate description lines until confirmed
    let mut lines = Vec::new();
    let mut input = co.suspend(Reply::say(wizard::description_prompt(&name))).await;
    loop {
        let text = input.trim();
        if text == CANCEL {
            return Ok(Reply::say(wizard::CANCELLED));
        }
        if text == CONFIRM {
            break;
        }
        if !text.is_empty() {
            lines.push(text.to_string());
        }
        input = co.suspend(Reply::handled()).await;
    }

    Ok(Reply::say(wizard::summary(&name, &lines.join("\n"))))
}

pub struct WizardPlugin {
    flow: Flow<ConversationKey, String, Reply, ()>,
}

impl WizardPlugin {
    pub fn new(policy: RestartPolicy) -> Self {
        Self {
            flow: Flow::new("project_wizard", project_wizard).with_policy(policy),
        }
    }
}

#[async_trait]
impl Plugin for WizardPlugin {
    fn name(&self) -> &'static str {
        "wizard"
    }

    async fn on_message(&mut self, chat: &dyn ChatProvider, message: &IncomingMessage) -> Result<bool> {
        let key = (message.channel.clone(), message.sender.clone());

        if message.text.trim() == START {
            match self.flow.start(key, ()).await {
                Ok(step) => {
                    step.value().deliver(chat).await?;
                }
                Err(FlowError::AlreadyRunning { .. }) => {
                    chat.send_message(wizard::ALREADY_RUNNING)
                        .await
                        .map_err(|e| anyhow::anyhow!(e))?;
                }
                Err(e) => return Err(e.into()),
            }
            return Ok(true);
        }

        match self.flow.step(&key, message.text.clone()).await? {
            Some(reply) => reply.deliver(chat).await,
            None => Ok(false),
        }
    }
}
