//! # Console Service
//!
//! Debug transport used when no chat service is configured. Every stdin line
//! is a message from `Me` in `#general`; replies are printed to stdout.

use crate::application::bot::Inbound;
use crate::domain::traits::ChatProvider;
use crate::domain::types::IncomingMessage;
use crate::strings::logs;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

pub const CHANNEL: &str = "#general";
pub const USER: &str = "Me";

#[derive(Clone)]
pub struct ConsoleService {
    channel: String,
}

impl ConsoleService {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for ConsoleService {
    fn room_id(&self) -> String {
        self.channel.clone()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        println!("{} | Botty: {}", self.channel, content);
        Ok(chrono::Utc::now().timestamp_millis().to_string())
    }

    async fn send_notification(&self, content: &str) -> Result<(), String> {
        self.send_message(content).await.map(|_| ())
    }
}

/// Reads stdin until EOF, forwarding each line to the dispatch loop.
pub async fn run(inbox: mpsc::Sender<Inbound>) -> Result<()> {
    let chat: Arc<dyn ChatProvider> = Arc::new(ConsoleService::new(CHANNEL));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read console input")?
    {
        let inbound = Inbound {
            chat: chat.clone(),
            message: IncomingMessage::new(CHANNEL, USER, line),
        };
        if inbox.send(inbound).await.is_err() {
            break;
        }
    }

    tracing::info!("{}", logs::CONSOLE_CLOSED);
    Ok(())
}
