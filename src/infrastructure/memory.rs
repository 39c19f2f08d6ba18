//! In-memory `ChatProvider` that records what the bot says.

use crate::domain::traits::ChatProvider;
use async_trait::async_trait;
use std::sync::Mutex;

pub struct RecordingChat {
    room: String,
    sent: Mutex<Vec<String>>,
}

impl RecordingChat {
    pub fn new(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatProvider for RecordingChat {
    fn room_id(&self) -> String {
        self.room.clone()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(content.to_string());
        Ok(format!("$event{}", sent.len()))
    }

    async fn send_notification(&self, content: &str) -> Result<(), String> {
        self.send_message(content).await.map(|_| ())
    }
}
