//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using the `matrix_sdk`,
//! and runs the Matrix side of the bot: login, invite handling, and forwarding
//! text messages to the dispatch loop.

use crate::application::bot::Inbound;
use crate::domain::config::MatrixConfig;
use crate::domain::traits::ChatProvider;
use crate::domain::types::IncomingMessage;
use crate::strings::logs;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, Relation, RoomMessageEventContent, SyncRoomMessageEvent},
    },
};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        tracing::info!("Bot sending message to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|resp| resp.event_id.to_string())
            .map_err(|e| e.to_string())
    }

    async fn send_notification(&self, content: &str) -> Result<(), String> {
        tracing::info!("Bot sending notice to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::notice_markdown(content))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Logs in and syncs forever, pushing every new text message from other users into `inbox`.
pub async fn run(config: &MatrixConfig, inbox: mpsc::Sender<Inbound>) -> Result<()> {
    let client = Client::builder()
        .homeserver_url(&config.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(&config.username, &config.password)
        .send()
        .await?;

    tracing::info!("{}", logs::logged_in(&config.username));

    if let Some(name) = &config.display_name
        && let Err(e) = client.account().set_display_name(Some(name.as_str())).await
    {
        tracing::warn!("{}", logs::set_display_name_fail(&e.to_string()));
    }

    let start_time = SystemTime::now();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let inbox = inbox.clone();
        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events older than start_time
            let ts = ev.origin_server_ts();
            let event_time = UNIX_EPOCH + Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            let MessageType::Text(text_content) = &original_msg.content.msgtype else {
                return;
            };
            if original_msg.sender == room.own_user_id() {
                return;
            }

            let thread = match &original_msg.content.relates_to {
                Some(Relation::Thread(thread)) => Some(thread.event_id.to_string()),
                _ => None,
            };
            let message = IncomingMessage {
                channel: room.room_id().to_string(),
                sender: original_msg.sender.to_string(),
                text: text_content.body.clone(),
                thread,
                timestamp: DateTime::<Utc>::from(event_time),
            };
            tracing::info!("Received message from {}: \n{}", message.sender, message.text);

            let room_id = message.channel.clone();
            let inbound = Inbound {
                chat: Arc::new(MatrixService::new(room)),
                message,
            };
            if inbox.send(inbound).await.is_err() {
                tracing::warn!("{}", logs::inbox_closed(&room_id));
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("{}", logs::invite_received(room.room_id().as_str()));
            if let Err(e) = room.join().await {
                tracing::warn!("{}", logs::join_invite_fail(&e.to_string()));
            }
        }
    });

    tracing::info!("{}", logs::SYNC_LOOP_START);
    client.sync(SyncSettings::default()).await?;
    Ok(())
}
