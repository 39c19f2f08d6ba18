//! # Bot Loop
//!
//! The single dispatch loop of the bot. Transports push incoming messages
//! into an mpsc channel; the loop interleaves them with periodic step ticks
//! and hands each one to the [`Dispatcher`] in arrival order. Nothing else
//! touches plugin (and therefore flow) state.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::application::dispatch::Dispatcher;
use crate::domain::traits::ChatProvider;
use crate::domain::types::IncomingMessage;
use crate::strings::logs;

/// A message together with the room it should be answered in.
pub struct Inbound {
    pub chat: Arc<dyn ChatProvider>,
    pub message: IncomingMessage,
}

pub struct Bot {
    dispatcher: Dispatcher,
    step_interval: Duration,
}

impl Bot {
    pub fn new(dispatcher: Dispatcher, step_interval: Duration) -> Self {
        Self {
            dispatcher,
            step_interval,
        }
    }

    /// Runs until every sender of `inbox` is dropped.
    pub async fn run(mut self, mut inbox: mpsc::Receiver<Inbound>) -> Result<()> {
        let mut ticker = tokio::time::interval(self.step_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("{}", logs::DISPATCH_LOOP_START);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.dispatcher.dispatch_step().await;
                }
                received = inbox.recv() => match received {
                    Some(inbound) => {
                        self.dispatcher.track(inbound.chat.clone());
                        self.dispatcher
                            .dispatch_message(inbound.chat.as_ref(), &inbound.message)
                            .await;
                    }
                    None => break,
                },
            }
        }
        tracing::info!("{}", logs::SHUTDOWN);
        Ok(())
    }
}
