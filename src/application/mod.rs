//! # Application Layer
//!
//! Contains the core logic and orchestration of the bot.
//! This includes the message flow engine, plugin dispatch, the bot loop and logging setup.

pub mod bot;
pub mod dispatch;
pub mod flow;
pub mod logging;
