//! # Message Flows
//!
//! Lets a handler write a multi-turn conversation as one linear async body
//! that suspends between messages. Each flow keeps one instance per
//! conversation key.

pub mod coroutine;
pub mod engine;
pub mod error;
pub mod registry;

pub use coroutine::Suspender;
pub use engine::Flow;
pub use error::FlowError;
