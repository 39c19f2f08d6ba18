//! # Interface Layer
//!
//! The bot's user-facing features, implemented as plugins on top of the
//! application layer.

pub mod plugins;
