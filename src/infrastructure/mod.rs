//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the `ChatProvider` trait defined in the Domain layer.

pub mod console;
pub mod matrix;

#[cfg(test)]
pub mod memory;
