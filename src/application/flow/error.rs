//! # Flow Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    /// The body already returned; nothing is left to resume.
    #[error("flow instance already terminated")]
    AlreadyTerminated,

    /// `advance` was called on a body that is parked waiting for input.
    #[error("flow instance is suspended and needs an input to continue")]
    AwaitingInput,

    /// `resume` was called before the body reached its first suspension.
    #[error("flow instance has not been started")]
    NotStarted,

    #[error("flow '{flow}' is already running for key {key}")]
    AlreadyRunning { flow: String, key: String },

    /// The body itself failed.
    #[error(transparent)]
    Body(#[from] anyhow::Error),
}
