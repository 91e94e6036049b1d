//! Error Types
//!
//! Failures that escape a prompt session. Validation failures and user
//! cancellation are deliberately absent: the first is an in-session state,
//! the second is an [`Outcome`](crate::prompt::Outcome) variant.

use std::io;

use thiserror::Error;

/// Errors surfaced by the prompt engine
#[derive(Debug, Error)]
pub enum PromptError {
    /// Writing a frame or reading input failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The terminal could not be switched into or out of raw mode
    #[error("terminal mode change failed: {0}")]
    Terminal(String),

    /// Configuration could not be read or is malformed
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A choice prompt was built without anything to choose
    #[error("{0} prompt needs at least one option")]
    NoOptions(&'static str),

    /// The session was already finished when `run` was called
    #[error("prompt session already finished")]
    Finished,
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::Config(err.to_string())
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, PromptError>;
