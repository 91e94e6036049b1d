//! keyprompt - interactive terminal prompts
//!
//! A small engine for asking questions on a terminal: raw key capture,
//! a key interpreter with configurable aliases, a prompt state machine,
//! in-place frame redraw, and flat or hierarchical cursor navigation.
//!
//! # Features
//!
//! - **Raw capture**: Raw mode and cursor hiding, restored on every exit path
//! - **Key aliases**: Map keys like `k`/`j` or `q` to navigation or cancel
//! - **State machine**: `initial`, `active`, `error`, `submit`, `cancel`
//! - **Diffing redraw**: Only changed lines are rewritten
//! - **Prompts**: Text, password, confirm, select, select-key, multi-select, grouped multi-select, path
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use keyprompt::prompts::TextPrompt;
//! use keyprompt::{ask, is_cancel};
//!
//! # async fn demo() -> keyprompt::Result<()> {
//! let outcome = ask(TextPrompt::new("What is your name?").placeholder("Ada")).await?;
//! if is_cancel(&outcome) {
//!     println!("Cancelled");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Cancellation is an [`Outcome`] value rather than an error, so a caller
//! always has to decide what a cancelled answer means.

pub mod config;
pub mod error;
pub mod prompt;
pub mod prompts;
pub mod terminal;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use config::EngineConfig;
pub use error::{PromptError, Result};
pub use prompt::{ask, ask_with, is_cancel, Outcome, Prompt, PromptSession, PromptState};
pub use terminal::{block, AbortPolicy, BlockOutcome, CaptureOptions, KeyPress};
