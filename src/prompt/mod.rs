//! Prompt Core Module
//!
//! The state machine, cursor arithmetic, line editing and the hierarchical
//! path tree that concrete prompts are built from.

pub mod cursor;
pub mod engine;
pub mod line;
pub mod state;
pub mod tree;

pub use engine::{ask, ask_with, is_cancel, Outcome, Prompt, PromptSession, Renderer, Validator};
pub use line::LineBuffer;
pub use state::{Effect, FrameContext, PromptState};
pub use tree::{DirectoryLister, FsLister, ListedEntry, Movement, NodeId, PathTree, TreeRow};
