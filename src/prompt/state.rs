//! Prompt lifecycle states and the effects a prompt handler can request.

use std::fmt;

/// Lifecycle state of a prompt session; only the engine changes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptState {
    #[default]
    Initial,
    Active,
    /// Accepted completion (terminal)
    Submit,
    /// Aborted by the user (terminal)
    Cancel,
    /// Validation or collaborator failure; the next event returns to `Active`
    Error,
}

impl PromptState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PromptState::Submit | PromptState::Cancel)
    }
}

impl fmt::Display for PromptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PromptState::Initial => "initial",
            PromptState::Active => "active",
            PromptState::Submit => "submit",
            PromptState::Cancel => "cancel",
            PromptState::Error => "error",
        };
        f.write_str(name)
    }
}

/// What a prompt handler asks the engine to do after an action
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Effect {
    /// Re-render (always happens anyway)
    #[default]
    Redraw,
    /// Frame height changed; repaint fully instead of diffing
    Resize,
    /// Submit now, as if return was pressed
    Submit,
    /// A collaborator failed; show the message in the error state
    Fail(String),
}

/// Inputs a render function sees besides the prompt itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext<'a> {
    pub state: PromptState,
    pub error: Option<&'a str>,
}

impl<'a> FrameContext<'a> {
    pub fn new(state: PromptState, error: Option<&'a str>) -> Self {
        Self { state, error }
    }
}
