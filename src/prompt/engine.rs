//! Prompt Engine Module
//!
//! The generic lifecycle shared by every prompt type. A concrete prompt
//! supplies a render function and an action handler through the [`Prompt`]
//! trait; [`PromptSession`] owns the state machine, feeds it one key at a
//! time, and redraws after every action.
//!
//! ```text
//! initial --(first event)--> active
//! active  --(submit, valid)--> submit        (terminal)
//! active  --(submit, invalid)--> error
//! error   --(any event)--> active
//! active | error --(cancel)--> cancel        (terminal)
//! ```

use std::io::{self, Write};

use tracing::{debug, trace};

use super::state::{Effect, FrameContext, PromptState};
use crate::config::EngineConfig;
use crate::error::{PromptError, Result};
use crate::terminal::{
    open_keys, Action, CaptureOptions, CrosstermControl, FrameWriter, InputMode, KeyInterpreter,
    KeySource, RawCapture, TerminalControl,
};

/// Validation callback: `Some(message)` rejects the value
pub type Validator<T> = Box<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Custom render callback for a prompt type
pub type Renderer<P> = Box<dyn Fn(&P, &FrameContext<'_>) -> String + Send + Sync>;

/// A concrete prompt: a value, a handler for actions, and a render function
pub trait Prompt {
    type Value: Clone;

    /// How printable keys are treated; text-entry prompts return `Text`
    fn input_mode(&self) -> InputMode {
        InputMode::Navigation
    }

    /// The value as it would be returned right now
    fn value(&self) -> Self::Value;

    /// Apply a navigation or insert action
    ///
    /// `Submit` and `Cancel` are handled by the engine and never reach here.
    fn on(&mut self, action: &Action) -> Effect;

    /// Called when submission is attempted, before validation
    fn on_submit(&mut self) {}

    fn validate(&self, _value: &Self::Value) -> Option<String> {
        None
    }

    /// Full frame text for the current state; must be a pure function
    fn render(&self, frame: &FrameContext<'_>) -> String;
}

/// Result of a finished prompt session
///
/// Cancellation is a value, not an error, so callers test for it with
/// [`is_cancel`] instead of handling a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Submitted(T),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_cancel(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// The submitted value, `None` if cancelled
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Submitted(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }
}

/// Whether a prompt result is the cancellation outcome
pub fn is_cancel<T>(outcome: &Outcome<T>) -> bool {
    outcome.is_cancel()
}

/// One interactive run of a prompt
pub struct PromptSession<P: Prompt> {
    prompt: P,
    state: PromptState,
    error: Option<String>,
    interpreter: KeyInterpreter,
    capture: CaptureOptions,
    resized: bool,
}

impl<P: Prompt> PromptSession<P> {
    pub fn new(prompt: P) -> Self {
        Self::with_config(prompt, &EngineConfig::default())
    }

    pub fn with_config(prompt: P, config: &EngineConfig) -> Self {
        Self {
            prompt,
            state: PromptState::Initial,
            error: None,
            interpreter: config.interpreter(),
            capture: config.capture,
            resized: false,
        }
    }

    pub fn state(&self) -> PromptState {
        self.state
    }

    /// Message of the current error state, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    pub fn into_prompt(self) -> P {
        self.prompt
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Render the current frame
    pub fn frame(&self) -> String {
        self.prompt
            .render(&FrameContext::new(self.state, self.error.as_deref()))
    }

    /// The outcome once a terminal state is reached
    pub fn outcome(&self) -> Option<Outcome<P::Value>> {
        match self.state {
            PromptState::Submit => Some(Outcome::Submitted(self.prompt.value())),
            PromptState::Cancel => Some(Outcome::Cancelled),
            _ => None,
        }
    }

    /// Feed one semantic action through the state machine
    ///
    /// Actions after a terminal state are ignored.
    pub fn dispatch(&mut self, action: Action) {
        if self.state.is_terminal() {
            return;
        }
        if matches!(self.state, PromptState::Initial | PromptState::Error) {
            self.error = None;
            self.transition(PromptState::Active);
        }

        match action {
            Action::Cancel => self.transition(PromptState::Cancel),
            Action::Submit => self.submit(),
            other => match self.prompt.on(&other) {
                Effect::Redraw => {}
                Effect::Resize => self.resized = true,
                Effect::Submit => self.submit(),
                Effect::Fail(message) => self.fail(message),
            },
        }
    }

    /// Whether the last action changed the frame's shape; clears the flag
    pub fn take_resize(&mut self) -> bool {
        std::mem::take(&mut self.resized)
    }

    /// Run against the process terminal
    pub async fn prompt_terminal(&mut self) -> Result<Outcome<P::Value>> {
        let control = CrosstermControl;
        let mut keys = open_keys(&control);
        self.run(&mut keys, io::stdout(), control).await
    }

    /// Run the interactive session until submit or cancel
    ///
    /// The terminal is captured for the duration and restored on every exit
    /// path, including errors. Closed input counts as a cancel.
    pub async fn run<K, W, C>(&mut self, keys: &mut K, mut out: W, control: C) -> Result<Outcome<P::Value>>
    where
        K: KeySource + ?Sized,
        W: Write,
        C: TerminalControl,
    {
        if self.state.is_terminal() {
            return Err(PromptError::Finished);
        }

        let mut capture = RawCapture::acquire(self.capture, control, &mut out)?;
        let mut writer = FrameWriter::new(out);

        let driven = self.drive(keys, &mut writer).await;
        let released = capture.release(writer.get_mut());

        let outcome = driven?;
        released.map_err(|e| PromptError::Terminal(e.to_string()))?;
        Ok(outcome)
    }

    async fn drive<K, W>(&mut self, keys: &mut K, writer: &mut FrameWriter<W>) -> Result<Outcome<P::Value>>
    where
        K: KeySource + ?Sized,
        W: Write,
    {
        writer.draw(&self.frame())?;

        while !self.state.is_terminal() {
            let Some(key) = keys.next_key().await else {
                debug!("input closed; cancelling prompt");
                self.dispatch(Action::Cancel);
                break;
            };

            let Some(action) = self.interpreter.interpret(&key, self.prompt.input_mode()) else {
                trace!(raw = ?key.raw, "key dropped");
                continue;
            };

            self.dispatch(action);
            if self.take_resize() {
                writer.invalidate();
            }
            if !self.state.is_terminal() {
                writer.draw(&self.frame())?;
            }
        }

        writer.finish(&self.frame())?;
        self.outcome().ok_or(PromptError::Finished)
    }

    fn submit(&mut self) {
        self.prompt.on_submit();
        let value = self.prompt.value();
        match self.prompt.validate(&value) {
            Some(message) => self.fail(message),
            None => self.transition(PromptState::Submit),
        }
    }

    fn fail(&mut self, message: String) {
        debug!(%message, "prompt entered error state");
        self.error = Some(message);
        self.transition(PromptState::Error);
    }

    fn transition(&mut self, next: PromptState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "prompt state changed");
            self.state = next;
        }
    }
}

/// Ask a prompt on the process terminal with configuration from the environment
pub async fn ask<P: Prompt>(prompt: P) -> Result<Outcome<P::Value>> {
    let config = EngineConfig::from_env()?;
    ask_with(prompt, &config).await
}

/// Ask a prompt on the process terminal with explicit configuration
pub async fn ask_with<P: Prompt>(prompt: P, config: &EngineConfig) -> Result<Outcome<P::Value>> {
    PromptSession::with_config(prompt, config).prompt_terminal().await
}
