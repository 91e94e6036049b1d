//! Masked text input.

use super::line_frame;
use super::text::edit_line;
use crate::prompt::{Effect, FrameContext, LineBuffer, Prompt, Renderer, Validator};
use crate::terminal::{Action, InputMode};

const DEFAULT_MASK: char = '▪';

/// Ask for a secret; every character is drawn as the mask glyph
pub struct PasswordPrompt {
    message: String,
    mask: char,
    line: LineBuffer,
    validator: Option<Validator<String>>,
    renderer: Option<Renderer<PasswordPrompt>>,
}

impl PasswordPrompt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            mask: DEFAULT_MASK,
            line: LineBuffer::new(),
            validator: None,
            renderer: None,
        }
    }

    pub fn mask(mut self, mask: char) -> Self {
        self.mask = mask;
        self
    }

    pub fn validate(mut self, validator: impl Fn(&String) -> Option<String> + Send + Sync + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn render_with(
        mut self,
        renderer: impl Fn(&PasswordPrompt, &FrameContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The masked text, one mask glyph per character
    pub fn masked(&self) -> String {
        std::iter::repeat(self.mask).take(self.line.len()).collect()
    }

    /// Masked text with the cursor position highlighted
    pub fn value_with_cursor(&self) -> String {
        self.line.masked_with_cursor(self.mask)
    }
}

impl Prompt for PasswordPrompt {
    type Value = String;

    fn input_mode(&self) -> InputMode {
        InputMode::Text
    }

    fn value(&self) -> String {
        self.line.text()
    }

    fn on(&mut self, action: &Action) -> Effect {
        edit_line(&mut self.line, action);
        Effect::Redraw
    }

    fn validate(&self, value: &String) -> Option<String> {
        self.validator.as_ref().and_then(|validate| validate(value))
    }

    fn render(&self, frame: &FrameContext<'_>) -> String {
        if let Some(renderer) = &self.renderer {
            return renderer(self, frame);
        }
        line_frame(frame.state, &self.message, &self.value_with_cursor(), &self.masked(), frame.error)
    }
}
