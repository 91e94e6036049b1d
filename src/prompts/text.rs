//! Text Prompt
//!
//! Free-form single-line input with a movable cursor, an optional
//! placeholder, and a default substituted when nothing was typed.

use super::{line_frame, placeholder};
use crate::prompt::{Effect, FrameContext, LineBuffer, Prompt, Renderer, Validator};
use crate::terminal::{Action, InputMode};

/// Ask for a line of text
pub struct TextPrompt {
    message: String,
    placeholder: Option<String>,
    default_value: Option<String>,
    line: LineBuffer,
    validator: Option<Validator<String>>,
    renderer: Option<Renderer<TextPrompt>>,
}

impl TextPrompt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            placeholder: None,
            default_value: None,
            line: LineBuffer::new(),
            validator: None,
            renderer: None,
        }
    }

    /// Hint shown while the input is empty; never submitted
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    /// Value submitted when the input is left empty
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Pre-filled, editable text with the cursor at its end
    pub fn initial_value(mut self, value: &str) -> Self {
        self.line.set_text(value);
        self
    }

    pub fn validate(mut self, validator: impl Fn(&String) -> Option<String> + Send + Sync + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn render_with(
        mut self,
        renderer: impl Fn(&TextPrompt, &FrameContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    /// Current text with the cursor position highlighted
    pub fn value_with_cursor(&self) -> String {
        self.line.with_cursor()
    }

    fn default_render(&self, frame: &FrameContext<'_>) -> String {
        let editing = match (&self.placeholder, self.line.is_empty()) {
            (Some(hint), true) => placeholder(hint),
            _ => self.value_with_cursor(),
        };
        line_frame(frame.state, &self.message, &editing, &self.line.text(), frame.error)
    }
}

/// Shared editing keys for single-line prompts
pub(crate) fn edit_line(line: &mut LineBuffer, action: &Action) {
    match action {
        Action::Left => line.move_left(),
        Action::Right => line.move_right(),
        action if action.is_backspace() => line.backspace(),
        action if action.is_delete() => line.delete(),
        Action::Insert { text, .. } => line.insert(text),
        _ => {}
    }
}

impl Prompt for TextPrompt {
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

    fn on_submit(&mut self) {
        if self.line.is_empty() {
            if let Some(default) = &self.default_value {
                self.line.set_text(default);
            }
        }
    }

    fn validate(&self, value: &String) -> Option<String> {
        self.validator.as_ref().and_then(|validate| validate(value))
    }

    fn render(&self, frame: &FrameContext<'_>) -> String {
        match &self.renderer {
            Some(renderer) => renderer(self, frame),
            None => self.default_render(frame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{Outcome, PromptSession, PromptState};
    use crate::prompt::line::end_cursor;
    use crate::terminal::KeyPress;
    use crate::testing::{run_scripted, typed};
    use crossterm::style::Stylize;
    use pretty_assertions::assert_eq;

    fn insert(text: &str) -> Action {
        Action::Insert {
            text: text.to_string(),
            sequence: Some(text.to_string()),
        }
    }

    #[test]
    fn test_initial_value() {
        let prompt = TextPrompt::new("Name").initial_value("Ada");
        assert_eq!(prompt.value(), "Ada");
        assert_eq!(prompt.line().cursor(), 3);
    }

    #[test]
    fn test_cursor_moves_with_edits() {
        let mut prompt = TextPrompt::new("Name");
        prompt.on(&insert("a"));
        prompt.on(&insert("c"));
        prompt.on(&Action::Left);
        prompt.on(&insert("b"));
        assert_eq!(prompt.value(), "abc");
        assert_eq!(prompt.value_with_cursor(), format!("ab{}", "c".reverse()));

        prompt.on(&Action::Right);
        assert_eq!(prompt.value_with_cursor(), format!("abc{}", end_cursor()));
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut prompt = TextPrompt::new("Name").initial_value("abcd");
        prompt.on(&Action::Insert {
            text: String::new(),
            sequence: Some("\x7f".to_string()),
        });
        assert_eq!(prompt.value(), "abc");

        prompt.on(&Action::Left);
        prompt.on(&Action::Left);
        prompt.on(&Action::Insert {
            text: String::new(),
            sequence: Some("\x1b[3~".to_string()),
        });
        assert_eq!(prompt.value(), "ac");
    }

    #[test]
    fn test_default_value_used_when_empty() {
        let mut session = PromptSession::new(TextPrompt::new("Name").default_value("anonymous"));
        session.dispatch(Action::Submit);
        assert_eq!(session.outcome(), Some(Outcome::Submitted("anonymous".to_string())));
    }

    #[test]
    fn test_default_value_ignored_when_typed() {
        let mut session = PromptSession::new(TextPrompt::new("Name").default_value("anonymous"));
        session.dispatch(insert("x"));
        session.dispatch(Action::Submit);
        assert_eq!(session.outcome(), Some(Outcome::Submitted("x".to_string())));
    }

    #[test]
    fn test_placeholder_only_while_empty() {
        let mut prompt = TextPrompt::new("Name").placeholder("your name");
        let frame = prompt.render(&FrameContext::new(PromptState::Initial, None));
        assert!(frame.contains(&placeholder("your name")));

        prompt.on(&insert("A"));
        let frame = prompt.render(&FrameContext::new(PromptState::Active, None));
        assert!(!frame.contains("our name"));
    }

    #[test]
    fn test_placeholder_not_submitted() {
        let mut session = PromptSession::new(TextPrompt::new("Name").placeholder("your name"));
        session.dispatch(Action::Submit);
        assert_eq!(session.outcome(), Some(Outcome::Submitted(String::new())));
    }

    #[test]
    fn test_validation_message_rendered() {
        let mut session = PromptSession::new(TextPrompt::new("Name").validate(|v| {
            if v.len() < 3 {
                Some("too short".to_string())
            } else {
                None
            }
        }));
        session.dispatch(insert("ab"));
        session.dispatch(Action::Submit);
        assert_eq!(session.state(), PromptState::Error);
        assert!(session.frame().contains("too short"));

        session.dispatch(insert("c"));
        session.dispatch(Action::Submit);
        assert_eq!(session.outcome(), Some(Outcome::Submitted("abc".to_string())));
    }

    #[tokio::test]
    async fn test_typed_letters_are_not_navigation() {
        // `k` and `j` would be aliases in navigation prompts
        let config = crate::config::EngineConfig::new()
            .with_alias("k", crate::terminal::Intent::Up)
            .with_alias("j", crate::terminal::Intent::Down);
        let mut keys = typed("jk");
        keys.push(KeyPress::named("return"));

        let run = crate::testing::run_scripted_with(TextPrompt::new("Name"), keys, &config)
            .await
            .unwrap();
        assert_eq!(run.outcome, Outcome::Submitted("jk".to_string()));
    }

    #[tokio::test]
    async fn test_escape_cancels() {
        let mut keys = typed("hello");
        keys.push(KeyPress::named("escape"));

        let run = run_scripted(TextPrompt::new("Name"), keys).await.unwrap();
        assert!(run.outcome.is_cancel());
        assert_eq!(run.state, PromptState::Cancel);
        assert!(run.final_frame.contains("hello"));
        assert!(!run.terminal.is_raw_now());
    }
}
