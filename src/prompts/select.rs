//! Single-choice list prompt.

use crossterm::style::Stylize;

use super::{bar, bar_end, title, S_RADIO_ACTIVE, S_RADIO_INACTIVE};
use crate::error::{PromptError, Result};
use crate::prompt::cursor::{clamp, step_down, step_up};
use crate::prompt::{Effect, FrameContext, Prompt, PromptState, Renderer};
use crate::terminal::Action;

/// One choice: the value returned plus how it is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption<T> {
    pub value: T,
    pub label: String,
    pub hint: Option<String>,
}

impl<T> SelectOption<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Label with the hint appended, for the highlighted row
    pub(crate) fn label_with_hint(&self) -> String {
        match &self.hint {
            Some(hint) => format!("{} {}", self.label, format!("({})", hint).dim()),
            None => self.label.clone(),
        }
    }
}

/// Pick one option with up/down (or left/right), confirm with return
pub struct SelectPrompt<T> {
    message: String,
    options: Vec<SelectOption<T>>,
    cursor: usize,
    renderer: Option<Renderer<SelectPrompt<T>>>,
}

impl<T: Clone> SelectPrompt<T> {
    pub fn new(message: impl Into<String>, options: Vec<SelectOption<T>>) -> Result<Self> {
        if options.is_empty() {
            return Err(PromptError::NoOptions("select"));
        }
        Ok(Self {
            message: message.into(),
            options,
            cursor: 0,
            renderer: None,
        })
    }

    /// Start with the cursor on the option holding `value`
    pub fn initial_value(mut self, value: &T) -> Self
    where
        T: PartialEq,
    {
        if let Some(index) = self.options.iter().position(|o| &o.value == value) {
            self.cursor = index;
        }
        self
    }

    pub fn render_with(
        mut self,
        renderer: impl Fn(&SelectPrompt<T>, &FrameContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn options(&self) -> &[SelectOption<T>] {
        &self.options
    }

    pub fn cursor(&self) -> usize {
        clamp(self.cursor, self.options.len())
    }

    pub fn selected(&self) -> &SelectOption<T> {
        &self.options[self.cursor()]
    }

    fn default_render(&self, frame: &FrameContext<'_>) -> String {
        let state = frame.state;
        let title = title(state, &self.message);
        match state {
            PromptState::Submit => format!("{}{}  {}", title, bar(state), self.selected().label.as_str().dim()),
            PromptState::Cancel => format!(
                "{}{}  {}\n{}",
                title,
                bar(state),
                self.selected().label.as_str().dim().crossed_out(),
                bar(state)
            ),
            _ => {
                let rows = option_rows(&self.options, self.cursor(), &bar(state));
                format!("{}{}\n{}\n", title, rows, bar_end(state))
            }
        }
    }
}

/// One line per option, radio-marked, highlighted at `cursor`
pub(crate) fn option_rows<T>(options: &[SelectOption<T>], cursor: usize, gutter: &str) -> String {
    options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            if i == cursor {
                format!("{}  {} {}", gutter, S_RADIO_ACTIVE.green(), option.label_with_hint())
            } else {
                format!("{}  {} {}", gutter, S_RADIO_INACTIVE.dim(), option.label.as_str().dim())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl<T: Clone> Prompt for SelectPrompt<T> {
    type Value = T;

    fn value(&self) -> T {
        self.selected().value.clone()
    }

    fn on(&mut self, action: &Action) -> Effect {
        match action {
            Action::Up | Action::Left => self.cursor = step_up(self.cursor, self.options.len()),
            Action::Down | Action::Right => self.cursor = step_down(self.cursor, self.options.len()),
            _ => {}
        }
        Effect::Redraw
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
    use crate::terminal::KeyPress;
    use crate::testing::run_scripted;
    use pretty_assertions::assert_eq;

    fn colors() -> Vec<SelectOption<&'static str>> {
        vec![
            SelectOption::new("r", "Red"),
            SelectOption::new("g", "Green").with_hint("popular"),
            SelectOption::new("b", "Blue"),
        ]
    }

    #[test]
    fn test_empty_options_rejected() {
        let err = SelectPrompt::<u8>::new("Pick", Vec::new()).err().unwrap();
        assert!(matches!(err, PromptError::NoOptions("select")));
    }

    #[test]
    fn test_cursor_wraps() {
        let mut prompt = SelectPrompt::new("Pick", colors()).unwrap();
        prompt.on(&Action::Up);
        assert_eq!(prompt.value(), "b");
        prompt.on(&Action::Right);
        assert_eq!(prompt.value(), "r");
        prompt.on(&Action::Down);
        assert_eq!(prompt.value(), "g");
    }

    #[test]
    fn test_initial_value() {
        let prompt = SelectPrompt::new("Pick", colors()).unwrap().initial_value(&"b");
        assert_eq!(prompt.cursor(), 2);

        let unknown = SelectPrompt::new("Pick", colors()).unwrap().initial_value(&"x");
        assert_eq!(unknown.cursor(), 0);
    }

    #[test]
    fn test_render_shows_hint_only_when_highlighted() {
        let mut prompt = SelectPrompt::new("Pick", colors()).unwrap();
        let frame = prompt.render(&FrameContext::new(PromptState::Active, None));
        assert!(!frame.contains("popular"));

        prompt.on(&Action::Down);
        let frame = prompt.render(&FrameContext::new(PromptState::Active, None));
        assert!(frame.contains("popular"));
        assert_eq!(frame.lines().count(), 6);
    }

    #[test]
    fn test_custom_renderer() {
        let prompt = SelectPrompt::new("Pick", colors())
            .unwrap()
            .render_with(|p, frame| format!("{}:{}", frame.state, p.selected().label));
        assert_eq!(prompt.render(&FrameContext::new(PromptState::Initial, None)), "initial:Red");
    }

    #[tokio::test]
    async fn test_scripted_selection() {
        let prompt = SelectPrompt::new("Pick", colors()).unwrap();
        let run = run_scripted(prompt, [KeyPress::named("down"), KeyPress::named("down"), KeyPress::named("return")])
            .await
            .unwrap();
        assert_eq!(run.outcome.into_value(), Some("b"));
        assert!(run.final_frame.contains("Blue"));
    }
}
