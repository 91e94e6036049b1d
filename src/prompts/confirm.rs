//! Yes/no prompt. Arrow keys toggle; `y` or `n` answers immediately.

use crossterm::style::Stylize;

use super::{bar, bar_end, title, S_RADIO_ACTIVE, S_RADIO_INACTIVE};
use crate::prompt::{Effect, FrameContext, Prompt, PromptState, Renderer};
use crate::terminal::Action;

pub struct ConfirmPrompt {
    message: String,
    active: String,
    inactive: String,
    value: bool,
    renderer: Option<Renderer<ConfirmPrompt>>,
}

impl ConfirmPrompt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            active: "Yes".to_string(),
            inactive: "No".to_string(),
            value: true,
            renderer: None,
        }
    }

    /// Labels for the `true` and `false` answers
    pub fn labels(mut self, active: impl Into<String>, inactive: impl Into<String>) -> Self {
        self.active = active.into();
        self.inactive = inactive.into();
        self
    }

    pub fn initial_value(mut self, value: bool) -> Self {
        self.value = value;
        self
    }

    pub fn render_with(
        mut self,
        renderer: impl Fn(&ConfirmPrompt, &FrameContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Label of the current answer
    pub fn label(&self) -> &str {
        if self.value {
            &self.active
        } else {
            &self.inactive
        }
    }

    fn choice(&self, label: &str, chosen: bool) -> String {
        if chosen {
            format!("{} {}", S_RADIO_ACTIVE.green(), label)
        } else {
            format!("{} {}", S_RADIO_INACTIVE.dim(), label.dim())
        }
    }

    fn default_render(&self, frame: &FrameContext<'_>) -> String {
        let state = frame.state;
        let title = title(state, &self.message);
        match state {
            PromptState::Submit => format!("{}{}  {}", title, bar(state), self.label().dim()),
            PromptState::Cancel => format!(
                "{}{}  {}\n{}",
                title,
                bar(state),
                self.label().dim().crossed_out(),
                bar(state)
            ),
            _ => format!(
                "{}{}  {} / {}\n{}\n",
                title,
                bar(state),
                self.choice(&self.active, self.value),
                self.choice(&self.inactive, !self.value),
                bar_end(state)
            ),
        }
    }
}

impl Prompt for ConfirmPrompt {
    type Value = bool;

    fn value(&self) -> bool {
        self.value
    }

    fn on(&mut self, action: &Action) -> Effect {
        match action {
            Action::Up | Action::Down | Action::Left | Action::Right => {
                self.value = !self.value;
                Effect::Redraw
            }
            other => match other.as_char().map(|c| c.to_ascii_lowercase()) {
                Some('y') => {
                    self.value = true;
                    Effect::Submit
                }
                Some('n') => {
                    self.value = false;
                    Effect::Submit
                }
                _ => Effect::Redraw,
            },
        }
    }

    fn render(&self, frame: &FrameContext<'_>) -> String {
        match &self.renderer {
            Some(renderer) => renderer(self, frame),
            None => self.default_render(frame),
        }
    }
}
