//! Select Key Prompt
//!
//! Each option is bound to a single key; pressing it picks that option and
//! submits at once. Arrows and return still work as in a normal select.

use crossterm::style::Stylize;

use super::select::SelectOption;
use super::{bar, bar_end, title};
use crate::error::{PromptError, Result};
use crate::prompt::cursor::{step_down, step_up};
use crate::prompt::{Effect, FrameContext, Prompt, PromptState, Renderer};
use crate::terminal::Action;

pub struct SelectKeyPrompt<T> {
    message: String,
    options: Vec<(char, SelectOption<T>)>,
    cursor: usize,
    renderer: Option<Renderer<SelectKeyPrompt<T>>>,
}

impl<T: Clone> SelectKeyPrompt<T> {
    /// Keys are matched case-insensitively
    pub fn new(message: impl Into<String>, options: Vec<(char, SelectOption<T>)>) -> Result<Self> {
        if options.is_empty() {
            return Err(PromptError::NoOptions("select-key"));
        }
        Ok(Self {
            message: message.into(),
            options,
            cursor: 0,
            renderer: None,
        })
    }

    pub fn render_with(
        mut self,
        renderer: impl Fn(&SelectKeyPrompt<T>, &FrameContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn options(&self) -> &[(char, SelectOption<T>)] {
        &self.options
    }

    pub fn selected(&self) -> &SelectOption<T> {
        &self.options[self.cursor].1
    }

    fn position_of(&self, key: char) -> Option<usize> {
        let key = key.to_lowercase().next().unwrap_or(key);
        self.options
            .iter()
            .position(|(k, _)| k.to_lowercase().next().unwrap_or(*k) == key)
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
                let gutter = bar(state);
                let rows: Vec<String> = self
                    .options
                    .iter()
                    .enumerate()
                    .map(|(i, (key, option))| {
                        let key = format!(" {} ", key);
                        if i == self.cursor {
                            format!("{}  {} {}", gutter, key.cyan().reverse(), option.label_with_hint())
                        } else {
                            format!("{}  {} {}", gutter, key.dark_grey().reverse(), option.label)
                        }
                    })
                    .collect();
                format!("{}{}\n{}\n", title, rows.join("\n"), bar_end(state))
            }
        }
    }
}

impl<T: Clone> Prompt for SelectKeyPrompt<T> {
    type Value = T;

    fn value(&self) -> T {
        self.selected().value.clone()
    }

    fn on(&mut self, action: &Action) -> Effect {
        match action {
            Action::Up | Action::Left => self.cursor = step_up(self.cursor, self.options.len()),
            Action::Down | Action::Right => self.cursor = step_down(self.cursor, self.options.len()),
            other => {
                if let Some(index) = other.as_char().and_then(|c| self.position_of(c)) {
                    self.cursor = index;
                    return Effect::Submit;
                }
            }
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
