//! Multi Select Prompt
//!
//! Checkbox list: space toggles the highlighted option, `a` toggles all,
//! return submits the checked values in option order.

use crossterm::style::Stylize;

use super::select::SelectOption;
use super::{bar, bar_end, title, S_CHECKBOX, S_CHECKBOX_SELECTED};
use crate::error::{PromptError, Result};
use crate::prompt::cursor::{step_down, step_up};
use crate::prompt::{Effect, FrameContext, Prompt, PromptState, Renderer};
use crate::terminal::Action;

const REQUIRED_MESSAGE: &str = "Please select at least one option. Press space to select, enter to submit";

pub struct MultiSelectPrompt<T> {
    message: String,
    options: Vec<SelectOption<T>>,
    checked: Vec<bool>,
    cursor: usize,
    required: bool,
    renderer: Option<Renderer<MultiSelectPrompt<T>>>,
}

impl<T: Clone> MultiSelectPrompt<T> {
    /// At least one option must be checked unless [`required(false)`](Self::required)
    pub fn new(message: impl Into<String>, options: Vec<SelectOption<T>>) -> Result<Self> {
        if options.is_empty() {
            return Err(PromptError::NoOptions("multiselect"));
        }
        Ok(Self {
            message: message.into(),
            checked: vec![false; options.len()],
            options,
            cursor: 0,
            required: true,
            renderer: None,
        })
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Pre-check every option whose value is listed
    pub fn initial_values(mut self, values: &[T]) -> Self
    where
        T: PartialEq,
    {
        for (option, checked) in self.options.iter().zip(self.checked.iter_mut()) {
            *checked = values.contains(&option.value);
        }
        self
    }

    /// Start with the cursor on the option holding `value`
    pub fn cursor_at(mut self, value: &T) -> Self
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
        renderer: impl Fn(&MultiSelectPrompt<T>, &FrameContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn options(&self) -> &[SelectOption<T>] {
        &self.options
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    fn toggle_all(&mut self) {
        let all = self.checked.iter().all(|c| *c);
        self.checked.iter_mut().for_each(|c| *c = !all);
    }

    fn checked_labels(&self) -> String {
        self.options
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(option, _)| option.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn row(&self, index: usize, gutter: &str) -> String {
        let option = &self.options[index];
        let highlighted = index == self.cursor;
        let mark = match (self.checked[index], highlighted) {
            (true, _) => S_CHECKBOX_SELECTED.green().to_string(),
            (false, true) => S_CHECKBOX.cyan().to_string(),
            (false, false) => S_CHECKBOX.dim().to_string(),
        };
        let label = if highlighted {
            option.label_with_hint()
        } else {
            option.label.as_str().dim().to_string()
        };
        format!("{}  {} {}", gutter, mark, label)
    }

    fn default_render(&self, frame: &FrameContext<'_>) -> String {
        let state = frame.state;
        let title = title(state, &self.message);
        match state {
            PromptState::Submit => format!("{}{}  {}", title, bar(state), self.checked_labels().dim()),
            PromptState::Cancel => {
                let labels = self.checked_labels();
                let mut frame = format!("{}{}  {}", title, bar(state), labels.as_str().dim().crossed_out());
                if !labels.is_empty() {
                    frame.push_str(&format!("\n{}", bar(state)));
                }
                frame
            }
            _ => {
                let gutter = bar(state);
                let rows: Vec<String> = (0..self.options.len()).map(|i| self.row(i, &gutter)).collect();
                let footer = match frame.error {
                    Some(error) => format!("{}  {}", bar_end(state), error.yellow()),
                    None => bar_end(state),
                };
                format!("{}{}\n{}\n", title, rows.join("\n"), footer)
            }
        }
    }
}

impl<T: Clone> Prompt for MultiSelectPrompt<T> {
    type Value = Vec<T>;

    fn value(&self) -> Vec<T> {
        self.options
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(option, _)| option.value.clone())
            .collect()
    }

    fn on(&mut self, action: &Action) -> Effect {
        match action {
            Action::Up | Action::Left => self.cursor = step_up(self.cursor, self.options.len()),
            Action::Down | Action::Right => self.cursor = step_down(self.cursor, self.options.len()),
            action if action.is_space() => self.checked[self.cursor] = !self.checked[self.cursor],
            action if action.as_char() == Some('a') => self.toggle_all(),
            _ => {}
        }
        Effect::Redraw
    }

    fn validate(&self, value: &Vec<T>) -> Option<String> {
        (self.required && value.is_empty()).then(|| REQUIRED_MESSAGE.to_string())
    }

    fn render(&self, frame: &FrameContext<'_>) -> String {
        match &self.renderer {
            Some(renderer) => renderer(self, frame),
            None => self.default_render(frame),
        }
    }
}
