//! Group Multi Select Prompt
//!
//! Checkbox list split into named groups. The cursor walks group headers
//! and options as one flat list; space on a header checks every option in
//! that group, or clears them all when the group is already complete.

use std::ops::Range;

use crossterm::style::Stylize;

use super::select::SelectOption;
use super::{bar, bar_end, title, S_BAR, S_BAR_END, S_CHECKBOX, S_CHECKBOX_SELECTED};
use crate::error::{PromptError, Result};
use crate::prompt::cursor::{step_down, step_up};
use crate::prompt::{Effect, FrameContext, Prompt, PromptState, Renderer};
use crate::terminal::Action;

const REQUIRED_MESSAGE: &str = "Please select at least one option. Press space to select, enter to submit";

/// One line of the flattened list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRow {
    /// Header of the group at this index
    Header(usize),
    /// Option at this index into the flattened option list
    Option(usize),
}

struct Group {
    name: String,
    members: Range<usize>,
}

pub struct GroupMultiSelectPrompt<T> {
    message: String,
    groups: Vec<Group>,
    options: Vec<SelectOption<T>>,
    checked: Vec<bool>,
    rows: Vec<GroupRow>,
    cursor: usize,
    required: bool,
    renderer: Option<Renderer<GroupMultiSelectPrompt<T>>>,
}

impl<T: Clone> GroupMultiSelectPrompt<T> {
    /// Groups are shown in the order given; at least one option is needed overall
    pub fn new<G>(message: impl Into<String>, groups: G) -> Result<Self>
    where
        G: IntoIterator<Item = (String, Vec<SelectOption<T>>)>,
    {
        let mut options = Vec::new();
        let mut group_list = Vec::new();
        let mut rows = Vec::new();

        for (name, members) in groups {
            rows.push(GroupRow::Header(group_list.len()));
            let start = options.len();
            for option in members {
                rows.push(GroupRow::Option(options.len()));
                options.push(option);
            }
            group_list.push(Group {
                name,
                members: start..options.len(),
            });
        }

        if options.is_empty() {
            return Err(PromptError::NoOptions("group multiselect"));
        }

        Ok(Self {
            message: message.into(),
            groups: group_list,
            checked: vec![false; options.len()],
            options,
            rows,
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

    pub fn render_with(
        mut self,
        renderer: impl Fn(&GroupMultiSelectPrompt<T>, &FrameContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn rows(&self) -> &[GroupRow] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn options(&self) -> &[SelectOption<T>] {
        &self.options
    }

    pub fn group_name(&self, group: usize) -> &str {
        &self.groups[group].name
    }

    pub fn is_checked(&self, option: usize) -> bool {
        self.checked.get(option).copied().unwrap_or(false)
    }

    /// A group is complete when it has members and all of them are checked
    pub fn is_group_checked(&self, group: usize) -> bool {
        let members = self.groups[group].members.clone();
        !members.is_empty() && self.checked[members].iter().all(|c| *c)
    }

    fn toggle_row(&mut self) {
        match self.rows[self.cursor] {
            GroupRow::Header(group) => {
                let fill = !self.is_group_checked(group);
                let members = self.groups[group].members.clone();
                self.checked[members].iter_mut().for_each(|c| *c = fill);
            }
            GroupRow::Option(index) => self.checked[index] = !self.checked[index],
        }
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

    fn checkbox(checked: bool, highlighted: bool) -> String {
        match (checked, highlighted) {
            (true, _) => S_CHECKBOX_SELECTED.green().to_string(),
            (false, true) => S_CHECKBOX.cyan().to_string(),
            (false, false) => S_CHECKBOX.dim().to_string(),
        }
    }

    fn row(&self, position: usize, gutter: &str) -> String {
        let highlighted = position == self.cursor;
        match self.rows[position] {
            GroupRow::Header(group) => {
                let mark = Self::checkbox(self.is_group_checked(group), highlighted);
                let name = self.groups[group].name.as_str();
                let name = if highlighted { name.to_string() } else { name.dim().to_string() };
                format!("{}  {} {}", gutter, mark, name)
            }
            GroupRow::Option(index) => {
                let option = &self.options[index];
                let last = !matches!(self.rows.get(position + 1), Some(GroupRow::Option(_)));
                let branch = if last { S_BAR_END } else { S_BAR };
                let mark = Self::checkbox(self.checked[index], highlighted);
                let label = if highlighted {
                    option.label_with_hint()
                } else {
                    option.label.as_str().dim().to_string()
                };
                format!("{}  {} {} {}", gutter, branch.dim(), mark, label)
            }
        }
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
                let rows: Vec<String> = (0..self.rows.len()).map(|i| self.row(i, &gutter)).collect();
                let footer = match frame.error {
                    Some(error) => format!("{}  {}", bar_end(state), error.yellow()),
                    None => bar_end(state),
                };
                format!("{}{}\n{}\n", title, rows.join("\n"), footer)
            }
        }
    }
}

impl<T: Clone> Prompt for GroupMultiSelectPrompt<T> {
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
            Action::Up | Action::Left => self.cursor = step_up(self.cursor, self.rows.len()),
            Action::Down | Action::Right => self.cursor = step_down(self.cursor, self.rows.len()),
            action if action.is_space() => self.toggle_row(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{Outcome, PromptSession};
    use crate::terminal::KeyPress;
    use crate::testing::run_scripted;
    use pretty_assertions::assert_eq;

    fn stack() -> Vec<(String, Vec<SelectOption<&'static str>>)> {
        vec![
            (
                "Frontend".to_string(),
                vec![SelectOption::new("react", "React"), SelectOption::new("vue", "Vue")],
            ),
            (
                "Backend".to_string(),
                vec![
                    SelectOption::new("axum", "Axum"),
                    SelectOption::new("actix", "Actix"),
                    SelectOption::new("rocket", "Rocket"),
                ],
            ),
        ]
    }

    fn space() -> Action {
        Action::Insert {
            text: " ".to_string(),
            sequence: Some(" ".to_string()),
        }
    }

    #[test]
    fn test_rows_interleave_headers_and_options() {
        let prompt = GroupMultiSelectPrompt::new("Stack", stack()).unwrap();
        assert_eq!(
            prompt.rows(),
            &[
                GroupRow::Header(0),
                GroupRow::Option(0),
                GroupRow::Option(1),
                GroupRow::Header(1),
                GroupRow::Option(2),
                GroupRow::Option(3),
                GroupRow::Option(4),
            ]
        );
        assert_eq!(prompt.group_name(1), "Backend");
    }

    #[test]
    fn test_no_options_is_error() {
        let err = GroupMultiSelectPrompt::<u8>::new("Stack", vec![("Empty".to_string(), Vec::new())])
            .err()
            .unwrap();
        assert!(matches!(err, PromptError::NoOptions(_)));
    }

    #[test]
    fn test_header_toggles_whole_group() {
        let mut prompt = GroupMultiSelectPrompt::new("Stack", stack()).unwrap();
        prompt.on(&Action::Down);
        prompt.on(&Action::Down);
        prompt.on(&Action::Down);
        assert_eq!(prompt.rows()[prompt.cursor()], GroupRow::Header(1));

        prompt.on(&space());
        assert_eq!(prompt.value(), vec!["axum", "actix", "rocket"]);
        assert!(prompt.is_group_checked(1));
        assert!(!prompt.is_group_checked(0));

        prompt.on(&space());
        assert!(prompt.value().is_empty());
    }

    #[test]
    fn test_partial_group_fills_on_header() {
        let mut prompt = GroupMultiSelectPrompt::new("Stack", stack())
            .unwrap()
            .initial_values(&["vue"]);
        assert!(!prompt.is_group_checked(0));

        prompt.on(&space());
        assert_eq!(prompt.value(), vec!["react", "vue"]);
        assert!(prompt.is_group_checked(0));
    }

    #[test]
    fn test_option_toggle_completes_group() {
        let mut prompt = GroupMultiSelectPrompt::new("Stack", stack()).unwrap();
        prompt.on(&Action::Down);
        prompt.on(&space());
        prompt.on(&Action::Down);
        prompt.on(&space());
        assert!(prompt.is_group_checked(0));

        prompt.on(&space());
        assert_eq!(prompt.value(), vec!["react"]);
        assert!(!prompt.is_group_checked(0));
    }

    #[test]
    fn test_cursor_wraps_over_headers() {
        let mut prompt = GroupMultiSelectPrompt::new("Stack", stack()).unwrap();
        prompt.on(&Action::Up);
        assert_eq!(prompt.rows()[prompt.cursor()], GroupRow::Option(4));
        prompt.on(&Action::Down);
        assert_eq!(prompt.rows()[prompt.cursor()], GroupRow::Header(0));
    }

    #[test]
    fn test_required_blocks_empty_submit() {
        let mut session = PromptSession::new(GroupMultiSelectPrompt::new("Stack", stack()).unwrap());
        session.dispatch(Action::Submit);
        assert_eq!(session.state(), PromptState::Error);
        assert!(session.frame().contains("Please select at least one option"));

        session.dispatch(space());
        session.dispatch(Action::Submit);
        assert_eq!(session.outcome(), Some(Outcome::Submitted(vec!["react", "vue"])));
    }

    #[test]
    fn test_frame_lists_groups() {
        let session = PromptSession::new(GroupMultiSelectPrompt::new("Stack", stack()).unwrap().required(false));
        let frame = session.frame();
        assert!(frame.contains("Frontend"));
        assert!(frame.contains("Rocket"));
        // title (2) + 7 rows + footer
        assert_eq!(frame.lines().count(), 10);
    }

    #[tokio::test]
    async fn test_scripted_group_pick() {
        let prompt = GroupMultiSelectPrompt::new("Stack", stack()).unwrap();
        let keys = [
            KeyPress::named("down"),
            KeyPress::named("space"),
            KeyPress::named("down"),
            KeyPress::named("down"),
            KeyPress::named("space"),
            KeyPress::named("return"),
        ];
        let run = run_scripted(prompt, keys).await.unwrap();
        assert_eq!(run.outcome, Outcome::Submitted(vec!["react", "axum", "actix", "rocket"]));
        assert!(run.final_frame.contains("React, Axum, Actix, Rocket"));
    }
}
