//! Concrete Prompts
//!
//! Ready-made prompt types built on the engine, plus the default frame
//! template they share. Every prompt accepts a custom render closure via
//! `render_with`; without one, frames look like this:
//!
//! ```text
//! │
//! ◆  What is your name?
//! │  Ada_
//! └
//! ```

pub mod confirm;
pub mod group_multiselect;
pub mod multiselect;
pub mod password;
pub mod path;
pub mod select;
pub mod select_key;
pub mod text;

pub use confirm::ConfirmPrompt;
pub use group_multiselect::{GroupMultiSelectPrompt, GroupRow};
pub use multiselect::MultiSelectPrompt;
pub use password::PasswordPrompt;
pub use path::PathPrompt;
pub use select::{SelectOption, SelectPrompt};
pub use select_key::SelectKeyPrompt;
pub use text::TextPrompt;

use std::ops::Range;

use crossterm::style::Stylize;

use crate::prompt::PromptState;

pub const S_BAR: &str = "│";
pub const S_BAR_END: &str = "└";
pub const S_RADIO_ACTIVE: &str = "●";
pub const S_RADIO_INACTIVE: &str = "○";
pub const S_CHECKBOX: &str = "◻";
pub const S_CHECKBOX_SELECTED: &str = "◼";

/// State marker shown before the message
pub fn symbol(state: PromptState) -> String {
    match state {
        PromptState::Initial | PromptState::Active => "◆".cyan().to_string(),
        PromptState::Cancel => "■".red().to_string(),
        PromptState::Error => "▲".yellow().to_string(),
        PromptState::Submit => "◇".green().to_string(),
    }
}

/// Left gutter bar, colored by state
pub fn bar(state: PromptState) -> String {
    match state {
        PromptState::Initial | PromptState::Active => S_BAR.cyan().to_string(),
        PromptState::Error => S_BAR.yellow().to_string(),
        PromptState::Submit | PromptState::Cancel => S_BAR.dark_grey().to_string(),
    }
}

/// Closing bar of an open frame, colored by state
pub fn bar_end(state: PromptState) -> String {
    match state {
        PromptState::Error => S_BAR_END.yellow().to_string(),
        _ => S_BAR_END.cyan().to_string(),
    }
}

/// Blank gutter line followed by the state symbol and message
pub fn title(state: PromptState, message: &str) -> String {
    format!("{}\n{}  {}\n", S_BAR.dark_grey(), symbol(state), message)
}

/// Placeholder text with its first character highlighted as the cursor
pub fn placeholder(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_string().reverse(), chars.as_str().dim()),
        None => crate::prompt::line::end_cursor(),
    }
}

/// Rows to show out of `len` so that `cursor` stays roughly centered
pub(crate) fn window(len: usize, cursor: usize, max: usize) -> Range<usize> {
    let max = max.max(1);
    if len <= max {
        return 0..len;
    }
    let start = cursor.saturating_sub(max / 2).min(len - max);
    start..start + max
}

/// Lines a list may use on the current terminal, leaving room for the frame
pub(crate) fn terminal_rows() -> usize {
    match crossterm::terminal::size() {
        Ok((_, height)) => usize::from(height).saturating_sub(6).max(5),
        Err(_) => usize::MAX,
    }
}

/// Standard frame around a single line of content
///
/// `editing` is shown while the prompt is open; `final_value` is shown
/// dimmed once it has been submitted or cancelled.
pub(crate) fn line_frame(
    state: PromptState,
    message: &str,
    editing: &str,
    final_value: &str,
    error: Option<&str>,
) -> String {
    let title = title(state, message);
    match state {
        PromptState::Submit => format!("{}{}  {}", title, bar(state), final_value.dim()),
        PromptState::Cancel => {
            let mut frame = format!("{}{}  {}", title, bar(state), final_value.dim().crossed_out());
            if !final_value.trim().is_empty() {
                frame.push_str(&format!("\n{}", bar(state)));
            }
            frame
        }
        PromptState::Error => format!(
            "{}{}  {}\n{}  {}\n",
            title,
            bar(state),
            editing,
            bar_end(state),
            error.unwrap_or_default().yellow()
        ),
        PromptState::Initial | PromptState::Active => {
            format!("{}{}  {}\n{}\n", title, bar(state), editing, bar_end(state))
        }
    }
}
