//! Path Prompt
//!
//! Filesystem browser over a [`PathTree`]: up/down move among siblings,
//! right expands a directory, left collapses it (or climbs above the root).

use std::path::{Path, PathBuf};

use crossterm::style::Stylize;

use super::{bar, bar_end, terminal_rows, title, window};
use crate::error::Result;
use crate::prompt::{
    DirectoryLister, Effect, FrameContext, FsLister, Movement, PathTree, Prompt, PromptState, Renderer, Validator,
};
use crate::terminal::Action;

/// Browse to a file or directory
pub struct PathPrompt<L: DirectoryLister = FsLister> {
    message: String,
    tree: PathTree<L>,
    validator: Option<Validator<PathBuf>>,
    renderer: Option<Renderer<PathPrompt<L>>>,
    max_rows: Option<usize>,
}

impl PathPrompt<FsLister> {
    /// Browse the real filesystem starting at `root`
    pub fn new(message: impl Into<String>, root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_lister(message, root, FsLister::default())
    }

    /// Browse starting at the process working directory
    pub fn from_cwd(message: impl Into<String>) -> Result<Self> {
        Self::new(message, std::env::current_dir()?)
    }
}

impl<L: DirectoryLister> PathPrompt<L> {
    /// Browse with a custom lister; the root's first entry starts selected
    pub fn with_lister(message: impl Into<String>, root: impl Into<PathBuf>, lister: L) -> Result<Self> {
        let mut tree = PathTree::new(root, lister)?;
        tree.right()?;
        Ok(Self {
            message: message.into(),
            tree,
            validator: None,
            renderer: None,
            max_rows: None,
        })
    }

    pub fn validate(mut self, validator: impl Fn(&PathBuf) -> Option<String> + Send + Sync + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn render_with(
        mut self,
        renderer: impl Fn(&PathPrompt<L>, &FrameContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Cap the number of tree rows drawn; defaults to what fits the terminal
    pub fn max_rows(mut self, rows: usize) -> Self {
        self.max_rows = Some(rows);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree(&self) -> &PathTree<L> {
        &self.tree
    }

    pub fn root(&self) -> &Path {
        self.tree.root_path()
    }

    fn movement_effect(result: std::io::Result<Movement>, path: &Path) -> Effect {
        match result {
            Ok(Movement::Resized) => Effect::Resize,
            Ok(_) => Effect::Redraw,
            Err(e) => Effect::Fail(format!("Cannot read directory {}: {}", path.display(), e)),
        }
    }

    fn default_render(&self, frame: &FrameContext<'_>) -> String {
        let state = frame.state;
        let title = title(state, &self.message);
        let value = self.tree.current_value().to_string_lossy().into_owned();
        match state {
            PromptState::Submit => format!("{}{}  {}", title, bar(state), value.as_str().dim()),
            PromptState::Cancel => format!(
                "{}{}  {}\n{}",
                title,
                bar(state),
                value.as_str().dim().crossed_out(),
                bar(state)
            ),
            _ => {
                let gutter = bar(state);
                let visible = self.tree.visible_rows();
                let selected = visible.iter().position(|row| row.selected).unwrap_or(0);
                let shown = window(visible.len(), selected, self.max_rows.unwrap_or_else(terminal_rows));

                let mut rows = Vec::new();
                if shown.start > 0 {
                    rows.push(format!("{}  {}", gutter, "...".dim()));
                }
                for row in &visible[shown.clone()] {
                    let indent = "  ".repeat(row.depth);
                    let marker = match (row.is_directory, row.expanded) {
                        (true, true) => "▾ ",
                        (true, false) => "▸ ",
                        (false, _) => "  ",
                    };
                    let entry = format!("{}{}{}", indent, marker, row.name);
                    if row.selected {
                        rows.push(format!("{}  {}", gutter, entry.cyan()));
                    } else {
                        rows.push(format!("{}  {}", gutter, entry.dim()));
                    }
                }
                if shown.end < visible.len() {
                    rows.push(format!("{}  {}", gutter, "...".dim()));
                }
                let footer = match frame.error {
                    Some(error) => format!("{}  {}", bar_end(state), error.yellow()),
                    None => bar_end(state),
                };
                format!("{}{}\n{}\n", title, rows.join("\n"), footer)
            }
        }
    }
}

impl<L: DirectoryLister> Prompt for PathPrompt<L> {
    type Value = PathBuf;

    fn value(&self) -> PathBuf {
        self.tree.current_value()
    }

    fn on(&mut self, action: &Action) -> Effect {
        match action {
            Action::Up => {
                self.tree.up();
                Effect::Redraw
            }
            Action::Down => {
                self.tree.down();
                Effect::Redraw
            }
            Action::Right => {
                let target = self.tree.current_value();
                Self::movement_effect(self.tree.right(), &target)
            }
            Action::Left => {
                let target = self.tree.root_path().parent().map(Path::to_path_buf);
                let at_root = self.tree.cursor_path().is_empty();
                let result = self.tree.left();
                match (at_root, target) {
                    (true, Some(parent)) => Self::movement_effect(result, &parent),
                    _ => Self::movement_effect(result, &self.tree.current_value()),
                }
            }
            _ => Effect::Redraw,
        }
    }

    fn validate(&self, value: &PathBuf) -> Option<String> {
        self.validator.as_ref().and_then(|validate| validate(value))
    }

    fn render(&self, frame: &FrameContext<'_>) -> String {
        match &self.renderer {
            Some(renderer) => renderer(self, frame),
            None => self.default_render(frame),
        }
    }
}
