//! Line Buffer Module
//!
//! Single-line text editing with a character cursor, used by the text and
//! password prompts.

use crossterm::style::Stylize;

/// Editable single line of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer from existing text with the cursor at the end
    pub fn from_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Place the cursor, clamped to the end of the text
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.chars.len());
    }

    /// Replace the whole text, cursor to the end
    pub fn set_text(&mut self, text: &str) {
        *self = Self::from_text(text);
    }

    /// Insert text at the cursor, skipping control characters
    pub fn insert(&mut self, text: &str) {
        for ch in text.chars().filter(|c| !c.is_control()) {
            self.chars.insert(self.cursor, ch);
            self.cursor += 1;
        }
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.chars.remove(self.cursor - 1);
            self.cursor -= 1;
        }
    }

    /// Delete the character under the cursor
    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.chars.len() {
            self.cursor += 1;
        }
    }

    /// The text with the cursor position highlighted
    pub fn with_cursor(&self) -> String {
        render_with_cursor(&self.chars, self.cursor)
    }

    /// Like [`with_cursor`](Self::with_cursor) but every character replaced by `mask`
    pub fn masked_with_cursor(&self, mask: char) -> String {
        let masked: Vec<char> = self.chars.iter().map(|_| mask).collect();
        render_with_cursor(&masked, self.cursor)
    }
}

/// Glyph shown when the cursor sits past the last character
pub fn end_cursor() -> String {
    "_".hidden().reverse().to_string()
}

fn render_with_cursor(chars: &[char], cursor: usize) -> String {
    if cursor >= chars.len() {
        let text: String = chars.iter().collect();
        return format!("{}{}", text, end_cursor());
    }

    let before: String = chars[..cursor].iter().collect();
    let after: String = chars[cursor + 1..].iter().collect();
    format!("{}{}{}", before, chars[cursor].to_string().reverse(), after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace() {
        let mut line = LineBuffer::new();
        line.insert("helo");
        line.move_left();
        line.insert("l");
        assert_eq!(line.text(), "hello");
        assert_eq!(line.cursor(), 4);

        line.backspace();
        assert_eq!(line.text(), "helo");
        assert_eq!(line.cursor(), 3);
    }

    #[test]
    fn test_delete_forward() {
        let mut line = LineBuffer::from_text("abc");
        line.set_cursor(0);
        line.delete();
        assert_eq!(line.text(), "bc");
        assert_eq!(line.cursor(), 0);

        line.set_cursor(10);
        line.delete();
        assert_eq!(line.text(), "bc");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut line = LineBuffer::from_text("ab");
        line.move_right();
        assert_eq!(line.cursor(), 2);
        line.move_left();
        line.move_left();
        line.move_left();
        assert_eq!(line.cursor(), 0);
        line.backspace();
        assert_eq!(line.text(), "ab");
    }

    #[test]
    fn test_multibyte_text() {
        let mut line = LineBuffer::from_text("héllo");
        line.set_cursor(2);
        line.backspace();
        assert_eq!(line.text(), "hllo");
    }

    #[test]
    fn test_control_chars_not_inserted() {
        let mut line = LineBuffer::new();
        line.insert("a\tb\x7f");
        assert_eq!(line.text(), "ab");
    }

    #[test]
    fn test_cursor_rendering() {
        let mut line = LineBuffer::from_text("abc");
        assert_eq!(line.with_cursor(), format!("abc{}", end_cursor()));

        line.set_cursor(1);
        assert_eq!(line.with_cursor(), format!("a{}c", "b".reverse()));
        assert_eq!(line.masked_with_cursor('*'), format!("*{}*", "*".reverse()));
    }
}
