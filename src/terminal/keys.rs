//! Key Interpretation Module
//!
//! Normalized keypress records, a decoder for raw terminal bytes, the
//! alias table, and the pure interpreter that turns a keypress into a
//! semantic [`Action`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};

const ESC: u8 = 0x1b;
const INTERRUPT: u8 = 0x03;

/// Named keys and the byte sequences a VT100-style terminal sends for them
const NAMED_SEQUENCES: &[(&str, &str)] = &[
    ("up", "\x1b[A"),
    ("down", "\x1b[B"),
    ("right", "\x1b[C"),
    ("left", "\x1b[D"),
    ("home", "\x1b[H"),
    ("end", "\x1b[F"),
    ("delete", "\x1b[3~"),
    ("return", "\r"),
    ("enter", "\n"),
    ("backspace", "\x7f"),
    ("tab", "\t"),
    ("space", " "),
    ("escape", "\x1b"),
];

/// One physical keypress, produced once and consumed by one interpreter pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub raw: Vec<u8>,
    pub name: Option<String>,
    pub sequence: Option<String>,
    pub ctrl: bool,
}

impl KeyPress {
    /// Build a named key (`"up"`, `"return"`, `"backspace"`, ...)
    ///
    /// Unknown names get an empty raw buffer and no sequence.
    pub fn named(name: &str) -> Self {
        let sequence = NAMED_SEQUENCES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, seq)| seq.to_string());

        Self {
            raw: sequence.as_deref().unwrap_or_default().as_bytes().to_vec(),
            name: Some(name.to_string()),
            sequence,
            ctrl: false,
        }
    }

    /// Build a printable character keypress
    pub fn char(c: char) -> Self {
        if c == ' ' {
            return Self::named("space");
        }
        let text = c.to_string();
        let name = if c.is_ascii_alphanumeric() {
            Some(c.to_ascii_lowercase().to_string())
        } else {
            None
        };

        Self {
            raw: text.as_bytes().to_vec(),
            name,
            sequence: Some(text),
            ctrl: false,
        }
    }

    /// Build a Ctrl+letter keypress; `ctrl('c')` is the interrupt byte
    pub fn ctrl(c: char) -> Self {
        let letter = c.to_ascii_lowercase();
        let byte = (letter as u8).wrapping_sub(b'a').wrapping_add(1);

        Self {
            raw: vec![byte],
            name: Some(letter.to_string()),
            sequence: Some((byte as char).to_string()),
            ctrl: true,
        }
    }

    /// The raw bytes as text (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }

    /// Whether this is the terminal interrupt byte (Ctrl+C)
    pub fn is_interrupt(&self) -> bool {
        self.raw == [INTERRUPT]
    }

    /// Whether the raw bytes form literal, insertable text
    pub fn is_printable(&self) -> bool {
        !self.ctrl
            && !self.raw.is_empty()
            && self.raw[0] != ESC
            && self.text().chars().all(|c| !c.is_control())
    }

    /// Convert a crossterm key event; release and repeat events yield `None`
    pub fn from_crossterm(event: KeyEvent) -> Option<Self> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        let key = match event.code {
            KeyCode::Up => Self::named("up"),
            KeyCode::Down => Self::named("down"),
            KeyCode::Left => Self::named("left"),
            KeyCode::Right => Self::named("right"),
            KeyCode::Home => Self::named("home"),
            KeyCode::End => Self::named("end"),
            KeyCode::Enter => Self::named("return"),
            KeyCode::Backspace => Self::named("backspace"),
            KeyCode::Delete => Self::named("delete"),
            KeyCode::Tab => Self::named("tab"),
            KeyCode::Esc => Self::named("escape"),
            KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => {
                if !c.is_ascii_alphabetic() {
                    return None;
                }
                Self::ctrl(c)
            }
            KeyCode::Char(c) => Self::char(c),
            _ => return None,
        };

        Some(key)
    }
}

/// Split a raw byte buffer into keypresses
///
/// Escape sequences that are not recognised still produce a keypress (with
/// no name) so the interpreter can drop them instead of inserting garbage.
pub fn decode_bytes(bytes: &[u8]) -> Vec<KeyPress> {
    let mut keys = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        let consumed = match byte {
            ESC => {
                let len = escape_len(&bytes[i..]);
                keys.push(decode_escape(&bytes[i..i + len]));
                len
            }
            b'\r' => {
                keys.push(KeyPress::named("return"));
                1
            }
            b'\n' => {
                keys.push(KeyPress::named("enter"));
                1
            }
            0x7f | 0x08 => {
                let mut key = KeyPress::named("backspace");
                key.raw = vec![byte];
                keys.push(key);
                1
            }
            b'\t' => {
                keys.push(KeyPress::named("tab"));
                1
            }
            0x01..=0x1a => {
                keys.push(KeyPress::ctrl((byte - 1 + b'a') as char));
                1
            }
            0x00 | 0x1c..=0x1f => 1,
            _ => {
                let len = utf8_len(byte).min(bytes.len() - i);
                if let Ok(text) = std::str::from_utf8(&bytes[i..i + len]) {
                    if let Some(c) = text.chars().next() {
                        keys.push(KeyPress::char(c));
                    }
                }
                len
            }
        };
        i += consumed.max(1);
    }

    keys
}

/// Length of the escape sequence starting at `bytes[0] == ESC`
fn escape_len(bytes: &[u8]) -> usize {
    match bytes.get(1) {
        Some(b'[') => {
            let mut j = 2;
            while let Some(&b) = bytes.get(j) {
                if (0x40..=0x7e).contains(&b) {
                    return j + 1;
                }
                j += 1;
            }
            bytes.len()
        }
        Some(b'O') => bytes.len().min(3),
        Some(&ESC) | None => 1,
        Some(_) => 2,
    }
}

fn decode_escape(seq: &[u8]) -> KeyPress {
    let name = match seq {
        [ESC] => Some("escape"),
        [ESC, b'[', params @ .., last] | [ESC, b'O', params @ .., last] => match last {
            b'A' => Some("up"),
            b'B' => Some("down"),
            b'C' => Some("right"),
            b'D' => Some("left"),
            b'H' => Some("home"),
            b'F' => Some("end"),
            b'~' => match params.split(|&b| b == b';').next() {
                Some(b"1") | Some(b"7") => Some("home"),
                Some(b"4") | Some(b"8") => Some("end"),
                Some(b"3") => Some("delete"),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    };

    let text = String::from_utf8_lossy(seq).into_owned();
    KeyPress {
        raw: seq.to_vec(),
        name: name.map(str::to_string),
        sequence: Some(text),
        ctrl: false,
    }
}

fn utf8_len(lead: u8) -> usize {
    match lead {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}

/// Target of an alias entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Up,
    Down,
    Left,
    Right,
    Submit,
    Cancel,
}

/// Semantic action derived from a keypress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Submit,
    Cancel,
    /// Literal input; `sequence` distinguishes e.g. backspace from delete
    Insert {
        text: String,
        sequence: Option<String>,
    },
}

impl Action {
    pub fn is_backspace(&self) -> bool {
        matches!(self, Action::Insert { sequence: Some(s), .. } if s == "\x7f" || s == "\x08")
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Action::Insert { sequence: Some(s), .. } if s == "\x1b[3~")
    }

    pub fn is_space(&self) -> bool {
        matches!(self, Action::Insert { text, .. } if text == " ")
    }

    /// The inserted character, if this is a single printable character
    pub fn as_char(&self) -> Option<char> {
        match self {
            Action::Insert { text, .. } => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Some(c),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl From<Intent> for Action {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Up => Action::Up,
            Intent::Down => Action::Down,
            Intent::Left => Action::Left,
            Intent::Right => Action::Right,
            Intent::Submit => Action::Submit,
            Intent::Cancel => Action::Cancel,
        }
    }
}

/// How a prompt wants literal keys treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Printable aliases (e.g. `k` for up) are honoured
    #[default]
    Navigation,
    /// Printable keys are typed; only cancel aliases still apply
    Text,
}

/// Ordered table of `[key, intent]` pairs, consulted before default mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable(Vec<(String, Intent)>);

impl Default for AliasTable {
    fn default() -> Self {
        Self(vec![
            ("escape".to_string(), Intent::Cancel),
            ("\u{3}".to_string(), Intent::Cancel),
        ])
    }
}

impl AliasTable {
    /// An empty table (no escape/Ctrl+C cancel aliases)
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Add or replace an alias, keeping insertion order for new keys
    pub fn set(&mut self, key: impl Into<String>, intent: Intent) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = intent,
            None => self.0.push((key, intent)),
        }
    }

    /// Merge another table into this one
    pub fn extend(&mut self, other: &AliasTable) {
        for (key, intent) in &other.0 {
            self.set(key.clone(), *intent);
        }
    }

    /// First alias matching the key's raw text, name, or sequence
    pub fn lookup(&self, key: &KeyPress) -> Option<Intent> {
        let text = key.text();
        self.0
            .iter()
            .find(|(alias, _)| {
                *alias == text
                    || key.name.as_deref() == Some(alias.as_str())
                    || key.sequence.as_deref() == Some(alias.as_str())
            })
            .map(|(_, intent)| *intent)
    }

    pub fn entries(&self) -> &[(String, Intent)] {
        &self.0
    }
}

/// Pure keypress-to-action mapping
#[derive(Debug, Clone, Default)]
pub struct KeyInterpreter {
    aliases: AliasTable,
}

impl KeyInterpreter {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Map a keypress to an action, or `None` if it should be dropped
    pub fn interpret(&self, key: &KeyPress, mode: InputMode) -> Option<Action> {
        if key.is_interrupt() {
            return Some(Action::Cancel);
        }

        if let Some(intent) = self.aliases.lookup(key) {
            let typed = mode == InputMode::Text && key.is_printable();
            if intent == Intent::Cancel || !typed {
                return Some(intent.into());
            }
        }

        match key.name.as_deref() {
            Some("up") => return Some(Action::Up),
            Some("down") => return Some(Action::Down),
            Some("left") => return Some(Action::Left),
            Some("right") => return Some(Action::Right),
            Some("return") | Some("enter") => return Some(Action::Submit),
            Some("backspace") | Some("delete") | Some("tab") => {
                return Some(Action::Insert {
                    text: String::new(),
                    sequence: key.sequence.clone(),
                })
            }
            _ => {}
        }

        if key.is_printable() {
            return Some(Action::Insert {
                text: key.text(),
                sequence: key.sequence.clone(),
            });
        }

        None
    }

    /// Whether the key is aliased to cancel (the fast-abort trigger)
    pub fn is_abort(&self, key: &KeyPress) -> bool {
        self.aliases.lookup(key) == Some(Intent::Cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(key: KeyPress) -> Option<Action> {
        KeyInterpreter::default().interpret(&key, InputMode::Navigation)
    }

    #[test]
    fn test_directional_names() {
        assert_eq!(interpret(KeyPress::named("up")), Some(Action::Up));
        assert_eq!(interpret(KeyPress::named("down")), Some(Action::Down));
        assert_eq!(interpret(KeyPress::named("left")), Some(Action::Left));
        assert_eq!(interpret(KeyPress::named("right")), Some(Action::Right));
        assert_eq!(interpret(KeyPress::named("return")), Some(Action::Submit));
    }

    #[test]
    fn test_interrupt_and_escape_cancel() {
        assert_eq!(interpret(KeyPress::ctrl('c')), Some(Action::Cancel));
        assert_eq!(interpret(KeyPress::named("escape")), Some(Action::Cancel));
    }

    #[test]
    fn test_printable_insert() {
        assert_eq!(
            interpret(KeyPress::char('x')),
            Some(Action::Insert {
                text: "x".to_string(),
                sequence: Some("x".to_string())
            })
        );
        assert!(interpret(KeyPress::char(' ')).unwrap().is_space());
    }

    #[test]
    fn test_backspace_vs_delete() {
        let backspace = interpret(KeyPress::named("backspace")).unwrap();
        let delete = interpret(KeyPress::named("delete")).unwrap();
        assert!(backspace.is_backspace());
        assert!(!backspace.is_delete());
        assert!(delete.is_delete());
    }

    #[test]
    fn test_unknown_escape_dropped() {
        let keys = decode_bytes(b"\x1b[15~");
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].name, None);
        assert_eq!(interpret(keys[0].clone()), None);
    }

    #[test]
    fn test_other_control_dropped() {
        assert_eq!(interpret(KeyPress::ctrl('a')), None);
    }

    #[test]
    fn test_alias_navigation_vs_text_mode() {
        let mut aliases = AliasTable::default();
        aliases.set("k", Intent::Up);
        let interpreter = KeyInterpreter::new(aliases);

        assert_eq!(
            interpreter.interpret(&KeyPress::char('k'), InputMode::Navigation),
            Some(Action::Up)
        );
        assert!(matches!(
            interpreter.interpret(&KeyPress::char('k'), InputMode::Text),
            Some(Action::Insert { .. })
        ));
    }

    #[test]
    fn test_cancel_alias_applies_in_text_mode() {
        let mut aliases = AliasTable::default();
        aliases.set("q", Intent::Cancel);
        let interpreter = KeyInterpreter::new(aliases);

        assert_eq!(
            interpreter.interpret(&KeyPress::char('q'), InputMode::Text),
            Some(Action::Cancel)
        );
        assert!(interpreter.is_abort(&KeyPress::char('q')));
        assert!(!interpreter.is_abort(&KeyPress::char('w')));
    }

    #[test]
    fn test_alias_set_replaces() {
        let mut aliases = AliasTable::empty();
        aliases.set("x", Intent::Up);
        aliases.set("x", Intent::Down);
        assert_eq!(aliases.entries().len(), 1);
        assert_eq!(aliases.lookup(&KeyPress::char('x')), Some(Intent::Down));
    }

    #[test]
    fn test_alias_table_json_shape() {
        let table: AliasTable = serde_json::from_str(r#"[["c", "cancel"], ["j", "down"]]"#).unwrap();
        assert_eq!(table.lookup(&KeyPress::char('c')), Some(Intent::Cancel));
        assert_eq!(table.lookup(&KeyPress::char('j')), Some(Intent::Down));
    }

    #[test]
    fn test_decode_mixed_buffer() {
        let keys = decode_bytes("a\x1b[Ab\r\x7fé\x03".as_bytes());
        let names: Vec<Option<&str>> = keys.iter().map(|k| k.name.as_deref()).collect();
        assert_eq!(
            names,
            vec![
                Some("a"),
                Some("up"),
                Some("b"),
                Some("return"),
                Some("backspace"),
                None,
                Some("c"),
            ]
        );
        assert_eq!(keys[5].text(), "é");
        assert!(keys[6].is_interrupt());
    }

    #[test]
    fn test_decode_ss3_and_modified_arrows() {
        let keys = decode_bytes(b"\x1bOB\x1b[1;5C\x1b");
        let names: Vec<Option<&str>> = keys.iter().map(|k| k.name.as_deref()).collect();
        assert_eq!(names, vec![Some("down"), Some("right"), Some("escape")]);
    }

    #[test]
    fn test_from_crossterm() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let key = KeyPress::from_crossterm(event).unwrap();
        assert!(key.is_interrupt());

        let event = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(KeyPress::from_crossterm(event), Some(KeyPress::named("return")));

        let mut release = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(KeyPress::from_crossterm(release), None);
    }
}
