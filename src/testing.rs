//! Test Support
//!
//! Scripted key sources, an in-memory terminal and a shared output buffer
//! for driving prompts without a TTY.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::Result;
use crate::prompt::{Outcome, Prompt, PromptSession, PromptState};
use crate::terminal::{KeyPress, KeySource, TerminalControl};
use crate::config::EngineConfig;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Key source that replays a fixed list, then reports closed input
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<KeyPress>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = KeyPress>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Keys not yet handed out
    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

#[async_trait]
impl KeySource for ScriptedKeys {
    async fn next_key(&mut self) -> Option<KeyPress> {
        self.keys.pop_front()
    }
}

#[derive(Debug, Default)]
struct TerminalState {
    tty: bool,
    raw: bool,
    history: Vec<bool>,
    fail: bool,
}

/// In-memory terminal recording every raw mode switch
///
/// Clones share state, so a test keeps one handle and gives another away.
#[derive(Debug, Clone, Default)]
pub struct FakeTerminal {
    state: Arc<Mutex<TerminalState>>,
}

impl FakeTerminal {
    /// An interactive terminal in cooked mode
    pub fn tty() -> Self {
        Self::with_tty(true)
    }

    /// Input redirected from a pipe or file
    pub fn piped() -> Self {
        Self::with_tty(false)
    }

    fn with_tty(tty: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(TerminalState {
                tty,
                ..TerminalState::default()
            })),
        }
    }

    pub fn is_raw_now(&self) -> bool {
        lock(&self.state).raw
    }

    /// Every raw flag set through [`TerminalControl::set_raw`], in order
    pub fn mode_changes(&self) -> Vec<bool> {
        lock(&self.state).history.clone()
    }

    /// Set the raw flag without recording a change
    pub fn force_raw(&self, raw: bool) {
        lock(&self.state).raw = raw;
    }

    /// Make every later mode switch fail
    pub fn fail_mode_changes(&self) {
        lock(&self.state).fail = true;
    }
}

impl TerminalControl for FakeTerminal {
    fn is_tty(&self) -> bool {
        lock(&self.state).tty
    }

    fn is_raw(&self) -> io::Result<bool> {
        Ok(lock(&self.state).raw)
    }

    fn set_raw(&mut self, enabled: bool) -> io::Result<()> {
        let mut state = lock(&self.state);
        if state.fail {
            return Err(io::Error::new(io::ErrorKind::Other, "mode switch refused"));
        }
        state.raw = enabled;
        state.history.push(enabled);
        Ok(())
    }
}

/// Cloneable in-memory writer
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> Vec<u8> {
        lock(&self.bytes).clone()
    }

    /// Contents decoded lossily as text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.bytes).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Everything observable after a scripted prompt run
#[derive(Debug)]
pub struct ScriptedRun<T> {
    pub outcome: Outcome<T>,
    pub state: PromptState,
    /// Bytes written to the terminal, lossily decoded
    pub output: String,
    /// The last frame rendered
    pub final_frame: String,
    pub terminal: FakeTerminal,
}

/// Run a prompt against scripted keys on a fake TTY with default configuration
pub async fn run_scripted<P>(prompt: P, keys: impl IntoIterator<Item = KeyPress>) -> Result<ScriptedRun<P::Value>>
where
    P: Prompt,
{
    run_scripted_with(prompt, keys, &EngineConfig::default()).await
}

/// Like [`run_scripted`] with explicit configuration
pub async fn run_scripted_with<P>(
    prompt: P,
    keys: impl IntoIterator<Item = KeyPress>,
    config: &EngineConfig,
) -> Result<ScriptedRun<P::Value>>
where
    P: Prompt,
{
    let terminal = FakeTerminal::tty();
    let out = SharedBuffer::default();
    let mut keys = ScriptedKeys::new(keys);

    let mut session = PromptSession::with_config(prompt, config);
    let outcome = session.run(&mut keys, out.clone(), terminal.clone()).await?;

    Ok(ScriptedRun {
        outcome,
        state: session.state(),
        output: out.text(),
        final_frame: session.frame(),
        terminal,
    })
}

/// Type a string as individual character keypresses
pub fn typed(text: &str) -> Vec<KeyPress> {
    text.chars().map(KeyPress::char).collect()
}
