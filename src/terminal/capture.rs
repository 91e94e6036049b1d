//! Raw Input Capture Module
//!
//! Exclusive control of the terminal input stream: raw mode on acquire,
//! cursor glyph hiding, and a guaranteed restore on every exit path.
//! Also provides [`block`], which swallows keystrokes while a long
//! operation (e.g. a spinner) owns the screen.

use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use crossterm::{cursor, queue, terminal};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::keys::{KeyInterpreter, KeyPress};
use super::source::KeySource;

/// Terminal mode switches, abstracted so capture can be tested without a TTY
pub trait TerminalControl {
    /// Whether input is an interactive terminal
    fn is_tty(&self) -> bool;
    /// Whether raw (non-canonical, no-echo) mode is currently on
    fn is_raw(&self) -> io::Result<bool>;
    /// Switch raw mode on or off
    fn set_raw(&mut self, enabled: bool) -> io::Result<()>;
}

/// The process terminal, via crossterm
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermControl;

impl TerminalControl for CrosstermControl {
    fn is_tty(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn is_raw(&self) -> io::Result<bool> {
        terminal::is_raw_mode_enabled()
    }

    fn set_raw(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            terminal::enable_raw_mode()
        } else {
            terminal::disable_raw_mode()
        }
    }
}

/// Switch raw mode only when input is a TTY; returns whether anything changed
pub fn set_raw_mode<C: TerminalControl + ?Sized>(control: &mut C, enabled: bool) -> io::Result<bool> {
    if !control.is_tty() {
        return Ok(false);
    }
    control.set_raw(enabled)?;
    Ok(true)
}

/// Options for acquiring the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Honour cancel aliases (and Ctrl+C) while input is blocked
    pub signal: bool,
    /// Erase the echo of keys swallowed while input is blocked
    pub overwrite: bool,
    /// Hide the cursor glyph while captured
    pub hide_cursor: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            signal: true,
            overwrite: true,
            hide_cursor: true,
        }
    }
}

/// What happens when a cancel alias is pressed while input is blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbortPolicy {
    /// Report [`BlockOutcome::Aborted`] through the handle
    #[default]
    Surface,
    /// Restore the terminal, then terminate the process with status 1.
    /// Callers awaiting a result never see one on this path.
    Exit,
}

/// Held terminal capture; restores the terminal on release or drop
pub struct RawCapture<C: TerminalControl> {
    control: C,
    options: CaptureOptions,
    /// Raw flag to restore, present only if acquire changed it
    restore_raw: Option<bool>,
    cursor_hidden: bool,
    released: bool,
}

impl<C: TerminalControl> RawCapture<C> {
    /// Take the terminal: raw mode on a TTY, cursor hidden unless suppressed
    ///
    /// Failing to enable raw mode degrades to non-interactive input rather
    /// than failing the prompt.
    pub fn acquire<W: Write>(options: CaptureOptions, mut control: C, out: &mut W) -> io::Result<Self> {
        let mut restore_raw = None;

        if control.is_tty() {
            match control.is_raw() {
                Ok(true) => {}
                Ok(false) => match control.set_raw(true) {
                    Ok(()) => restore_raw = Some(false),
                    Err(e) => warn!("raw mode unavailable, continuing non-interactively: {}", e),
                },
                Err(e) => warn!("cannot query terminal mode, continuing non-interactively: {}", e),
            }
        } else {
            debug!("input is not a terminal; raw mode skipped");
        }

        if options.hide_cursor {
            queue!(out, cursor::Hide)?;
            out.flush()?;
        }

        debug!(raw = restore_raw.is_some(), "terminal captured");

        Ok(Self {
            control,
            options,
            restore_raw,
            cursor_hidden: options.hide_cursor,
            released: false,
        })
    }

    /// Whether keys arrive unbuffered (raw mode was enabled by this capture or already on)
    pub fn is_interactive(&self) -> bool {
        self.control.is_tty() && self.control.is_raw().unwrap_or(false)
    }

    pub fn options(&self) -> CaptureOptions {
        self.options
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    /// Give the terminal back: raw flag restored, cursor shown. Idempotent.
    pub fn release<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let restored = self.restore_mode();

        if self.cursor_hidden {
            queue!(out, cursor::Show)?;
            out.flush()?;
            self.cursor_hidden = false;
        }

        debug!("terminal released");
        restored
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        match self.restore_raw.take() {
            Some(previous) => self.control.set_raw(previous),
            None => Ok(()),
        }
    }
}

impl<C: TerminalControl> Drop for RawCapture<C> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let _ = self.restore_mode();
        if self.cursor_hidden && self.control.is_tty() {
            let mut stdout = io::stdout();
            let _ = queue!(stdout, cursor::Show);
            let _ = stdout.flush();
        }
    }
}

/// How a blocked-input period ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// The owner released the block
    Released,
    /// A cancel alias was pressed
    Aborted,
}

struct Blocked<C: TerminalControl, W: Write> {
    capture: RawCapture<C>,
    out: W,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle to a running input block
pub struct BlockHandle<C: TerminalControl, W: Write> {
    shared: Arc<Mutex<Blocked<C, W>>>,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<BlockOutcome>,
}

impl<C, W> BlockHandle<C, W>
where
    C: TerminalControl + Send + 'static,
    W: Write + Send + 'static,
{
    /// Stop swallowing keys and restore the terminal
    pub async fn release(mut self) -> io::Result<BlockOutcome> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let outcome = self.task.await.unwrap_or(BlockOutcome::Released);

        let mut guard = lock(&self.shared);
        let Blocked { capture, out } = &mut *guard;
        capture.release(out)?;
        Ok(outcome)
    }

    /// Whether a cancel alias already ended the block
    pub fn is_aborted(&self) -> bool {
        self.task.is_finished()
    }

    /// Run a closure against the output while the block is held
    pub fn with_output<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut lock(&self.shared).out)
    }
}

/// Swallow keystrokes until released
///
/// With `overwrite`, the echo of each swallowed key is erased so whatever
/// owns the screen keeps redrawing in place. With `signal`, a key aliased to
/// cancel ends the block as [`BlockOutcome::Aborted`], or terminates the
/// process under [`AbortPolicy::Exit`].
pub fn block<K, C, W>(
    options: CaptureOptions,
    interpreter: KeyInterpreter,
    policy: AbortPolicy,
    mut keys: K,
    control: C,
    mut out: W,
) -> io::Result<BlockHandle<C, W>>
where
    K: KeySource + 'static,
    C: TerminalControl + Send + 'static,
    W: Write + Send + 'static,
{
    let capture = RawCapture::acquire(options, control, &mut out)?;
    let shared = Arc::new(Mutex::new(Blocked { capture, out }));
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    let task_shared = Arc::clone(&shared);
    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;

                key = keys.next_key() => {
                    let Some(key) = key else {
                        let _ = stop_rx.await;
                        return BlockOutcome::Released;
                    };

                    if options.signal && interpreter.is_abort(&key) {
                        debug!("cancel alias pressed while input blocked");
                        let mut guard = lock(&task_shared);
                        let Blocked { capture, out } = &mut *guard;
                        let _ = capture.release(out);
                        if policy == AbortPolicy::Exit {
                            std::process::exit(1);
                        }
                        return BlockOutcome::Aborted;
                    }

                    if options.overwrite {
                        let mut guard = lock(&task_shared);
                        if let Err(e) = erase_echo(&mut guard.out, &key) {
                            warn!("failed to erase swallowed key: {}", e);
                        }
                    }
                }
                _ = &mut stop_rx => return BlockOutcome::Released,
            }
        }
    });

    Ok(BlockHandle {
        shared,
        stop: Some(stop_tx),
        task,
    })
}

/// Undo what the terminal echoed for a swallowed key
fn erase_echo<W: Write>(out: &mut W, key: &KeyPress) -> io::Result<()> {
    if key.name.as_deref() == Some("return") {
        queue!(out, cursor::MoveUp(1), terminal::Clear(terminal::ClearType::UntilNewLine))?;
    } else {
        queue!(out, cursor::MoveLeft(1), terminal::Clear(terminal::ClearType::UntilNewLine))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::keys::{AliasTable, Intent};
    use crate::testing::{FakeTerminal, ScriptedKeys, SharedBuffer};

    fn bytes(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> Vec<u8> {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_acquire_and_release_restores_mode() {
        let term = FakeTerminal::tty();
        let mut out = Vec::new();
        let mut capture = RawCapture::acquire(CaptureOptions::default(), term.clone(), &mut out).unwrap();
        assert!(term.is_raw_now());
        assert!(capture.is_interactive());

        capture.release(&mut out).unwrap();
        assert!(!term.is_raw_now());
        assert_eq!(term.mode_changes(), vec![true, false]);
    }

    #[test]
    fn test_release_is_idempotent() {
        let term = FakeTerminal::tty();
        let mut out = Vec::new();
        let mut capture = RawCapture::acquire(CaptureOptions::default(), term.clone(), &mut out).unwrap();
        capture.release(&mut out).unwrap();
        capture.release(&mut out).unwrap();
        assert_eq!(term.mode_changes(), vec![true, false]);
    }

    #[test]
    fn test_drop_restores_mode() {
        let term = FakeTerminal::tty();
        let mut out = Vec::new();
        {
            let _capture = RawCapture::acquire(CaptureOptions::default(), term.clone(), &mut out).unwrap();
            assert!(term.is_raw_now());
        }
        assert!(!term.is_raw_now());
    }

    #[test]
    fn test_already_raw_left_alone() {
        let term = FakeTerminal::tty();
        term.force_raw(true);
        let mut out = Vec::new();
        let mut capture = RawCapture::acquire(CaptureOptions::default(), term.clone(), &mut out).unwrap();
        capture.release(&mut out).unwrap();
        assert!(term.is_raw_now());
        assert!(term.mode_changes().is_empty());
    }

    #[test]
    fn test_non_tty_skips_raw_mode() {
        let term = FakeTerminal::piped();
        let mut out = Vec::new();
        let mut capture = RawCapture::acquire(CaptureOptions::default(), term.clone(), &mut out).unwrap();
        assert!(!capture.is_interactive());
        capture.release(&mut out).unwrap();
        assert!(term.mode_changes().is_empty());
    }

    #[test]
    fn test_raw_mode_failure_degrades() {
        let term = FakeTerminal::tty();
        term.fail_mode_changes();
        let mut out = Vec::new();
        let mut capture = RawCapture::acquire(CaptureOptions::default(), term.clone(), &mut out).unwrap();
        assert!(!capture.is_interactive());
        capture.release(&mut out).unwrap();
        assert!(!term.is_raw_now());
    }

    #[test]
    fn test_cursor_hidden_and_restored() {
        let mut out = Vec::new();
        let mut capture = RawCapture::acquire(CaptureOptions::default(), FakeTerminal::tty(), &mut out).unwrap();
        assert_eq!(out, bytes(|b| queue!(b, cursor::Hide)));

        out.clear();
        capture.release(&mut out).unwrap();
        assert_eq!(out, bytes(|b| queue!(b, cursor::Show)));
    }

    #[test]
    fn test_cursor_not_hidden_when_suppressed() {
        let options = CaptureOptions {
            hide_cursor: false,
            ..CaptureOptions::default()
        };
        let mut out = Vec::new();
        let mut capture = RawCapture::acquire(options, FakeTerminal::tty(), &mut out).unwrap();
        capture.release(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_set_raw_mode_helper() {
        let mut tty = FakeTerminal::tty();
        assert!(set_raw_mode(&mut tty, true).unwrap());
        assert!(tty.is_raw_now());
        assert!(set_raw_mode(&mut tty, false).unwrap());
        assert!(!tty.is_raw_now());

        let mut piped = FakeTerminal::piped();
        assert!(!set_raw_mode(&mut piped, true).unwrap());
        assert!(piped.mode_changes().is_empty());
    }

    #[tokio::test]
    async fn test_block_erases_swallowed_keys() {
        let out = SharedBuffer::default();
        let keys = ScriptedKeys::new([KeyPress::char('c'), KeyPress::named("return")]);
        let handle = block(
            CaptureOptions::default(),
            KeyInterpreter::default(),
            AbortPolicy::Surface,
            keys,
            FakeTerminal::tty(),
            out.clone(),
        )
        .unwrap();

        let outcome = handle.release().await.unwrap();
        assert_eq!(outcome, BlockOutcome::Released);

        let expected = bytes(|b| {
            queue!(b, cursor::Hide)?;
            queue!(b, cursor::MoveLeft(1), terminal::Clear(terminal::ClearType::UntilNewLine))?;
            queue!(b, cursor::MoveUp(1), terminal::Clear(terminal::ClearType::UntilNewLine))?;
            queue!(b, cursor::Show)
        });
        assert_eq!(out.contents(), expected);
    }

    #[tokio::test]
    async fn test_block_without_overwrite_writes_nothing_per_key() {
        let out = SharedBuffer::default();
        let options = CaptureOptions {
            overwrite: false,
            hide_cursor: false,
            ..CaptureOptions::default()
        };
        let keys = ScriptedKeys::new([KeyPress::char('c')]);
        let handle = block(
            options,
            KeyInterpreter::default(),
            AbortPolicy::Surface,
            keys,
            FakeTerminal::tty(),
            out.clone(),
        )
        .unwrap();

        assert_eq!(handle.release().await.unwrap(), BlockOutcome::Released);
        assert!(out.contents().is_empty());
    }

    #[tokio::test]
    async fn test_block_aborts_on_cancel_alias() {
        let mut aliases = AliasTable::default();
        aliases.set("c", Intent::Cancel);
        let term = FakeTerminal::tty();
        let keys = ScriptedKeys::new([KeyPress::char('c')]);
        let handle = block(
            CaptureOptions::default(),
            KeyInterpreter::new(aliases),
            AbortPolicy::Surface,
            keys,
            term.clone(),
            SharedBuffer::default(),
        )
        .unwrap();

        assert_eq!(handle.release().await.unwrap(), BlockOutcome::Aborted);
        assert!(!term.is_raw_now());
    }

    #[tokio::test]
    async fn test_block_reports_abort_before_release() {
        let keys = ScriptedKeys::new([KeyPress::named("escape")]);
        let handle = block(
            CaptureOptions::default(),
            KeyInterpreter::default(),
            AbortPolicy::Surface,
            keys,
            FakeTerminal::tty(),
            SharedBuffer::default(),
        )
        .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(handle.is_aborted());
        assert_eq!(handle.release().await.unwrap(), BlockOutcome::Aborted);
    }

    #[tokio::test]
    async fn test_block_ignores_aliases_without_signal() {
        let options = CaptureOptions {
            signal: false,
            ..CaptureOptions::default()
        };
        let keys = ScriptedKeys::new([KeyPress::ctrl('c')]);
        let handle = block(
            options,
            KeyInterpreter::default(),
            AbortPolicy::Surface,
            keys,
            FakeTerminal::tty(),
            SharedBuffer::default(),
        )
        .unwrap();

        assert_eq!(handle.release().await.unwrap(), BlockOutcome::Released);
    }
}
