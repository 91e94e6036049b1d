//! Key Sources
//!
//! Where keypresses come from. The engine awaits exactly one key at a time
//! from a [`KeySource`]; a source never reads ahead of what it returns.

use std::collections::VecDeque;

use async_trait::async_trait;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{trace, warn};

use super::capture::TerminalControl;
use super::keys::{decode_bytes, KeyPress};

/// An asynchronous stream of keypresses; `None` means input is closed
#[async_trait]
pub trait KeySource: Send {
    async fn next_key(&mut self) -> Option<KeyPress>;
}

#[async_trait]
impl<K: KeySource + ?Sized> KeySource for Box<K> {
    async fn next_key(&mut self) -> Option<KeyPress> {
        (**self).next_key().await
    }
}

/// Keys from an interactive terminal via crossterm's event stream
pub struct TerminalKeys {
    events: EventStream,
}

impl TerminalKeys {
    pub fn new() -> Self {
        Self {
            events: EventStream::new(),
        }
    }
}

impl Default for TerminalKeys {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeySource for TerminalKeys {
    async fn next_key(&mut self) -> Option<KeyPress> {
        loop {
            match self.events.next().await {
                Some(Ok(Event::Key(event))) => {
                    if let Some(key) = KeyPress::from_crossterm(event) {
                        trace!(name = ?key.name, "key received");
                        return Some(key);
                    }
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!("terminal event stream failed: {}", e);
                    return None;
                }
                None => return None,
            }
        }
    }
}

/// Keys decoded from a byte stream, used when input is not a TTY
pub struct PipedKeys<R> {
    reader: R,
    pending: VecDeque<KeyPress>,
}

impl<R: AsyncRead + Unpin + Send> PipedKeys<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }
}

impl PipedKeys<tokio::io::Stdin> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> KeySource for PipedKeys<R> {
    async fn next_key(&mut self) -> Option<KeyPress> {
        let mut buf = [0u8; 256];
        while self.pending.is_empty() {
            match self.reader.read(&mut buf).await {
                Ok(0) => return None,
                Ok(n) => self.pending.extend(decode_bytes(&buf[..n])),
                Err(e) => {
                    warn!("reading piped input failed: {}", e);
                    return None;
                }
            }
        }
        self.pending.pop_front()
    }
}

/// Pick the key source matching the terminal: event stream on a TTY, byte decoding otherwise
pub fn open_keys<C: TerminalControl>(control: &C) -> Box<dyn KeySource> {
    if control.is_tty() {
        Box::new(TerminalKeys::new())
    } else {
        Box::new(PipedKeys::stdin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_piped_keys_decode_in_order() {
        let input: &[u8] = b"hi\x1b[B\r";
        let mut keys = PipedKeys::new(input);

        let mut names = Vec::new();
        while let Some(key) = keys.next_key().await {
            names.push(key.name);
        }

        assert_eq!(
            names,
            vec![
                Some("h".to_string()),
                Some("i".to_string()),
                Some("down".to_string()),
                Some("return".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_piped_keys_eof() {
        let input: &[u8] = b"";
        let mut keys = PipedKeys::new(input);
        assert!(keys.next_key().await.is_none());
    }
}
