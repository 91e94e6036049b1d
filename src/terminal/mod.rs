//! Terminal Boundary Module
//!
//! Everything that touches the process terminal: capturing raw input,
//! decoding and interpreting keys, and redrawing frames in place.
//!
//! ## Module Structure
//!
//! - `keys` - Keypress records, byte decoding, alias table, interpreter
//! - `capture` - Raw mode acquire/release and input blocking
//! - `source` - Async key sources (event stream, piped bytes)
//! - `render` - Diffing in-place frame writer

pub mod capture;
pub mod keys;
pub mod render;
pub mod source;

pub use capture::{
    block, set_raw_mode, AbortPolicy, BlockHandle, BlockOutcome, CaptureOptions, CrosstermControl,
    RawCapture, TerminalControl,
};
pub use keys::{decode_bytes, Action, AliasTable, InputMode, Intent, KeyInterpreter, KeyPress};
pub use render::FrameWriter;
pub use source::{open_keys, KeySource, PipedKeys, TerminalKeys};
