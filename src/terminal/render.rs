//! Frame Rendering Module
//!
//! In-place redraw of a prompt frame on a scrollback-style terminal. The
//! writer remembers the previous frame's lines and only rewrites from the
//! first line that changed, so unchanged frames cost nothing and changed
//! frames never pollute scrollback.

use std::io::{self, Write};

use crossterm::{cursor, queue, style::Print, terminal};

/// Diffing frame writer over any output stream
pub struct FrameWriter<W: Write> {
    out: W,
    previous: Vec<String>,
    drawn: bool,
    stale: bool,
    finished: bool,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: Vec::new(),
            drawn: false,
            stale: false,
            finished: false,
        }
    }

    /// Number of terminal lines the last frame occupied
    pub fn previous_height(&self) -> usize {
        self.previous.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Forget line bookkeeping; the next draw erases and repaints everything
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Draw a frame, rewriting only what changed since the previous one
    pub fn draw(&mut self, frame: &str) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }

        let lines = split_lines(frame);

        if !self.drawn {
            self.write_lines(&lines)?;
        } else if self.stale {
            self.move_to_line(0)?;
            queue!(self.out, terminal::Clear(terminal::ClearType::FromCursorDown))?;
            self.write_lines(&lines)?;
        } else {
            let common = self
                .previous
                .iter()
                .zip(lines.iter())
                .take_while(|(a, b)| a == b)
                .count();

            if common == lines.len() && common == self.previous.len() {
                return Ok(());
            }

            if common >= self.previous.len() {
                // Only new lines were appended below the old frame
                queue!(self.out, Print("\r\n"))?;
                self.write_lines(&lines[common..])?;
            } else {
                let start = common.min(lines.len().saturating_sub(1));
                self.move_to_line(start)?;
                queue!(self.out, terminal::Clear(terminal::ClearType::FromCursorDown))?;
                self.write_lines(&lines[start..])?;
            }
        }

        self.out.flush()?;
        self.previous = lines;
        self.drawn = true;
        self.stale = false;
        Ok(())
    }

    /// Draw the final frame and leave the cursor on a fresh line below it
    ///
    /// Nothing is written after this.
    pub fn finish(&mut self, frame: &str) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.draw(frame)?;
        queue!(self.out, Print("\r\n"))?;
        self.out.flush()?;
        self.finished = true;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Move from the end of the previous frame to column 0 of line `index`
    fn move_to_line(&mut self, index: usize) -> io::Result<()> {
        let last = self.previous.len().saturating_sub(1);
        let up = last.saturating_sub(index);
        if up > 0 {
            queue!(self.out, cursor::MoveUp(up as u16))?;
        }
        queue!(self.out, cursor::MoveToColumn(0))
    }

    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        // Raw mode turns off output post-processing, so newlines need an explicit \r
        queue!(self.out, Print(lines.join("\r\n")))
    }
}

fn split_lines(frame: &str) -> Vec<String> {
    frame
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}
