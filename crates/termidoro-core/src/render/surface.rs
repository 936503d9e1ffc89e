//! Drawing surfaces and terminal size sources.
//!
//! [`TerminalSurface`] turns draw calls into crossterm commands. The
//! [`RecordingSurface`] keeps the calls instead so rendering can be checked
//! without a terminal.

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use tracing::debug;

use super::Rgb;

/// Used whenever the terminal size cannot be queried.
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Minimal drawing API the renderer needs. Coordinates are zero-based
/// `(column, row)`.
pub trait Surface {
    fn move_to(&mut self, col: u16, row: u16) -> io::Result<()>;
    fn clear_screen(&mut self) -> io::Result<()>;
    /// Blank `width` cells starting at `(col, row)`.
    fn clear_region(&mut self, col: u16, row: u16, width: u16) -> io::Result<()>;
    fn write_styled(&mut self, text: &str, color: Option<Rgb>) -> io::Result<()>;
    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;

    fn write_plain(&mut self, text: &str) -> io::Result<()> {
        self.write_styled(text, None)
    }
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn move_to(&mut self, col: u16, row: u16) -> io::Result<()> {
        (**self).move_to(col, row)
    }
    fn clear_screen(&mut self) -> io::Result<()> {
        (**self).clear_screen()
    }
    fn clear_region(&mut self, col: u16, row: u16, width: u16) -> io::Result<()> {
        (**self).clear_region(col, row, width)
    }
    fn write_styled(&mut self, text: &str, color: Option<Rgb>) -> io::Result<()> {
        (**self).write_styled(text, color)
    }
    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        (**self).set_cursor_visible(visible)
    }
    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Real terminal output through crossterm.
pub struct TerminalSurface<W: Write = Stdout> {
    out: W,
}

impl TerminalSurface<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn move_to(&mut self, col: u16, row: u16) -> io::Result<()> {
        queue!(self.out, MoveTo(col, row))
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    fn clear_region(&mut self, col: u16, row: u16, width: u16) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(col, row),
            Print(" ".repeat(usize::from(width)))
        )
    }

    fn write_styled(&mut self, text: &str, color: Option<Rgb>) -> io::Result<()> {
        match color {
            Some(Rgb { r, g, b }) => queue!(
                self.out,
                SetForegroundColor(Color::Rgb { r, g, b }),
                Print(text),
                ResetColor
            ),
            None => queue!(self.out, Print(text)),
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        if visible {
            queue!(self.out, Show)?;
        } else {
            queue!(self.out, Hide)?;
        }
        self.out.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// One recorded draw operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    MoveTo { col: u16, row: u16 },
    ClearScreen,
    ClearRegion { col: u16, row: u16, width: u16 },
    Write { text: String, color: Option<Rgb> },
    CursorVisible(bool),
    Flush,
}

/// Surface that records every call. Intended for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    cursor_visible: Option<bool>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last visibility set, or `None` if never touched.
    pub fn cursor_visible(&self) -> Option<bool> {
        self.cursor_visible
    }

    /// Concatenation of every written string.
    pub fn text(&self) -> String {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Write { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every text written right after a `MoveTo` landing on `(col, row)`,
    /// joined with the writes that follow until the next positioning call.
    pub fn text_at(&self, col: u16, row: u16) -> Vec<String> {
        let mut found = Vec::new();
        let mut current: Option<String> = None;
        for call in &self.calls {
            match call {
                DrawCall::MoveTo { col: c, row: r } => {
                    if let Some(done) = current.take() {
                        found.push(done);
                    }
                    if *c == col && *r == row {
                        current = Some(String::new());
                    }
                }
                DrawCall::Write { text, .. } => {
                    if let Some(buf) = current.as_mut() {
                        buf.push_str(text);
                    }
                }
                DrawCall::ClearScreen | DrawCall::ClearRegion { .. } => {
                    if let Some(done) = current.take() {
                        found.push(done);
                    }
                }
                DrawCall::CursorVisible(_) | DrawCall::Flush => {}
            }
        }
        if let Some(done) = current {
            found.push(done);
        }
        found
    }
}

impl Surface for RecordingSurface {
    fn move_to(&mut self, col: u16, row: u16) -> io::Result<()> {
        self.calls.push(DrawCall::MoveTo { col, row });
        Ok(())
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.calls.push(DrawCall::ClearScreen);
        Ok(())
    }

    fn clear_region(&mut self, col: u16, row: u16, width: u16) -> io::Result<()> {
        self.calls.push(DrawCall::ClearRegion { col, row, width });
        Ok(())
    }

    fn write_styled(&mut self, text: &str, color: Option<Rgb>) -> io::Result<()> {
        self.calls.push(DrawCall::Write {
            text: text.to_string(),
            color,
        });
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        self.cursor_visible = Some(visible);
        self.calls.push(DrawCall::CursorVisible(visible));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.calls.push(DrawCall::Flush);
        Ok(())
    }
}

/// Where the clock gets the current terminal dimensions from.
pub trait SizeSource {
    /// `(width, height)` in cells.
    fn size(&self) -> (u16, u16);
}

impl<F: Fn() -> (u16, u16)> SizeSource for F {
    fn size(&self) -> (u16, u16) {
        self()
    }
}

/// Queries the controlling terminal, falling back to 80x24.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSize;

impl SizeSource for TerminalSize {
    fn size(&self) -> (u16, u16) {
        match crossterm::terminal::size() {
            Ok((w, h)) if w > 0 && h > 0 => (w, h),
            Ok(_) => FALLBACK_SIZE,
            Err(e) => {
                debug!(error = %e, "terminal size unavailable, using fallback");
                FALLBACK_SIZE
            }
        }
    }
}

/// A size that never changes.
#[derive(Debug, Clone, Copy)]
pub struct FixedSize(pub u16, pub u16);

impl SizeSource for FixedSize {
    fn size(&self) -> (u16, u16) {
        (self.0, self.1)
    }
}
