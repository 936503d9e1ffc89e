//! Live renderer.
//!
//! Every redraw is a pure function of a [`RenderState`]: nothing from the
//! previous frame is kept. The header (label line and box) is drawn only at
//! interval start and after a resize; the progress line is redrawn every tick.
//!
//! ```text
//! [WORK Cycle 1]
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ [█████████░░░░░░░░░░░░░░░░░░░░░░░░░░]  26%          18m 30s left    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod bar;
mod surface;

pub use bar::{
    bar_cells, filled_cells, gradient, interpolate, percent, progress_fraction, BarCell, Rgb,
    BAR_WIDTH, EMPTY_GLYPH, FILLED_GLYPH,
};
pub use surface::{
    DrawCall, FixedSize, RecordingSurface, SizeSource, Surface, TerminalSize, TerminalSurface,
    FALLBACK_SIZE,
};

use std::io;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::timer::{CancelSignal, IntervalKind};

/// Outer width of the box, borders included.
pub const BOX_WIDTH: u16 = 71;
/// Rows used by the whole frame: label, three box rows, a gap, message, prompt.
pub const FRAME_HEIGHT: u16 = 7;

const CONTENT_ROW: u16 = 2;
const BAR_COL: u16 = 2;
const TIME_COL: u16 = 56;
const MESSAGE_ROW: u16 = 5;
const PROMPT_ROW: u16 = 6;

pub const CONTINUE_PROMPT: &str = "Continue with another cycle? [Y/n]: ";

/// Where the frame is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Top-left corner of the frame at a fixed position.
    Fixed { col: u16, row: u16 },
    /// Centered in the terminal; recomputed from the current size.
    Centered,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Fixed { col: 0, row: 0 }
    }
}

/// Serializable layout choice used by the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Fixed,
    Centered,
}

impl From<LayoutMode> for Layout {
    fn from(mode: LayoutMode) -> Self {
        match mode {
            LayoutMode::Fixed => Layout::default(),
            LayoutMode::Centered => Layout::Centered,
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    pub elapsed_secs: u64,
    pub total_secs: u64,
    pub kind: IntervalKind,
    pub cycle: u32,
    pub label: String,
    pub width: u16,
    pub height: u16,
}

impl RenderState {
    pub fn remaining_secs(&self) -> u64 {
        self.total_secs.saturating_sub(self.elapsed_secs)
    }
}

/// Answer to the continue prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueAnswer {
    Continue,
    Stop,
    /// Interrupted while waiting for input.
    Interrupted,
}

/// `n` / `no` in any case stops; anything else, including nothing, continues.
pub fn wants_to_continue(answer: Option<&str>) -> bool {
    match answer {
        Some(line) => {
            let normalized = line.trim().to_lowercase();
            normalized != "n" && normalized != "no"
        }
        None => true,
    }
}

/// `24m 59s left`
pub fn format_time_left(remaining_secs: u64) -> String {
    format!("{}m {:02}s left", remaining_secs / 60, remaining_secs % 60)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    layout: Layout,
}

impl Renderer {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Top-left corner of the frame for a terminal of the given size.
    pub fn anchor(&self, width: u16, height: u16) -> (u16, u16) {
        match self.layout {
            Layout::Fixed { col, row } => (col, row),
            Layout::Centered => (
                width.saturating_sub(BOX_WIDTH) / 2,
                height.saturating_sub(FRAME_HEIGHT) / 2,
            ),
        }
    }

    /// Clear the screen and draw the label line and the box border.
    pub fn draw_header<S: Surface>(&self, surface: &mut S, state: &RenderState) -> io::Result<()> {
        let (col, row) = self.anchor(state.width, state.height);
        let inner = usize::from(BOX_WIDTH - 2);

        surface.clear_screen()?;
        surface.move_to(col, row)?;
        surface.write_plain(&format!("[{} Cycle {}]", state.label, state.cycle))?;

        surface.move_to(col, row + 1)?;
        surface.write_plain(&format!("┌{}┐", "─".repeat(inner)))?;
        surface.move_to(col, row + CONTENT_ROW)?;
        surface.write_plain(&format!("│{}│", " ".repeat(inner)))?;
        surface.move_to(col, row + 3)?;
        surface.write_plain(&format!("└{}┘", "─".repeat(inner)))?;
        surface.flush()
    }

    /// Clear the inside of the box, then draw bar, percentage and time left.
    pub fn draw_progress<S: Surface>(&self, surface: &mut S, state: &RenderState) -> io::Result<()> {
        let (col, row) = self.anchor(state.width, state.height);
        let line = row + CONTENT_ROW;

        surface.clear_region(col + 1, line, BOX_WIDTH - 2)?;

        surface.move_to(col + BAR_COL, line)?;
        surface.write_plain("[")?;
        for cell in bar_cells(state.kind, state.elapsed_secs, state.total_secs) {
            let mut buf = [0u8; 4];
            surface.write_styled(cell.glyph.encode_utf8(&mut buf), cell.color)?;
        }
        surface.write_plain(&format!(
            "]  {}%",
            percent(state.elapsed_secs, state.total_secs)
        ))?;

        surface.move_to(col + TIME_COL, line)?;
        surface.write_plain(&format_time_left(state.remaining_secs()))?;
        surface.flush()
    }

    /// Show a one-line message below the box.
    pub fn show_message<S: Surface>(
        &self,
        surface: &mut S,
        size: (u16, u16),
        message: &str,
    ) -> io::Result<()> {
        let (col, row) = self.anchor(size.0, size.1);
        surface.clear_region(col, row + MESSAGE_ROW, BOX_WIDTH)?;
        surface.move_to(col, row + MESSAGE_ROW)?;
        surface.write_plain(message)?;
        surface.flush()
    }

    pub fn clear_message<S: Surface>(&self, surface: &mut S, size: (u16, u16)) -> io::Result<()> {
        let (col, row) = self.anchor(size.0, size.1);
        surface.clear_region(col, row + MESSAGE_ROW, BOX_WIDTH)?;
        surface.flush()
    }

    /// Move the cursor below the frame so later plain output does not land
    /// inside the box.
    pub fn park_cursor<S: Surface>(&self, surface: &mut S, size: (u16, u16)) -> io::Result<()> {
        let (_, row) = self.anchor(size.0, size.1);
        surface.move_to(0, row + FRAME_HEIGHT)?;
        surface.write_plain("\n")?;
        surface.flush()
    }

    /// Ask whether to run another cycle.
    ///
    /// Reveals the cursor while waiting and hides it again before returning.
    /// A read error or end of input counts as "continue". The wait also ends
    /// when `cancel` fires.
    pub async fn prompt_continue<S, R>(
        &self,
        surface: &mut S,
        size: (u16, u16),
        input: &mut R,
        cancel: &mut CancelSignal,
    ) -> ContinueAnswer
    where
        S: Surface,
        R: AsyncBufRead + Unpin,
    {
        let (col, row) = self.anchor(size.0, size.1);
        let shown = surface
            .clear_region(col, row + PROMPT_ROW, BOX_WIDTH)
            .and_then(|_| surface.move_to(col, row + PROMPT_ROW))
            .and_then(|_| surface.write_plain(CONTINUE_PROMPT))
            .and_then(|_| surface.set_cursor_visible(true));
        if let Err(e) = shown {
            warn!(error = %e, "failed to draw continue prompt");
        }

        let mut line = String::new();
        let answer = tokio::select! {
            read = input.read_line(&mut line) => match read {
                Ok(0) => {
                    debug!("continue prompt: end of input");
                    ContinueAnswer::Continue
                }
                Ok(_) if wants_to_continue(Some(&line)) => ContinueAnswer::Continue,
                Ok(_) => ContinueAnswer::Stop,
                Err(e) => {
                    warn!(error = %e, "continue prompt: read failed");
                    ContinueAnswer::Continue
                }
            },
            _ = cancel.cancelled() => ContinueAnswer::Interrupted,
        };

        if let Err(e) = surface.set_cursor_visible(false) {
            warn!(error = %e, "failed to hide cursor after prompt");
        }
        answer
    }
}
