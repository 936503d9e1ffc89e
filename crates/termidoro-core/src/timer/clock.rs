//! Interval clock.
//!
//! Drives one interval to completion or cancellation. A single foreground
//! loop waits on three sources at once and handles whichever is ready first:
//!
//! ```text
//! tick (1s)        -> elapsed += 1, redraw progress, maybe notify, maybe finish
//! resize poll      -> if the size changed: redraw header, then progress
//! cancel signal    -> stop immediately
//! ```
//!
//! The cursor is hidden for the whole interval and shown again on every exit
//! path, including the run future being dropped mid-interval.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use super::{CancelSignal, IntervalKind};
use crate::notify::Notifier;
use crate::render::{RenderState, Renderer, SizeSource, Surface};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);
pub const RESIZE_POLL_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Completed,
    Cancelled,
}

/// One interval to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSpec {
    pub duration: Duration,
    pub kind: IntervalKind,
    pub cycle: u32,
    pub label: String,
}

impl IntervalSpec {
    pub fn new(duration: Duration, kind: IntervalKind, cycle: u32, label: impl Into<String>) -> Self {
        Self {
            duration,
            kind,
            cycle,
            label: label.into(),
        }
    }

    /// Whole seconds, never less than one.
    pub fn total_secs(&self) -> u64 {
        self.duration.as_secs().max(1)
    }
}

/// Hides the cursor for its lifetime.
struct HiddenCursor<'a, S: Surface> {
    surface: &'a mut S,
}

impl<'a, S: Surface> HiddenCursor<'a, S> {
    fn new(surface: &'a mut S) -> Self {
        if let Err(e) = surface.set_cursor_visible(false) {
            warn!(error = %e, "failed to hide cursor");
        }
        Self { surface }
    }
}

impl<S: Surface> Deref for HiddenCursor<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface> DerefMut for HiddenCursor<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface> Drop for HiddenCursor<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.surface.set_cursor_visible(true) {
            warn!(error = %e, "failed to restore cursor");
        }
    }
}

pub struct IntervalClock<Z: SizeSource> {
    renderer: Renderer,
    size_source: Z,
    notifier: Arc<dyn Notifier>,
    tick_period: Duration,
    resize_period: Duration,
    elapsed_secs: u64,
    size: (u16, u16),
}

impl<Z: SizeSource> IntervalClock<Z> {
    pub fn new(renderer: Renderer, size_source: Z, notifier: Arc<dyn Notifier>) -> Self {
        let size = size_source.size();
        Self {
            renderer,
            size_source,
            notifier,
            tick_period: TICK_PERIOD,
            resize_period: RESIZE_POLL_PERIOD,
            elapsed_secs: 0,
            size,
        }
    }

    /// Elapsed whole seconds of the current (or last) interval.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Last observed terminal size.
    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Re-read the terminal size outside of a running interval.
    pub fn refresh_size(&mut self) -> (u16, u16) {
        self.size = self.size_source.size();
        self.size
    }

    /// Run one interval until it completes or `cancel` fires.
    pub async fn run<S: Surface>(
        &mut self,
        surface: &mut S,
        interval: &IntervalSpec,
        mut cancel: CancelSignal,
    ) -> Outcome {
        let total = interval.total_secs();
        self.elapsed_secs = 0;
        self.size = self.size_source.size();
        let mut notified = false;

        info!(
            kind = %interval.kind,
            cycle = interval.cycle,
            total_secs = total,
            "interval started"
        );

        let mut screen = HiddenCursor::new(surface);
        self.redraw(&mut *screen, interval, true);
        self.notify_if_last_second(interval, &mut notified);

        let start = Instant::now();
        let mut ticker = time::interval_at(start + self.tick_period, self.tick_period);
        let mut resize = time::interval_at(start + self.resize_period, self.resize_period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.elapsed_secs += 1;
                    self.redraw(&mut *screen, interval, false);
                    self.notify_if_last_second(interval, &mut notified);

                    if self.elapsed_secs >= total {
                        info!(kind = %interval.kind, elapsed_secs = self.elapsed_secs, "interval completed");
                        return Outcome::Completed;
                    }
                }
                _ = resize.tick() => {
                    let size = self.size_source.size();
                    if size != self.size {
                        debug!(from = ?self.size, to = ?size, "terminal resized");
                        self.size = size;
                        self.redraw(&mut *screen, interval, true);
                    }
                }
                _ = cancel.cancelled() => {
                    info!(kind = %interval.kind, elapsed_secs = self.elapsed_secs, "interval cancelled");
                    return Outcome::Cancelled;
                }
            }
        }
    }

    fn render_state(&self, interval: &IntervalSpec) -> RenderState {
        RenderState {
            elapsed_secs: self.elapsed_secs,
            total_secs: interval.total_secs(),
            kind: interval.kind,
            cycle: interval.cycle,
            label: interval.label.clone(),
            width: self.size.0,
            height: self.size.1,
        }
    }

    /// Header first when requested, so the numbers land in the current box.
    fn redraw<S: Surface>(&self, surface: &mut S, interval: &IntervalSpec, with_header: bool) {
        let state = self.render_state(interval);
        if with_header {
            if let Err(e) = self.renderer.draw_header(surface, &state) {
                warn!(error = %e, "header redraw failed");
            }
        }
        if let Err(e) = self.renderer.draw_progress(surface, &state) {
            warn!(error = %e, "progress redraw failed");
        }
    }

    /// Fire the completion notification once, one second before the end.
    fn notify_if_last_second(&self, interval: &IntervalSpec, notified: &mut bool) {
        if !*notified && self.elapsed_secs + 1 >= interval.total_secs() {
            *notified = true;
            debug!(kind = %interval.kind, "sending completion notification");
            self.notifier.notify(interval.kind);
        }
    }
}
