//! Cycle orchestrator: WORK -> BREAK -> continue? -> WORK ...
//!
//! ## State Transitions
//!
//! ```text
//! AwaitingWork     --durations resolved--> RunningWork
//! RunningWork      --completed-->          AwaitingBreak
//! RunningWork      --cancelled-->          Finished
//! AwaitingBreak    --durations resolved--> RunningBreak
//! RunningBreak     --completed-->          AwaitingContinue
//! RunningBreak     --cancelled-->          Finished
//! AwaitingContinue --continue-->           AwaitingWork (cycle + 1)
//! AwaitingContinue --stop-->               Finished
//! ```
//!
//! The orchestrator is the only writer of the ledger. Durations are resolved
//! once, on the first WORK interval, and reused for every later cycle.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::render::{ContinueAnswer, SizeSource, Surface};
use crate::timer::{
    parse_minutes_answer, IntervalClock, IntervalKind, IntervalSpec, InterruptSource, Ledger,
    Outcome, ResolvedDurations, DEFAULT_BREAK, DEFAULT_WORK,
};

pub const WORK_PROMPT: &str = "Work duration in minutes (default 25): ";
pub const BREAK_PROMPT: &str = "Break duration in minutes (default 5): ";
pub const INPUT_CLOSED: &str = "\nInput closed. Using default values.\n";
pub const BREAK_MESSAGE: &str = "Time for a break!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    AwaitingWork,
    RunningWork,
    AwaitingBreak,
    RunningBreak,
    AwaitingContinue,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleEvent {
    DurationResolved,
    Clock(Outcome),
    Continue,
    Stop,
}

impl CycleState {
    /// Next state for `event`. Events that do not apply leave the state as is.
    pub fn on(self, event: CycleEvent) -> CycleState {
        use CycleEvent as E;
        use CycleState as S;

        match (self, event) {
            (S::AwaitingWork, E::DurationResolved) => S::RunningWork,
            (S::RunningWork, E::Clock(Outcome::Completed)) => S::AwaitingBreak,
            (S::RunningWork, E::Clock(Outcome::Cancelled)) => S::Finished,
            (S::AwaitingBreak, E::DurationResolved) => S::RunningBreak,
            (S::RunningBreak, E::Clock(Outcome::Completed)) => S::AwaitingContinue,
            (S::RunningBreak, E::Clock(Outcome::Cancelled)) => S::Finished,
            (S::AwaitingContinue, E::Continue) => S::AwaitingWork,
            (S::AwaitingContinue, E::Stop) => S::Finished,
            (state, _) => state,
        }
    }

    pub fn is_finished(self) -> bool {
        self == CycleState::Finished
    }
}

/// Already-validated settings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSettings {
    /// Explicit work length; `None` means default or ask.
    pub work: Option<Duration>,
    /// Explicit break length; `None` means default or ask.
    pub rest: Option<Duration>,
    /// Custom name shown for WORK intervals.
    pub label: String,
    /// Skip every prompt and keep cycling.
    pub auto_confirm: bool,
    pub sound_enabled: bool,
}

pub struct CycleOrchestrator<S, Z, R, I>
where
    S: Surface,
    Z: SizeSource,
    R: AsyncBufRead + Unpin,
    I: InterruptSource,
{
    surface: S,
    clock: IntervalClock<Z>,
    input: R,
    interrupts: I,
    settings: SessionSettings,
    durations: Option<ResolvedDurations>,
    ledger: Ledger,
    state: CycleState,
    session_number: u32,
    cycle_number: u32,
}

impl<S, Z, R, I> CycleOrchestrator<S, Z, R, I>
where
    S: Surface,
    Z: SizeSource,
    R: AsyncBufRead + Unpin,
    I: InterruptSource,
{
    pub fn new(
        surface: S,
        clock: IntervalClock<Z>,
        input: R,
        interrupts: I,
        settings: SessionSettings,
    ) -> Self {
        Self {
            surface,
            clock,
            input,
            interrupts,
            settings,
            durations: None,
            ledger: Ledger::new(),
            state: CycleState::AwaitingWork,
            session_number: 0,
            cycle_number: 1,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn durations(&self) -> Option<ResolvedDurations> {
        self.durations
    }

    pub fn session_number(&self) -> u32 {
        self.session_number
    }

    pub fn cycle_number(&self) -> u32 {
        self.cycle_number
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    // ── Driving ──────────────────────────────────────────────────────

    /// Run cycles until an interval is cancelled or the user declines to
    /// continue.
    pub async fn run(&mut self) -> &Ledger {
        while !self.state.is_finished() {
            let event = match self.state {
                CycleState::AwaitingWork | CycleState::AwaitingBreak => {
                    self.resolve_durations().await;
                    CycleEvent::DurationResolved
                }
                CycleState::RunningWork => {
                    let outcome = self.run_interval(IntervalKind::Work).await;
                    if outcome == Outcome::Completed {
                        self.announce_break();
                    }
                    CycleEvent::Clock(outcome)
                }
                CycleState::RunningBreak => {
                    CycleEvent::Clock(self.run_interval(IntervalKind::Break).await)
                }
                CycleState::AwaitingContinue => {
                    let event = self.ask_to_continue().await;
                    if event == CycleEvent::Continue {
                        self.cycle_number += 1;
                    }
                    event
                }
                CycleState::Finished => break,
            };

            let next = self.state.on(event);
            debug!(from = ?self.state, ?event, to = ?next, "cycle transition");
            self.state = next;
        }

        let size = self.clock.refresh_size();
        let renderer = *self.clock.renderer();
        report(renderer.park_cursor(&mut self.surface, size), "park cursor");
        report(self.surface.set_cursor_visible(true), "show cursor");

        info!(
            intervals = self.ledger.len(),
            completed = self.ledger.completed_count(),
            total_completed_secs = self.ledger.total_completed().as_secs(),
            "session finished"
        );
        &self.ledger
    }

    async fn run_interval(&mut self, kind: IntervalKind) -> Outcome {
        let durations = self.durations.unwrap_or_default();
        let duration = durations.for_kind(kind);
        let index = self.ledger.add_interval(duration, kind);
        self.session_number += 1;

        let label = kind.display_label(&self.settings.label);
        let spec = IntervalSpec::new(duration, kind, self.cycle_number, label.clone());
        debug!(session = self.session_number, cycle = self.cycle_number, %kind, "running interval");

        let cancel = self.interrupts.arm();
        let outcome = self.clock.run(&mut self.surface, &spec, cancel).await;

        match outcome {
            Outcome::Completed => self.ledger.mark_completed(index),
            Outcome::Cancelled => {
                self.ledger.mark_cancelled(index);
                let size = self.clock.size();
                let renderer = *self.clock.renderer();
                report(
                    renderer.show_message(
                        &mut self.surface,
                        size,
                        &format!("{label} Cycle {} cancelled", self.cycle_number),
                    ),
                    "cancel message",
                );
            }
        }
        outcome
    }

    fn announce_break(&mut self) {
        let size = self.clock.size();
        let renderer = *self.clock.renderer();
        report(
            renderer.show_message(&mut self.surface, size, BREAK_MESSAGE),
            "break message",
        );
        report(renderer.clear_message(&mut self.surface, size), "clear message");
    }

    async fn ask_to_continue(&mut self) -> CycleEvent {
        if self.settings.auto_confirm {
            return CycleEvent::Continue;
        }

        let size = self.clock.refresh_size();
        let renderer = *self.clock.renderer();
        report(renderer.show_message(&mut self.surface, size, ""), "message line");

        let mut cancel = self.interrupts.arm();
        let answer = renderer
            .prompt_continue(&mut self.surface, size, &mut self.input, &mut cancel)
            .await;

        match answer {
            ContinueAnswer::Continue => {
                report(renderer.clear_message(&mut self.surface, size), "clear message");
                CycleEvent::Continue
            }
            ContinueAnswer::Stop => CycleEvent::Stop,
            ContinueAnswer::Interrupted => {
                info!("interrupted at continue prompt");
                CycleEvent::Stop
            }
        }
    }

    // ── Durations ────────────────────────────────────────────────────

    async fn resolve_durations(&mut self) {
        if self.durations.is_some() {
            return;
        }

        let resolved = match (self.settings.work, self.settings.rest) {
            (None, None) if !self.settings.auto_confirm => self.prompt_durations().await,
            (work, rest) => ResolvedDurations::new(
                work.unwrap_or(DEFAULT_WORK),
                rest.unwrap_or(DEFAULT_BREAK),
            ),
        };

        info!(
            work_secs = resolved.work.as_secs(),
            break_secs = resolved.rest.as_secs(),
            "durations resolved"
        );
        self.durations = Some(resolved);
    }

    /// Ask for both lengths, once per process.
    async fn prompt_durations(&mut self) -> ResolvedDurations {
        let work = match self.ask_minutes(WORK_PROMPT, DEFAULT_WORK).await {
            Some(work) => work,
            None => return ResolvedDurations::default(),
        };
        let rest = self
            .ask_minutes(BREAK_PROMPT, DEFAULT_BREAK)
            .await
            .unwrap_or(DEFAULT_BREAK);
        ResolvedDurations::new(work, rest)
    }

    /// `None` on end of input.
    async fn ask_minutes(&mut self, prompt: &str, default: Duration) -> Option<Duration> {
        report(
            self.surface
                .write_plain(prompt)
                .and_then(|_| self.surface.flush()),
            "duration prompt",
        );

        let mut line = String::new();
        match self.input.read_line(&mut line).await {
            Ok(0) => {
                report(
                    self.surface
                        .write_plain(INPUT_CLOSED)
                        .and_then(|_| self.surface.flush()),
                    "input closed notice",
                );
                None
            }
            Ok(_) => Some(parse_minutes_answer(&line, default)),
            Err(e) => {
                warn!(error = %e, "failed to read duration, using default");
                Some(default)
            }
        }
    }
}

fn report(result: io::Result<()>, what: &str) {
    if let Err(e) = result {
        warn!(error = %e, "{what} failed");
    }
}
