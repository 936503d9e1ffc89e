//! Integration tests for the cycle orchestrator.
//!
//! Runs whole sessions on tokio's paused clock against a recording surface,
//! scripted stdin and scripted interrupts.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use termidoro_core::cycle::{BREAK_PROMPT, INPUT_CLOSED, WORK_PROMPT};
use termidoro_core::render::{FixedSize, CONTINUE_PROMPT};
use termidoro_core::{
    cancel_pair, CancelSignal, CycleOrchestrator, CycleState, IntervalClock, IntervalKind,
    IntervalStatus, InterruptSource, Recap, RecordingNotifier, RecordingSurface, Renderer,
    SessionSettings,
};
use tokio::io::AsyncBufRead;

/// Interrupt after the given delay for each armed interval, in order.
/// `None` (or an exhausted script) never interrupts.
struct ScriptedInterrupts {
    script: VecDeque<Option<Duration>>,
}

impl ScriptedInterrupts {
    fn new(script: impl IntoIterator<Item = Option<Duration>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    fn none() -> Self {
        Self::new([])
    }
}

impl InterruptSource for ScriptedInterrupts {
    fn arm(&mut self) -> CancelSignal {
        match self.script.pop_front().flatten() {
            Some(delay) => {
                let (mut handle, signal) = cancel_pair();
                let task = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    handle.cancel();
                });
                signal.with_listener(task)
            }
            None => CancelSignal::never(),
        }
    }
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn orchestrator<R: AsyncBufRead + Unpin>(
    settings: SessionSettings,
    input: R,
    interrupts: ScriptedInterrupts,
    notifier: &RecordingNotifier,
) -> CycleOrchestrator<RecordingSurface, FixedSize, R, ScriptedInterrupts> {
    let clock = IntervalClock::new(
        Renderer::default(),
        FixedSize(80, 24),
        Arc::new(notifier.clone()),
    );
    CycleOrchestrator::new(RecordingSurface::new(), clock, input, interrupts, settings)
}

#[tokio::test(start_paused = true)]
async fn test_auto_confirm_cycles_until_interrupted() {
    let notifier = RecordingNotifier::new();
    let settings = SessionSettings {
        work: Some(secs(2)),
        rest: Some(secs(1)),
        auto_confirm: true,
        ..SessionSettings::default()
    };
    let interrupts = ScriptedInterrupts::new([None, None, Some(Duration::from_millis(500))]);
    let mut session = orchestrator(settings, &b""[..], interrupts, &notifier);

    let ledger = session.run().await.clone();

    let statuses: Vec<IntervalStatus> = ledger.intervals().iter().map(|i| i.status).collect();
    assert_eq!(
        statuses,
        vec![
            IntervalStatus::Completed,
            IntervalStatus::Completed,
            IntervalStatus::Cancelled
        ]
    );
    assert_eq!(ledger.total_completed(), secs(3));
    assert_eq!(session.cycle_number(), 2);
    assert_eq!(session.session_number(), 3);
    assert_eq!(session.state(), CycleState::Finished);

    let text = session.surface().text();
    assert!(!text.contains(CONTINUE_PROMPT));
    assert!(!text.contains(WORK_PROMPT));
    assert!(text.contains("Time for a break!"));
    assert!(text.contains("WORK Cycle 2 cancelled"));
    assert_eq!(session.surface().cursor_visible(), Some(true));
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_during_first_work_interval() {
    let notifier = RecordingNotifier::new();
    let settings = SessionSettings {
        work: Some(secs(25 * 60)),
        rest: Some(secs(5 * 60)),
        ..SessionSettings::default()
    };
    let interrupts = ScriptedInterrupts::new([Some(Duration::from_millis(5500))]);
    let mut session = orchestrator(settings, &b""[..], interrupts, &notifier);

    let began = tokio::time::Instant::now();
    let ledger = session.run().await.clone();

    assert_eq!(began.elapsed(), Duration::from_millis(5500));
    assert_eq!(ledger.len(), 1);
    assert!(ledger.intervals()[0].cancelled());
    assert_eq!(ledger.total_completed(), Duration::ZERO);
    assert!(notifier.sent().is_empty());

    let recap = Recap::from_ledger(&ledger).to_string();
    assert!(recap.contains("1. 25m 0s - "));
    assert!(recap.trim_end().ends_with("Total: 0m 00s"));
    assert!(recap.contains('✗'));
}

#[tokio::test(start_paused = true)]
async fn test_durations_are_prompted_once() {
    let notifier = RecordingNotifier::new();
    let input = b"0.05\n0.05\ny\nn\n";
    let mut session = orchestrator(
        SessionSettings::default(),
        &input[..],
        ScriptedInterrupts::none(),
        &notifier,
    );

    let ledger = session.run().await.clone();

    let durations = session.durations().unwrap();
    assert_eq!(durations.work, secs(3));
    assert_eq!(durations.rest, secs(3));
    assert_eq!(ledger.len(), 4);
    assert_eq!(ledger.completed_count(), 4);
    assert_eq!(ledger.total_completed(), secs(12));

    let text = session.surface().text();
    assert_eq!(text.matches(WORK_PROMPT).count(), 1);
    assert_eq!(text.matches(BREAK_PROMPT).count(), 1);
    assert_eq!(text.matches(CONTINUE_PROMPT).count(), 2);
    assert_eq!(
        notifier.sent(),
        vec![
            IntervalKind::Work,
            IntervalKind::Break,
            IntervalKind::Work,
            IntervalKind::Break
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_closed_input_applies_defaults() {
    let notifier = RecordingNotifier::new();
    // Break interrupted after one second so the run ends.
    let interrupts = ScriptedInterrupts::new([None, Some(secs(1))]);
    let mut session = orchestrator(SessionSettings::default(), &b""[..], interrupts, &notifier);

    let ledger = session.run().await.clone();

    let durations = session.durations().unwrap();
    assert_eq!(durations.work, secs(25 * 60));
    assert_eq!(durations.rest, secs(5 * 60));
    assert_eq!(ledger.total_completed(), secs(25 * 60));
    assert!(ledger.intervals()[1].cancelled());

    let text = session.surface().text();
    assert!(text.contains(INPUT_CLOSED));
    assert!(!text.contains(BREAK_PROMPT));
}

#[tokio::test(start_paused = true)]
async fn test_declining_continue_variants_stop() {
    for answer in ["n\n", "N\n", "no\n", "  No  \n"] {
        let notifier = RecordingNotifier::new();
        let settings = SessionSettings {
            work: Some(secs(1)),
            rest: Some(secs(1)),
            ..SessionSettings::default()
        };
        let mut session = orchestrator(
            settings,
            answer.as_bytes(),
            ScriptedInterrupts::none(),
            &notifier,
        );

        let ledger = session.run().await.clone();
        assert_eq!(ledger.len(), 2, "answer {answer:?}");
        assert_eq!(session.cycle_number(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_other_answers_continue() {
    let notifier = RecordingNotifier::new();
    let settings = SessionSettings {
        work: Some(secs(1)),
        rest: Some(secs(1)),
        label: "Writing".into(),
        ..SessionSettings::default()
    };
    let input = b"\nsure\nyes\nn\n";
    let mut session = orchestrator(settings, &input[..], ScriptedInterrupts::none(), &notifier);

    let ledger = session.run().await.clone();

    assert_eq!(ledger.len(), 8);
    assert_eq!(ledger.total_completed(), secs(8));
    assert_eq!(session.cycle_number(), 4);
    let labels = session.surface().text_at(0, 0);
    assert!(labels.iter().any(|l| l == "[Writing Cycle 4]"));
    assert!(labels.iter().any(|l| l == "[BREAK Cycle 1]"));
}

#[tokio::test(start_paused = true)]
async fn test_fractional_durations_credit_what_ran() {
    let notifier = RecordingNotifier::new();
    let settings = SessionSettings {
        work: Some(Duration::from_millis(1500)),
        rest: Some(Duration::from_millis(1500)),
        ..SessionSettings::default()
    };
    let mut session = orchestrator(settings, &b"n\n"[..], ScriptedInterrupts::none(), &notifier);

    let began = tokio::time::Instant::now();
    let ledger = session.run().await.clone();

    assert_eq!(began.elapsed(), secs(2));
    assert_eq!(ledger.completed_count(), 2);
    assert_eq!(ledger.total_completed(), secs(2));
    assert!(ledger.intervals().iter().all(|i| i.duration == secs(1)));

    let recap = Recap::from_ledger(&ledger).to_string();
    assert!(recap.trim_end().ends_with("Total: 0m 02s"));
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_at_continue_prompt_stops() {
    let notifier = RecordingNotifier::new();
    let settings = SessionSettings {
        work: Some(secs(1)),
        rest: Some(secs(1)),
        ..SessionSettings::default()
    };
    // Keep the write half alive so the prompt read stays pending.
    let (_writer, reader) = tokio::io::duplex(64);
    let interrupts = ScriptedInterrupts::new([None, None, Some(Duration::from_millis(200))]);
    let mut session = orchestrator(
        settings,
        tokio::io::BufReader::new(reader),
        interrupts,
        &notifier,
    );

    let ledger = session.run().await.clone();

    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.completed_count(), 2);
    assert_eq!(session.state(), CycleState::Finished);
    assert_eq!(session.surface().cursor_visible(), Some(true));
}
