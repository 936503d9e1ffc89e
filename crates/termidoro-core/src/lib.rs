//! # Termidoro Core Library
//!
//! This library provides the core logic for the termidoro terminal pomodoro
//! timer. The `termidoro` binary is a thin layer over it: it parses arguments,
//! sets up logging and hands a [`CycleOrchestrator`] the real terminal.
//!
//! ## Architecture
//!
//! - **Interval Clock**: drives one interval at 1 s resolution, redraws on
//!   terminal resize and stops early on a single-fire cancellation signal
//! - **Live Renderer**: draws the framed label, gradient progress bar and
//!   time-left text onto a [`Surface`]
//! - **Cycle Orchestrator**: WORK, BREAK, continue prompt, repeat
//! - **Session Ledger**: append-only record of every interval, summarised by
//!   the [`Recap`] at exit
//! - **Storage**: TOML-based user configuration
//!
//! ## Key Components
//!
//! - [`IntervalClock`]: tick loop for one interval
//! - [`Renderer`]: frame geometry and drawing
//! - [`CycleOrchestrator`]: cycle state machine
//! - [`Ledger`]: interval history
//! - [`Config`]: user defaults

pub mod cycle;
pub mod error;
pub mod notify;
pub mod recap;
pub mod render;
pub mod storage;
pub mod templates;
pub mod timer;

pub use cycle::{CycleEvent, CycleOrchestrator, CycleState, SessionSettings};
pub use error::{ConfigError, CoreError, DurationError, TemplateError};
pub use notify::{notifier_for, DesktopNotifier, Notifier, RecordingNotifier, SilentNotifier};
pub use recap::{Recap, RecapEntry};
pub use render::{
    DrawCall, Layout, LayoutMode, RecordingSurface, Renderer, SizeSource, Surface, TerminalSize,
    TerminalSurface,
};
pub use storage::Config;
pub use templates::Template;
pub use timer::{
    cancel_pair, CancelHandle, CancelSignal, Interval, IntervalClock, IntervalKind, IntervalSpec,
    IntervalStatus, InterruptSource, Ledger, OsInterrupts, Outcome, ResolvedDurations,
};
