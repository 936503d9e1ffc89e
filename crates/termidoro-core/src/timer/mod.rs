mod cancel;
mod clock;
mod duration;
mod kind;
mod ledger;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal, InterruptSource, OsInterrupts};
pub use clock::{IntervalClock, IntervalSpec, Outcome, RESIZE_POLL_PERIOD, TICK_PERIOD};
pub use duration::{
    format_duration, format_duration_padded, format_minutes, parse_duration, parse_minutes_answer,
    whole_seconds, ResolvedDurations, DEFAULT_BREAK, DEFAULT_WORK,
};
pub use kind::IntervalKind;
pub use ledger::{Interval, IntervalStatus, Ledger};
