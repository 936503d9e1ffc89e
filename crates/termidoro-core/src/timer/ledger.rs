//! Session ledger: append-only record of every interval attempted.
//!
//! The ledger is pure data. It is owned and mutated by the foreground cycle
//! loop only; nothing in the clock or the interrupt listener touches it.

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::IntervalKind;

/// Terminal status of an interval. A single tag instead of two flags, so an
/// interval can never be both completed and cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interval {
    pub kind: IntervalKind,
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub status: IntervalStatus,
}

impl Interval {
    pub fn completed(&self) -> bool {
        self.status == IntervalStatus::Completed
    }

    pub fn cancelled(&self) -> bool {
        self.status == IntervalStatus::Cancelled
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    intervals: Vec<Interval>,
    #[serde(with = "duration_secs")]
    total_completed: Duration,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pending interval starting now. Returns its index.
    pub fn add_interval(&mut self, duration: Duration, kind: IntervalKind) -> usize {
        self.add_interval_at(duration, kind, Local::now())
    }

    pub fn add_interval_at(
        &mut self,
        duration: Duration,
        kind: IntervalKind,
        start_time: DateTime<Local>,
    ) -> usize {
        let end_time = start_time
            + chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
        self.intervals.push(Interval {
            kind,
            duration,
            start_time,
            end_time,
            status: IntervalStatus::Pending,
        });
        self.intervals.len() - 1
    }

    /// Mark an interval completed and add its duration to the total.
    ///
    /// Out-of-range indices and already-finished intervals are left untouched.
    pub fn mark_completed(&mut self, index: usize) {
        if let Some(interval) = self.intervals.get_mut(index) {
            if interval.status == IntervalStatus::Pending {
                interval.status = IntervalStatus::Completed;
                self.total_completed += interval.duration;
            }
        }
    }

    /// Mark an interval cancelled. Never changes the completed total.
    pub fn mark_cancelled(&mut self, index: usize) {
        if let Some(interval) = self.intervals.get_mut(index) {
            if interval.status == IntervalStatus::Pending {
                interval.status = IntervalStatus::Cancelled;
            }
        }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn total_completed(&self) -> Duration {
        self.total_completed
    }

    pub fn completed_count(&self) -> usize {
        self.intervals.iter().filter(|i| i.completed()).count()
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_complete_cancel() {
        let mut ledger = Ledger::new();

        let first = ledger.add_interval(Duration::from_secs(600), IntervalKind::Work);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.intervals()[0].duration, Duration::from_secs(600));
        assert_eq!(ledger.intervals()[0].status, IntervalStatus::Pending);

        ledger.mark_completed(first);
        assert!(ledger.intervals()[0].completed());
        assert_eq!(ledger.total_completed(), Duration::from_secs(600));

        let second = ledger.add_interval(Duration::from_secs(300), IntervalKind::Break);
        ledger.mark_cancelled(second);
        assert!(ledger.intervals()[1].cancelled());
        assert!(!ledger.intervals()[1].completed());
        assert_eq!(ledger.total_completed(), Duration::from_secs(600));
    }

    #[test]
    fn end_time_is_start_plus_duration() {
        let mut ledger = Ledger::new();
        let start = Local::now();
        let i = ledger.add_interval_at(Duration::from_secs(90), IntervalKind::Work, start);
        let interval = ledger.get(i).unwrap();
        assert_eq!(interval.end_time - interval.start_time, chrono::Duration::seconds(90));
    }

    #[test]
    fn out_of_range_is_noop() {
        let mut ledger = Ledger::new();
        ledger.mark_completed(3);
        ledger.mark_cancelled(3);
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_completed(), Duration::ZERO);
    }

    #[test]
    fn first_terminal_status_wins() {
        let mut ledger = Ledger::new();
        let i = ledger.add_interval(Duration::from_secs(60), IntervalKind::Work);
        ledger.mark_cancelled(i);
        ledger.mark_completed(i);
        assert!(ledger.intervals()[i].cancelled());
        assert_eq!(ledger.total_completed(), Duration::ZERO);

        let j = ledger.add_interval(Duration::from_secs(60), IntervalKind::Work);
        ledger.mark_completed(j);
        ledger.mark_completed(j);
        assert_eq!(ledger.total_completed(), Duration::from_secs(60));
        assert_eq!(ledger.completed_count(), 1);
    }

    #[test]
    fn total_matches_completed_sum() {
        let mut ledger = Ledger::new();
        for (n, secs) in [30u64, 45, 60, 75].into_iter().enumerate() {
            let i = ledger.add_interval(Duration::from_secs(secs), IntervalKind::Work);
            if n % 2 == 0 {
                ledger.mark_completed(i);
            } else {
                ledger.mark_cancelled(i);
            }
        }
        let sum: Duration = ledger
            .intervals()
            .iter()
            .filter(|i| i.completed())
            .map(|i| i.duration)
            .sum();
        assert_eq!(ledger.total_completed(), sum);
        assert_eq!(sum, Duration::from_secs(90));
    }
}
