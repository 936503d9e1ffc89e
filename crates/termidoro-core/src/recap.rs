//! End-of-run summary of the ledger, as text or JSON.

use std::fmt;

use serde::Serialize;

use crate::timer::{format_duration, format_duration_padded, IntervalKind, IntervalStatus, Ledger};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecapEntry {
    /// 1-based position in the ledger.
    pub index: usize,
    pub kind: IntervalKind,
    pub duration_secs: u64,
    pub duration: String,
    /// Local `HH:MM`.
    pub start: String,
    pub end: String,
    pub status: IntervalStatus,
}

impl RecapEntry {
    fn glyph(&self) -> char {
        if self.status == IntervalStatus::Cancelled {
            '✗'
        } else {
            '✓'
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recap {
    pub entries: Vec<RecapEntry>,
    pub total_completed_secs: u64,
    pub total: String,
}

impl Recap {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let entries = ledger
            .intervals()
            .iter()
            .enumerate()
            .map(|(i, interval)| RecapEntry {
                index: i + 1,
                kind: interval.kind,
                duration_secs: interval.duration.as_secs(),
                duration: format_duration(interval.duration),
                start: interval.start_time.format("%H:%M").to_string(),
                end: interval.end_time.format("%H:%M").to_string(),
                status: interval.status,
            })
            .collect();

        Self {
            entries,
            total_completed_secs: ledger.total_completed().as_secs(),
            total: format_duration_padded(ledger.total_completed()),
        }
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Recap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "--- Session Recap ---")?;
        for entry in &self.entries {
            writeln!(
                f,
                "{}. {} - {} - {} {}",
                entry.index,
                entry.duration,
                entry.start,
                entry.end,
                entry.glyph()
            )?;
        }
        writeln!(f, "Total: {}", self.total)
    }
}
