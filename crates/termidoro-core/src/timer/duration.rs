//! Duration parsing, formatting and the once-per-process resolved durations.
//!
//! Accepted input follows the familiar `1h30m` / `25m` / `30s` / `1.5h` form.
//! A bare number is read as minutes, so `25` and `2.5` both work.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::IntervalKind;
use crate::error::DurationError;

pub const DEFAULT_WORK: Duration = Duration::from_secs(25 * 60);
pub const DEFAULT_BREAK: Duration = Duration::from_secs(5 * 60);

/// Work and break lengths, resolved once and reused for every cycle.
///
/// Both are whole seconds: the clock ticks once per second and the ledger
/// credits exactly what the clock ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDurations {
    pub work: Duration,
    pub rest: Duration,
}

impl ResolvedDurations {
    /// Sub-second remainders are dropped.
    pub fn new(work: Duration, rest: Duration) -> Self {
        Self {
            work: whole_seconds(work),
            rest: whole_seconds(rest),
        }
    }

    pub fn for_kind(&self, kind: IntervalKind) -> Duration {
        match kind {
            IntervalKind::Work => self.work,
            IntervalKind::Break => self.rest,
        }
    }
}

impl Default for ResolvedDurations {
    fn default() -> Self {
        Self::new(DEFAULT_WORK, DEFAULT_BREAK)
    }
}

/// Drop any fraction of a second.
pub fn whole_seconds(d: Duration) -> Duration {
    Duration::from_secs(d.as_secs())
}

/// Parse a duration argument.
///
/// Returns `Ok(None)` for an empty or zero input, meaning "use the default".
/// Fractions of a second are truncated, so `1.5s` runs for one second.
///
/// # Errors
///
/// Returns [`DurationError::InvalidFormat`] when the text is not a duration and
/// [`DurationError::TooShort`] for positive durations under one second.
pub fn parse_duration(input: &str) -> Result<Option<Duration>, DurationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = parse_units(trimmed)
        .or_else(|| parse_units(&format!("{trimmed}m")))
        .ok_or_else(|| DurationError::InvalidFormat(input.to_string()))?;

    if parsed.is_zero() {
        return Ok(None);
    }
    if parsed < Duration::from_secs(1) {
        return Err(DurationError::TooShort(input.to_string()));
    }
    Ok(Some(whole_seconds(parsed)))
}

/// Parse an interactive "minutes" answer, falling back to `default` for blank,
/// non-numeric or non-positive input. Leading numeric text is honoured, so
/// `10 minutes` reads as ten minutes.
pub fn parse_minutes_answer(input: &str, default: Duration) -> Duration {
    let trimmed = input.trim();
    let numeric: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match numeric.parse::<f64>() {
        Ok(minutes) if minutes.is_finite() && minutes > 0.0 => {
            let secs = (minutes * 60.0).floor();
            if secs < 1.0 {
                default
            } else {
                Duration::from_secs(secs as u64)
            }
        }
        _ => default,
    }
}

/// Sequence of `<number><unit>` pairs, e.g. `1h30m` or `1.5h`.
fn parse_units(s: &str) -> Option<Duration> {
    if s == "0" {
        return Some(Duration::ZERO);
    }

    let mut rest = s;
    let mut total_nanos: f64 = 0.0;
    let mut saw_component = false;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return None;
        }
        let value: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60.0 * 1e9,
            "h" => 3600.0 * 1e9,
            _ => return None,
        };
        rest = &rest[unit_len..];

        total_nanos += value * scale;
        saw_component = true;
    }

    if !saw_component || !total_nanos.is_finite() {
        return None;
    }
    Some(Duration::from_nanos(total_nanos.round() as u64))
}

/// `25m 0s` style, used for ledger entries.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}

/// `25m 00s` style, used for totals.
pub fn format_duration_padded(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}m {:02}s", secs / 60, secs % 60)
}

/// Whole minutes, e.g. `50m`.
pub fn format_minutes(d: Duration) -> String {
    format!("{}m", d.as_secs() / 60)
}
