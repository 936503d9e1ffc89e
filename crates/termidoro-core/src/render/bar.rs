//! Progress bar geometry and colour gradient.

use crate::timer::IntervalKind;

/// Number of cells between the bar brackets. Independent of terminal width.
pub const BAR_WIDTH: usize = 35;

pub const FILLED_GLYPH: char = '█';
pub const EMPTY_GLYPH: char = '░';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Start and end colour of the filled portion for each interval kind.
pub fn gradient(kind: IntervalKind) -> (Rgb, Rgb) {
    match kind {
        // purple -> blue
        IntervalKind::Work => (Rgb::new(139, 92, 246), Rgb::new(59, 130, 246)),
        // orange -> red
        IntervalKind::Break => (Rgb::new(251, 146, 60), Rgb::new(239, 68, 68)),
    }
}

/// Linear interpolation between two colours, `t` in `[0, 1]`.
pub fn interpolate(start: Rgb, end: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| -> u8 {
        let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(
        channel(start.r, end.r),
        channel(start.g, end.g),
        channel(start.b, end.b),
    )
}

/// `elapsed / total` clamped to `[0, 1]`. Elapsed may briefly run past total.
pub fn progress_fraction(elapsed: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (elapsed as f64 / total as f64).clamp(0.0, 1.0)
}

/// Filled cell count. Integer arithmetic keeps it exact and monotone.
pub fn filled_cells(elapsed: u64, total: u64) -> usize {
    if total == 0 {
        return BAR_WIDTH;
    }
    let clamped = elapsed.min(total);
    ((clamped * BAR_WIDTH as u64) / total) as usize
}

/// Whole percent shown next to the bar.
pub fn percent(elapsed: u64, total: u64) -> u64 {
    (progress_fraction(elapsed, total) * 100.0).round() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarCell {
    pub glyph: char,
    pub color: Option<Rgb>,
}

/// Cells of the bar, left to right. Filled cells carry their gradient colour
/// (interpolated at `i / BAR_WIDTH`), empty cells are uncoloured.
pub fn bar_cells(kind: IntervalKind, elapsed: u64, total: u64) -> Vec<BarCell> {
    let filled = filled_cells(elapsed, total);
    let (start, end) = gradient(kind);

    (0..BAR_WIDTH)
        .map(|i| {
            if i < filled {
                BarCell {
                    glyph: FILLED_GLYPH,
                    color: Some(interpolate(start, end, i as f64 / BAR_WIDTH as f64)),
                }
            } else {
                BarCell {
                    glyph: EMPTY_GLYPH,
                    color: None,
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fraction_is_clamped() {
        assert_eq!(progress_fraction(0, 10), 0.0);
        assert_eq!(progress_fraction(5, 10), 0.5);
        assert_eq!(progress_fraction(12, 10), 1.0);
    }

    #[test]
    fn empty_and_full_bars() {
        assert_eq!(filled_cells(0, 60), 0);
        assert_eq!(filled_cells(60, 60), BAR_WIDTH);
        assert_eq!(filled_cells(61, 60), BAR_WIDTH);
        assert_eq!(filled_cells(30, 60), 17);
    }

    #[test]
    fn gradient_endpoints() {
        let (start, end) = gradient(IntervalKind::Work);
        assert_eq!(interpolate(start, end, 0.0), start);
        assert_eq!(interpolate(start, end, 1.0), end);
        assert_eq!(interpolate(start, end, 0.5), Rgb::new(99, 111, 246));
    }

    #[test]
    fn kinds_use_distinct_gradients() {
        assert_ne!(gradient(IntervalKind::Work), gradient(IntervalKind::Break));
    }

    #[test]
    fn cells_colour_only_filled_portion() {
        let cells = bar_cells(IntervalKind::Break, 1, 2);
        assert_eq!(cells.len(), BAR_WIDTH);
        let filled = filled_cells(1, 2);
        assert!(cells[..filled].iter().all(|c| c.glyph == FILLED_GLYPH && c.color.is_some()));
        assert!(cells[filled..].iter().all(|c| c.glyph == EMPTY_GLYPH && c.color.is_none()));
        assert_eq!(cells[0].color, Some(gradient(IntervalKind::Break).0));
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(9, 3), 100);
    }

    proptest! {
        #[test]
        fn fill_is_monotone_and_saturates(total in 1u64..20_000, a in 0u64..40_000, b in 0u64..40_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(filled_cells(lo, total) <= filled_cells(hi, total));
            prop_assert!(filled_cells(hi, total) <= BAR_WIDTH);
            if hi >= total {
                prop_assert_eq!(filled_cells(hi, total), BAR_WIDTH);
            }
        }
    }
}
