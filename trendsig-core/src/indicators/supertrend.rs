//! Supertrend — ATR-based directional band indicator.
//!
//! Inherently sequential: each bar's direction depends on the previous
//! bar's candidate bands and direction, so the computation is a single
//! O(N) fold and cannot be vectorized across bars.
//!
//! Per bar: candidate upper = hl2 + multiplier * ATR, candidate lower =
//! hl2 - multiplier * ATR. Direction flips to +1 when close crosses above
//! the previous bar's candidate upper band, to -1 when it crosses below
//! the previous candidate lower band, and otherwise persists. The band is
//! the candidate lower band while direction is +1 (support), the candidate
//! upper band while -1 (resistance). Candidates are not ratcheted; each
//! bar's comparison uses the previous bar's raw candidates.
//!
//! Seed: the first bar with a defined ATR takes direction +1 and the lower
//! candidate band. Bars before that (ATR warm-up) are NaN in both series
//! and must be treated as unavailable downstream.
//!
//! Two aligned output series, selected by `SupertrendSeries`:
//! - Band: the active band value.
//! - Direction: +1.0 or -1.0 (NaN during warm-up).
//!
//! Lookback: period (same as ATR).

use super::atr::{true_range, wilder_smooth};
use super::Indicator;
use crate::domain::Bar;

/// Which output series of the Supertrend computation to expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupertrendSeries {
    Band,
    Direction,
}

#[derive(Debug, Clone)]
pub struct Supertrend {
    period: usize,
    multiplier: f64,
    series: SupertrendSeries,
    name: String,
}

impl Supertrend {
    pub fn band(period: usize, multiplier: f64) -> Self {
        Self::series(period, multiplier, SupertrendSeries::Band)
    }

    pub fn direction(period: usize, multiplier: f64) -> Self {
        Self::series(period, multiplier, SupertrendSeries::Direction)
    }

    pub fn series(period: usize, multiplier: f64, series: SupertrendSeries) -> Self {
        assert!(period >= 1, "Supertrend period must be >= 1");
        assert!(multiplier > 0.0, "Supertrend multiplier must be > 0");
        let tag = match series {
            SupertrendSeries::Band => "supertrend",
            SupertrendSeries::Direction => "supertrend_dir",
        };
        Self {
            period,
            multiplier,
            series,
            name: format!("{tag}_{period}_{multiplier}"),
        }
    }
}

/// Fold state carried from bar to bar: previous direction and the previous
/// bar's candidate bands.
#[derive(Debug, Clone, Copy)]
struct BandState {
    direction: i8,
    upper: f64,
    lower: f64,
}

impl BandState {
    /// Advance one bar: decide direction against the previous candidates,
    /// then adopt this bar's candidates as the new state.
    fn step(self, close: f64, upper: f64, lower: f64) -> BandState {
        let direction = if close > self.upper {
            1
        } else if close < self.lower {
            -1
        } else {
            self.direction
        };
        BandState {
            direction,
            upper,
            lower,
        }
    }

    /// The active band for the current direction.
    fn band(&self) -> f64 {
        if self.direction == 1 {
            self.lower
        } else {
            self.upper
        }
    }
}

/// Compute both Supertrend series in one pass.
///
/// Returns (band, direction), each aligned with `bars`. Exposed so the
/// engine can compute both columns without running the fold twice.
pub fn compute_supertrend(
    bars: &[Bar],
    period: usize,
    multiplier: f64,
) -> (Vec<f64>, Vec<f64>) {
    let n = bars.len();
    let mut band = vec![f64::NAN; n];
    let mut direction = vec![f64::NAN; n];

    let mut tr = true_range(bars);
    if !tr.is_empty() {
        tr[0] = f64::NAN;
    }
    let atr = wilder_smooth(&tr, period);

    let start = match atr.iter().position(|v| !v.is_nan()) {
        Some(idx) => idx,
        None => return (band, direction),
    };

    // Seed: direction +1, band = lower candidate.
    let hl2 = bars[start].hl2();
    let mut state = BandState {
        direction: 1,
        upper: hl2 + multiplier * atr[start],
        lower: hl2 - multiplier * atr[start],
    };
    band[start] = state.band();
    direction[start] = 1.0;

    for i in (start + 1)..n {
        if atr[i].is_nan() {
            // Wilder smoothing only goes NaN by tainting the remainder;
            // the recurrence cannot resume without a previous state.
            break;
        }
        let hl2 = bars[i].hl2();
        state = state.step(
            bars[i].close,
            hl2 + multiplier * atr[i],
            hl2 - multiplier * atr[i],
        );
        band[i] = state.band();
        direction[i] = f64::from(state.direction);
    }

    (band, direction)
}

impl Indicator for Supertrend {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let (band, direction) = compute_supertrend(bars, self.period, self.multiplier);
        match self.series {
            SupertrendSeries::Band => band,
            SupertrendSeries::Direction => direction,
        }
    }
}
