//! Feature composition — higher-level columns derived from indicator
//! outputs.
//!
//! Every feature is a pure per-bar function of indicator columns and raw
//! prices, reproducible from those inputs alone: no hidden state, no
//! lookahead. Features are emitted as additional named f64 columns
//! (categorical states as small integer codes, NaN marking warm-up), so
//! the caller receives them through the same `IndicatorValues` container
//! as the raw indicators.

pub mod alpha;
pub mod factor_score;
pub mod regime;

pub use regime::{MarketRegime, TrendState, VolatilityState};

/// Negate a column in place, preserving NaN. Used for the sign-flipped
/// alpha transforms (rank and correlation enter the formulas negated).
pub fn negate(values: &mut [f64]) {
    for v in values.iter_mut() {
        *v = -*v;
    }
}

/// Close-to-close simple returns. NaN at index 0.
pub(crate) fn pct_change(closes: &[f64]) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    for i in 1..n {
        result[i] = closes[i] / closes[i - 1] - 1.0;
    }
    result
}

/// Rolling sample standard deviation (ddof = 1) of a series.
/// NaN while the window contains any NaN or is not yet full.
pub(crate) fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window < 2 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let w = &values[i + 1 - window..=i];
        if w.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean: f64 = w.iter().sum::<f64>() / window as f64;
        let var: f64 = w.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>()
            / (window as f64 - 1.0);
        result[i] = var.sqrt();
    }

    result
}

/// Rolling mean. NaN while the window contains any NaN or is not yet full.
pub(crate) fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let w = &values[i + 1 - window..=i];
        if w.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = w.iter().sum::<f64>() / window as f64;
    }

    result
}
