//! Indicator trait, column container, and the windowed indicator library.
//!
//! Indicators are pure functions: bar history in, numeric series out. They
//! are precomputed once per evaluation and fed per-bar into predicate
//! evaluation. No recomputation, no incremental state across calls.
//!
//! # Look-ahead contamination guard
//! No indicator value at bar t may depend on price data from bar t+1 or
//! later. Every indicator must pass the truncated-vs-full series test.
//!
//! # Numeric policy
//! Warm-up values are `f64::NAN`. Ratio features with a possibly-zero
//! denominator add a small fixed epsilon (the constants used by the
//! reference formulas) instead of letting inf/NaN escape; windows with
//! zero variance in correlation/rank yield NaN. NaN never panics and is
//! treated as "unavailable" by downstream predicates.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod correlation;
pub mod ema;
pub mod macd;
pub mod percent_rank;
pub mod regression;
pub mod rolling;
pub mod rsi;
pub mod sma;
pub mod supertrend;

pub use adx::{Adx, AdxSeries};
pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerBand};
pub use correlation::RollingCorrelation;
pub use ema::Ema;
pub use macd::{Macd, MacdSeries};
pub use percent_rank::PercentRank;
pub use regression::RegressionSlope;
pub use rolling::{RollingMax, RollingMin};
pub use rsi::Rsi;
pub use sma::Sma;
pub use supertrend::{compute_supertrend, Supertrend, SupertrendSeries};

use crate::domain::Bar;
use std::collections::HashMap;

/// Which raw bar field a column-valued indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl BarField {
    pub fn get(&self, bar: &Bar) -> f64 {
        match self {
            BarField::Open => bar.open,
            BarField::High => bar.high,
            BarField::Low => bar.low,
            BarField::Close => bar.close,
            BarField::Volume => bar.volume,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BarField::Open => "open",
            BarField::High => "high",
            BarField::Low => "low",
            BarField::Close => "close",
            BarField::Volume => "volume",
        }
    }
}

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. The first `lookback()` values should be `f64::NAN`
/// (warm-up).
pub trait Indicator: Send + Sync {
    /// Human-readable name encoding the parameters (e.g., "sma_20",
    /// "atr_14"). Doubles as the column key in `IndicatorValues`.
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Container for precomputed indicator and feature columns.
///
/// Built once per evaluation, then queried by bar index. Discrete columns
/// (Supertrend direction, regime codes, factor scores) are stored as f64
/// with NaN marking warm-up, same as continuous columns.
#[derive(Debug, Clone, Default)]
pub struct IndicatorValues {
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named column.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Compute an indicator and store it under its own name. Returns the
    /// column name for convenience.
    pub fn compute_and_insert(&mut self, indicator: &dyn Indicator, bars: &[Bar]) -> String {
        let name = indicator.name().to_string();
        self.series.insert(name.clone(), indicator.compute(bars));
        name
    }

    /// Value at a specific bar index. `None` if the column is missing or
    /// the index is out of bounds; NaN values are returned as-is.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    /// Full series for a named column.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// Names of all stored columns, sorted (deterministic iteration).
    pub fn column_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.series.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Mean of a window, or NaN if any value in it is NaN.
pub(crate) fn window_mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    for &v in values {
        if v.is_nan() {
            return f64::NAN;
        }
        sum += v;
    }
    sum / values.len() as f64
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLCV: open = prev close (or close for first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0,
/// volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
