//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1],
//! alpha = 2 / (period + 1).
//! Seed: EMA[period-1] = SMA of first `period` close values.
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.period)
    }
}

/// Compute raw EMA values from a pre-extracted f64 slice.
/// Used by composed indicators (MACD signal line) that need the EMA of an
/// arbitrary series. Leading NaN values are skipped; the seed window is the
/// first `period` consecutive valid values.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    // Seed window: first stretch of `period` consecutive valid values.
    let first_valid = match values.iter().position(|v| !v.is_nan()) {
        Some(idx) => idx,
        None => return result,
    };
    if first_valid + period > n {
        return result;
    }

    let mut sum = 0.0;
    for &v in &values[first_valid..first_valid + period] {
        if v.is_nan() {
            return result; // NaN inside seed window → stay undefined
        }
        sum += v;
    }
    let seed = sum / period as f64;
    let seed_idx = first_valid + period - 1;
    result[seed_idx] = seed;

    let mut prev = seed;
    for i in (seed_idx + 1)..n {
        if values[i].is_nan() {
            // NaN propagates: subsequent values are tainted
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}
