//! Alpha-style bar-local and rolling transforms of price and volume.
//!
//! Per-feature formulas (epsilons are part of the documented formula, not
//! incidental — they keep zero-width ranges finite):
//! - intraday_strength (alpha 101): (close - open) / ((high - low) + 0.001)
//! - turbulence: |ret - mean_20(ret)| / std_20(ret)
//! - volume_ratio: volume / SMA(volume, n)
//! - volatility_ratio: ATR / close
//! - price_position: (close - min_low_n) / (max_high_n - min_low_n + 0.0001)
//!
//! The rank and correlation alphas (alpha 4 / alpha 6) are the negated
//! PercentRank and RollingCorrelation indicator columns; the engine wires
//! those through `features::negate`.

use super::{pct_change, rolling_mean, rolling_std};
use crate::domain::Bar;

/// Intraday trend strength: where the close landed within the bar's range.
/// Positive when the bar closed above its open; the epsilon keeps
/// zero-range bars at 0 instead of NaN.
pub fn intraday_strength(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .map(|b| (b.close - b.open) / ((b.high - b.low) + 0.001))
        .collect()
}

/// Turbulence: how far the current return strays from its rolling mean,
/// in units of rolling stddev. NaN during warm-up and when the rolling
/// stddev is zero (a dead-flat window has no meaningful deviation scale).
pub fn turbulence(bars: &[Bar], window: usize) -> Vec<f64> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let returns = pct_change(&closes);
    let mean = rolling_mean(&returns, window);
    let std = rolling_std(&returns, window);

    (0..bars.len())
        .map(|i| {
            if returns[i].is_nan() || mean[i].is_nan() || std[i].is_nan() || std[i] == 0.0 {
                f64::NAN
            } else {
                (returns[i] - mean[i]).abs() / std[i]
            }
        })
        .collect()
}

/// Volume relative to its rolling average. NaN during warm-up and when the
/// average volume is zero (no activity to compare against).
pub fn volume_ratio(bars: &[Bar], window: usize) -> Vec<f64> {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let avg = rolling_mean(&volumes, window);

    (0..bars.len())
        .map(|i| {
            if avg[i].is_nan() || avg[i] == 0.0 {
                f64::NAN
            } else {
                volumes[i] / avg[i]
            }
        })
        .collect()
}

/// ATR as a fraction of price — the volatility measure the framework uses
/// for sizing decisions. NaN wherever ATR is undefined.
pub fn volatility_ratio(atr: &[f64], bars: &[Bar]) -> Vec<f64> {
    debug_assert_eq!(atr.len(), bars.len());
    atr.iter()
        .zip(bars)
        .map(|(&atr, bar)| {
            if atr.is_nan() {
                f64::NAN
            } else {
                atr / bar.close
            }
        })
        .collect()
}

/// Position of the close within the rolling support/resistance channel,
/// 0 near support, 1 near resistance.
pub fn price_position(bars: &[Bar], support: &[f64], resistance: &[f64]) -> Vec<f64> {
    debug_assert_eq!(bars.len(), support.len());
    debug_assert_eq!(bars.len(), resistance.len());
    (0..bars.len())
        .map(|i| {
            if support[i].is_nan() || resistance[i].is_nan() {
                f64::NAN
            } else {
                (bars[i].close - support[i]) / (resistance[i] - support[i] + 0.0001)
            }
        })
        .collect()
}
