//! Multi-factor scores — integer counts of independently-defined
//! sub-conditions, consumed downstream as ">= k of n" predicate inputs.
//!
//! Long and short scores use deliberately asymmetric thresholds (the long
//! side demands a quieter RSI and more volume confirmation than the short
//! side). A NaN input fails its sub-condition and contributes 0, matching
//! the comparison semantics the thresholds were tuned under; warm-up bars
//! are masked at signal level regardless.

/// Per-column thresholds for one side's score.
#[derive(Debug, Clone, Copy)]
pub struct ScoreThresholds {
    /// Required trend-band direction (+1.0 long, -1.0 short).
    pub direction: f64,
    /// Minimum ADX (strict).
    pub adx_min: f64,
    /// RSI bound (strict): maximum for the long side, minimum for short.
    pub rsi_bound: f64,
    /// Minimum volume ratio (strict).
    pub volume_ratio_min: f64,
}

impl ScoreThresholds {
    /// Long-side defaults: direction +1, ADX > 20, RSI < 65, volume ratio
    /// > 1.2.
    pub fn long_defaults() -> Self {
        Self {
            direction: 1.0,
            adx_min: 20.0,
            rsi_bound: 65.0,
            volume_ratio_min: 1.2,
        }
    }

    /// Short-side defaults: direction -1, ADX > 15, RSI > 35, volume ratio
    /// > 1.0 (looser than the long side on every axis).
    pub fn short_defaults() -> Self {
        Self {
            direction: -1.0,
            adx_min: 15.0,
            rsi_bound: 35.0,
            volume_ratio_min: 1.0,
        }
    }
}

/// Count of satisfied sub-conditions per bar, 0..=5:
/// 1. trend-band direction matches
/// 2. fast EMA on the right side of slow EMA
/// 3. ADX above the minimum
/// 4. RSI inside the bound (below for long, above for short)
/// 5. volume ratio above the minimum
#[allow(clippy::too_many_arguments)]
pub fn side_score(
    thresholds: &ScoreThresholds,
    direction: &[f64],
    ema_fast: &[f64],
    ema_slow: &[f64],
    adx: &[f64],
    rsi: &[f64],
    volume_ratio: &[f64],
) -> Vec<f64> {
    let n = direction.len();
    debug_assert!(
        [ema_fast, ema_slow, adx, rsi, volume_ratio]
            .iter()
            .all(|c| c.len() == n)
    );

    let long_side = thresholds.direction > 0.0;
    (0..n)
        .map(|i| {
            let mut score = 0;
            if direction[i] == thresholds.direction {
                score += 1;
            }
            let ema_ok = if long_side {
                ema_fast[i] > ema_slow[i]
            } else {
                ema_fast[i] < ema_slow[i]
            };
            if ema_ok {
                score += 1;
            }
            if adx[i] > thresholds.adx_min {
                score += 1;
            }
            let rsi_ok = if long_side {
                rsi[i] < thresholds.rsi_bound
            } else {
                rsi[i] > thresholds.rsi_bound
            };
            if rsi_ok {
                score += 1;
            }
            if volume_ratio[i] > thresholds.volume_ratio_min {
                score += 1;
            }
            f64::from(score)
        })
        .collect()
}

/// Trend-quality score, 0..=3: one point each for ADX > 30, ADX > 35, and
/// |alpha| > 0.05. Consumed with an inclusive ">= 1" gate.
pub fn trend_score(adx: &[f64], alpha: &[f64]) -> Vec<f64> {
    debug_assert_eq!(adx.len(), alpha.len());
    adx.iter()
        .zip(alpha)
        .map(|(&adx, &alpha)| {
            let mut score = 0;
            if adx > 30.0 {
                score += 1;
            }
            if adx > 35.0 {
                score += 1;
            }
            if alpha.abs() > 0.05 {
                score += 1;
            }
            f64::from(score)
        })
        .collect()
}
