//! Regime classification — categorical market states from continuous
//! indicators, plus the regime score gate.
//!
//! Threshold operators are preserved exactly as documented per feature
//! (strict vs inclusive boundaries are intentional and not unified):
//! - Volatility buckets: < 0.02 low, ≤ 0.04 medium, ≤ 0.06 high, else
//!   extreme (20-bar return stddev).
//! - Trend buckets: ADX > 25 moderate (strict), > 35 strong (strict).
//! - Tradable gate: regime_score >= 0 (inclusive).
//! - Bull/bear detection: |price deviation from trend EMA| > 2% (strict)
//!   with ADX > 20 (strict).

use super::{pct_change, rolling_std};
use crate::domain::Bar;

/// Volatility bucket from the 20-bar stddev of close-to-close returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolatilityState {
    Low,
    Medium,
    High,
    Extreme,
}

impl VolatilityState {
    /// Classify a return-stddev value. `None` when undefined (warm-up).
    pub fn classify(vol: f64) -> Option<Self> {
        if vol.is_nan() {
            return None;
        }
        Some(if vol < 0.02 {
            Self::Low
        } else if vol <= 0.04 {
            Self::Medium
        } else if vol <= 0.06 {
            Self::High
        } else {
            Self::Extreme
        })
    }

    /// Contribution to the regime score: calm regimes help, erratic hurt.
    pub fn score(self) -> i32 {
        match self {
            Self::Low | Self::Medium => 1,
            Self::High | Self::Extreme => -1,
        }
    }
}

/// Trend-strength bucket from ADX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendState {
    Weak,
    Moderate,
    Strong,
}

impl TrendState {
    pub fn classify(adx: f64) -> Option<Self> {
        if adx.is_nan() {
            return None;
        }
        Some(if adx > 35.0 {
            Self::Strong
        } else if adx > 25.0 {
            Self::Moderate
        } else {
            Self::Weak
        })
    }

    pub fn score(self) -> i32 {
        match self {
            Self::Moderate | Self::Strong => 1,
            Self::Weak => -1,
        }
    }
}

/// Broad market regime from price deviation against a long trend EMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketRegime {
    Bull,
    Bear,
    Sideways,
}

impl MarketRegime {
    /// Column code: +1 bull, -1 bear, 0 sideways.
    pub fn code(self) -> f64 {
        match self {
            Self::Bull => 1.0,
            Self::Bear => -1.0,
            Self::Sideways => 0.0,
        }
    }

    pub fn from_code(code: f64) -> Option<Self> {
        if code == 1.0 {
            Some(Self::Bull)
        } else if code == -1.0 {
            Some(Self::Bear)
        } else if code == 0.0 {
            Some(Self::Sideways)
        } else {
            None
        }
    }

    /// ADX gate for long entries under this regime: a bull market loosens
    /// the gate by 5 points, a bear market tightens it by 10.
    pub fn adjusted_long_threshold(self, base: f64) -> f64 {
        match self {
            Self::Bull => base - 5.0,
            Self::Bear => base + 10.0,
            Self::Sideways => base,
        }
    }

    /// ADX gate for short entries: a bear market loosens by `bear_bonus`,
    /// a bull market tightens by `bull_penalty`.
    pub fn adjusted_short_threshold(self, base: f64, bear_bonus: f64, bull_penalty: f64) -> f64 {
        match self {
            Self::Bear => base - bear_bonus,
            Self::Bull => base + bull_penalty,
            Self::Sideways => base,
        }
    }
}

/// 20-bar sample stddev of close-to-close returns — the volatility measure
/// the volatility buckets classify.
pub fn return_volatility(bars: &[Bar], window: usize) -> Vec<f64> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    rolling_std(&pct_change(&closes), window)
}

/// Regime score column: volatility contribution + trend contribution.
/// NaN while either input is undefined (unavailable, never tradable).
pub fn regime_score(volatility: &[f64], adx: &[f64]) -> Vec<f64> {
    debug_assert_eq!(volatility.len(), adx.len());
    volatility
        .iter()
        .zip(adx)
        .map(|(&vol, &adx)| {
            match (VolatilityState::classify(vol), TrendState::classify(adx)) {
                (Some(v), Some(t)) => f64::from(v.score() + t.score()),
                _ => f64::NAN,
            }
        })
        .collect()
}

/// Tradable flag column: 1.0 where regime_score >= 0, 0.0 where below,
/// 0.0 where the score is undefined (an unknown regime is not tradable).
pub fn can_trade(score: &[f64]) -> Vec<f64> {
    score
        .iter()
        .map(|&s| if s >= 0.0 { 1.0 } else { 0.0 })
        .collect()
}

/// Market regime column (+1/-1/0 codes, NaN while inputs are undefined).
///
/// Bull: price more than 2% above the trend EMA with ADX > 20.
/// Bear: price more than 2% below with ADX > 20. Otherwise sideways.
pub fn market_regime(bars: &[Bar], trend_ema: &[f64], adx: &[f64]) -> Vec<f64> {
    debug_assert_eq!(bars.len(), trend_ema.len());
    debug_assert_eq!(bars.len(), adx.len());

    let mut result = vec![f64::NAN; bars.len()];
    for i in 0..bars.len() {
        if trend_ema[i].is_nan() || adx[i].is_nan() {
            continue;
        }
        let deviation_pct = (bars[i].close - trend_ema[i]) / trend_ema[i] * 100.0;
        let regime = if deviation_pct > 2.0 && adx[i] > 20.0 {
            MarketRegime::Bull
        } else if deviation_pct < -2.0 && adx[i] > 20.0 {
            MarketRegime::Bear
        } else {
            MarketRegime::Sideways
        };
        result[i] = regime.code();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn volatility_buckets() {
        assert_eq!(VolatilityState::classify(0.01), Some(VolatilityState::Low));
        assert_eq!(VolatilityState::classify(0.02), Some(VolatilityState::Medium));
        assert_eq!(VolatilityState::classify(0.04), Some(VolatilityState::Medium));
        assert_eq!(VolatilityState::classify(0.05), Some(VolatilityState::High));
        assert_eq!(VolatilityState::classify(0.06), Some(VolatilityState::High));
        assert_eq!(VolatilityState::classify(0.07), Some(VolatilityState::Extreme));
        assert_eq!(VolatilityState::classify(f64::NAN), None);
    }

    #[test]
    fn trend_buckets_strict_boundaries() {
        assert_eq!(TrendState::classify(25.0), Some(TrendState::Weak));
        assert_eq!(TrendState::classify(25.1), Some(TrendState::Moderate));
        assert_eq!(TrendState::classify(35.0), Some(TrendState::Moderate));
        assert_eq!(TrendState::classify(35.1), Some(TrendState::Strong));
        assert_eq!(TrendState::classify(f64::NAN), None);
    }

    #[test]
    fn regime_score_contributions() {
        // Calm + strong trend = +2; extreme + weak = -2; mixed = 0.
        let score = regime_score(&[0.01, 0.08, 0.01], &[40.0, 10.0, 10.0]);
        assert_eq!(score, vec![2.0, -2.0, 0.0]);
    }

    #[test]
    fn regime_score_nan_inputs_are_nan() {
        let score = regime_score(&[f64::NAN, 0.01], &[30.0, f64::NAN]);
        assert!(score[0].is_nan());
        assert!(score[1].is_nan());
    }

    #[test]
    fn can_trade_gate_is_inclusive_at_zero() {
        let flags = can_trade(&[2.0, 0.0, -1.0, f64::NAN]);
        assert_eq!(flags, vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn market_regime_detection() {
        let bars = make_bars(&[110.0, 95.0, 101.0]);
        let ema = vec![100.0, 100.0, 100.0];
        let strong = vec![25.0, 25.0, 25.0];
        let codes = market_regime(&bars, &ema, &strong);
        assert_eq!(codes, vec![1.0, -1.0, 0.0]);
    }

    #[test]
    fn market_regime_requires_adx() {
        // 10% above trend but ADX at 20 (not strictly above): sideways.
        let bars = make_bars(&[110.0]);
        let codes = market_regime(&bars, &[100.0], &[20.0]);
        assert_eq!(codes, vec![0.0]);
    }

    #[test]
    fn market_regime_nan_inputs() {
        let bars = make_bars(&[110.0]);
        let codes = market_regime(&bars, &[f64::NAN], &[30.0]);
        assert!(codes[0].is_nan());
    }

    #[test]
    fn threshold_adjustment_by_regime() {
        assert_eq!(MarketRegime::Bull.adjusted_long_threshold(33.0), 28.0);
        assert_eq!(MarketRegime::Bear.adjusted_long_threshold(33.0), 43.0);
        assert_eq!(MarketRegime::Sideways.adjusted_long_threshold(33.0), 33.0);
        assert_eq!(
            MarketRegime::Bear.adjusted_short_threshold(23.0, 10.0, 10.0),
            13.0
        );
        assert_eq!(
            MarketRegime::Bull.adjusted_short_threshold(23.0, 10.0, 10.0),
            33.0
        );
    }

    #[test]
    fn return_volatility_flat_series_is_zero() {
        let bars = make_bars(&[100.0; 25]);
        let vol = return_volatility(&bars, 20);
        assert!(vol[19].is_nan()); // first return is NaN, window not clean yet
        assert_eq!(vol[20], 0.0);
    }
}
