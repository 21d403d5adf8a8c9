//! Strategy parameters — validated before any computation runs.
//!
//! Every tunable carries a documented valid range; `validate` rejects a
//! parameter set up front so the engine never computes on nonsense. The
//! ranges match the space the defaults were tuned over.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// ADX period is not tunable; every threshold in the parameter set was
/// calibrated against the 14-bar reading.
pub const ADX_PERIOD: usize = 14;

/// Window for return volatility, volume ratio and turbulence.
pub const VOLATILITY_WINDOW: usize = 20;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("parameter {name} = {value} outside valid range [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("inconsistent parameters: {reason}")]
    Inconsistent { reason: String },
}

/// Exact identity of a parameter set, for caching and run records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamsHash(pub [u8; 32]);

impl ParamsHash {
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Tunable strategy parameters. Read-only once handed to the engine.
///
/// Defaults are the tuned values; each field documents its valid range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// ATR period for the trend band, [5, 30].
    pub atr_period: usize,
    /// ATR multiplier for the band offset, [2.0, 5.0].
    pub atr_multiplier: f64,
    /// Fast EMA period, [5, 50]. Must be below `ema_slow`.
    pub ema_fast: usize,
    /// Slow EMA period, [20, 200].
    pub ema_slow: usize,
    /// RSI period, [10, 30].
    pub rsi_period: usize,
    /// Base ADX gate for long entries, [20, 40].
    pub adx_threshold_long: f64,
    /// Base ADX gate for short entries, [15, 35].
    pub adx_threshold_short: f64,
    /// Minimum |intraday strength| for entries, [0.02, 0.15].
    pub alpha_threshold: f64,
    /// Minimum volume ratio for entries, [1.0, 2.0].
    pub volume_factor: f64,
    /// Maximum ATR/close ratio for entries, [0.01, 0.10].
    pub max_volatility_ratio: f64,
    /// EMA period of the regime trend line, [50, 200].
    pub trend_lookback: usize,
    /// Short-gate loosening in a bear market (ADX points), [0, 15].
    pub regime_bear_bonus: f64,
    /// Short-gate tightening in a bull market (ADX points), [0, 15].
    pub regime_bull_penalty: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            atr_period: 10,
            atr_multiplier: 3.0,
            ema_fast: 21,
            ema_slow: 55,
            rsi_period: 14,
            adx_threshold_long: 33.0,
            adx_threshold_short: 23.0,
            alpha_threshold: 0.118,
            volume_factor: 1.1,
            max_volatility_ratio: 0.06,
            trend_lookback: 100,
            regime_bear_bonus: 10.0,
            regime_bull_penalty: 10.0,
        }
    }
}

impl StrategyParams {
    /// Range-check every field plus the cross-field constraints.
    /// Reports the first violation found, in field order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("atr_period", self.atr_period as f64, 5.0, 30.0)?;
        check_range("atr_multiplier", self.atr_multiplier, 2.0, 5.0)?;
        check_range("ema_fast", self.ema_fast as f64, 5.0, 50.0)?;
        check_range("ema_slow", self.ema_slow as f64, 20.0, 200.0)?;
        check_range("rsi_period", self.rsi_period as f64, 10.0, 30.0)?;
        check_range("adx_threshold_long", self.adx_threshold_long, 20.0, 40.0)?;
        check_range("adx_threshold_short", self.adx_threshold_short, 15.0, 35.0)?;
        check_range("alpha_threshold", self.alpha_threshold, 0.02, 0.15)?;
        check_range("volume_factor", self.volume_factor, 1.0, 2.0)?;
        check_range("max_volatility_ratio", self.max_volatility_ratio, 0.01, 0.10)?;
        check_range("trend_lookback", self.trend_lookback as f64, 50.0, 200.0)?;
        check_range("regime_bear_bonus", self.regime_bear_bonus, 0.0, 15.0)?;
        check_range("regime_bull_penalty", self.regime_bull_penalty, 0.0, 15.0)?;

        if self.ema_fast >= self.ema_slow {
            return Err(ConfigError::Inconsistent {
                reason: format!(
                    "ema_fast ({}) must be below ema_slow ({})",
                    self.ema_fast, self.ema_slow
                ),
            });
        }
        Ok(())
    }

    /// Exact identity: blake3 over the canonical serialized form.
    ///
    /// Keys are sorted so two equal parameter sets always hash identically,
    /// independent of field declaration order.
    pub fn full_hash(&self) -> ParamsHash {
        let value = serde_json::to_value(self).expect("StrategyParams must serialize");
        let canonical: BTreeMap<String, serde_json::Value> = match value {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        let json =
            serde_json::to_string(&canonical).expect("canonical params must serialize");
        ParamsHash(*blake3::hash(json.as_bytes()).as_bytes())
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}
