//! ADX — Average Directional Index (Wilder), with +DI / -DI.
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR using Wilder smoothing (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX = Wilder-smoothed DX
//!
//! The three series are exposed as separate `Indicator` instances selected
//! by `AdxSeries`. A zero smoothed TR (dead-flat window) produces DI = 0
//! rather than a division blowup.
//!
//! Lookback: period for the DI lines, 2 * period for ADX.

use super::atr::{true_range, wilder_smooth};
use super::Indicator;
use crate::domain::Bar;

/// Which output series of the ADX computation to expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdxSeries {
    Adx,
    PlusDi,
    MinusDi,
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    series: AdxSeries,
    name: String,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        Self::series(period, AdxSeries::Adx)
    }

    pub fn plus_di(period: usize) -> Self {
        Self::series(period, AdxSeries::PlusDi)
    }

    pub fn minus_di(period: usize) -> Self {
        Self::series(period, AdxSeries::MinusDi)
    }

    pub fn series(period: usize, series: AdxSeries) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        let name = match series {
            AdxSeries::Adx => format!("adx_{period}"),
            AdxSeries::PlusDi => format!("plus_di_{period}"),
            AdxSeries::MinusDi => format!("minus_di_{period}"),
        };
        Self {
            period,
            series,
            name,
        }
    }

    fn directional_lines(&self, bars: &[Bar]) -> (Vec<f64>, Vec<f64>) {
        let n = bars.len();
        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];

        for i in 1..n {
            let up_move = bars[i].high - bars[i - 1].high;
            let down_move = bars[i - 1].low - bars[i].low;
            plus_dm[i] = if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            };
            minus_dm[i] = if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            };
        }

        let mut tr = true_range(bars);
        if !tr.is_empty() {
            tr[0] = f64::NAN; // first bar has no previous close
        }

        let s_plus = wilder_smooth(&plus_dm, self.period);
        let s_minus = wilder_smooth(&minus_dm, self.period);
        let s_tr = wilder_smooth(&tr, self.period);

        let mut plus_di = vec![f64::NAN; n];
        let mut minus_di = vec![f64::NAN; n];
        for i in 0..n {
            if s_plus[i].is_nan() || s_minus[i].is_nan() || s_tr[i].is_nan() {
                continue;
            }
            if s_tr[i] == 0.0 {
                // Dead-flat window: no directional movement either.
                plus_di[i] = 0.0;
                minus_di[i] = 0.0;
            } else {
                plus_di[i] = 100.0 * s_plus[i] / s_tr[i];
                minus_di[i] = 100.0 * s_minus[i] / s_tr[i];
            }
        }

        (plus_di, minus_di)
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.series {
            // DI seeds at index `period`; the DX re-smoothing seeds
            // `period` values later, at index 2 * period - 1.
            AdxSeries::Adx => 2 * self.period - 1,
            AdxSeries::PlusDi | AdxSeries::MinusDi => self.period,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        if n < 2 {
            return vec![f64::NAN; n];
        }

        let (plus_di, minus_di) = self.directional_lines(bars);

        match self.series {
            AdxSeries::PlusDi => plus_di,
            AdxSeries::MinusDi => minus_di,
            AdxSeries::Adx => {
                let mut dx = vec![f64::NAN; n];
                for i in 0..n {
                    if plus_di[i].is_nan() || minus_di[i].is_nan() {
                        continue;
                    }
                    let sum = plus_di[i] + minus_di[i];
                    dx[i] = if sum == 0.0 {
                        0.0
                    } else {
                        100.0 * (plus_di[i] - minus_di[i]).abs() / sum
                    };
                }
                wilder_smooth(&dx, self.period)
            }
        }
    }
}
