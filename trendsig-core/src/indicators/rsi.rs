//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period.
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0; both zero → 50.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period + 1 {
            return result;
        }

        // Seed: average gain/loss over the first `period` close changes.
        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for i in 1..=self.period {
            let change = bars[i].close - bars[i - 1].close;
            if change > 0.0 {
                avg_gain += change;
            } else {
                avg_loss -= change;
            }
        }
        avg_gain /= self.period as f64;
        avg_loss /= self.period as f64;

        result[self.period] = rsi_value(avg_gain, avg_loss);

        let alpha = 1.0 / self.period as f64;
        for i in (self.period + 1)..n {
            let change = bars[i].close - bars[i - 1].close;
            let gain = if change > 0.0 { change } else { 0.0 };
            let loss = if change < 0.0 { -change } else { 0.0 };

            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;

            result[i] = rsi_value(avg_gain, avg_loss);
        }

        result
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement at all
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_all_gains_is_100() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let rsi = Rsi::new(5).compute(&make_bars(&closes));
        assert!(rsi[4].is_nan());
        assert_approx(rsi[5], 100.0, 1e-9);
        assert_approx(rsi[9], 100.0, 1e-9);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        let rsi = Rsi::new(5).compute(&make_bars(&closes));
        assert_approx(rsi[5], 0.0, 1e-9);
    }

    #[test]
    fn rsi_flat_is_50() {
        let closes = vec![100.0; 10];
        let rsi = Rsi::new(5).compute(&make_bars(&closes));
        assert_approx(rsi[5], 50.0, 1e-9);
    }

    #[test]
    fn rsi_balanced_alternation() {
        // Equal gains and losses → avg_gain == avg_loss → RSI = 50 at seed.
        let closes = vec![100.0, 101.0, 100.0, 101.0, 100.0];
        let rsi = Rsi::new(4).compute(&make_bars(&closes));
        assert_approx(rsi[4], 50.0, 1e-9);
    }

    #[test]
    fn rsi_bounded() {
        let closes = vec![100.0, 103.0, 99.0, 104.0, 102.0, 105.0, 101.0, 106.0];
        let rsi = Rsi::new(3).compute(&make_bars(&closes));
        for &v in &rsi[3..] {
            assert!((0.0..=100.0).contains(&v), "RSI out of bounds: {v}");
        }
    }

    #[test]
    fn rsi_too_few_bars() {
        let rsi = Rsi::new(14).compute(&make_bars(&[100.0, 101.0, 102.0]));
        assert!(rsi.iter().all(|v| v.is_nan()));
    }
}
