//! Simple Moving Average (SMA).
//!
//! Rolling mean over a selectable bar field (close by default).
//! Lookback: period - 1.

use super::{window_mean, BarField, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    field: BarField,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self::of_field(period, BarField::Close)
    }

    /// SMA over an arbitrary bar field (e.g., volume for the volume-ratio
    /// feature).
    pub fn of_field(period: usize, field: BarField) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        let name = match field {
            BarField::Close => format!("sma_{period}"),
            _ => format!("sma_{}_{period}", field.label()),
        };
        Self {
            period,
            field,
            name,
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        let values: Vec<f64> = bars.iter().map(|b| self.field.get(b)).collect();
        for i in (self.period - 1)..n {
            let start = i + 1 - self.period;
            result[i] = window_mean(&values[start..=i]);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn sma_basic() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let sma = Sma::new(3);
        let result = sma.compute(&bars);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 2.0, DEFAULT_EPSILON);
        assert_approx(result[3], 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_period_one_is_identity() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let result = Sma::new(1).compute(&bars);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[2], 30.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_too_few_bars() {
        let bars = make_bars(&[1.0, 2.0]);
        let result = Sma::new(5).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn sma_of_volume_field() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let sma = Sma::of_field(2, BarField::Volume);
        assert_eq!(sma.name(), "sma_volume_2");
        let result = sma.compute(&bars);
        assert_approx(result[1], 1000.0, DEFAULT_EPSILON);
    }

    #[test]
    #[should_panic(expected = "SMA period must be >= 1")]
    fn sma_rejects_zero_period() {
        Sma::new(0);
    }
}
