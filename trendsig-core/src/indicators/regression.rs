//! Rolling linear-regression slope.
//!
//! Ordinary least-squares slope of a bar field against bar offset
//! 0..period-1 within each trailing window (the LINEARREG_SLOPE
//! construction). Positive slope = rising trend over the window.
//! Lookback: period - 1.

use super::{BarField, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct RegressionSlope {
    period: usize,
    field: BarField,
    name: String,
}

impl RegressionSlope {
    pub fn new(period: usize, field: BarField) -> Self {
        assert!(period >= 2, "regression slope period must be >= 2");
        Self {
            period,
            field,
            name: format!("slope_{}_{period}", field.label()),
        }
    }
}

impl Indicator for RegressionSlope {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        let p = self.period as f64;
        // x = 0..period-1; these sums are window-independent.
        let sum_x = p * (p - 1.0) / 2.0;
        let sum_x2 = p * (p - 1.0) * (2.0 * p - 1.0) / 6.0;
        let denom = p * sum_x2 - sum_x * sum_x;

        let values: Vec<f64> = bars.iter().map(|b| self.field.get(b)).collect();
        for i in (self.period - 1)..n {
            let window = &values[i + 1 - self.period..=i];
            let mut sum_y = 0.0;
            let mut sum_xy = 0.0;
            for (x, &y) in window.iter().enumerate() {
                sum_y += y;
                sum_xy += x as f64 * y;
            }
            result[i] = (p * sum_xy - sum_x * sum_y) / denom;
        }

        result
    }
}
