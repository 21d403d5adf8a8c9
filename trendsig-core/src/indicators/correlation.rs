//! Rolling Pearson correlation between two bar fields.
//!
//! Used by the alpha features (e.g., correlation of open and volume over
//! 10 bars). A window in which either field has zero variance yields NaN —
//! correlation is undefined there, and NaN is the "unavailable" marker
//! downstream predicates treat as false.
//! Lookback: period - 1.

use super::{BarField, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct RollingCorrelation {
    period: usize,
    x: BarField,
    y: BarField,
    name: String,
}

impl RollingCorrelation {
    pub fn new(period: usize, x: BarField, y: BarField) -> Self {
        assert!(period >= 2, "correlation period must be >= 2");
        Self {
            period,
            x,
            y,
            name: format!("corr_{}_{}_{period}", x.label(), y.label()),
        }
    }
}

impl Indicator for RollingCorrelation {
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

        let xs: Vec<f64> = bars.iter().map(|b| self.x.get(b)).collect();
        let ys: Vec<f64> = bars.iter().map(|b| self.y.get(b)).collect();
        let p = self.period as f64;

        for i in (self.period - 1)..n {
            let start = i + 1 - self.period;
            let xw = &xs[start..=i];
            let yw = &ys[start..=i];

            let mean_x: f64 = xw.iter().sum::<f64>() / p;
            let mean_y: f64 = yw.iter().sum::<f64>() / p;

            let mut cov = 0.0;
            let mut var_x = 0.0;
            let mut var_y = 0.0;
            for k in 0..self.period {
                let dx = xw[k] - mean_x;
                let dy = yw[k] - mean_y;
                cov += dx * dy;
                var_x += dx * dx;
                var_y += dy * dy;
            }

            if var_x > 0.0 && var_y > 0.0 {
                result[i] = cov / (var_x.sqrt() * var_y.sqrt());
            }
            // Zero variance: leave NaN.
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;
    use chrono::NaiveDate;

    fn make_bars_open_volume(data: &[(f64, f64)]) -> Vec<Bar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(open, volume))| Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open + 1.0,
                low: open - 1.0,
                close: open,
                volume,
            })
            .collect()
    }

    #[test]
    fn perfect_positive_correlation() {
        let data: Vec<(f64, f64)> = (0..8).map(|i| (100.0 + i as f64, 1000.0 + 10.0 * i as f64)).collect();
        let bars = make_bars_open_volume(&data);
        let result =
            RollingCorrelation::new(4, BarField::Open, BarField::Volume).compute(&bars);
        assert!(result[2].is_nan());
        assert_approx(result[3], 1.0, 1e-9);
        assert_approx(result[7], 1.0, 1e-9);
    }

    #[test]
    fn perfect_negative_correlation() {
        let data: Vec<(f64, f64)> = (0..8).map(|i| (100.0 + i as f64, 1000.0 - 10.0 * i as f64)).collect();
        let bars = make_bars_open_volume(&data);
        let result =
            RollingCorrelation::new(4, BarField::Open, BarField::Volume).compute(&bars);
        assert_approx(result[5], -1.0, 1e-9);
    }

    #[test]
    fn zero_variance_window_is_nan() {
        let data: Vec<(f64, f64)> = (0..6).map(|i| (100.0, 1000.0 + i as f64)).collect();
        let bars = make_bars_open_volume(&data);
        let result =
            RollingCorrelation::new(3, BarField::Open, BarField::Volume).compute(&bars);
        assert!(result[3].is_nan());
        assert!(result[5].is_nan());
    }

    #[test]
    fn correlation_bounded() {
        let data: Vec<(f64, f64)> = [
            (100.0, 900.0),
            (102.0, 1100.0),
            (101.0, 950.0),
            (104.0, 1300.0),
            (103.0, 800.0),
            (105.0, 1200.0),
        ]
        .to_vec();
        let bars = make_bars_open_volume(&data);
        let result =
            RollingCorrelation::new(4, BarField::Open, BarField::Volume).compute(&bars);
        for &v in result.iter().filter(|v| !v.is_nan()) {
            assert!((-1.0..=1.0).contains(&v), "correlation out of bounds: {v}");
        }
    }
}
