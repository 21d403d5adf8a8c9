//! Rolling extrema — channel breakout levels.
//!
//! RollingMax/RollingMin over a selectable bar field. The default fields
//! match channel usage: max of highs (resistance), min of lows (support).
//! Lookback: period - 1.

use super::{BarField, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct RollingMax {
    period: usize,
    field: BarField,
    name: String,
}

impl RollingMax {
    /// Rolling max of highs — the upper channel / resistance level.
    pub fn new(period: usize) -> Self {
        Self::of_field(period, BarField::High)
    }

    pub fn of_field(period: usize, field: BarField) -> Self {
        assert!(period >= 1, "rolling max period must be >= 1");
        Self {
            period,
            field,
            name: format!("rolling_max_{}_{period}", field.label()),
        }
    }
}

impl Indicator for RollingMax {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_extreme(bars, self.period, self.field, true)
    }
}

#[derive(Debug, Clone)]
pub struct RollingMin {
    period: usize,
    field: BarField,
    name: String,
}

impl RollingMin {
    /// Rolling min of lows — the lower channel / support level.
    pub fn new(period: usize) -> Self {
        Self::of_field(period, BarField::Low)
    }

    pub fn of_field(period: usize, field: BarField) -> Self {
        assert!(period >= 1, "rolling min period must be >= 1");
        Self {
            period,
            field,
            name: format!("rolling_min_{}_{period}", field.label()),
        }
    }
}

impl Indicator for RollingMin {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_extreme(bars, self.period, self.field, false)
    }
}

fn rolling_extreme(bars: &[Bar], period: usize, field: BarField, max: bool) -> Vec<f64> {
    let n = bars.len();
    let mut result = vec![f64::NAN; n];

    if n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &bars[i + 1 - period..=i];
        let mut extreme = field.get(&window[0]);
        for bar in &window[1..] {
            let v = field.get(bar);
            extreme = if max { extreme.max(v) } else { extreme.min(v) };
        }
        result[i] = extreme;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn rolling_max_of_highs() {
        // make_bars: high = max(open, close) + 1.0
        let bars = make_bars(&[10.0, 12.0, 11.0, 15.0, 13.0]);
        let result = RollingMax::new(3).compute(&bars);
        assert!(result[1].is_nan());
        assert_approx(result[2], 13.0, DEFAULT_EPSILON); // max high of bars 0..=2
        assert_approx(result[3], 16.0, DEFAULT_EPSILON); // bar 3 high = 15+1
        assert_approx(result[4], 16.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_min_of_lows() {
        // make_bars: low = min(open, close) - 1.0
        let bars = make_bars(&[10.0, 12.0, 11.0, 15.0, 13.0]);
        let result = RollingMin::new(3).compute(&bars);
        assert_approx(result[2], 9.0, DEFAULT_EPSILON);
        assert_approx(result[4], 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_max_of_close_field() {
        let bars = make_bars(&[10.0, 12.0, 11.0]);
        let ind = RollingMax::of_field(2, BarField::Close);
        assert_eq!(ind.name(), "rolling_max_close_2");
        let result = ind.compute(&bars);
        assert_approx(result[1], 12.0, DEFAULT_EPSILON);
        assert_approx(result[2], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn too_few_bars() {
        let bars = make_bars(&[10.0]);
        assert!(RollingMax::new(5).compute(&bars).iter().all(|v| v.is_nan()));
    }
}
