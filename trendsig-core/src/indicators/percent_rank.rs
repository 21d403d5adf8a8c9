//! Rolling percentile rank.
//!
//! Rank of the current value within its trailing window, as a fraction of
//! the window size (pandas `rolling(n).rank(pct=True)` semantics: average
//! rank of the current value among the window values, divided by n).
//! Output is in (0, 1]. Lookback: period - 1.

use super::{BarField, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct PercentRank {
    period: usize,
    field: BarField,
    name: String,
}

impl PercentRank {
    pub fn new(period: usize, field: BarField) -> Self {
        assert!(period >= 1, "percent rank period must be >= 1");
        Self {
            period,
            field,
            name: format!("pct_rank_{}_{period}", field.label()),
        }
    }
}

impl Indicator for PercentRank {
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
            let window = &values[i + 1 - self.period..=i];
            let current = values[i];

            // Average rank: count strictly-below + half of ties (including
            // the current value itself, which gets (1 + ties) / 2 extra).
            let below = window.iter().filter(|&&v| v < current).count() as f64;
            let ties = window.iter().filter(|&&v| v == current).count() as f64;
            let avg_rank = below + (ties + 1.0) / 2.0;
            result[i] = avg_rank / self.period as f64;
        }

        result
    }
}
