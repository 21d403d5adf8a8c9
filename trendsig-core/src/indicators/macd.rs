//! MACD — Moving Average Convergence/Divergence.
//!
//! MACD line = EMA(close, fast) - EMA(close, slow)
//! Signal line = EMA(MACD line, signal_period)
//! Histogram = MACD line - signal line
//!
//! The three series are separate `Indicator` instances selected by
//! `MacdSeries`. Lookback: slow - 1 for the MACD line, slow + signal - 2
//! for signal and histogram.

use super::ema::ema_of_series;
use super::Indicator;
use crate::domain::Bar;

/// Which output series of the MACD computation to expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdSeries {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal_period: usize,
    series: MacdSeries,
    name: String,
}

impl Macd {
    pub fn line(fast: usize, slow: usize, signal_period: usize) -> Self {
        Self::series(fast, slow, signal_period, MacdSeries::Line)
    }

    pub fn signal(fast: usize, slow: usize, signal_period: usize) -> Self {
        Self::series(fast, slow, signal_period, MacdSeries::Signal)
    }

    pub fn histogram(fast: usize, slow: usize, signal_period: usize) -> Self {
        Self::series(fast, slow, signal_period, MacdSeries::Histogram)
    }

    pub fn series(fast: usize, slow: usize, signal_period: usize, series: MacdSeries) -> Self {
        assert!(fast >= 1, "MACD fast period must be >= 1");
        assert!(slow > fast, "MACD slow period must exceed fast period");
        assert!(signal_period >= 1, "MACD signal period must be >= 1");
        let tag = match series {
            MacdSeries::Line => "macd",
            MacdSeries::Signal => "macd_signal",
            MacdSeries::Histogram => "macd_hist",
        };
        Self {
            fast,
            slow,
            signal_period,
            series,
            name: format!("{tag}_{fast}_{slow}_{signal_period}"),
        }
    }

    pub fn default_params() -> (usize, usize, usize) {
        (12, 26, 9)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.series {
            MacdSeries::Line => self.slow - 1,
            MacdSeries::Signal | MacdSeries::Histogram => self.slow + self.signal_period - 2,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);

        let mut line = vec![f64::NAN; n];
        for i in 0..n {
            if !fast[i].is_nan() && !slow[i].is_nan() {
                line[i] = fast[i] - slow[i];
            }
        }

        if self.series == MacdSeries::Line {
            return line;
        }

        let signal = ema_of_series(&line, self.signal_period);
        match self.series {
            MacdSeries::Signal => signal,
            MacdSeries::Histogram => {
                let mut hist = vec![f64::NAN; n];
                for i in 0..n {
                    if !line[i].is_nan() && !signal[i].is_nan() {
                        hist[i] = line[i] - signal[i];
                    }
                }
                hist
            }
            MacdSeries::Line => unreachable!(),
        }
    }
}
