//! Predicate sets and signal reduction.
//!
//! A predicate is a named boolean test over one bar's row: the raw bar
//! plus the precomputed indicator/feature columns at that index. An
//! ordered list of predicates reduces via conjunction or disjunction into
//! one of the four signal channels.
//!
//! # Architecture invariant
//! Predicates never see portfolio or position state, never read an index
//! beyond the current bar, and never mutate prior output. The signal at
//! bar i is a pure function of bars 0..=i and the configuration.
//!
//! # NaN semantics
//! A missing column or NaN value makes a comparison false — it never
//! panics, never satisfies an AND-reduction, and never silently counts as
//! true. Warm-up bars are additionally forced false regardless of
//! predicate outcome.

use crate::domain::Bar;
use crate::indicators::IndicatorValues;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One bar's view of the world: the bar itself plus column lookups at the
/// same index. Handed to predicate closures.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    pub bar: &'a Bar,
    pub index: usize,
    columns: &'a IndicatorValues,
}

impl<'a> Row<'a> {
    pub fn new(bar: &'a Bar, index: usize, columns: &'a IndicatorValues) -> Self {
        Self {
            bar,
            index,
            columns,
        }
    }

    /// Column value at this row. `None` when the column is missing, the
    /// index is out of range, or the value is NaN — all three read as
    /// "unavailable".
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .get(column, self.index)
            .filter(|v| !v.is_nan())
    }

    /// True iff the column is available and the comparison holds.
    pub fn check(&self, column: &str, cmp: impl FnOnce(f64) -> bool) -> bool {
        self.get(column).is_some_and(cmp)
    }
}

/// A named boolean test over a single row.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    eval: Arc<dyn Fn(&Row<'_>) -> bool + Send + Sync>,
}

impl Predicate {
    pub fn new(
        name: impl Into<String>,
        eval: impl Fn(&Row<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            eval: Arc::new(eval),
        }
    }

    /// Convenience constructor: column compared against a fixed threshold.
    pub fn column(
        name: impl Into<String>,
        column: impl Into<String>,
        cmp: impl Fn(f64) -> bool + Send + Sync + 'static,
    ) -> Self {
        let column = column.into();
        Self::new(name, move |row| row.check(&column, |v| cmp(v)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn eval(&self, row: &Row<'_>) -> bool {
        (self.eval)(row)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish()
    }
}

/// How a predicate list reduces into one boolean per bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReduceMode {
    /// Conjunction: every predicate must hold.
    All,
    /// Disjunction: any predicate suffices.
    Any,
}

/// Which output channel a predicate set feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalChannel {
    EnterLong,
    ExitLong,
    EnterShort,
    ExitShort,
}

impl SignalChannel {
    pub const ALL: [SignalChannel; 4] = [
        SignalChannel::EnterLong,
        SignalChannel::ExitLong,
        SignalChannel::EnterShort,
        SignalChannel::ExitShort,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SignalChannel::EnterLong => "enter_long",
            SignalChannel::ExitLong => "exit_long",
            SignalChannel::EnterShort => "enter_short",
            SignalChannel::ExitShort => "exit_short",
        }
    }
}

/// Ordered predicate list + reduction mode, feeding one channel.
#[derive(Debug, Clone)]
pub struct PredicateSet {
    pub channel: SignalChannel,
    pub mode: ReduceMode,
    predicates: Vec<Predicate>,
}

impl PredicateSet {
    pub fn new(channel: SignalChannel, mode: ReduceMode) -> Self {
        Self {
            channel,
            mode,
            predicates: Vec::new(),
        }
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Evaluate one row. An empty predicate list never fires in either
    /// mode: a channel with no conditions is inert, not always-on.
    pub fn eval_row(&self, row: &Row<'_>) -> bool {
        if self.predicates.is_empty() {
            return false;
        }
        match self.mode {
            ReduceMode::All => self.predicates.iter().all(|p| p.eval(row)),
            ReduceMode::Any => self.predicates.iter().any(|p| p.eval(row)),
        }
    }

    /// Evaluate the full series into a boolean column. Bars with index
    /// below `warmup` are forced false regardless of predicate outcome.
    pub fn evaluate(&self, bars: &[Bar], columns: &IndicatorValues, warmup: usize) -> Vec<bool> {
        bars.iter()
            .enumerate()
            .map(|(i, bar)| i >= warmup && self.eval_row(&Row::new(bar, i, columns)))
            .collect()
    }
}

/// The four-channel boolean signal output, aligned with the input series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalFrame {
    pub enter_long: Vec<bool>,
    pub exit_long: Vec<bool>,
    pub enter_short: Vec<bool>,
    pub exit_short: Vec<bool>,
}

impl SignalFrame {
    /// All-false frame of the given length.
    pub fn empty(len: usize) -> Self {
        Self {
            enter_long: vec![false; len],
            exit_long: vec![false; len],
            enter_short: vec![false; len],
            exit_short: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.enter_long.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enter_long.is_empty()
    }

    pub fn channel(&self, channel: SignalChannel) -> &[bool] {
        match channel {
            SignalChannel::EnterLong => &self.enter_long,
            SignalChannel::ExitLong => &self.exit_long,
            SignalChannel::EnterShort => &self.enter_short,
            SignalChannel::ExitShort => &self.exit_short,
        }
    }

    pub fn channel_mut(&mut self, channel: SignalChannel) -> &mut Vec<bool> {
        match channel {
            SignalChannel::EnterLong => &mut self.enter_long,
            SignalChannel::ExitLong => &mut self.exit_long,
            SignalChannel::EnterShort => &mut self.enter_short,
            SignalChannel::ExitShort => &mut self.exit_short,
        }
    }

    /// Evaluate a group of predicate sets into one frame. Sets feeding the
    /// same channel are OR-merged (any set may fire the channel).
    pub fn evaluate(
        sets: &[PredicateSet],
        bars: &[Bar],
        columns: &IndicatorValues,
        warmup: usize,
    ) -> Self {
        let mut frame = Self::empty(bars.len());
        for set in sets {
            let column = set.evaluate(bars, columns, warmup);
            let target = frame.channel_mut(set.channel);
            for (out, fired) in target.iter_mut().zip(column) {
                *out = *out || fired;
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn columns_with(name: &str, values: Vec<f64>) -> IndicatorValues {
        let mut iv = IndicatorValues::new();
        iv.insert(name, values);
        iv
    }

    #[test]
    fn row_get_filters_nan() {
        let bars = make_bars(&[100.0, 101.0]);
        let iv = columns_with("x", vec![f64::NAN, 5.0]);
        let row0 = Row::new(&bars[0], 0, &iv);
        let row1 = Row::new(&bars[1], 1, &iv);
        assert_eq!(row0.get("x"), None);
        assert_eq!(row1.get("x"), Some(5.0));
        assert_eq!(row1.get("missing"), None);
    }

    #[test]
    fn nan_comparison_is_false_not_true() {
        let bars = make_bars(&[100.0]);
        let iv = columns_with("x", vec![f64::NAN]);
        let row = Row::new(&bars[0], 0, &iv);
        // Both the predicate and its negation read false on NaN.
        assert!(!row.check("x", |v| v > 0.0));
        assert!(!row.check("x", |v| v <= 0.0));
    }

    #[test]
    fn all_mode_requires_every_predicate() {
        let bars = make_bars(&[100.0]);
        let iv = columns_with("x", vec![5.0]);
        let set = PredicateSet::new(SignalChannel::EnterLong, ReduceMode::All)
            .with(Predicate::column("x_pos", "x", |v| v > 0.0))
            .with(Predicate::column("x_big", "x", |v| v > 10.0));
        let out = set.evaluate(bars.as_slice(), &iv, 0);
        assert_eq!(out, vec![false]);
    }

    #[test]
    fn any_mode_needs_one_predicate() {
        let bars = make_bars(&[100.0]);
        let iv = columns_with("x", vec![5.0]);
        let set = PredicateSet::new(SignalChannel::ExitLong, ReduceMode::Any)
            .with(Predicate::column("x_neg", "x", |v| v < 0.0))
            .with(Predicate::column("x_pos", "x", |v| v > 0.0));
        let out = set.evaluate(bars.as_slice(), &iv, 0);
        assert_eq!(out, vec![true]);
    }

    #[test]
    fn empty_predicate_set_never_fires() {
        let bars = make_bars(&[100.0, 101.0]);
        let iv = IndicatorValues::new();
        for mode in [ReduceMode::All, ReduceMode::Any] {
            let set = PredicateSet::new(SignalChannel::EnterLong, mode);
            assert_eq!(set.evaluate(bars.as_slice(), &iv, 0), vec![false, false]);
        }
    }

    #[test]
    fn warmup_forces_false() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0]);
        let iv = columns_with("x", vec![1.0; 4]);
        let set = PredicateSet::new(SignalChannel::EnterLong, ReduceMode::All)
            .with(Predicate::column("always", "x", |v| v > 0.0));
        let out = set.evaluate(bars.as_slice(), &iv, 2);
        assert_eq!(out, vec![false, false, true, true]);
    }

    #[test]
    fn nan_never_satisfies_and_reduction() {
        let bars = make_bars(&[100.0, 101.0]);
        let mut iv = IndicatorValues::new();
        iv.insert("a", vec![1.0, 1.0]);
        iv.insert("b", vec![1.0, f64::NAN]);
        let set = PredicateSet::new(SignalChannel::EnterLong, ReduceMode::All)
            .with(Predicate::column("a_pos", "a", |v| v > 0.0))
            .with(Predicate::column("b_pos", "b", |v| v > 0.0));
        let out = set.evaluate(bars.as_slice(), &iv, 0);
        assert_eq!(out, vec![true, false]);
    }

    #[test]
    fn raw_bar_predicates_see_price() {
        let bars = make_bars(&[100.0, 90.0]);
        let iv = IndicatorValues::new();
        let set = PredicateSet::new(SignalChannel::EnterShort, ReduceMode::All)
            .with(Predicate::new("below_95", |row: &Row<'_>| {
                row.bar.close < 95.0
            }));
        let out = set.evaluate(bars.as_slice(), &iv, 0);
        assert_eq!(out, vec![false, true]);
    }

    #[test]
    fn frame_merges_same_channel_sets_with_or() {
        let bars = make_bars(&[100.0, 101.0]);
        let mut iv = IndicatorValues::new();
        iv.insert("a", vec![1.0, -1.0]);
        iv.insert("b", vec![-1.0, 1.0]);
        let sets = vec![
            PredicateSet::new(SignalChannel::EnterLong, ReduceMode::All)
                .with(Predicate::column("a_pos", "a", |v| v > 0.0)),
            PredicateSet::new(SignalChannel::EnterLong, ReduceMode::All)
                .with(Predicate::column("b_pos", "b", |v| v > 0.0)),
        ];
        let frame = SignalFrame::evaluate(&sets, bars.as_slice(), &iv, 0);
        assert_eq!(frame.enter_long, vec![true, true]);
        assert_eq!(frame.enter_short, vec![false, false]);
    }

    #[test]
    fn channel_accessors_roundtrip() {
        let mut frame = SignalFrame::empty(2);
        frame.channel_mut(SignalChannel::ExitShort)[1] = true;
        assert_eq!(frame.channel(SignalChannel::ExitShort), &[false, true]);
        assert_eq!(SignalChannel::ExitShort.label(), "exit_short");
    }
}
