//! The signal engine — wires indicators, the trend band, features and
//! predicate sets into the four-channel signal output.
//!
//! One engine owns one validated parameter set. `run` recomputes every
//! column from scratch for the series it is given (batch model, no
//! incremental state); `run_batch` fans independent parameter sets out
//! across a rayon pool with a shared column cache, since each run is pure
//! given its inputs.

use crate::cache::IndicatorCache;
use crate::config::{ConfigError, StrategyParams, ADX_PERIOD, VOLATILITY_WINDOW};
use crate::domain::{PriceSeries, SeriesError};
use crate::features::{self, alpha, factor_score, regime, MarketRegime};
use crate::indicators::{
    compute_supertrend, Adx, Atr, BarField, Ema, Indicator, IndicatorValues, PercentRank,
    RollingCorrelation, RollingMax, RollingMin, Rsi, Supertrend,
};
use crate::signals::{Predicate, PredicateSet, ReduceMode, Row, SignalChannel, SignalFrame};
use rayon::prelude::*;
use thiserror::Error;

/// Fixed ATR period behind `volatility_ratio`, independent of the tunable
/// band period.
const VOLATILITY_ATR_PERIOD: usize = 14;
/// Rolling rank window for `alpha_4`.
const ALPHA_RANK_WINDOW: usize = 9;
/// Rolling correlation window for `alpha_6`.
const ALPHA_CORR_WINDOW: usize = 10;
/// Support/resistance channel window for `price_position`.
const CHANNEL_WINDOW: usize = 20;
/// Factor-score gates: long entries need 4 of 5 sub-conditions, short
/// entries 3 of 5, and both sides need at least one trend-score point.
const LONG_SCORE_GATE: f64 = 4.0;
const SHORT_SCORE_GATE: f64 = 3.0;
const TREND_SCORE_GATE: f64 = 1.0;

/// Names of the composed feature columns in the report. Indicator columns
/// keep their parameter-encoding names (`atr_10`, `ema_55`, ...).
pub mod columns {
    pub const RETURN_VOLATILITY: &str = "return_volatility";
    pub const REGIME_SCORE: &str = "regime_score";
    pub const CAN_TRADE: &str = "can_trade";
    pub const MARKET_REGIME: &str = "market_regime";
    pub const ADX_GATE_LONG: &str = "adx_gate_long";
    pub const ADX_GATE_SHORT: &str = "adx_gate_short";
    pub const ALPHA_101: &str = "alpha_101";
    pub const ALPHA_4: &str = "alpha_4";
    pub const ALPHA_6: &str = "alpha_6";
    pub const TURBULENCE: &str = "turbulence";
    pub const VOLUME_RATIO: &str = "volume_ratio";
    pub const VOLATILITY_RATIO: &str = "volatility_ratio";
    pub const PRICE_POSITION: &str = "price_position";
    pub const LONG_SCORE: &str = "long_score";
    pub const SHORT_SCORE: &str = "short_score";
    pub const TREND_SCORE: &str = "trend_score";
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Series(#[from] SeriesError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything one evaluation produces: the four signal channels, the full
/// column set for caller telemetry (sizing inputs like `volatility_ratio`
/// are exposed here, never acted on), the warm-up length that was masked,
/// and the per-bar market regime.
#[derive(Debug, Clone)]
pub struct EngineReport {
    pub signals: SignalFrame,
    pub columns: IndicatorValues,
    pub warmup: usize,
    pub regimes: Vec<Option<MarketRegime>>,
}

/// Parameter-encoding column names resolved once at engine construction.
#[derive(Debug, Clone)]
struct ColumnNames {
    band: String,
    direction: String,
    ema_fast: String,
    ema_slow: String,
    trend_ema: String,
    rsi: String,
    adx: String,
    plus_di: String,
    minus_di: String,
    atr_vol: String,
}

/// One validated parameter set, ready to evaluate any number of series.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    params: StrategyParams,
    names: ColumnNames,
    cache: Option<IndicatorCache>,
}

impl SignalEngine {
    /// Rejects an out-of-range parameter set before any computation.
    pub fn new(params: StrategyParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let names = ColumnNames {
            band: Supertrend::band(params.atr_period, params.atr_multiplier)
                .name()
                .to_string(),
            direction: Supertrend::direction(params.atr_period, params.atr_multiplier)
                .name()
                .to_string(),
            ema_fast: Ema::new(params.ema_fast).name().to_string(),
            ema_slow: Ema::new(params.ema_slow).name().to_string(),
            trend_ema: Ema::new(params.trend_lookback).name().to_string(),
            rsi: Rsi::new(params.rsi_period).name().to_string(),
            adx: Adx::new(ADX_PERIOD).name().to_string(),
            plus_di: Adx::plus_di(ADX_PERIOD).name().to_string(),
            minus_di: Adx::minus_di(ADX_PERIOD).name().to_string(),
            atr_vol: Atr::new(VOLATILITY_ATR_PERIOD).name().to_string(),
        };
        Ok(Self {
            params,
            names,
            cache: None,
        })
    }

    /// Attach a shared column cache (batch runs over the same series).
    pub fn with_cache(mut self, cache: IndicatorCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    /// Bars before this index have at least one undefined consumed column;
    /// all four channels are forced false there.
    pub fn warmup(&self) -> usize {
        [
            Supertrend::band(self.params.atr_period, self.params.atr_multiplier).lookback(),
            Ema::new(self.params.ema_fast).lookback(),
            Ema::new(self.params.ema_slow).lookback(),
            Ema::new(self.params.trend_lookback).lookback(),
            Rsi::new(self.params.rsi_period).lookback(),
            Adx::new(ADX_PERIOD).lookback(),
            Atr::new(VOLATILITY_ATR_PERIOD).lookback(),
            PercentRank::new(ALPHA_RANK_WINDOW, BarField::Low).lookback(),
            RollingCorrelation::new(ALPHA_CORR_WINDOW, BarField::Open, BarField::Volume).lookback(),
            RollingMax::new(CHANNEL_WINDOW).lookback(),
            // Return-based windows: one extra bar for the first return.
            VOLATILITY_WINDOW,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Full pipeline with the built-in predicate wiring.
    pub fn run(&self, series: &PriceSeries) -> EngineReport {
        let sets = self.built_in_sets();
        self.evaluate(series, &sets)
    }

    /// Full pipeline, caller-supplied predicate sets over the same columns.
    pub fn run_custom(&self, series: &PriceSeries, sets: &[PredicateSet]) -> EngineReport {
        self.evaluate(series, sets)
    }

    /// Validate bars and run in one call — the boundary entry point for
    /// callers holding raw bar data.
    pub fn run_bars(&self, bars: Vec<crate::domain::Bar>) -> Result<EngineReport, EngineError> {
        let series = PriceSeries::new(bars)?;
        Ok(self.run(&series))
    }

    /// Evaluate many parameter sets against one series in parallel. Each
    /// engine run is pure; the shared cache deduplicates columns whose
    /// parameters coincide across sets.
    pub fn run_batch(
        params_list: &[StrategyParams],
        series: &PriceSeries,
    ) -> Result<Vec<EngineReport>, ConfigError> {
        let cache = IndicatorCache::new();
        let engines = params_list
            .iter()
            .map(|p| Self::new(p.clone()).map(|e| e.with_cache(cache.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(engines.par_iter().map(|e| e.run(series)).collect())
    }

    fn evaluate(&self, series: &PriceSeries, sets: &[PredicateSet]) -> EngineReport {
        let columns = self.compute_columns(series);
        let warmup = self.warmup();
        let signals = SignalFrame::evaluate(sets, series.bars(), &columns, warmup);
        let regimes = match columns.get_series(columns::MARKET_REGIME) {
            Some(codes) => codes.iter().map(|&c| MarketRegime::from_code(c)).collect(),
            None => vec![None; series.len()],
        };
        EngineReport {
            signals,
            columns,
            warmup,
            regimes,
        }
    }

    /// Compute one indicator column, going through the shared cache when
    /// one is attached. The column name encodes every parameter, so
    /// (series hash, name) is a complete cache key.
    fn indicator_column(
        &self,
        series: &PriceSeries,
        indicator: &dyn Indicator,
        out: &mut IndicatorValues,
    ) {
        let name = indicator.name().to_string();
        let values = match &self.cache {
            Some(cache) => (*cache
                .get_or_compute(series.series_hash(), &name, || {
                    indicator.compute(series.bars())
                }))
            .clone(),
            None => indicator.compute(series.bars()),
        };
        out.insert(name, values);
    }

    fn compute_columns(&self, series: &PriceSeries) -> IndicatorValues {
        let bars = series.bars();
        let p = &self.params;
        let mut out = IndicatorValues::new();

        // Raw indicator columns (cache-eligible).
        self.indicator_column(series, &Atr::new(p.atr_period), &mut out);
        self.indicator_column(series, &Atr::new(VOLATILITY_ATR_PERIOD), &mut out);
        self.indicator_column(series, &Ema::new(p.ema_fast), &mut out);
        self.indicator_column(series, &Ema::new(p.ema_slow), &mut out);
        self.indicator_column(series, &Ema::new(p.trend_lookback), &mut out);
        self.indicator_column(series, &Rsi::new(p.rsi_period), &mut out);
        self.indicator_column(series, &Adx::new(ADX_PERIOD), &mut out);
        self.indicator_column(series, &Adx::plus_di(ADX_PERIOD), &mut out);
        self.indicator_column(series, &Adx::minus_di(ADX_PERIOD), &mut out);
        self.indicator_column(
            series,
            &PercentRank::new(ALPHA_RANK_WINDOW, BarField::Low),
            &mut out,
        );
        self.indicator_column(
            series,
            &RollingCorrelation::new(ALPHA_CORR_WINDOW, BarField::Open, BarField::Volume),
            &mut out,
        );
        self.indicator_column(series, &RollingMin::new(CHANNEL_WINDOW), &mut out);
        self.indicator_column(series, &RollingMax::new(CHANNEL_WINDOW), &mut out);

        // Trend band: one fold produces both columns.
        let (band, direction) = match &self.cache {
            Some(cache) => {
                let band = cache.get_or_compute(series.series_hash(), &self.names.band, || {
                    compute_supertrend(bars, p.atr_period, p.atr_multiplier).0
                });
                let dir = cache.get_or_compute(series.series_hash(), &self.names.direction, || {
                    compute_supertrend(bars, p.atr_period, p.atr_multiplier).1
                });
                ((*band).clone(), (*dir).clone())
            }
            None => compute_supertrend(bars, p.atr_period, p.atr_multiplier),
        };
        out.insert(self.names.band.clone(), band);
        out.insert(self.names.direction.clone(), direction);

        // Feature columns. Not cached: their names don't encode the
        // parameter-dependent inputs they are built from.
        self.compose_features(series, &mut out);
        out
    }

    fn compose_features(&self, series: &PriceSeries, out: &mut IndicatorValues) {
        let bars = series.bars();

        let volatility = regime::return_volatility(bars, VOLATILITY_WINDOW);
        let adx = out.get_series(&self.names.adx).unwrap_or(&[]).to_vec();
        let score = regime::regime_score(&volatility, &adx);
        out.insert(columns::CAN_TRADE, regime::can_trade(&score));
        out.insert(columns::REGIME_SCORE, score);
        out.insert(columns::RETURN_VOLATILITY, volatility);

        let trend_ema = out.get_series(&self.names.trend_ema).unwrap_or(&[]).to_vec();
        let regimes = regime::market_regime(bars, &trend_ema, &adx);
        let gate_long: Vec<f64> = regimes
            .iter()
            .map(|&code| match MarketRegime::from_code(code) {
                Some(r) => r.adjusted_long_threshold(self.params.adx_threshold_long),
                None => f64::NAN,
            })
            .collect();
        let gate_short: Vec<f64> = regimes
            .iter()
            .map(|&code| match MarketRegime::from_code(code) {
                Some(r) => r.adjusted_short_threshold(
                    self.params.adx_threshold_short,
                    self.params.regime_bear_bonus,
                    self.params.regime_bull_penalty,
                ),
                None => f64::NAN,
            })
            .collect();
        out.insert(columns::ADX_GATE_LONG, gate_long);
        out.insert(columns::ADX_GATE_SHORT, gate_short);
        out.insert(columns::MARKET_REGIME, regimes);

        out.insert(columns::ALPHA_101, alpha::intraday_strength(bars));
        let mut alpha_4 = out
            .get_series(PercentRank::new(ALPHA_RANK_WINDOW, BarField::Low).name())
            .unwrap_or(&[])
            .to_vec();
        features::negate(&mut alpha_4);
        out.insert(columns::ALPHA_4, alpha_4);
        let mut alpha_6 = out
            .get_series(
                RollingCorrelation::new(ALPHA_CORR_WINDOW, BarField::Open, BarField::Volume)
                    .name(),
            )
            .unwrap_or(&[])
            .to_vec();
        features::negate(&mut alpha_6);
        out.insert(columns::ALPHA_6, alpha_6);
        out.insert(columns::TURBULENCE, alpha::turbulence(bars, VOLATILITY_WINDOW));

        let volume_ratio = alpha::volume_ratio(bars, VOLATILITY_WINDOW);
        let atr_vol = out.get_series(&self.names.atr_vol).unwrap_or(&[]).to_vec();
        out.insert(columns::VOLATILITY_RATIO, alpha::volatility_ratio(&atr_vol, bars));
        let support = out
            .get_series(RollingMin::new(CHANNEL_WINDOW).name())
            .unwrap_or(&[])
            .to_vec();
        let resistance = out
            .get_series(RollingMax::new(CHANNEL_WINDOW).name())
            .unwrap_or(&[])
            .to_vec();
        out.insert(
            columns::PRICE_POSITION,
            alpha::price_position(bars, &support, &resistance),
        );

        let direction = out.get_series(&self.names.direction).unwrap_or(&[]).to_vec();
        let ema_fast = out.get_series(&self.names.ema_fast).unwrap_or(&[]).to_vec();
        let ema_slow = out.get_series(&self.names.ema_slow).unwrap_or(&[]).to_vec();
        let rsi = out.get_series(&self.names.rsi).unwrap_or(&[]).to_vec();
        out.insert(
            columns::LONG_SCORE,
            factor_score::side_score(
                &factor_score::ScoreThresholds::long_defaults(),
                &direction,
                &ema_fast,
                &ema_slow,
                &adx,
                &rsi,
                &volume_ratio,
            ),
        );
        out.insert(
            columns::SHORT_SCORE,
            factor_score::side_score(
                &factor_score::ScoreThresholds::short_defaults(),
                &direction,
                &ema_fast,
                &ema_slow,
                &adx,
                &rsi,
                &volume_ratio,
            ),
        );
        let alpha_101 = out.get_series(columns::ALPHA_101).unwrap_or(&[]).to_vec();
        out.insert(
            columns::TREND_SCORE,
            factor_score::trend_score(&adx, &alpha_101),
        );
        out.insert(columns::VOLUME_RATIO, volume_ratio);
    }

    /// The built-in wiring: conjunctive entries with asymmetric long/short
    /// thresholds and regime-adjusted ADX gates; exits fire purely on a
    /// trend-band direction flip.
    fn built_in_sets(&self) -> Vec<PredicateSet> {
        let p = &self.params;
        let dir = self.names.direction.clone();
        let fast = self.names.ema_fast.clone();
        let slow = self.names.ema_slow.clone();
        let adx = self.names.adx.clone();
        let plus_di = self.names.plus_di.clone();
        let minus_di = self.names.minus_di.clone();

        let enter_long = PredicateSet::new(SignalChannel::EnterLong, ReduceMode::All)
            .with(Predicate::column("trend_up", dir.clone(), |v| v == 1.0))
            .with(two_column_cmp("ema_bullish", fast.clone(), slow.clone(), |f, s| f > s))
            .with(two_column_cmp(
                "adx_above_long_gate",
                adx.clone(),
                columns::ADX_GATE_LONG.to_string(),
                |a, gate| a > gate,
            ))
            .with(two_column_cmp(
                "di_bullish",
                plus_di.clone(),
                minus_di.clone(),
                |p, m| p > m,
            ))
            .with(Predicate::column("alpha_bullish", columns::ALPHA_101, {
                let threshold = p.alpha_threshold;
                move |v| v > threshold
            }))
            .with(Predicate::column("volume_confirms", columns::VOLUME_RATIO, {
                let factor = p.volume_factor;
                move |v| v > factor
            }))
            .with(Predicate::column("volatility_ok", columns::VOLATILITY_RATIO, {
                let max = p.max_volatility_ratio;
                move |v| v < max
            }))
            .with(Predicate::column("regime_tradable", columns::CAN_TRADE, |v| {
                v == 1.0
            }))
            .with(Predicate::column("long_score_gate", columns::LONG_SCORE, |v| {
                v >= LONG_SCORE_GATE
            }))
            .with(Predicate::column("trend_score_gate", columns::TREND_SCORE, |v| {
                v >= TREND_SCORE_GATE
            }));

        let enter_short = PredicateSet::new(SignalChannel::EnterShort, ReduceMode::All)
            .with(Predicate::column("trend_down", dir.clone(), |v| v == -1.0))
            .with(two_column_cmp("ema_bearish", fast, slow, |f, s| f < s))
            .with(two_column_cmp(
                "adx_above_short_gate",
                adx,
                columns::ADX_GATE_SHORT.to_string(),
                |a, gate| a > gate,
            ))
            .with(two_column_cmp("di_bearish", minus_di, plus_di, |m, p| {
                m > p
            }))
            .with(Predicate::column("alpha_bearish", columns::ALPHA_101, {
                let threshold = p.alpha_threshold;
                move |v| v < -threshold
            }))
            .with(Predicate::column("volume_confirms", columns::VOLUME_RATIO, {
                let factor = p.volume_factor;
                move |v| v > factor
            }))
            .with(Predicate::column("volatility_ok", columns::VOLATILITY_RATIO, {
                let max = p.max_volatility_ratio;
                move |v| v < max
            }))
            .with(Predicate::column("regime_tradable", columns::CAN_TRADE, |v| {
                v == 1.0
            }))
            .with(Predicate::column("short_score_gate", columns::SHORT_SCORE, |v| {
                v >= SHORT_SCORE_GATE
            }))
            .with(Predicate::column("trend_score_gate", columns::TREND_SCORE, |v| {
                v >= TREND_SCORE_GATE
            }));

        let exit_long = PredicateSet::new(SignalChannel::ExitLong, ReduceMode::All)
            .with(Predicate::column("trend_flipped_down", dir.clone(), |v| {
                v == -1.0
            }));
        let exit_short = PredicateSet::new(SignalChannel::ExitShort, ReduceMode::All)
            .with(Predicate::column("trend_flipped_up", dir, |v| v == 1.0));

        vec![enter_long, exit_long, enter_short, exit_short]
    }
}

/// Predicate over two columns of the same row; false when either is
/// unavailable.
fn two_column_cmp(
    name: &'static str,
    left: String,
    right: String,
    cmp: impl Fn(f64, f64) -> bool + Send + Sync + 'static,
) -> Predicate {
    Predicate::new(name, move |row: &Row<'_>| {
        match (row.get(&left), row.get(&right)) {
            (Some(l), Some(r)) => cmp(l, r),
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn short_warmup_params() -> StrategyParams {
        StrategyParams {
            atr_period: 5,
            ema_fast: 5,
            ema_slow: 20,
            rsi_period: 10,
            trend_lookback: 50,
            ..Default::default()
        }
    }

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::new(make_bars(closes)).unwrap()
    }

    #[test]
    fn new_rejects_invalid_params() {
        let params = StrategyParams {
            atr_multiplier: 1.0,
            ..Default::default()
        };
        assert!(SignalEngine::new(params).is_err());
    }

    #[test]
    fn report_is_aligned_with_series() {
        let engine = SignalEngine::new(short_warmup_params()).unwrap();
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + i as f64 * 0.5).collect();
        let s = series(&closes);
        let report = engine.run(&s);

        assert_eq!(report.signals.len(), 120);
        assert_eq!(report.regimes.len(), 120);
        for name in report.columns.column_names() {
            assert_eq!(
                report.columns.get_series(name).map(<[f64]>::len),
                Some(120),
                "column {name} misaligned"
            );
        }
    }

    #[test]
    fn warmup_prefix_is_all_false() {
        let engine = SignalEngine::new(short_warmup_params()).unwrap();
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + i as f64).collect();
        let report = engine.run(&series(&closes));

        assert!(report.warmup >= 49);
        for channel in SignalChannel::ALL {
            assert!(report.signals.channel(channel)[..report.warmup]
                .iter()
                .all(|&b| !b));
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let engine = SignalEngine::new(short_warmup_params()).unwrap();
        let closes: Vec<f64> = (0..150)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect();
        let s = series(&closes);

        let a = engine.run(&s);
        let b = engine.run(&s);
        assert_eq!(a.signals, b.signals);
        for name in a.columns.column_names() {
            let left = a.columns.get_series(name).unwrap();
            let right = b.columns.get_series(name).unwrap();
            assert!(left
                .iter()
                .zip(right)
                .all(|(x, y)| x.to_bits() == y.to_bits()));
        }
    }

    #[test]
    fn direction_flip_fires_exit_long() {
        let mut closes = vec![100.0; 80];
        closes.extend(vec![80.0; 10]); // crash through the lower band
        let engine = SignalEngine::new(short_warmup_params()).unwrap();
        let report = engine.run(&series(&closes));

        assert!(report.signals.exit_long[80]);
        assert!(!report.signals.exit_long[79]);
    }

    #[test]
    fn run_custom_with_no_sets_is_all_false() {
        let engine = SignalEngine::new(short_warmup_params()).unwrap();
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let report = engine.run_custom(&series(&closes), &[]);
        assert_eq!(report.signals, SignalFrame::empty(100));
    }

    #[test]
    fn entries_require_a_directional_cross() {
        let engine = SignalEngine::new(short_warmup_params()).unwrap();
        let sets = engine.built_in_sets();
        let long = sets
            .iter()
            .find(|s| s.channel == SignalChannel::EnterLong)
            .unwrap();
        let short = sets
            .iter()
            .find(|s| s.channel == SignalChannel::EnterShort)
            .unwrap();
        assert!(long.predicates().iter().any(|p| p.name() == "di_bullish"));
        assert!(short.predicates().iter().any(|p| p.name() == "di_bearish"));
    }

    #[test]
    fn directional_lines_are_exposed_and_cross_in_an_uptrend() {
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + i as f64).collect();
        let engine = SignalEngine::new(short_warmup_params()).unwrap();
        let report = engine.run(&series(&closes));

        let plus = report.columns.get_series("plus_di_14").unwrap();
        let minus = report.columns.get_series("minus_di_14").unwrap();
        for i in report.warmup..plus.len() {
            assert!(
                plus[i] > minus[i],
                "+DI should dominate -DI at bar {i} in a steady rise"
            );
        }
    }

    #[test]
    fn batch_matches_individual_runs() {
        let params_list = vec![
            short_warmup_params(),
            StrategyParams {
                atr_multiplier: 4.0,
                ..short_warmup_params()
            },
        ];
        let closes: Vec<f64> = (0..120)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 3.0)
            .collect();
        let s = series(&closes);

        let batch = SignalEngine::run_batch(&params_list, &s).unwrap();
        assert_eq!(batch.len(), 2);
        for (params, report) in params_list.iter().zip(&batch) {
            let single = SignalEngine::new(params.clone()).unwrap().run(&s);
            assert_eq!(single.signals, report.signals);
        }
    }

    #[test]
    fn batch_rejects_any_invalid_member() {
        let params_list = vec![
            StrategyParams::default(),
            StrategyParams {
                ema_fast: 60,
                ..Default::default()
            },
        ];
        let s = series(&(0..120).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        assert!(SignalEngine::run_batch(&params_list, &s).is_err());
    }

    #[test]
    fn run_bars_reports_malformed_input() {
        let mut bars = make_bars(&[100.0, 101.0, 102.0]);
        bars[1].high = 0.5; // below low
        let engine = SignalEngine::new(short_warmup_params()).unwrap();
        assert!(matches!(
            engine.run_bars(bars),
            Err(EngineError::Series(SeriesError::MalformedBar { index: 1 }))
        ));
    }
}
