//! TrendSig Core — indicator and signal composition engine.
//!
//! This crate contains the algorithmic heart of a trend-following signal
//! pipeline:
//! - Domain types (bars, validated price series)
//! - Windowed indicator library (SMA/EMA, RSI, ATR, ADX, MACD, Bollinger,
//!   rolling extrema/rank/slope/correlation)
//! - The stateful Supertrend band recurrence
//! - Feature composition (regime classification, factor scores, alpha
//!   transforms)
//! - Declarative predicate reduction into four boolean signal channels
//!
//! Order execution, exchange connectivity, portfolio accounting and
//! parameter search live in the surrounding framework. This crate takes a
//! price series plus a parameter set and returns signal columns; nothing
//! here performs I/O.

pub mod cache;
pub mod config;
pub mod domain;
pub mod engine;
pub mod features;
pub mod indicators;
pub mod signals;

pub use config::{ConfigError, StrategyParams};
pub use domain::{Bar, PriceSeries, SeriesError};
pub use engine::{EngineError, EngineReport, SignalEngine};
pub use indicators::{Indicator, IndicatorValues};
pub use signals::{Predicate, PredicateSet, ReduceMode, Row, SignalChannel, SignalFrame};
