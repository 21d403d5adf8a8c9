//! PriceSeries — validated, immutable chronological bar sequence.
//!
//! Validation is fail-fast: the first offending bar is named in the error.
//! Data is never silently repaired. A short (or empty) series is not an
//! error — downstream indicators simply stay in warm-up.

use super::Bar;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("malformed bar at index {index}: OHLC ordering violated or non-finite value")]
    MalformedBar { index: usize },

    #[error("non-monotonic timestamp at index {index}: timestamps must be strictly increasing")]
    NonMonotonicTimestamp { index: usize },
}

/// Content identity of a price series, used as a cache key component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesHash(pub [u8; 32]);

impl SeriesHash {
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Immutable ordered sequence of OHLCV bars.
///
/// Construction validates every bar (`Bar::is_sane`) and strict timestamp
/// monotonicity. Once built, the series is read-only; all indicator columns
/// are positionally aligned with it.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.is_sane() {
                return Err(SeriesError::MalformedBar { index });
            }
        }
        for index in 1..bars.len() {
            if bars[index].timestamp <= bars[index - 1].timestamp {
                return Err(SeriesError::NonMonotonicTimestamp { index });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Truncated view of the first `len` bars. Ordering and sanity were
    /// already validated, so no re-check is needed.
    pub fn truncate(&self, len: usize) -> Self {
        Self {
            bars: self.bars[..len.min(self.bars.len())].to_vec(),
        }
    }

    /// blake3 hash of the bar data. Two series with identical bars have
    /// identical hashes regardless of how they were constructed.
    pub fn series_hash(&self) -> SeriesHash {
        let mut hasher = blake3::Hasher::new();
        for bar in &self.bars {
            hasher.update(&bar.timestamp.and_utc().timestamp_millis().to_le_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
        SeriesHash(*hasher.finalize().as_bytes())
    }
}
