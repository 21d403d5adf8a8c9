//! Shared read-through cache for indicator columns.
//!
//! Batch runs recompute the same columns for the same series under many
//! parameter sets (the slow EMA or 14-bar ADX rarely changes between
//! neighbouring parameter sets). The cache keys each column by
//! (series content hash, column name) so identical work is done once.
//!
//! Single-flight: concurrent callers asking for the same key share one
//! computation. The map mutex is held only to resolve the per-key cell;
//! the computation itself runs outside the lock.

use crate::domain::SeriesHash;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

type Key = (SeriesHash, String);
type Cell = Arc<OnceLock<Arc<Vec<f64>>>>;

/// Column cache shared across engine runs. Cheap to clone (`Arc` inside).
#[derive(Clone, Default)]
pub struct IndicatorCache {
    cells: Arc<Mutex<HashMap<Key, Cell>>>,
}

impl IndicatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached column, computing it at most once per key even
    /// under concurrent access.
    pub fn get_or_compute(
        &self,
        series: SeriesHash,
        column: &str,
        compute: impl FnOnce() -> Vec<f64>,
    ) -> Arc<Vec<f64>> {
        let cell = {
            let mut cells = match self.cells.lock() {
                Ok(guard) => guard,
                // A panic inside the lock only ever leaves a fully-formed
                // map behind; the cells themselves are write-once.
                Err(poisoned) => poisoned.into_inner(),
            };
            Arc::clone(
                cells
                    .entry((series, column.to_string()))
                    .or_insert_with(|| Arc::new(OnceLock::new())),
            )
        };
        Arc::clone(cell.get_or_init(|| Arc::new(compute())))
    }

    /// Number of resolved columns currently held.
    pub fn len(&self) -> usize {
        match self.cells.lock() {
            Ok(guard) => guard.values().filter(|c| c.get().is_some()).count(),
            Err(poisoned) => poisoned
                .into_inner()
                .values()
                .filter(|c| c.get().is_some())
                .count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for IndicatorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorCache")
            .field("columns", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn hash(byte: u8) -> SeriesHash {
        SeriesHash([byte; 32])
    }

    #[test]
    fn computes_once_per_key() {
        let cache = IndicatorCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_compute(hash(1), "atr_10", || {
            calls.fetch_add(1, Ordering::SeqCst);
            vec![1.0, 2.0]
        });
        let second = cache.get_or_compute(hash(1), "atr_10", || {
            calls.fetch_add(1, Ordering::SeqCst);
            vec![9.0, 9.0]
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*first, vec![1.0, 2.0]);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn distinct_keys_compute_separately() {
        let cache = IndicatorCache::new();
        let a = cache.get_or_compute(hash(1), "atr_10", || vec![1.0]);
        let b = cache.get_or_compute(hash(1), "atr_14", || vec![2.0]);
        let c = cache.get_or_compute(hash(2), "atr_10", || vec![3.0]);
        assert_eq!((*a)[0], 1.0);
        assert_eq!((*b)[0], 2.0);
        assert_eq!((*c)[0], 3.0);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn concurrent_callers_share_one_computation() {
        let cache = IndicatorCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let cache = cache.clone();
                let calls = Arc::clone(&calls);
                scope.spawn(move || {
                    cache.get_or_compute(hash(7), "ema_55", || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        vec![5.0; 100]
                    })
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clone_shares_storage() {
        let cache = IndicatorCache::new();
        let clone = cache.clone();
        cache.get_or_compute(hash(3), "rsi_14", || vec![50.0]);
        assert_eq!(clone.len(), 1);
    }
}
