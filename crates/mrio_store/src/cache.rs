//! Per-period cache of loaded MRIO tables.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use mrio_core::tables::MrioTables;
use tracing::debug;

use crate::error::StoreError;
use crate::source::DatasetSource;

type Slot = Arc<Mutex<Option<Arc<MrioTables>>>>;

/// Thread-safe per-period cache over a [`DatasetSource`].
///
/// The cache is unbounded: a deployment serves a handful of periods and
/// each table set is large enough that re-loading is worse than holding
/// it. Concurrent `get` calls for an uncached period coalesce into one
/// `load` via a per-period slot lock; the outer map lock is only held to
/// find or create the slot, never across a load. Failed loads leave the
/// slot empty so a later call can retry.
pub struct MatrixStore<S> {
    source: S,
    slots: Mutex<HashMap<i32, Slot>>,
}

impl<S: DatasetSource> MatrixStore<S> {
    /// Create an empty store over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The tables for `period`, loading and caching them on first use.
    pub fn get(&self, period: i32) -> Result<Arc<MrioTables>, StoreError> {
        let slot = self.slot_for(period);
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tables) = guard.as_ref() {
            return Ok(Arc::clone(tables));
        }
        debug!(period, "cache miss, loading dataset");
        let tables = Arc::new(self.source.load(period)?);
        *guard = Some(Arc::clone(&tables));
        Ok(tables)
    }

    /// Whether `period` is currently cached.
    pub fn is_cached(&self, period: i32) -> bool {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match slots.get(&period) {
            Some(slot) => slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_some(),
            None => false,
        }
    }

    /// Drop the cached tables for `period`, if any. Returns whether an
    /// entry was evicted. In-flight `Arc` handles stay valid.
    pub fn evict(&self, period: i32) -> bool {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(&period).is_some()
    }

    fn slot_for(&self, period: i32) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(period).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrio_core::types::{LabelUniverse, SectorKey};
    use nalgebra::{DMatrix, DVector};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    struct CountingSource {
        loads: AtomicUsize,
        fail_periods: Vec<i32>,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail_periods: Vec::new(),
            }
        }

        fn failing_on(period: i32) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail_periods: vec![period],
            }
        }

        fn load_count(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    impl DatasetSource for CountingSource {
        fn load(&self, period: i32) -> Result<MrioTables, StoreError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail_periods.contains(&period) {
                return Err(StoreError::PeriodNotFound { period });
            }
            let labels = LabelUniverse::new(vec![
                SectorKey::new("C1", "Farming"),
                SectorKey::new("C1", "Food Processing"),
            ])
            .unwrap();
            let mut a = DMatrix::zeros(2, 2);
            a[(0, 1)] = 0.4;
            let y = DVector::from_vec(vec![100.0, 150.0]);
            Ok(MrioTables::derive_with_demand(labels, a, y).unwrap())
        }
    }

    #[test]
    fn test_second_get_hits_cache() {
        let store = MatrixStore::new(CountingSource::new());
        let first = store.get(2020).unwrap();
        let second = store.get(2020).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.source.load_count(), 1);
    }

    #[test]
    fn test_periods_are_cached_independently() {
        let store = MatrixStore::new(CountingSource::new());
        store.get(2020).unwrap();
        store.get(2021).unwrap();
        assert_eq!(store.source.load_count(), 2);
        assert!(store.is_cached(2020));
        assert!(store.is_cached(2021));
        assert!(!store.is_cached(2022));
    }

    #[test]
    fn test_evict_forces_reload() {
        let store = MatrixStore::new(CountingSource::new());
        store.get(2020).unwrap();
        assert!(store.evict(2020));
        assert!(!store.is_cached(2020));
        assert!(!store.evict(2020));
        store.get(2020).unwrap();
        assert_eq!(store.source.load_count(), 2);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let store = MatrixStore::new(CountingSource::failing_on(2020));
        assert!(store.get(2020).is_err());
        assert!(!store.is_cached(2020));
        assert!(store.get(2020).is_err());
        assert_eq!(store.source.load_count(), 2);
    }

    #[test]
    fn test_concurrent_gets_load_once() {
        let store = Arc::new(MatrixStore::new(CountingSource::new()));
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    store.get(2020).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.source.load_count(), 1);
    }
}
