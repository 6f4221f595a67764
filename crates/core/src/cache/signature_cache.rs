use dashmap::DashMap;
use hierscope_api::models::SearchScope;
use serde::Serialize;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;
use crate::hierarchy::HierarchyMap;

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Cached whole-type maps, keyed by type and scope.
    pub full_entries: usize,
    /// Cached name-partitioned maps, keyed by type and method name.
    pub name_entries: usize,
    /// Modification stamp the cached entries belong to.
    pub stamp: u64,
}

#[derive(Debug, Clone)]
struct Stamped {
    stamp: u64,
    value: Arc<HierarchyMap>,
}

/// Cache of hierarchy maps.
///
/// Entries remember the model stamp they were computed for. Observing a
/// newer stamp drops everything. Two threads may compute the same key at
/// once; whichever inserts last is kept.
#[derive(Debug, Default)]
pub struct SignatureCache {
    full: DashMap<(String, SearchScope), Stamped>,
    by_name: DashMap<(String, String), Stamped>,
    stamp: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SignatureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole-type map for `fqn` in `scope`.
    pub fn full_map<F>(
        &self,
        fqn: &str,
        scope: &SearchScope,
        stamp: u64,
        compute: F,
    ) -> Result<Arc<HierarchyMap>>
    where
        F: FnOnce() -> Result<HierarchyMap>,
    {
        self.get_or_compute(
            &self.full,
            (fqn.to_string(), scope.clone()),
            stamp,
            compute,
        )
    }

    /// Map of `fqn` restricted to methods called `name`.
    pub fn name_map<F>(&self, fqn: &str, name: &str, stamp: u64, compute: F) -> Result<Arc<HierarchyMap>>
    where
        F: FnOnce() -> Result<HierarchyMap>,
    {
        self.get_or_compute(
            &self.by_name,
            (fqn.to_string(), name.to_string()),
            stamp,
            compute,
        )
    }

    fn get_or_compute<K, F>(
        &self,
        map: &DashMap<K, Stamped>,
        key: K,
        stamp: u64,
        compute: F,
    ) -> Result<Arc<HierarchyMap>>
    where
        K: Hash + Eq,
        F: FnOnce() -> Result<HierarchyMap>,
    {
        self.sync(stamp);

        // The shard guard must be released before computing: the computation
        // may read this cache again.
        let cached = map
            .get(&key)
            .filter(|entry| entry.stamp == stamp)
            .map(|entry| entry.value.clone());
        if let Some(value) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("signature cache hit");
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = Arc::new(compute()?);
        if self.stamp.load(Ordering::Acquire) == stamp {
            map.insert(
                key,
                Stamped {
                    stamp,
                    value: value.clone(),
                },
            );
        }
        Ok(value)
    }

    /// Advance to `stamp`, dropping every entry if it is newer than the last one seen.
    fn sync(&self, stamp: u64) {
        let seen = self.stamp.load(Ordering::Acquire);
        if stamp > seen
            && self
                .stamp
                .compare_exchange(seen, stamp, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        {
            tracing::debug!(
                "program model changed ({} -> {}), clearing signature cache",
                seen,
                stamp
            );
            self.full.clear();
            self.by_name.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            full_entries: self.full.len(),
            name_entries: self.by_name.len(),
            stamp: self.stamp.load(Ordering::Acquire),
        }
    }

    pub fn clear(&self) {
        self.full.clear();
        self.by_name.clear();
    }
}
