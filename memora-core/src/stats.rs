use std::sync::atomic::{AtomicU64, Ordering};

use crate::Fetched;

/// Hit/miss counters of a memoized function.
///
/// Counters are atomics with `Relaxed` ordering, so a `CacheStats` can be
/// shared through the [`stats_registry`](crate::stats_registry) and read from
/// any thread.
///
/// # Examples
///
/// ```
/// use memora_core::CacheStats;
///
/// let stats = CacheStats::new();
///
/// stats.record_hit();
/// stats.record_hit();
/// stats.record_miss();
///
/// assert_eq!(stats.hits(), 2);
/// assert_eq!(stats.misses(), 1);
/// assert_eq!(stats.total_accesses(), 3);
/// assert!((stats.hit_rate() - 0.6666).abs() < 0.001);
/// ```
#[derive(Debug)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a [`compute_or_fetch`](crate::compute_or_fetch) outcome.
    ///
    /// ```
    /// use memora_core::{CacheStats, Fetched};
    ///
    /// let stats = CacheStats::new();
    /// stats.record(&Fetched::Computed(1));
    /// stats.record(&Fetched::Hit(1));
    /// assert_eq!((stats.hits(), stats.misses()), (1, 1));
    /// ```
    #[inline]
    pub fn record<R>(&self, fetched: &Fetched<R>) {
        if fetched.is_hit() {
            self.record_hit();
        } else {
            self.record_miss();
        }
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_accesses(&self) -> u64 {
        self.hits() + self.misses()
    }

    /// Fraction of accesses served from the cache, 0.0 with no accesses.
    #[inline]
    pub fn hit_rate(&self) -> f64 {
        self.rate(self.hits())
    }

    /// Fraction of accesses that computed, 0.0 with no accesses.
    #[inline]
    pub fn miss_rate(&self) -> f64 {
        self.rate(self.misses())
    }

    fn rate(&self, count: u64) -> f64 {
        match self.total_accesses() {
            0 => 0.0,
            total => count as f64 / total as f64,
        }
    }

    /// Resets both counters to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot copy; the clone's counters are independent.
impl Clone for CacheStats {
    fn clone(&self) -> Self {
        Self {
            hits: AtomicU64::new(self.hits()),
            misses: AtomicU64::new(self.misses()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.misses(), 0);
        assert_eq!(stats.total_accesses(), 0);
    }

    #[test]
    fn test_record_fetched() {
        let stats = CacheStats::new();
        stats.record(&Fetched::Computed("a"));
        stats.record(&Fetched::Hit("a"));
        stats.record(&Fetched::Hit("a"));
        assert_eq!(stats.hits(), 2);
        assert_eq!(stats.misses(), 1);
    }

    #[test]
    fn test_rates() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_miss();
        assert!((stats.miss_rate() - 0.6666).abs() < 0.001);
        assert!((stats.hit_rate() - 0.3333).abs() < 0.001);
    }

    #[test]
    fn test_rates_without_accesses() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.miss_rate(), 0.0);
    }

    #[test]
    fn test_reset() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.reset();
        assert_eq!(stats.total_accesses(), 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let stats = CacheStats::new();
        stats.record_hit();

        let cloned = stats.clone();
        stats.record_hit();
        assert_eq!(stats.hits(), 2);
        assert_eq!(cloned.hits(), 1);
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(CacheStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..100 {
                        stats.record_hit();
                    }
                    for _ in 0..25 {
                        stats.record_miss();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(stats.hits(), 800);
        assert_eq!(stats.misses(), 200);
        assert!((stats.hit_rate() - 0.8).abs() < f64::EPSILON);
    }
}
