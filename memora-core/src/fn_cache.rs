use std::cell::RefCell;
use std::fmt;

#[cfg(feature = "stats")]
use std::sync::Arc;

use crate::{compute_or_fetch, CacheBackend, CacheKey, CacheStrategy, MemoResult};

#[cfg(feature = "stats")]
use crate::{stats_registry, CacheStats};

/// Cache storage behind a `#[memoize]` function.
///
/// The macro declares one `FnCache` per annotated function inside a
/// `thread_local!`, so each thread memoizes independently. Statistics are
/// registered under the function's name and shared by all threads.
///
/// # Examples
///
/// ```
/// use memora_core::{CacheStrategy, FnCache, ToValue};
///
/// thread_local! {
///     static SQUARES: FnCache<u64> = FnCache::new("squares", CacheStrategy::Hash);
/// }
///
/// fn square(n: u64) -> u64 {
///     SQUARES.with(|cache| cache.call(vec![n.to_value()], || n * n))
/// }
///
/// assert_eq!(square(12), 144);
/// assert_eq!(square(12), 144);
/// assert_eq!(SQUARES.with(|cache| cache.len()), 1);
/// ```
pub struct FnCache<R> {
    name: &'static str,
    cache: RefCell<Box<dyn CacheBackend<R>>>,
    #[cfg(feature = "stats")]
    stats: Arc<CacheStats>,
}

impl<R: Clone + 'static> FnCache<R> {
    pub fn new(name: &'static str, strategy: CacheStrategy<R>) -> Self {
        tracing::debug!(name, strategy = strategy.label(), "created function cache");
        Self {
            name,
            cache: RefCell::new(strategy.create()),
            #[cfg(feature = "stats")]
            stats: stats_registry::get_or_register(name),
        }
    }

    /// Returns the cached result for `key`, running `compute` on a miss.
    ///
    /// # Panics
    ///
    /// Panics if the key cannot be serialized. Annotated functions have no
    /// error channel for it; use [`try_call`](Self::try_call) to handle it.
    pub fn call<F>(&self, key: CacheKey, compute: F) -> R
    where
        F: FnOnce() -> R,
    {
        match self.try_call(key, compute) {
            Ok(value) => value,
            Err(err) => panic!("memoized function `{}` failed: {}", self.name, err),
        }
    }

    pub fn try_call<F>(&self, key: CacheKey, compute: F) -> MemoResult<R>
    where
        F: FnOnce() -> R,
    {
        let fetched = compute_or_fetch(&self.cache, key, |_| compute())?;

        #[cfg(feature = "stats")]
        self.stats.record(&fetched);

        Ok(fetched.into_inner())
    }

    pub fn entries(&self) -> Vec<R> {
        self.cache.borrow().entries()
    }
}

impl<R> FnCache<R> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl<R> fmt::Debug for FnCache<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCache")
            .field("name", &self.name)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EqualityOptions, Value};
    use serial_test::serial;
    use std::cell::Cell;

    #[test]
    #[serial]
    fn test_call_caches_by_key() {
        let cache = FnCache::new("fn_cache_by_key", CacheStrategy::Hash);
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            "value".to_string()
        };

        assert_eq!(cache.call(vec![Value::from(1)], compute), "value");
        assert_eq!(cache.call(vec![Value::from(1)], compute), "value");
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.name(), "fn_cache_by_key");
    }

    #[test]
    #[serial]
    fn test_equality_strategy() {
        let cache = FnCache::new(
            "fn_cache_lru",
            CacheStrategy::Equality(EqualityOptions::deep().with_size(2)),
        );
        for n in 0..3 {
            cache.call(vec![Value::array([Value::from(n)])], || n);
        }
        assert_eq!(cache.entries(), vec![2, 1]);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[cfg(feature = "stats")]
    #[test]
    #[serial]
    fn test_stats_are_registered_by_name() {
        let cache = FnCache::new("fn_cache_stats", CacheStrategy::Hash);
        crate::stats_registry::reset("fn_cache_stats");

        cache.call(vec![Value::from("k")], || 1);
        cache.call(vec![Value::from("k")], || 1);

        let stats = crate::stats_registry::get("fn_cache_stats").unwrap();
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 1);
    }
}
