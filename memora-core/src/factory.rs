use std::fmt;
use std::sync::Arc;

use crate::{
    deep_equal, shallow_equal, strict_equal, CacheBackend, EqualityFn, HashCache, KeyComparator,
    LruCache, SingleValueCache, Value,
};

/// Builds a fresh, empty backend for each memoized function.
///
/// Any `Fn() -> Box<dyn CacheBackend<R>>` closure is a factory, which makes
/// custom backends easy to plug in:
///
/// ```
/// use memora_core::{CacheBackend, CacheFactory, HashCache};
///
/// let factory = || Box::new(HashCache::<u64>::new()) as Box<dyn CacheBackend<u64>>;
/// assert!(factory.create().is_empty());
/// ```
pub trait CacheFactory<R> {
    fn create(&self) -> Box<dyn CacheBackend<R>>;
}

impl<R, F> CacheFactory<R> for F
where
    F: Fn() -> Box<dyn CacheBackend<R>>,
{
    fn create(&self) -> Box<dyn CacheBackend<R>> {
        self()
    }
}

/// Creates [`HashCache`] backends.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashCacheFactory;

impl<R: Clone + 'static> CacheFactory<R> for HashCacheFactory {
    fn create(&self) -> Box<dyn CacheBackend<R>> {
        Box::new(HashCache::new())
    }
}

/// Configuration of an equality-based cache: the argument predicate and an
/// optional bound.
///
/// With a `size` the cache is an [`LruCache`] of that many entries; without
/// one (or with a size of zero) it is a [`SingleValueCache`].
///
/// # Examples
///
/// ```
/// use memora_core::{EqualityOptions, Value};
///
/// let options = EqualityOptions::deep_with_depth(2).with_size(16);
/// assert_eq!(options.size, Some(16));
/// assert!((options.func)(&Value::from(1), &Value::from(1)));
/// ```
#[derive(Clone)]
pub struct EqualityOptions {
    pub func: EqualityFn,
    pub size: Option<usize>,
}

impl EqualityOptions {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + 'static,
    {
        Self {
            func: Arc::new(func),
            size: None,
        }
    }

    pub fn strict() -> Self {
        Self::new(strict_equal)
    }

    pub fn shallow() -> Self {
        Self::new(shallow_equal)
    }

    /// Unbounded deep comparison.
    pub fn deep() -> Self {
        Self::new(|a: &Value, b: &Value| deep_equal(a, b, None))
    }

    pub fn deep_with_depth(depth: usize) -> Self {
        Self::new(move |a: &Value, b: &Value| deep_equal(a, b, Some(depth)))
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn comparator(&self) -> KeyComparator {
        KeyComparator::from_shared(Arc::clone(&self.func))
    }
}

impl fmt::Debug for EqualityOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EqualityOptions")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Creates equality-based backends from [`EqualityOptions`].
#[derive(Clone, Debug)]
pub struct EqualityCacheFactory {
    options: EqualityOptions,
}

impl EqualityCacheFactory {
    pub fn new(options: EqualityOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EqualityOptions {
        &self.options
    }
}

impl<R: Clone + 'static> CacheFactory<R> for EqualityCacheFactory {
    fn create(&self) -> Box<dyn CacheBackend<R>> {
        let comparator = self.options.comparator();
        match self.options.size {
            Some(size) if size > 0 => Box::new(LruCache::new(comparator, size)),
            _ => Box::new(SingleValueCache::new(comparator)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: i32) -> Vec<Value> {
        vec![Value::from(n)]
    }

    #[test]
    fn test_hash_factory_creates_fresh_caches() {
        let factory = HashCacheFactory;
        let mut first: Box<dyn CacheBackend<i32>> = factory.create();
        first.set(key(1), 1).unwrap();

        let second: Box<dyn CacheBackend<i32>> = factory.create();
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_equality_factory_without_size_is_single_slot() {
        let factory = EqualityCacheFactory::new(EqualityOptions::strict());
        let mut cache: Box<dyn CacheBackend<i32>> = factory.create();
        cache.set(key(1), 1).unwrap();
        cache.set(key(2), 2).unwrap();
        assert_eq!(cache.entries(), vec![2]);
    }

    #[test]
    fn test_equality_factory_with_size_is_lru() {
        let factory = EqualityCacheFactory::new(EqualityOptions::shallow().with_size(2));
        let mut cache: Box<dyn CacheBackend<i32>> = factory.create();
        for n in 1..=3 {
            cache.set(key(n), n).unwrap();
        }
        assert_eq!(cache.entries(), vec![3, 2]);
        assert_eq!(cache.get(&key(1)).unwrap(), None);
    }

    #[test]
    fn test_zero_size_is_single_slot() {
        let factory = EqualityCacheFactory::new(EqualityOptions::strict().with_size(0));
        let mut cache: Box<dyn CacheBackend<i32>> = factory.create();
        cache.set(key(1), 1).unwrap();
        cache.set(key(2), 2).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_closure_factory() {
        let factory = || -> Box<dyn CacheBackend<&'static str>> {
            Box::new(LruCache::new(KeyComparator::new(strict_equal), 5))
        };
        let mut cache = factory.create();
        cache.set(key(1), "one").unwrap();
        assert_eq!(cache.get(&key(1)).unwrap(), Some("one"));
    }

    #[test]
    fn test_presets() {
        let a = Value::from(serde_json::json!({"x": {"y": 1}}));
        let b = Value::from(serde_json::json!({"x": {"y": 2}}));
        assert!(!(EqualityOptions::strict().func)(&a, &b));
        assert!(!(EqualityOptions::shallow().func)(&a, &b));
        assert!(!(EqualityOptions::deep().func)(&a, &b));
        assert!((EqualityOptions::deep_with_depth(1).func)(&a, &b));
    }
}
