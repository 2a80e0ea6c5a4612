use crate::{CacheKey, MemoResult, Value};

/// Storage behind a memoizer.
///
/// A backend maps argument lists to previously computed results. Lookups
/// return `Ok(None)` when nothing is stored for the key, so any `R`, including
/// unit values or a cached `Value::Undefined`, can be memoized unambiguously.
///
/// `get` takes `&mut self` because lookups may reorder entries (the LRU
/// backend promotes on every hit). Both `get` and `set` are fallible only for
/// backends that serialize keys.
///
/// # Examples
///
/// ```
/// use memora_core::{CacheBackend, HashCache, Value};
///
/// let mut cache: HashCache<u32> = HashCache::new();
/// cache.set(vec![Value::from("a")], 1).unwrap();
///
/// assert_eq!(cache.get(&[Value::from("a")]).unwrap(), Some(1));
/// assert_eq!(cache.get(&[Value::from("b")]).unwrap(), None);
/// assert_eq!(cache.entries(), vec![1]);
/// ```
pub trait CacheBackend<R> {
    /// Looks up the value stored for `key`.
    fn get(&mut self, key: &[Value]) -> MemoResult<Option<R>>;

    /// Stores `value` for `key`.
    fn set(&mut self, key: CacheKey, value: R) -> MemoResult<()>;

    /// Stored values, in the backend's natural order.
    fn entries(&self) -> Vec<R>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every stored entry.
    fn clear(&mut self);
}

impl<R, B: CacheBackend<R> + ?Sized> CacheBackend<R> for Box<B> {
    fn get(&mut self, key: &[Value]) -> MemoResult<Option<R>> {
        (**self).get(key)
    }

    fn set(&mut self, key: CacheKey, value: R) -> MemoResult<()> {
        (**self).set(key, value)
    }

    fn entries(&self) -> Vec<R> {
        (**self).entries()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}
