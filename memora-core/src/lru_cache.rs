use std::collections::VecDeque;

use crate::{CacheBackend, CacheEntry, CacheKey, KeyComparator, MemoResult, Value};

/// Bounded cache with least-recently-used eviction.
///
/// Entries are kept most-recently-used first and looked up by a linear scan
/// with the injected comparator, so keys need neither hashing nor ordering.
/// This suits the small bounds (tens of entries) the cache is meant for.
///
/// - A hit moves the matched entry to the front; the others keep their
///   relative order.
/// - `set` on a key that already matches an entry does not update the value;
///   it only promotes the existing entry (the lookup counts as a use).
/// - When full, `set` evicts the last entry before inserting at the front.
///
/// # Examples
///
/// ```
/// use memora_core::{strict_equal, CacheBackend, KeyComparator, LruCache, Value};
///
/// let mut cache = LruCache::new(KeyComparator::new(strict_equal), 2);
/// cache.set(vec![Value::from("a")], 1).unwrap();
/// cache.set(vec![Value::from("b")], 2).unwrap();
///
/// // "a" becomes the most recently used, so "b" is evicted next
/// assert_eq!(cache.get(&[Value::from("a")]).unwrap(), Some(1));
/// cache.set(vec![Value::from("c")], 3).unwrap();
///
/// assert_eq!(cache.get(&[Value::from("b")]).unwrap(), None);
/// assert_eq!(cache.entries(), vec![3, 1]);
/// ```
#[derive(Clone, Debug)]
pub struct LruCache<R> {
    comparator: KeyComparator,
    capacity: usize,
    entries: VecDeque<CacheEntry<R>>,
}

impl<R> LruCache<R> {
    /// Creates an empty cache holding at most `size` entries. A size of zero
    /// is raised to one.
    pub fn new(comparator: KeyComparator, size: usize) -> Self {
        let capacity = size.max(1);
        Self {
            comparator,
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Finds the entry matching `key` and moves it to the front.
    fn promote(&mut self, key: &[Value]) -> Option<&CacheEntry<R>> {
        let pos = self
            .entries
            .iter()
            .position(|entry| entry.matches(&self.comparator, key))?;
        if pos > 0 {
            let entry = self.entries.remove(pos)?;
            self.entries.push_front(entry);
        }
        self.entries.front()
    }
}

impl<R: Clone> CacheBackend<R> for LruCache<R> {
    fn get(&mut self, key: &[Value]) -> MemoResult<Option<R>> {
        Ok(self.promote(key).map(|entry| entry.value.clone()))
    }

    fn set(&mut self, key: CacheKey, value: R) -> MemoResult<()> {
        if self.promote(&key).is_some() {
            return Ok(());
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_back();
            tracing::debug!(capacity = self.capacity, "evicted least recently used entry");
        }
        self.entries.push_front(CacheEntry::new(key, value));
        Ok(())
    }

    fn entries(&self) -> Vec<R> {
        self.entries.iter().map(|entry| entry.value.clone()).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{deep_equal, strict_equal};
    use proptest::prelude::*;
    use serde_json::json;

    fn key(name: &str) -> CacheKey {
        vec![Value::from(name)]
    }

    fn strict_cache<R>(size: usize) -> LruCache<R> {
        LruCache::new(KeyComparator::new(strict_equal), size)
    }

    #[test]
    fn test_capacity_bound() {
        let mut cache = strict_cache(2);
        cache.set(key("A"), 1).unwrap();
        cache.set(key("B"), 2).unwrap();
        cache.set(key("C"), 3).unwrap();

        assert_eq!(cache.get(&key("A")).unwrap(), None);
        assert_eq!(cache.get(&key("B")).unwrap(), Some(2));
        assert_eq!(cache.get(&key("C")).unwrap(), Some(3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_promotion_changes_eviction_victim() {
        let mut cache = strict_cache(2);
        cache.set(key("B"), 2).unwrap();
        cache.set(key("A"), 1).unwrap();
        assert_eq!(cache.entries(), vec![1, 2]);

        assert_eq!(cache.get(&key("B")).unwrap(), Some(2));
        cache.set(key("C"), 3).unwrap();

        assert_eq!(cache.get(&key("A")).unwrap(), None);
        assert_eq!(cache.get(&key("B")).unwrap(), Some(2));
    }

    #[test]
    fn test_promotion_keeps_relative_order() {
        let mut cache = strict_cache(4);
        for (i, name) in ["A", "B", "C", "D"].iter().enumerate() {
            cache.set(key(name), i).unwrap();
        }
        assert_eq!(cache.entries(), vec![3, 2, 1, 0]);

        cache.get(&key("B")).unwrap();
        assert_eq!(cache.entries(), vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_set_on_existing_key_is_a_noop() {
        let mut cache = strict_cache(3);
        cache.set(key("A"), 1).unwrap();
        cache.set(key("B"), 2).unwrap();
        cache.set(key("A"), 100).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key("A")).unwrap(), Some(1));
        // The ignored set still counted as a use of "A"
        assert_eq!(cache.entries(), vec![1, 2]);
    }

    #[test]
    fn test_deep_keys() {
        let mut cache = LruCache::new(
            KeyComparator::new(|a: &Value, b: &Value| deep_equal(a, b, None)),
            2,
        );
        cache
            .set(vec![Value::from(json!({"lat": 3.9855, "long": 1.98204}))], "home")
            .unwrap();
        let probe = [Value::from(json!({"long": 1.98204, "lat": 3.9855}))];
        assert_eq!(cache.get(&probe).unwrap(), Some("home"));
    }

    #[test]
    fn test_zero_size_holds_one_entry() {
        let mut cache = strict_cache(0);
        assert_eq!(cache.capacity(), 1);
        cache.set(key("A"), 1).unwrap();
        cache.set(key("B"), 2).unwrap();
        assert_eq!(cache.entries(), vec![2]);
    }

    #[test]
    fn test_clear() {
        let mut cache = strict_cache(2);
        cache.set(key("A"), 1).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key("A")).unwrap(), None);
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(
            size in 1usize..6,
            ops in prop::collection::vec((any::<bool>(), 0u8..10), 0..64),
        ) {
            let mut cache = strict_cache(size);
            for (is_set, k) in ops {
                let k = vec![Value::from(k)];
                if is_set {
                    cache.set(k, 0).unwrap();
                } else {
                    cache.get(&k).unwrap();
                }
                prop_assert!(cache.len() <= size);
            }
        }

        #[test]
        fn prop_keys_stay_unique(keys in prop::collection::vec(0u8..5, 0..32)) {
            let mut cache = strict_cache(8);
            for k in &keys {
                cache.set(vec![Value::from(*k)], *k).unwrap();
            }
            let mut stored = cache.entries();
            let before = stored.len();
            stored.sort_unstable();
            stored.dedup();
            prop_assert_eq!(stored.len(), before);
        }
    }
}
