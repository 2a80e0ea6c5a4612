use std::collections::HashMap;

use crate::hasher::hash_key;
use crate::{CacheBackend, CacheKey, MemoResult, Value};

/// Unbounded cache indexed by the 32-bit hash of the serialized key.
///
/// Keys that serialize to the same string, or whose strings collide under the
/// hash, share a slot: the later `set` overwrites the earlier value. This is an
/// accepted approximation traded for constant-time lookups.
///
/// `entries()` returns values in first-insertion order of their slots.
///
/// # Examples
///
/// ```
/// use memora_core::{CacheBackend, HashCache, Value};
///
/// let mut cache = HashCache::new();
/// cache.set(vec![Value::from(1), Value::from("x")], "first").unwrap();
///
/// // A structurally equal key hits, whatever its identity
/// assert_eq!(cache.get(&[Value::from(1), Value::from("x")]).unwrap(), Some("first"));
/// ```
#[derive(Clone, Debug)]
pub struct HashCache<R> {
    map: HashMap<i32, R>,
    order: Vec<i32>,
}

impl<R> HashCache<R> {
    /// Creates an empty cache.
    ///
    /// ```
    /// use memora_core::{CacheBackend, HashCache};
    ///
    /// let cache: HashCache<u32> = HashCache::new();
    /// assert!(cache.is_empty());
    /// assert!(cache.entries().is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<R> Default for HashCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone> CacheBackend<R> for HashCache<R> {
    fn get(&mut self, key: &[Value]) -> MemoResult<Option<R>> {
        let hash = hash_key(key)?;
        Ok(self.map.get(&hash).cloned())
    }

    fn set(&mut self, key: CacheKey, value: R) -> MemoResult<()> {
        let hash = hash_key(&key)?;
        if self.map.insert(hash, value).is_none() {
            self.order.push(hash);
        }
        Ok(())
    }

    fn entries(&self) -> Vec<R> {
        self.order
            .iter()
            .filter_map(|hash| self.map.get(hash).cloned())
            .collect()
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_miss_on_empty() {
        let mut cache: HashCache<i32> = HashCache::new();
        assert_eq!(cache.get(&[Value::from(1)]).unwrap(), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let mut cache = HashCache::new();
        cache.set(vec![Value::from("a"), Value::from("b")], 7).unwrap();
        assert_eq!(cache.get(&[Value::from("a"), Value::from("b")]).unwrap(), Some(7));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_structural_keys_share_a_slot() {
        let mut cache = HashCache::new();
        cache
            .set(vec![Value::from(json!({"page": 1, "size": 10}))], "page one")
            .unwrap();
        // A fresh object with the same contents serializes identically
        let probe = [Value::from(json!({"page": 1, "size": 10}))];
        assert_eq!(cache.get(&probe).unwrap(), Some("page one"));
    }

    #[test]
    fn test_nullish_values_are_stored() {
        let mut cache = HashCache::new();
        cache.set(vec![Value::from(1)], Value::Undefined).unwrap();
        cache.set(vec![Value::from(2)], Value::Null).unwrap();
        assert_eq!(cache.get(&[Value::from(1)]).unwrap(), Some(Value::Undefined));
        assert_eq!(cache.get(&[Value::from(2)]).unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_overwrite_keeps_first_insertion_order() {
        let mut cache = HashCache::new();
        cache.set(vec![Value::from("x")], 1).unwrap();
        cache.set(vec![Value::from("y")], 2).unwrap();
        cache.set(vec![Value::from("x")], 3).unwrap();
        assert_eq!(cache.entries(), vec![3, 2]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_colliding_serializations_overwrite() {
        let mut cache = HashCache::new();
        cache.set(vec![Value::from("a,b")], "joined").unwrap();
        cache.set(vec![Value::from("a"), Value::from("b")], "split").unwrap();
        assert_eq!(cache.get(&[Value::from("a,b")]).unwrap(), Some("split"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = HashCache::new();
        cache.set(vec![Value::from(1)], 1).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.entries().is_empty());
        assert_eq!(cache.get(&[Value::from(1)]).unwrap(), None);
    }
}
