use crate::{CacheBackend, CacheEntry, CacheKey, KeyComparator, MemoResult, Value};

/// Remembers only the most recent call.
///
/// A lookup hits when the stored key equals the probe under the injected
/// comparator; every `set` replaces the stored entry.
///
/// # Examples
///
/// ```
/// use memora_core::{shallow_equal, CacheBackend, KeyComparator, SingleValueCache, Value};
///
/// let mut cache = SingleValueCache::new(KeyComparator::new(shallow_equal));
/// cache.set(vec![Value::from(1)], "one").unwrap();
/// cache.set(vec![Value::from(2)], "two").unwrap();
///
/// assert_eq!(cache.get(&[Value::from(1)]).unwrap(), None);
/// assert_eq!(cache.get(&[Value::from(2)]).unwrap(), Some("two"));
/// ```
#[derive(Clone, Debug)]
pub struct SingleValueCache<R> {
    comparator: KeyComparator,
    entry: Option<CacheEntry<R>>,
}

impl<R> SingleValueCache<R> {
    pub fn new(comparator: KeyComparator) -> Self {
        Self {
            comparator,
            entry: None,
        }
    }
}

impl<R: Clone> CacheBackend<R> for SingleValueCache<R> {
    fn get(&mut self, key: &[Value]) -> MemoResult<Option<R>> {
        Ok(self
            .entry
            .as_ref()
            .filter(|entry| entry.matches(&self.comparator, key))
            .map(|entry| entry.value.clone()))
    }

    fn set(&mut self, key: CacheKey, value: R) -> MemoResult<()> {
        self.entry = Some(CacheEntry::new(key, value));
        Ok(())
    }

    fn entries(&self) -> Vec<R> {
        self.entry
            .iter()
            .map(|entry| entry.value.clone())
            .collect()
    }

    fn len(&self) -> usize {
        usize::from(self.entry.is_some())
    }

    fn clear(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{deep_equal, strict_equal};
    use serde_json::json;

    #[test]
    fn test_empty_cache_misses() {
        let mut cache: SingleValueCache<i32> = SingleValueCache::new(KeyComparator::new(strict_equal));
        assert_eq!(cache.get(&[]).unwrap(), None);
        assert!(cache.entries().is_empty());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_latest_call_wins() {
        let mut cache = SingleValueCache::new(KeyComparator::new(strict_equal));
        cache.set(vec![Value::from("a")], 1).unwrap();
        assert_eq!(cache.get(&[Value::from("a")]).unwrap(), Some(1));

        cache.set(vec![Value::from("b")], 2).unwrap();
        assert_eq!(cache.get(&[Value::from("a")]).unwrap(), None);
        assert_eq!(cache.entries(), vec![2]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_comparator_decides_hits() {
        let mut strict = SingleValueCache::new(KeyComparator::new(strict_equal));
        let mut deep = SingleValueCache::new(KeyComparator::new(|a: &Value, b: &Value| {
            deep_equal(a, b, None)
        }));

        strict.set(vec![Value::from(json!({"id": 1}))], "x").unwrap();
        deep.set(vec![Value::from(json!({"id": 1}))], "x").unwrap();

        let probe = [Value::from(json!({"id": 1}))];
        assert_eq!(strict.get(&probe).unwrap(), None);
        assert_eq!(deep.get(&probe).unwrap(), Some("x"));
    }

    #[test]
    fn test_argument_count_must_match() {
        let mut cache = SingleValueCache::new(KeyComparator::new(strict_equal));
        cache.set(vec![Value::from(1)], 1).unwrap();
        assert_eq!(cache.get(&[Value::from(1), Value::Undefined]).unwrap(), None);
    }

    #[test]
    fn test_clear() {
        let mut cache = SingleValueCache::new(KeyComparator::new(strict_equal));
        cache.set(vec![Value::from(1)], 1).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&[Value::from(1)]).unwrap(), None);
    }
}
