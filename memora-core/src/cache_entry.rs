use crate::{KeyComparator, Value};

/// Positional call arguments identifying a memoized call.
pub type CacheKey = Vec<Value>;

/// A stored key paired with the result computed for it.
///
/// Entries are owned by the backend that created them; `entries()` hands
/// out clones of the values, never the entries themselves.
///
/// # Examples
///
/// ```
/// use memora_core::{strict_equal, CacheEntry, KeyComparator, Value};
///
/// let comparator = KeyComparator::new(strict_equal);
/// let entry = CacheEntry::new(vec![Value::from("page"), Value::from(2)], 42);
///
/// assert_eq!(entry.value, 42);
/// assert!(entry.matches(&comparator, &[Value::from("page"), Value::from(2)]));
/// assert!(!entry.matches(&comparator, &[Value::from("page")]));
/// ```
#[derive(Clone, Debug)]
pub struct CacheEntry<R> {
    pub key: CacheKey,
    pub value: R,
}

impl<R> CacheEntry<R> {
    pub fn new(key: CacheKey, value: R) -> Self {
        Self { key, value }
    }

    /// Returns `true` if `key` is equal to this entry's key under `comparator`.
    pub fn matches(&self, comparator: &KeyComparator, key: &[Value]) -> bool {
        comparator.compare(Some(self.key.as_slice()), Some(key))
    }
}
