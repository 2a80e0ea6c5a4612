use std::fmt;
use std::sync::Arc;

use crate::{EqualityFn, Value};

/// Compares whole argument lists with an injected element predicate.
///
/// This is the lookup predicate of the equality-based backends
/// ([`SingleValueCache`](crate::SingleValueCache) and
/// [`LruCache`](crate::LruCache)). Two keys are equal when both are present,
/// have the same length, and `equals` holds for every positional pair.
///
/// # Examples
///
/// ```
/// use memora_core::{shallow_equal, KeyComparator, Value};
///
/// let comparator = KeyComparator::new(shallow_equal);
/// let prev = [Value::from(1), Value::from("a")];
///
/// assert!(comparator.compare(Some(&prev[..]), Some(&[Value::from(1), Value::from("a")][..])));
/// assert!(!comparator.compare(Some(&prev[..]), Some(&[Value::from(1)][..])));
/// assert!(!comparator.compare(None, Some(&prev[..])));
/// ```
#[derive(Clone)]
pub struct KeyComparator {
    equals: EqualityFn,
}

impl KeyComparator {
    pub fn new<F>(equals: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + 'static,
    {
        Self {
            equals: Arc::new(equals),
        }
    }

    /// Wraps an already shared predicate.
    pub fn from_shared(equals: EqualityFn) -> Self {
        Self { equals }
    }

    /// Compares two keys. An absent key never equals anything, not even
    /// another absent key.
    pub fn compare(&self, prev: Option<&[Value]>, next: Option<&[Value]>) -> bool {
        match (prev, next) {
            (Some(prev), Some(next)) => {
                prev.len() == next.len()
                    && prev
                        .iter()
                        .zip(next.iter())
                        .all(|(a, b)| (self.equals)(a, b))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for KeyComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyComparator").finish_non_exhaustive()
    }
}
