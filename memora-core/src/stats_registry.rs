//! Process-wide statistics of named memoizers.
//!
//! Memoizers built with a name (`MemoizeOptions::name`, or any `#[memoize]`
//! function) register their [`CacheStats`] here, so hit rates can be queried
//! without a handle to the memoizer itself. Registering a name twice returns
//! the counters already registered: every thread-local instance of a
//! `#[memoize]` function reports into the same entry.
//!
//! ```
//! use memora_core::stats_registry;
//!
//! let stats = stats_registry::get_or_register("doc_lookup");
//! stats.record_miss();
//!
//! assert_eq!(stats_registry::get("doc_lookup").map(|s| s.misses()), Some(1));
//! assert!(stats_registry::list().contains(&"doc_lookup".to_string()));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::CacheStats;

static STATS_REGISTRY: Lazy<RwLock<HashMap<String, Arc<CacheStats>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers `stats` under `name`, replacing any previous entry.
pub fn register(name: &str, stats: Arc<CacheStats>) {
    STATS_REGISTRY.write().insert(name.to_string(), stats);
    tracing::debug!(name, "registered cache statistics");
}

/// Returns the counters registered under `name`, registering fresh ones if
/// there are none.
pub fn get_or_register(name: &str) -> Arc<CacheStats> {
    if let Some(stats) = STATS_REGISTRY.read().get(name) {
        return Arc::clone(stats);
    }

    let mut registry = STATS_REGISTRY.write();
    let stats = registry.entry(name.to_string()).or_insert_with(|| {
        tracing::debug!(name, "registered cache statistics");
        Arc::new(CacheStats::new())
    });
    Arc::clone(stats)
}

/// Live counters registered under `name`.
pub fn get(name: &str) -> Option<Arc<CacheStats>> {
    STATS_REGISTRY.read().get(name).cloned()
}

/// Names of all registered memoizers, in no particular order.
pub fn list() -> Vec<String> {
    STATS_REGISTRY.read().keys().cloned().collect()
}

/// Zeroes the counters registered under `name`. Returns `false` if the name
/// is unknown.
pub fn reset(name: &str) -> bool {
    match STATS_REGISTRY.read().get(name) {
        Some(stats) => {
            stats.reset();
            true
        }
        None => false,
    }
}

/// Forgets every registration. Counters held by live memoizers keep counting
/// but are no longer reachable by name.
pub fn clear() {
    STATS_REGISTRY.write().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_register_and_get() {
        let stats = Arc::new(CacheStats::new());
        register("registry_test_fn", Arc::clone(&stats));
        stats.record_hit();

        let found = get("registry_test_fn").unwrap();
        assert_eq!(found.hits(), 1);
        assert!(Arc::ptr_eq(&found, &stats));
    }

    #[test]
    #[serial]
    fn test_get_or_register_shares_counters() {
        let first = get_or_register("registry_shared");
        let second = get_or_register("registry_shared");
        first.record_miss();
        assert_eq!(second.misses(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    #[serial]
    fn test_list() {
        clear();
        get_or_register("fn1");
        get_or_register("fn2");

        let mut names = list();
        names.sort();
        assert_eq!(names, vec!["fn1".to_string(), "fn2".to_string()]);
    }

    #[test]
    #[serial]
    fn test_reset() {
        let stats = get_or_register("registry_reset");
        stats.record_hit();
        stats.record_hit();

        assert!(reset("registry_reset"));
        assert_eq!(stats.hits(), 0);
        assert!(!reset("registry_nonexistent"));
    }

    #[test]
    #[serial]
    fn test_clear() {
        get_or_register("registry_clear");
        assert!(!list().is_empty());

        clear();
        assert!(list().is_empty());
        assert!(get("registry_clear").is_none());
    }
}
