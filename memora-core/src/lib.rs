//! # Memora Core
//!
//! Core types of the Memora memoization library: the argument value model,
//! key derivation, cache backends and the memoizer that ties them together.
//!
//! ## Features
//!
//! - **Hash-based caching**: keys are serialized and folded into a 32-bit hash
//! - **Equality-based caching**: keys are compared with an injected predicate
//!   (strict, shallow, deep with optional depth, or your own)
//! - **Bounded LRU**: equality-based caches with a size evict the least
//!   recently used entry
//! - **Pluggable backends**: any [`CacheFactory`] can supply the storage
//! - **Statistics**: optional hit/miss monitoring (`stats` feature)
//!
//! ## Module Organization
//!
//! - [`value`] - Dynamically typed argument values and [`ToValue`]
//! - [`equality`] - Comparison predicates for equality-based caches
//! - [`hasher`] - Key serialization and the rolling hash
//! - [`memoizer`] - Configuration, [`compute_or_fetch`] and [`Memoized`]
//!
//! ## Example
//!
//! ```
//! use memora_core::{memoize_unary, EqualityOptions, MemoizeOptions, Value};
//!
//! let describe = memoize_unary(
//!     |params: &Value| format!("{} fields", params.get("fields").map_or(0.0, |f| f.as_f64().unwrap_or(0.0))),
//!     MemoizeOptions::new().equality(EqualityOptions::deep().with_size(8)),
//! )
//! .unwrap();
//!
//! let params = Value::object([("fields", Value::from(3))]);
//! assert_eq!(describe.call_one(params).unwrap(), "3 fields");
//! ```

mod assert;
mod backend;
mod cache_entry;
mod comparator;
mod error;
mod factory;
mod fn_cache;
mod hash_cache;
mod lru_cache;
mod single_value_cache;

pub mod equality;
pub mod hasher;
pub mod memoizer;
pub mod value;

#[cfg(feature = "stats")]
mod stats;

#[cfg(feature = "stats")]
pub mod stats_registry;

pub use assert::assert_required_args;
pub use backend::CacheBackend;
pub use cache_entry::{CacheEntry, CacheKey};
pub use comparator::KeyComparator;
pub use equality::{deep_equal, shallow_equal, strict_equal, EqualityFn};
pub use error::{MemoError, MemoResult};
pub use factory::{CacheFactory, EqualityCacheFactory, EqualityOptions, HashCacheFactory};
pub use fn_cache::FnCache;
pub use hash_cache::HashCache;
pub use hasher::{fold_hash, hash_key, serialize_key, KeyForm};
pub use lru_cache::LruCache;
pub use memoizer::{
    compute_or_fetch, memoize, memoize_unary, memoize_variadic, memoize_with, Arity, ArityKeys,
    CacheStrategy, Fetched, KeyStrategy, MemoFn, MemoizeOptions, Memoized,
};
pub use single_value_cache::SingleValueCache;
pub use value::{Callable, ToValue, Value};

#[cfg(feature = "stats")]
pub use stats::CacheStats;
