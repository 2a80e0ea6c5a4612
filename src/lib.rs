//! # Memora
//!
//! In-process memoization for Rust: wrap an expensive function and let a
//! cache answer repeated calls.
//!
//! ## Features
//!
//! - **Attribute macro**: add `#[memoize]` to a function or method
//! - **Runtime memoizers**: wrap closures with [`memoize_unary`] or [`memoize_variadic`]
//! - **Three backends**: hash-keyed ([`HashCache`]), last-call ([`SingleValueCache`])
//!   and bounded least-recently-used ([`LruCache`])
//! - **Injected equality**: strict, shallow, deep with an optional depth, or custom
//! - **Statistics**: hit/miss counters per named memoizer (`stats` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use memora::memoize;
//!
//! #[memoize]
//! fn fibonacci(n: u32) -> u64 {
//!     if n <= 1 {
//!         return n as u64;
//!     }
//!     fibonacci(n - 1) + fibonacci(n - 2)
//! }
//!
//! assert_eq!(fibonacci(50), 12_586_269_025);
//! ```
//!
//! ## Equality-Based Caching
//!
//! Hashing serializes every key. When arguments are large structures that
//! should compare by content, pick an equality and, optionally, a bound:
//!
//! ```rust
//! use memora::{memoize, Value};
//!
//! #[memoize(equality = "deep", size = 16)]
//! fn field_count(params: Value) -> usize {
//!     match params {
//!         Value::Object(fields) => fields.len(),
//!         _ => 0,
//!     }
//! }
//!
//! let params = Value::object([("page", Value::from(1)), ("size", Value::from(20))]);
//! assert_eq!(field_count(params), 2);
//! ```
//!
//! ## Runtime Memoizers
//!
//! ```rust
//! use memora::{memoize_variadic, EqualityOptions, MemoError, MemoizeOptions, Value};
//!
//! let join = memoize_variadic(
//!     |args: &[Value]| args.iter().map(ToString::to_string).collect::<Vec<_>>().join("-"),
//!     MemoizeOptions::new().required_args(1),
//! )
//! .unwrap();
//!
//! assert_eq!(join.call(&[Value::from("a"), Value::from(1)]).unwrap(), "a-1");
//! assert!(matches!(join.call(&[]), Err(MemoError::ArgumentCount { .. })));
//!
//! // Only one backend option may be chosen
//! let conflicting = memoize_variadic(
//!     |args: &[Value]| args.len(),
//!     MemoizeOptions::new().equality(EqualityOptions::strict()).hash(true),
//! );
//! assert!(matches!(conflicting, Err(MemoError::Configuration { .. })));
//! ```
//!
//! ## Methods
//!
//! The receiver becomes part of the key, so it must implement [`ToValue`]:
//!
//! ```rust
//! use memora::{memoize, ToValue, Value};
//!
//! struct Rate {
//!     percent: u32,
//! }
//!
//! impl ToValue for Rate {
//!     fn to_value(&self) -> Value {
//!         Value::object([("percent", self.percent.to_value())])
//!     }
//! }
//!
//! impl Rate {
//!     #[memoize(equality = "shallow", size = 4)]
//!     fn apply(&self, amount: u64) -> u64 {
//!         amount * u64::from(self.percent) / 100
//!     }
//! }
//!
//! assert_eq!(Rate { percent: 15 }.apply(200), 30);
//! ```

pub use memora_core::*;
pub use memora_macros::memoize;

// Items referenced by code that `#[memoize]` generates. Not a public API.
#[doc(hidden)]
pub mod internal {
    pub use memora_core::{CacheKey, CacheStrategy, EqualityOptions, FnCache, ToValue};
}
