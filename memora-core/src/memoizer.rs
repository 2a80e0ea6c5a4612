use std::cell::RefCell;
use std::fmt;

#[cfg(feature = "stats")]
use std::sync::Arc;

use crate::{
    assert_required_args, CacheBackend, CacheFactory, CacheKey, EqualityCacheFactory,
    EqualityOptions, HashCacheFactory, MemoError, MemoResult, Value,
};

#[cfg(feature = "stats")]
use crate::{stats_registry, CacheStats};

/// Calling convention of a memoized function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// One parameter; that argument alone is the cache key.
    Unary,
    /// Any number of parameters; the full argument list is the cache key.
    Variadic,
}

/// The function being memoized, with its arity made explicit.
pub enum MemoFn<R> {
    Unary(Box<dyn Fn(&Value) -> R>),
    Variadic(Box<dyn Fn(&[Value]) -> R>),
}

impl<R> MemoFn<R> {
    pub fn unary<F>(func: F) -> Self
    where
        F: Fn(&Value) -> R + 'static,
    {
        MemoFn::Unary(Box::new(func))
    }

    pub fn variadic<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> R + 'static,
    {
        MemoFn::Variadic(Box::new(func))
    }

    pub fn arity(&self) -> Arity {
        match self {
            MemoFn::Unary(_) => Arity::Unary,
            MemoFn::Variadic(_) => Arity::Variadic,
        }
    }

    fn invoke(&self, args: &[Value]) -> R {
        match self {
            MemoFn::Unary(func) => func(args.first().unwrap_or(&Value::Undefined)),
            MemoFn::Variadic(func) => func(args),
        }
    }
}

impl<R> fmt::Debug for MemoFn<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MemoFn").field(&self.arity()).finish()
    }
}

/// Turns the arguments of a call into its cache key.
///
/// The default, [`ArityKeys`], keys a unary function on its first argument
/// and a variadic one on the full argument list. Any
/// `Fn(Arity, &[Value]) -> CacheKey` closure can replace it, for instance to
/// ignore a trailing context argument. The function itself still receives
/// every argument.
///
/// ```
/// use memora_core::{memoize_variadic, Arity, MemoizeOptions, Value};
///
/// let greet = memoize_variadic(
///     |args: &[Value]| format!("hello {}", args[0]),
///     MemoizeOptions::new().key_strategy(|_: Arity, args: &[Value]| args[..1].to_vec()),
/// )
/// .unwrap();
///
/// greet.call(&[Value::from("ada"), Value::from("request-1")]).unwrap();
/// greet.call(&[Value::from("ada"), Value::from("request-2")]).unwrap();
/// assert_eq!(greet.len(), 1);
/// ```
pub trait KeyStrategy {
    fn key(&self, arity: Arity, args: &[Value]) -> CacheKey;
}

impl<F> KeyStrategy for F
where
    F: Fn(Arity, &[Value]) -> CacheKey,
{
    fn key(&self, arity: Arity, args: &[Value]) -> CacheKey {
        self(arity, args)
    }
}

/// Keys on the first argument for unary functions (`Undefined` when it is
/// missing, extra arguments ignored) and on every argument otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArityKeys;

impl KeyStrategy for ArityKeys {
    fn key(&self, arity: Arity, args: &[Value]) -> CacheKey {
        match arity {
            Arity::Unary => vec![args.first().cloned().unwrap_or_default()],
            Arity::Variadic => args.to_vec(),
        }
    }
}

/// Which backend a memoizer uses.
///
/// The variants are mutually exclusive, so a memoizer built from a strategy
/// is always validly configured. See [`MemoizeOptions`] for the loose form
/// that checks exclusivity at runtime.
pub enum CacheStrategy<R> {
    /// A [`HashCache`](crate::HashCache).
    Hash,
    /// A [`SingleValueCache`](crate::SingleValueCache), or an
    /// [`LruCache`](crate::LruCache) when a size is given.
    Equality(EqualityOptions),
    /// Whatever the factory builds.
    Factory(Box<dyn CacheFactory<R>>),
}

impl<R: Clone + 'static> CacheStrategy<R> {
    pub fn factory<F>(factory: F) -> Self
    where
        F: CacheFactory<R> + 'static,
    {
        CacheStrategy::Factory(Box::new(factory))
    }

    /// Builds a fresh backend for this strategy.
    pub fn create(&self) -> Box<dyn CacheBackend<R>> {
        match self {
            CacheStrategy::Hash => HashCacheFactory.create(),
            CacheStrategy::Equality(options) => {
                EqualityCacheFactory::new(options.clone()).create()
            }
            CacheStrategy::Factory(factory) => factory.create(),
        }
    }
}

impl<R> CacheStrategy<R> {
    pub fn label(&self) -> &'static str {
        match self {
            CacheStrategy::Hash => "hash",
            CacheStrategy::Equality(options) if options.size.is_some() => "equality-lru",
            CacheStrategy::Equality(_) => "equality-single",
            CacheStrategy::Factory(_) => "factory",
        }
    }
}

impl<R> Default for CacheStrategy<R> {
    fn default() -> Self {
        CacheStrategy::Hash
    }
}

impl<R> fmt::Debug for CacheStrategy<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheStrategy::Hash => f.write_str("Hash"),
            CacheStrategy::Equality(options) => f.debug_tuple("Equality").field(options).finish(),
            CacheStrategy::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Loose memoizer configuration.
///
/// At most one of `cache_factory`, `equality` and `hash(true)` may be set;
/// [`resolve`](Self::resolve) rejects combinations. When several could
/// apply, an explicit factory wins over equality, which wins over hashing,
/// the default.
///
/// # Examples
///
/// ```
/// use memora_core::{EqualityOptions, MemoError, MemoizeOptions};
///
/// let options = MemoizeOptions::<i32>::new()
///     .equality(EqualityOptions::deep())
///     .hash(true);
///
/// match options.resolve() {
///     Err(MemoError::Configuration { conflicting }) => {
///         assert_eq!(conflicting, vec!["equality", "hash"]);
///     }
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
pub struct MemoizeOptions<R> {
    cache_factory: Option<Box<dyn CacheFactory<R>>>,
    equality: Option<EqualityOptions>,
    hash: bool,
    required_args: usize,
    name: Option<String>,
    key_strategy: Option<Box<dyn KeyStrategy>>,
}

impl<R> MemoizeOptions<R> {
    pub fn new() -> Self {
        Self {
            cache_factory: None,
            equality: None,
            hash: false,
            required_args: 0,
            name: None,
            key_strategy: None,
        }
    }

    pub fn cache_factory<F>(mut self, factory: F) -> Self
    where
        F: CacheFactory<R> + 'static,
    {
        self.cache_factory = Some(Box::new(factory));
        self
    }

    pub fn equality(mut self, options: EqualityOptions) -> Self {
        self.equality = Some(options);
        self
    }

    /// Requests the hash-based backend explicitly. `hash(false)` is the same
    /// as leaving it unset.
    pub fn hash(mut self, enabled: bool) -> Self {
        self.hash = enabled;
        self
    }

    /// Calls with fewer arguments fail with [`MemoError::ArgumentCount`].
    pub fn required_args(mut self, count: usize) -> Self {
        self.required_args = count;
        self
    }

    /// Registers the memoizer's statistics under `name`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the default [`ArityKeys`] key derivation. It combines with
    /// any backend option.
    pub fn key_strategy<K>(mut self, strategy: K) -> Self
    where
        K: KeyStrategy + 'static,
    {
        self.key_strategy = Some(Box::new(strategy));
        self
    }

    /// Checks exclusivity and picks the strategy.
    pub fn resolve(self) -> MemoResult<CacheStrategy<R>> {
        let mut conflicting = Vec::new();
        if self.cache_factory.is_some() {
            conflicting.push("cache_factory");
        }
        if self.equality.is_some() {
            conflicting.push("equality");
        }
        if self.hash {
            conflicting.push("hash");
        }
        if conflicting.len() > 1 {
            return Err(MemoError::Configuration { conflicting });
        }

        Ok(match (self.cache_factory, self.equality) {
            (Some(factory), _) => CacheStrategy::Factory(factory),
            (None, Some(options)) => CacheStrategy::Equality(options),
            (None, None) => CacheStrategy::Hash,
        })
    }
}

impl<R> Default for MemoizeOptions<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for MemoizeOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizeOptions")
            .field("cache_factory", &self.cache_factory.is_some())
            .field("equality", &self.equality)
            .field("hash", &self.hash)
            .field("required_args", &self.required_args)
            .field("name", &self.name)
            .field("key_strategy", &self.key_strategy.is_some())
            .finish()
    }
}

/// Outcome of [`compute_or_fetch`].
#[derive(Clone, Debug, PartialEq)]
pub enum Fetched<R> {
    /// The value was already cached.
    Hit(R),
    /// The value was computed and stored.
    Computed(R),
}

impl<R> Fetched<R> {
    pub fn is_hit(&self) -> bool {
        matches!(self, Fetched::Hit(_))
    }

    pub fn into_inner(self) -> R {
        match self {
            Fetched::Hit(value) | Fetched::Computed(value) => value,
        }
    }
}

/// Returns the cached value for `key`, or computes, stores and returns it.
///
/// The cache is not borrowed while `compute` runs, so `compute` may call
/// back into the same memoized function. A failing lookup returns before
/// `compute` runs and leaves the cache untouched.
///
/// ```
/// use std::cell::RefCell;
/// use memora_core::{compute_or_fetch, Fetched, HashCache, Value};
///
/// let cache = RefCell::new(HashCache::new());
/// let key = vec![Value::from(21)];
///
/// let first = compute_or_fetch(&cache, key.clone(), |args| args[0].as_f64().unwrap() * 2.0).unwrap();
/// let second = compute_or_fetch(&cache, key, |_| unreachable!()).unwrap();
///
/// assert_eq!(first, Fetched::Computed(42.0));
/// assert_eq!(second, Fetched::Hit(42.0));
/// ```
pub fn compute_or_fetch<R, B, F>(cache: &RefCell<B>, key: CacheKey, compute: F) -> MemoResult<Fetched<R>>
where
    R: Clone,
    B: CacheBackend<R> + ?Sized,
    F: FnOnce(&[Value]) -> R,
{
    let cached = cache.borrow_mut().get(&key)?;
    if let Some(value) = cached {
        tracing::trace!(args = key.len(), "cache hit");
        return Ok(Fetched::Hit(value));
    }

    tracing::trace!(args = key.len(), "cache miss");
    let value = compute(&key);
    cache.borrow_mut().set(key, value.clone())?;
    Ok(Fetched::Computed(value))
}

/// A memoized function.
///
/// Owns its backend exclusively; the backend lives as long as the
/// `Memoized` does. Single-threaded: concurrent callers would need their own
/// mutual exclusion around "check, compute, store".
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use memora_core::{memoize_variadic, EqualityOptions, MemoizeOptions, Value};
///
/// let calls = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&calls);
/// let sum = memoize_variadic(
///     move |args: &[Value]| {
///         counter.set(counter.get() + 1);
///         args.iter().filter_map(Value::as_f64).sum::<f64>()
///     },
///     MemoizeOptions::new().equality(EqualityOptions::shallow().with_size(4)),
/// )
/// .unwrap();
///
/// assert_eq!(sum.call(&[Value::from(1), Value::from(2)]).unwrap(), 3.0);
/// assert_eq!(sum.call(&[Value::from(1), Value::from(2)]).unwrap(), 3.0);
/// assert_eq!(calls.get(), 1);
/// ```
pub struct Memoized<R> {
    func: MemoFn<R>,
    keys: Box<dyn KeyStrategy>,
    cache: RefCell<Box<dyn CacheBackend<R>>>,
    required_args: usize,
    name: Option<String>,
    #[cfg(feature = "stats")]
    stats: Arc<CacheStats>,
}

impl<R: Clone + 'static> Memoized<R> {
    fn build(
        func: MemoFn<R>,
        keys: Box<dyn KeyStrategy>,
        strategy: CacheStrategy<R>,
        required_args: usize,
        name: Option<String>,
    ) -> Self {
        tracing::debug!(
            strategy = strategy.label(),
            arity = ?func.arity(),
            name = name.as_deref().unwrap_or("<anonymous>"),
            "created memoizer"
        );

        #[cfg(feature = "stats")]
        let stats = match &name {
            Some(name) => stats_registry::get_or_register(name),
            None => Arc::new(CacheStats::new()),
        };

        Self {
            cache: RefCell::new(strategy.create()),
            func,
            keys,
            required_args,
            name,
            #[cfg(feature = "stats")]
            stats,
        }
    }

    /// Calls the function through the cache.
    pub fn call(&self, args: &[Value]) -> MemoResult<R> {
        assert_required_args(self.required_args, args.len())?;
        let key = self.keys.key(self.func.arity(), args);
        let fetched = compute_or_fetch(&self.cache, key, |_| self.func.invoke(args))?;

        #[cfg(feature = "stats")]
        self.stats.record(&fetched);

        Ok(fetched.into_inner())
    }

    /// Calls with a single argument.
    pub fn call_one(&self, arg: Value) -> MemoResult<R> {
        self.call(std::slice::from_ref(&arg))
    }

    /// Cached values, in the backend's order.
    pub fn entries(&self) -> Vec<R> {
        self.cache.borrow().entries()
    }
}

impl<R> Memoized<R> {
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    pub fn arity(&self) -> Arity {
        self.func.arity()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Hit/miss counters. Memoizers registered under the same name share them.
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<R> fmt::Debug for Memoized<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("arity", &self.func.arity())
            .field("name", &self.name)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Wraps `func` with a cache chosen from `options`.
///
/// Fails with [`MemoError::Configuration`] before anything is cached when
/// more than one backend option is set.
pub fn memoize<R: Clone + 'static>(
    func: MemoFn<R>,
    mut options: MemoizeOptions<R>,
) -> MemoResult<Memoized<R>> {
    let required_args = options.required_args;
    let name = options.name.take();
    let keys = options
        .key_strategy
        .take()
        .unwrap_or_else(|| Box::new(ArityKeys));
    let strategy = options.resolve()?;
    Ok(Memoized::build(func, keys, strategy, required_args, name))
}

/// Memoizes a one-parameter function. The first argument of each call is the
/// whole cache key.
///
/// ```
/// use memora_core::{memoize_unary, MemoizeOptions, Value};
///
/// let len = memoize_unary(|v: &Value| v.to_string().len(), MemoizeOptions::new()).unwrap();
/// assert_eq!(len.call_one(Value::from("memo")).unwrap(), 4);
/// assert_eq!(len.call(&[Value::from("memo"), Value::from(1)]).unwrap(), 4);
/// assert_eq!(len.len(), 1);
/// ```
pub fn memoize_unary<R, F>(func: F, options: MemoizeOptions<R>) -> MemoResult<Memoized<R>>
where
    R: Clone + 'static,
    F: Fn(&Value) -> R + 'static,
{
    memoize(MemoFn::unary(func), options)
}

/// Memoizes a function over the full argument list.
///
/// ```
/// use memora_core::{memoize_variadic, MemoizeOptions, Value};
///
/// let count = memoize_variadic(|args: &[Value]| args.len(), MemoizeOptions::new()).unwrap();
/// assert_eq!(count.call(&[Value::from(1), Value::from(2)]).unwrap(), 2);
/// assert_eq!(count.call(&[Value::from(1)]).unwrap(), 1);
/// assert_eq!(count.len(), 2);
/// ```
pub fn memoize_variadic<R, F>(func: F, options: MemoizeOptions<R>) -> MemoResult<Memoized<R>>
where
    R: Clone + 'static,
    F: Fn(&[Value]) -> R + 'static,
{
    memoize(MemoFn::variadic(func), options)
}

/// Wraps `func` with a cache built from an already valid strategy.
///
/// ```
/// use memora_core::{memoize_with, CacheStrategy, EqualityOptions, MemoFn, Value};
///
/// let len = memoize_with(
///     MemoFn::unary(|v: &Value| v.as_array().map_or(0, |items| items.len())),
///     CacheStrategy::Equality(EqualityOptions::deep()),
/// );
/// let list = Value::array([Value::from(1), Value::from(2)]);
/// assert_eq!(len.call_one(list).unwrap(), 2);
/// ```
pub fn memoize_with<R: Clone + 'static>(func: MemoFn<R>, strategy: CacheStrategy<R>) -> Memoized<R> {
    Memoized::build(func, Box::new(ArityKeys), strategy, 0, None)
}
