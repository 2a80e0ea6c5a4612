//! Hash-based key derivation.
//!
//! A key is rendered to a string, one argument at a time, and the joined
//! string is folded into a 32-bit signed integer with a polynomial rolling
//! hash (`hash * 31 + code_unit` over UTF-16 code units, wrapping). The hash
//! is not cryptographic and collisions are expected; [`HashCache`] accepts
//! them as an approximation.
//!
//! [`HashCache`]: crate::HashCache

use crate::{Callable, MemoResult, Value};

/// How one argument is rendered into the key string.
///
/// The variants are tried in order: plain text, nullish, other
/// string-convertible primitives, callables, values exposing an ordered
/// key/value enumeration, and everything else.
#[derive(Debug)]
pub enum KeyForm<'a> {
    /// Strings pass through unchanged.
    Text(&'a str),
    /// `undefined` / `null`.
    Nullish(&'a Value),
    /// Numbers and booleans, via their canonical string.
    Primitive(&'a Value),
    /// Functions, via their canonical string.
    Callable(&'a Callable),
    /// Map-like values, JSON-encoded as an object of their entries.
    MapLike(&'a Value),
    /// Arrays and objects, JSON-encoded.
    Generic(&'a Value),
}

impl<'a> KeyForm<'a> {
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::String(s) => KeyForm::Text(s),
            Value::Undefined | Value::Null => KeyForm::Nullish(value),
            Value::Bool(_) | Value::Number(_) => KeyForm::Primitive(value),
            Value::Function(callable) => KeyForm::Callable(callable),
            Value::Map(_) => KeyForm::MapLike(value),
            Value::Array(_) | Value::Object(_) => KeyForm::Generic(value),
        }
    }

    pub fn render(&self) -> MemoResult<String> {
        Ok(match self {
            KeyForm::Text(s) => (*s).to_string(),
            KeyForm::Nullish(value) | KeyForm::Primitive(value) => value.to_string(),
            KeyForm::Callable(callable) => Value::Function((*callable).clone()).to_string(),
            KeyForm::MapLike(value) | KeyForm::Generic(value) => serde_json::to_string(value)?,
        })
    }
}

/// Renders a key to the string that gets hashed: each argument rendered by
/// its [`KeyForm`], joined with commas.
///
/// ```
/// use memora_core::{serialize_key, Value};
///
/// let key = [Value::from("a"), Value::from(1), Value::Null, Value::array([Value::from(2)])];
/// assert_eq!(serialize_key(&key).unwrap(), "a,1,null,[2]");
/// ```
pub fn serialize_key(args: &[Value]) -> MemoResult<String> {
    let parts = args
        .iter()
        .map(|arg| KeyForm::of(arg).render())
        .collect::<MemoResult<Vec<_>>>()?;
    Ok(parts.join(","))
}

/// Folds a string into a 32-bit signed integer. The empty string hashes to 0.
///
/// ```
/// use memora_core::fold_hash;
///
/// assert_eq!(fold_hash(""), 0);
/// assert_eq!(fold_hash("a"), 97);
/// ```
pub fn fold_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// Derives the fingerprint of a key.
///
/// ```
/// use memora_core::{hash_key, Value};
///
/// let key = [Value::from("a"), Value::from("b")];
/// assert_eq!(hash_key(&key).unwrap(), hash_key(&key).unwrap());
/// ```
pub fn hash_key(args: &[Value]) -> MemoResult<i32> {
    Ok(fold_hash(&serialize_key(args)?))
}
