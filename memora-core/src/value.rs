use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::equality::strict_equal;
use crate::MemoResult;

/// Largest integer a `f64` represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A named callable used as a memoization argument.
///
/// Callables compare by identity: clones of one `Callable` are the same
/// callable, two callables created separately are not, even with equal names.
#[derive(Clone, Debug)]
pub struct Callable {
    name: Arc<str>,
}

impl Callable {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if both handles refer to the same callable.
    pub fn same(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.name, &other.name)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A dynamically typed argument value.
///
/// Memoized functions receive their arguments as `Value`s, and cache keys are
/// ordered lists of them. Composite variants are reference counted, so cloning a
/// key is cheap and strict equality can compare composites by identity.
///
/// `PartialEq` is structural (deep) comparison; the identity-aware comparisons
/// live in [`crate::equality`].
///
/// # Examples
///
/// ```
/// use memora_core::Value;
///
/// let params = Value::object([("page", Value::from(1)), ("per_page", Value::from(10))]);
/// assert_eq!(params.type_of(), "object");
/// assert_eq!(params.get("page"), Some(&Value::Number(1.0)));
///
/// let list = Value::array([Value::from("a"), Value::Null]);
/// assert_eq!(list.to_string(), "a,");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Function(Callable),
    Array(Arc<Vec<Value>>),
    /// Insertion-ordered fields with unique names.
    Object(Arc<Vec<(String, Value)>>),
    /// Insertion-ordered entries with unique keys, exposing an ordered
    /// key/value enumeration.
    Map(Arc<Vec<(Value, Value)>>),
}

impl Value {
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Array(Arc::new(items.into_iter().collect()))
    }

    /// Builds an object; a repeated field name overwrites the earlier value
    /// but keeps its original position.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut out: Vec<(String, Value)> = Vec::new();
        for (name, value) in fields {
            let name = name.into();
            match out.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = value,
                None => out.push((name, value)),
            }
        }
        Value::Object(Arc::new(out))
    }

    /// Builds a map; keys are unique under SameValueZero (strict equality
    /// where `NaN` matches `NaN`).
    pub fn map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let mut out: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            match out
                .iter_mut()
                .find(|(existing, _)| same_value_zero(existing, &key))
            {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }
        Value::Map(Arc::new(out))
    }

    pub fn function(name: &str) -> Self {
        Value::Function(Callable::new(name))
    }

    /// Converts any serializable value through its JSON data model.
    ///
    /// ```
    /// use memora_core::Value;
    /// use std::collections::BTreeMap;
    ///
    /// let mut scores = BTreeMap::new();
    /// scores.insert("alice", 3);
    /// let value = Value::from_serialize(&scores).unwrap();
    /// assert_eq!(value.get("alice"), Some(&Value::Number(3.0)));
    /// ```
    pub fn from_serialize<T>(value: &T) -> MemoResult<Value>
    where
        T: Serialize + ?Sized,
    {
        Ok(serde_json::to_value(value)?.into())
    }

    /// Type name in the style of `typeof`, with `null`, arrays and maps told apart.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// `false` for `Undefined` and `Null`, `true` otherwise.
    pub fn is_defined(&self) -> bool {
        !self.is_nullish()
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::Number(_) | Value::String(_))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_) | Value::Map(_))
    }

    /// Returns `true` when the value has no members.
    ///
    /// Nullish values and scalars (numbers, booleans, functions) have no
    /// members and count as empty; strings and composites are empty when
    /// they have length zero.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(fields) => fields.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            _ => true,
        }
    }

    /// Looks up an object field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Whether the value survives as an object member in the JSON encoding.
    fn is_json_member(&self) -> bool {
        !matches!(self, Value::Undefined | Value::Function(_))
    }
}

/// Strict equality, except that `NaN` matches `NaN`.
fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => strict_equal(a, b),
    }
}

/// Formats a number the way ECMAScript `Number#toString` does.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }
    let exponential = format!("{:e}", n);
    match exponential.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => exponential,
    }
}

/// Fields of a map-like value as an object would hold them: keys coerced to
/// their canonical string, a later duplicate overwriting an earlier one in place.
pub(crate) fn map_fields(entries: &[(Value, Value)]) -> Vec<(String, &Value)> {
    let mut fields: Vec<(String, &Value)> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let name = key.to_string();
        match fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => fields.push((name, value)),
        }
    }
    fields
}

/// Canonical string form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Function(callable) => {
                write!(f, "function {}() {{ [native code] }}", callable.name())
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    // Array joins render nullish elements as empty strings
                    if item.is_defined() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
            Value::Map(_) => f.write_str("[object Map]"),
        }
    }
}

/// JSON encoding.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Undefined | Value::Null | Value::Function(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                if !n.is_finite() {
                    serializer.serialize_unit()
                } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(fields) => {
                let mut map = serializer.serialize_map(None)?;
                for (name, value) in fields.iter().filter(|(_, v)| v.is_json_member()) {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(None)?;
                for (name, value) in map_fields(entries)
                    .into_iter()
                    .filter(|(_, v)| v.is_json_member())
                {
                    map.serialize_entry(&name, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(fields) => {
                Value::object(fields.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Function(callable)
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Conversion of typed arguments into key values.
///
/// `#[memoize]` calls this on every argument (and on `self` for methods) to
/// build the cache key. Integers wider than 53 bits lose precision, as they
/// would as JSON numbers.
///
/// # Examples
///
/// ```
/// use memora_core::{ToValue, Value};
///
/// #[derive(Clone)]
/// struct Page {
///     number: u32,
///     size: u32,
/// }
///
/// impl ToValue for Page {
///     fn to_value(&self) -> Value {
///         Value::object([("number", self.number.to_value()), ("size", self.size.to_value())])
///     }
/// }
///
/// let page = Page { number: 2, size: 50 };
/// assert_eq!(page.to_value().get("size"), Some(&Value::Number(50.0)));
/// ```
pub trait ToValue {
    fn to_value(&self) -> Value;
}

macro_rules! number_to_value {
    ($($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Number(*self as f64)
                }
            }
        )*
    };
}

number_to_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Undefined
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for Callable {
    fn to_value(&self) -> Value {
        Value::Function(self.clone())
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::array(self.iter().map(ToValue::to_value))
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::map(self.iter().map(|(k, v)| (k.to_value(), v.to_value())))
    }
}

/// Entries are ordered by the canonical string of their keys so that equal
/// maps always produce the same key value.
impl<K: ToValue, V: ToValue, S: BuildHasher> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        let mut entries: Vec<(Value, Value)> = self
            .iter()
            .map(|(k, v)| (k.to_value(), v.to_value()))
            .collect();
        entries.sort_by_cached_key(|(k, _)| k.to_string());
        Value::map(entries)
    }
}
