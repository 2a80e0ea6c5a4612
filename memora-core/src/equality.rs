//! Value comparison predicates.
//!
//! These are the `equals(a, b)` collaborators plugged into equality-based
//! caches through [`EqualityOptions`](crate::EqualityOptions). Any function
//! with the [`EqualityFn`] shape works; the three provided here cover the
//! usual identity, one-level and recursive comparisons.

use std::sync::Arc;

use crate::Value;

/// Injected argument comparison predicate.
pub type EqualityFn = Arc<dyn Fn(&Value, &Value) -> bool>;

/// Strict (`===`) equality.
///
/// Primitives compare by value with `NaN` never equal to itself and `0`
/// equal to `-0`. Functions and composites compare by identity.
///
/// ```
/// use memora_core::{strict_equal, Value};
///
/// let list = Value::array([Value::from(1)]);
/// assert!(strict_equal(&list, &list.clone()));
/// assert!(!strict_equal(&list, &Value::array([Value::from(1)])));
/// assert!(!strict_equal(&Value::from(f64::NAN), &Value::from(f64::NAN)));
/// ```
pub fn strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Function(x), Value::Function(y)) => x.same(y),
        (Value::Array(x), Value::Array(y)) => Arc::ptr_eq(x, y),
        (Value::Object(x), Value::Object(y)) => Arc::ptr_eq(x, y),
        (Value::Map(x), Value::Map(y)) => Arc::ptr_eq(x, y),
        _ => false,
    }
}

/// `Object.is`: strict equality, except `NaN` equals `NaN` and `0` differs from `-0`.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            (x.is_nan() && y.is_nan()) || x.to_bits() == y.to_bits()
        }
        _ => strict_equal(a, b),
    }
}

/// One-level comparison.
///
/// Identical values are equal. Two composites of the same kind are equal when
/// they have the same member names (indices for arrays, positions for maps)
/// and each pair of members is strictly equal. Primitives that are not
/// strictly equal are compared once more with `NaN` equal to itself, so `NaN`
/// matches `NaN` while `0` and `-0` stay equal.
///
/// ```
/// use memora_core::{shallow_equal, Value};
///
/// let a = Value::object([("lat", Value::from(3.9855)), ("long", Value::from(1.98204))]);
/// let b = Value::object([("lat", Value::from(3.9855)), ("long", Value::from(1.98204))]);
/// assert!(shallow_equal(&a, &b));
/// assert!(!shallow_equal(&a, &Value::object(Vec::<(String, Value)>::new())));
/// ```
pub fn shallow_equal(a: &Value, b: &Value) -> bool {
    if strict_equal(a, b) {
        return true;
    }
    match (a, b) {
        (Value::Array(_), _) | (Value::Object(_), _) | (Value::Map(_), _) => {
            compare_members(a, b, &strict_equal)
        }
        _ => same_value(a, b),
    }
}

/// Recursive comparison, optionally bounded.
///
/// `depth` bounds how many composite levels have their members compared:
/// `None` is unbounded, `Some(1)` compares the top-level members only (nested
/// composites are taken as equal), and `Some(0)` compares no members at all,
/// so any two composites are equal. Primitive values are always compared
/// strictly, whatever the depth.
///
/// ```
/// use memora_core::{deep_equal, Value};
///
/// let a = Value::object([("a", Value::object([("b", Value::from(1))]))]);
/// let b = Value::object([("a", Value::object([("b", Value::from(2))]))]);
/// assert!(deep_equal(&a, &b, Some(1)));
/// assert!(!deep_equal(&a, &b, Some(2)));
/// assert!(!deep_equal(&a, &b, None));
/// ```
pub fn deep_equal(a: &Value, b: &Value, depth: Option<usize>) -> bool {
    deep_compare(a, b, depth.unwrap_or(usize::MAX))
}

fn deep_compare(a: &Value, b: &Value, remaining: usize) -> bool {
    if strict_equal(a, b) {
        return true;
    }
    if !(a.is_composite() && b.is_composite()) {
        return false;
    }
    if remaining == 0 {
        return true;
    }
    let next = remaining - 1;
    compare_members(a, b, &|x: &Value, y: &Value| {
        if x.is_composite() && y.is_composite() {
            deep_compare(x, y, next)
        } else {
            strict_equal(x, y)
        }
    })
}

/// Compares two composites member by member. Composites of different kinds,
/// or a composite against a non-composite, are never equal.
fn compare_members(a: &Value, b: &Value, members_equal: &dyn Fn(&Value, &Value) -> bool) -> bool {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| members_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(name, l)| {
                    y.iter()
                        .find(|(other, _)| other == name)
                        .map_or(false, |(_, r)| members_equal(l, r))
                })
        }
        (Value::Map(x), Value::Map(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|((lk, lv), (rk, rv))| members_equal(lk, rk) && members_equal(lv, rv))
        }
        _ => false,
    }
}
