//! Uses `#[memoize]` with `memora` as the only dependency.

use memora::{memoize, ToValue, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

static SQUARE_CALLS: AtomicUsize = AtomicUsize::new(0);

#[memoize]
pub fn square(x: u32) -> u32 {
    SQUARE_CALLS.fetch_add(1, Ordering::SeqCst);
    x * x
}

#[memoize(equality = "deep", depth = 2, size = 8)]
pub fn describe(params: Value) -> String {
    params.to_string()
}

pub struct Tariff {
    pub cents: u64,
}

impl ToValue for Tariff {
    fn to_value(&self) -> Value {
        Value::object([("cents", self.cents.to_value())])
    }
}

impl Tariff {
    #[memoize(equality = "shallow", size = 2, name = "tariff_total")]
    pub fn total(&self, units: u64) -> u64 {
        self.cents * units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_memoized_function() {
        assert_eq!(square(12), 144);
        assert_eq!(square(12), 144);
        assert_eq!(SQUARE_CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_equality_memoized_function() {
        let params = Value::object([("page", Value::from(2))]);
        assert_eq!(describe(params.clone()), "[object Object]");
        assert_eq!(describe(params), "[object Object]");
    }

    #[test]
    fn test_memoized_method() {
        let tariff = Tariff { cents: 25 };
        assert_eq!(tariff.total(4), 100);
        assert_eq!(tariff.total(4), 100);
    }
}
