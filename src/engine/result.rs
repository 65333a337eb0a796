//! Result row representation

use serde_json::{Number, Value};

/// Hard cap on the row count a single query may produce, measured after the
/// filter and transform stages and before projection and ordering
pub const RESULT_ROW_LIMIT: usize = 5000;

/// One result row: qualified key (or apply key) to value
///
/// Key order within a row is not semantically significant; only membership
/// and value are.
pub type ResultRow = serde_json::Map<String, Value>;

/// Wrap a finite float as a JSON number value.
///
/// Dataset numerics come from JSON and aggregates divide finite sums, so a
/// non-finite value here is a defect.
pub fn number_value(value: f64) -> Value {
    match Number::from_f64(value) {
        Some(number) => Value::Number(number),
        None => unreachable!("non-finite numeric value {} in result row", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_value_preserves_value() {
        assert_eq!(number_value(88.33), serde_json::json!(88.33));
        assert_eq!(number_value(-1.0), serde_json::json!(-1.0));
    }
}
