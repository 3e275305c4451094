use crate::value::Value;
use std::cmp::Ordering;

///
/// Comparison semantics
///
/// Mirrors the affinity rules a SQL backend applies once a rewritten filter
/// reaches it: text operands against numeric columns are read as integers,
/// booleans order as 0/1, and NULL never compares.
///

/// Order a stored field value against a filter operand.
///
/// Returns `None` when the pair is not comparable (NULL on either side,
/// unparseable numeric text, or mismatched families).
#[must_use]
pub fn compare(field: &Value, operand: &Value) -> Option<Ordering> {
    match (field, operand) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Text(a), Value::Text(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::Blob(a), Value::Blob(b)) => Some(a.as_slice().cmp(b.as_slice())),
        _ => {
            let left = numeric(field)?;
            let right = numeric(operand)?;

            Some(left.cmp(&right))
        }
    }
}

/// Equality under the same affinity rules as `compare`.
#[must_use]
pub fn values_equal(field: &Value, operand: &Value) -> bool {
    compare(field, operand) == Some(Ordering::Equal)
}

// Widen any numeric-capable value into one comparable domain.
fn numeric(value: &Value) -> Option<i128> {
    match value {
        Value::Bool(b) => Some(i128::from(*b)),
        Value::Int(v) => Some(i128::from(*v)),
        Value::Uint(v) => Some(i128::from(*v)),
        Value::Text(s) => s.parse::<i128>().ok(),
        Value::Null | Value::Blob(_) => None,
    }
}
