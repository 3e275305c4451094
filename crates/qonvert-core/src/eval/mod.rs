mod like;

use crate::{
    expr::{CompareClause, CompareOp, FilterExpr},
    value::{Value, compare, values_equal},
};
use std::{cmp::Ordering, collections::BTreeMap};

// re-exports
pub use like::like_matches;

///
/// Row
///
/// Abstraction over a row-like value that can expose fields by name.
/// This decouples filter evaluation from any concrete record type.
/// A missing field reads as `None` and behaves like NULL.
///

pub trait Row {
    fn field(&self, name: &str) -> Option<Value>;
}

impl Row for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

///
/// Evaluate a filter against one row with SQL-like semantics.
///
/// - NULL or missing fields never satisfy a leaf
/// - text operands against numeric fields are read as integers
/// - `In` holds when any element equals the field
/// - an empty `And` is true, an empty `Or` is false
///
#[must_use]
pub fn eval<R: Row + ?Sized>(row: &R, expr: &FilterExpr) -> bool {
    match expr {
        FilterExpr::And(children) => children.iter().all(|child| eval(row, child)),
        FilterExpr::Or(children) => children.iter().any(|child| eval(row, child)),
        FilterExpr::Eq { field, value } => {
            on_present(row, field, |actual| values_equal(actual, value))
        }
        FilterExpr::In { field, values } => on_present(row, field, |actual| {
            values.iter().any(|value| values_equal(actual, value))
        }),
        FilterExpr::Compare(clause) => eval_compare(row, clause),
    }
}

/// Keep the rows a filter accepts, preserving their order.
#[must_use]
pub fn filter_rows<'a, R: Row>(rows: &'a [R], expr: &FilterExpr) -> Vec<&'a R> {
    rows.iter().filter(|row| eval(*row, expr)).collect()
}

fn eval_compare<R: Row + ?Sized>(row: &R, clause: &CompareClause) -> bool {
    let CompareClause { field, op, value } = clause;

    on_present(row, field, |actual| {
        if op.is_pattern() {
            let (Some(pattern), Some(text)) = (value.as_text(), text_of(actual)) else {
                return false;
            };
            return like_matches(pattern, &text) == (*op == CompareOp::Like);
        }

        compare(actual, value).is_some_and(|ordering| ordering_satisfies(*op, ordering))
    })
}

const fn ordering_satisfies(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => matches!(ordering, Ordering::Equal),
        CompareOp::Ne => !matches!(ordering, Ordering::Equal),
        CompareOp::Lt => matches!(ordering, Ordering::Less),
        CompareOp::Lte => !matches!(ordering, Ordering::Greater),
        CompareOp::Gt => matches!(ordering, Ordering::Greater),
        CompareOp::Gte => !matches!(ordering, Ordering::Less),
        CompareOp::Like | CompareOp::NotLike => false,
    }
}

// Textual form a SQL engine would match LIKE against.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Int(v) => Some(v.to_string()),
        Value::Uint(v) => Some(v.to_string()),
        Value::Bool(b) => Some(u8::from(*b).to_string()),
        Value::Null | Value::Blob(_) => None,
    }
}

// Evaluate a field predicate only when the field is present and non-null.
fn on_present<R: Row + ?Sized>(row: &R, field: &str, f: impl FnOnce(&Value) -> bool) -> bool {
    match row.field(field) {
        Some(value) if !value.is_null() => f(&value),
        _ => false,
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, age: i64) -> BTreeMap<String, Value> {
        BTreeMap::from([
            ("name".to_string(), Value::from(name)),
            ("age".to_string(), Value::Int(age)),
        ])
    }

    #[test]
    fn comparison_operators_follow_numeric_affinity() {
        let amy = row("amy", 30);

        assert!(eval(&amy, &FilterExpr::gte("age", "30")));
        assert!(!eval(&amy, &FilterExpr::gt("age", "30")));
        assert!(eval(&amy, &FilterExpr::lte("age", "30")));
        assert!(!eval(&amy, &FilterExpr::lt("age", "30")));
        assert!(!eval(&amy, &FilterExpr::ne("age", "30")));
        assert!(eval(&amy, &FilterExpr::ne("age", "31")));
        assert!(eval(&amy, &FilterExpr::compare("age", CompareOp::Eq, 30)));
    }

    #[test]
    fn malformed_numeric_operand_matches_nothing() {
        let amy = row("amy", 30);

        assert!(!eval(&amy, &FilterExpr::gt("age", "=30")));
        assert!(!eval(&amy, &FilterExpr::ne("age", "=30")));
    }

    #[test]
    fn like_and_not_like() {
        let jessica = row("jessica", 46);

        assert!(eval(&jessica, &FilterExpr::like("name", "jes%")));
        assert!(!eval(&jessica, &FilterExpr::not_like("name", "jes%")));
        assert!(eval(&jessica, &FilterExpr::not_like("name", "a%")));
        assert!(eval(&jessica, &FilterExpr::like("age", "4_")));
    }

    #[test]
    fn missing_and_null_fields_never_match() {
        let mut amy = row("amy", 30);
        amy.insert("nickname".to_string(), Value::Null);

        assert!(!eval(&amy, &FilterExpr::eq("missing", "x")));
        assert!(!eval(&amy, &FilterExpr::ne("nickname", "x")));
        assert!(!eval(&amy, &FilterExpr::not_like("nickname", "x%")));
    }

    #[test]
    fn membership_and_compound_nodes() {
        let amy = row("amy", 30);

        let empty = FilterExpr::in_iter("name", Vec::<Value>::new());
        let range = FilterExpr::lt("age", "20") | FilterExpr::gt("age", "25");

        assert!(eval(&amy, &FilterExpr::in_iter("name", ["jessica", "amy"])));
        assert!(!eval(&amy, &empty));
        assert!(eval(&amy, &FilterExpr::And(vec![])));
        assert!(!eval(&amy, &FilterExpr::Or(vec![])));
        assert!(eval(&amy, &(FilterExpr::eq("name", "amy") & range)));
    }

    #[test]
    fn filter_rows_preserves_order() {
        let rows = vec![row("jessica", 29), row("amy", 30), row("boris", 31)];

        let kept = filter_rows(&rows, &FilterExpr::gte("age", "30"));

        assert_eq!(kept, vec![&rows[1], &rows[2]]);
    }
}
