
use crate::{
    expr::{CompareClause, FilterExpr},
    obs::{MetricsEvent, record},
    rule::{PrefixRuleTable, Resolved},
    value::Value,
};
use std::borrow::Cow;

///
/// Rewrite a filter tree, resolving operator markers on text values.
///
/// Rewrite guarantees:
/// - `And` / `Or` keep their kind and child positions; recursion is unconditional
/// - `Eq` with a marked text value becomes `Compare`
/// - `In` with at least one marked text element becomes an `Or` of `Compare`
///   leaves, one per marked element in encounter order; unmarked and non-text
///   elements are dropped
/// - `In` with no marked element is kept verbatim
/// - everything else passes through
///
/// The input is never mutated. Subtrees that do not change are returned
/// borrowed, so an untouched tree costs no allocation at all.
///
#[must_use]
pub fn rewrite<'a>(rules: &PrefixRuleTable, expr: &'a FilterExpr) -> Cow<'a, FilterExpr> {
    match expr {
        FilterExpr::And(children) => match rewrite_children(rules, children) {
            Some(children) => Cow::Owned(FilterExpr::And(children)),
            None => Cow::Borrowed(expr),
        },
        FilterExpr::Or(children) => match rewrite_children(rules, children) {
            Some(children) => Cow::Owned(FilterExpr::Or(children)),
            None => Cow::Borrowed(expr),
        },
        FilterExpr::Eq { field, value } => match rewrite_equality(rules, field, value) {
            Some(leaf) => Cow::Owned(leaf),
            None => Cow::Borrowed(expr),
        },
        FilterExpr::In { field, values } => match expand_membership(rules, field, values) {
            Some(disjunction) => Cow::Owned(disjunction),
            None => Cow::Borrowed(expr),
        },
        FilterExpr::Compare(_) => Cow::Borrowed(expr),
    }
}

///
/// Rewrite `expr` in place.
///
/// The replacement tree is built off to the side and swapped in only when
/// something changed. Returns whether the tree was replaced.
///
pub fn rewrite_in_place(rules: &PrefixRuleTable, expr: &mut FilterExpr) -> bool {
    let replacement = match rewrite(rules, expr) {
        Cow::Owned(rewritten) => Some(rewritten),
        Cow::Borrowed(_) => None,
    };

    match replacement {
        Some(rewritten) => {
            *expr = rewritten;
            true
        }
        None => false,
    }
}

// Rewrite each child in position; `None` when no child changed.
fn rewrite_children(rules: &PrefixRuleTable, children: &[FilterExpr]) -> Option<Vec<FilterExpr>> {
    let rewritten: Vec<Cow<'_, FilterExpr>> = children
        .iter()
        .map(|child| rewrite(rules, child))
        .collect();

    if rewritten.iter().all(|child| matches!(child, Cow::Borrowed(_))) {
        return None;
    }

    Some(rewritten.into_iter().map(Cow::into_owned).collect())
}

// Equality leaf: convert when the value is text carrying a marker.
fn rewrite_equality(rules: &PrefixRuleTable, field: &str, value: &Value) -> Option<FilterExpr> {
    let resolved = rules.resolve(value.as_text()?)?;

    Some(compare_leaf(field, resolved))
}

///
/// Expand a membership leaf into a disjunction of comparisons.
///
/// Only marked text elements contribute a branch. Elements that are not
/// text, or carry no marker, are dropped rather than kept as an equality
/// branch. With zero marked elements the leaf is left alone, preserving
/// the original set-membership test.
///
fn expand_membership(rules: &PrefixRuleTable, field: &str, values: &[Value]) -> Option<FilterExpr> {
    let branches: Vec<FilterExpr> = values
        .iter()
        .filter_map(|value| rules.resolve(value.as_text()?))
        .map(|resolved| compare_leaf(field, resolved))
        .collect();

    if branches.is_empty() {
        record(MetricsEvent::MembershipUnchanged);
        return None;
    }

    let matched = branches.len();
    record(MetricsEvent::MembershipExpanded {
        matched: count(matched),
        dropped: count(values.len() - matched),
    });

    Some(FilterExpr::Or(branches))
}

fn compare_leaf(field: &str, resolved: Resolved<'_>) -> FilterExpr {
    record(MetricsEvent::LeafConverted { op: resolved.op });

    FilterExpr::Compare(CompareClause::new(
        field,
        resolved.op,
        Value::Text(resolved.residual.to_string()),
    ))
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
