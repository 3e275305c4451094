mod op;


use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr};

// re-exports
pub use op::CompareOp;

///
/// FilterExpr
///
/// Logical filter tree handed over by the query builder.
///
/// Builders only ever produce `Eq` and `In` leaves; `Compare` leaves are
/// what the rewrite pass emits once a marker on a text value has been
/// resolved. The set of node kinds is closed so every pass over the tree
/// matches exhaustively.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FilterExpr {
    And(Vec<Self>),
    Or(Vec<Self>),
    Eq { field: String, value: Value },
    In { field: String, values: Vec<Value> },
    Compare(CompareClause),
}

impl FilterExpr {
    // --- Leaves ---

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn in_iter<I>(field: impl Into<String>, vals: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::In {
            field: field.into(),
            values: vals.into_iter().map(Into::into).collect(),
        }
    }

    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare(CompareClause::new(field, op, value))
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Ne, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Like, pattern)
    }

    pub fn not_like(field: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::NotLike, pattern)
    }

    // --- Compound ---

    /// Combine two expressions into an `And` expression.
    ///
    /// This flattens nested `And`s to avoid deep nesting (e.g., `(a AND b) AND c` becomes `AND[a,b,c]`).
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::And(mut a), Self::And(mut b)) => {
                a.append(&mut b);
                Self::And(a)
            }
            (Self::And(mut a), b) => {
                a.push(b);
                Self::And(a)
            }
            (a, Self::And(mut b)) => {
                let mut list = vec![a];
                list.append(&mut b);
                Self::And(list)
            }
            (a, b) => Self::And(vec![a, b]),
        }
    }

    /// Combine two expressions into an `Or` expression,
    /// flattening nested `Or`s similarly to `and`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Or(mut a), Self::Or(mut b)) => {
                a.append(&mut b);
                Self::Or(a)
            }
            (Self::Or(mut a), b) => {
                a.push(b);
                Self::Or(a)
            }
            (a, Self::Or(mut b)) => {
                let mut list = vec![a];
                list.append(&mut b);
                Self::Or(list)
            }
            (a, b) => Self::Or(vec![a, b]),
        }
    }

    // --- Inspection ---

    /// Field name of a leaf; `None` for compound nodes.
    #[must_use]
    pub const fn field(&self) -> Option<&str> {
        match self {
            Self::Eq { field, .. } | Self::In { field, .. } => Some(field.as_str()),
            Self::Compare(clause) => Some(clause.field.as_str()),
            Self::And(_) | Self::Or(_) => None,
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        !matches!(self, Self::And(_) | Self::Or(_))
    }

    /// Number of leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => children.iter().map(Self::leaf_count).sum(),
            Self::Eq { .. } | Self::In { .. } | Self::Compare(_) => 1,
        }
    }
}

impl BitAnd for FilterExpr {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for FilterExpr {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

///
/// CompareClause
///
/// One `field <op> value` comparison.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CompareClause {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl CompareClause {
    pub fn new(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}
