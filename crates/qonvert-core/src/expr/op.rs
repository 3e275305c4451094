use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// CompareOp
///
/// Operators a comparison leaf can carry. `Display` renders the SQL
/// operator text used when a filter is compiled.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub enum CompareOp {
    #[display("=")]
    Eq,
    #[display("!=")]
    Ne,
    #[display("<")]
    Lt,
    #[display("<=")]
    Lte,
    #[display(">")]
    Gt,
    #[display(">=")]
    Gte,
    #[display("LIKE")]
    Like,
    #[display("NOT LIKE")]
    NotLike,
}

impl CompareOp {
    /// Stable snake_case name, used as the metrics key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Like => "like",
            Self::NotLike => "not_like",
        }
    }

    /// `LIKE` / `NOT LIKE`, which match against a pattern instead of
    /// ordering values.
    #[must_use]
    pub const fn is_pattern(self) -> bool {
        matches!(self, Self::Like | Self::NotLike)
    }
}
