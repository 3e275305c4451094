use crate::expr::CompareOp;
use serde::{Deserialize, Serialize};

///
/// MarkerConfig
///
/// Caller-chosen prefix per operator. An empty string disables that
/// operator; every field defaults to empty so a partial config only
/// switches on what it names.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    pub gte: String,
    pub gt: String,
    pub lte: String,
    pub lt: String,
    pub ne: String,
    pub like: String,
    pub not_like: String,
}

impl MarkerConfig {
    /// The conventional marker set: `>=`, `>`, `<=`, `<`, `!=`, `~`, `!~`.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            gte: ">=".to_string(),
            gt: ">".to_string(),
            lte: "<=".to_string(),
            lt: "<".to_string(),
            ne: "!=".to_string(),
            like: "~".to_string(),
            not_like: "!~".to_string(),
        }
    }

    /// Markers paired with their operator, in base priority order.
    ///
    /// GE must precede GT and LE must precede LT; the remaining operators
    /// follow the relational ones. Disabled markers are included as empty
    /// strings and filtered out by the rule table.
    #[must_use]
    pub const fn in_priority_order(&self) -> [(&str, CompareOp); 7] {
        [
            (self.gte.as_str(), CompareOp::Gte),
            (self.gt.as_str(), CompareOp::Gt),
            (self.lte.as_str(), CompareOp::Lte),
            (self.lt.as_str(), CompareOp::Lt),
            (self.ne.as_str(), CompareOp::Ne),
            (self.like.as_str(), CompareOp::Like),
            (self.not_like.as_str(), CompareOp::NotLike),
        ]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.in_priority_order()
            .iter()
            .all(|(marker, _)| marker.is_empty())
    }

    // --- Builders ---

    #[must_use]
    pub fn with_gte(mut self, marker: impl Into<String>) -> Self {
        self.gte = marker.into();
        self
    }

    #[must_use]
    pub fn with_gt(mut self, marker: impl Into<String>) -> Self {
        self.gt = marker.into();
        self
    }

    #[must_use]
    pub fn with_lte(mut self, marker: impl Into<String>) -> Self {
        self.lte = marker.into();
        self
    }

    #[must_use]
    pub fn with_lt(mut self, marker: impl Into<String>) -> Self {
        self.lt = marker.into();
        self
    }

    #[must_use]
    pub fn with_ne(mut self, marker: impl Into<String>) -> Self {
        self.ne = marker.into();
        self
    }

    #[must_use]
    pub fn with_like(mut self, marker: impl Into<String>) -> Self {
        self.like = marker.into();
        self
    }

    #[must_use]
    pub fn with_not_like(mut self, marker: impl Into<String>) -> Self {
        self.not_like = marker.into();
        self
    }
}
