mod config;


use crate::expr::CompareOp;
use derive_more::{Deref, IntoIterator};
use thiserror::Error as ThisError;

// re-exports
pub use config::MarkerConfig;

///
/// Prefix rules
///
/// A rule table maps string prefixes ("markers") onto comparison
/// operators. Rules are checked in order and the first marker that
/// prefixes a value wins, so the order is part of the contract:
///
/// - the base order is GE, GT, LE, LT, NE, LIKE, NOT_LIKE
/// - a marker is never checked after a strictly shorter marker that is
///   its own prefix (`>` must not shadow `>=`, `!` must not shadow `!~`)
///
/// The table is built once and never mutated afterwards, so a single
/// instance can be shared freely between concurrent queries.
///

///
/// RuleError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RuleError {
    #[error("marker '{marker}' is configured for both '{first}' and '{second}'")]
    DuplicateMarker {
        marker: String,
        first: &'static str,
        second: &'static str,
    },
}

///
/// PrefixRule
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrefixRule {
    pub marker: String,
    pub op: CompareOp,
}

impl PrefixRule {
    /// Match this rule against `value`, returning the residual on success.
    #[must_use]
    pub fn strip<'a>(&self, value: &'a str) -> Option<&'a str> {
        value.strip_prefix(self.marker.as_str())
    }
}

///
/// Resolved
///
/// Outcome of a successful lookup: the operator plus the value with the
/// marker removed from the front. The residual is not trimmed and may be
/// empty when the value is exactly the marker.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Resolved<'a> {
    pub op: CompareOp,
    pub residual: &'a str,
}

///
/// PrefixRuleTable
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
#[into_iterator(ref)]
pub struct PrefixRuleTable {
    rules: Vec<PrefixRule>,
}

impl PrefixRuleTable {
    /// Build the table from a marker configuration.
    ///
    /// Empty markers are skipped. A marker that extends an earlier marker
    /// is hoisted in front of it; two operators sharing one marker are
    /// rejected since the second could never match.
    pub fn new(config: &MarkerConfig) -> Result<Self, RuleError> {
        let mut rules: Vec<PrefixRule> = Vec::new();

        for (marker, op) in config.in_priority_order() {
            if marker.is_empty() {
                continue;
            }

            if let Some(existing) = rules.iter().find(|rule| rule.marker == marker) {
                return Err(RuleError::DuplicateMarker {
                    marker: marker.to_string(),
                    first: existing.op.name(),
                    second: op.name(),
                });
            }

            let rule = PrefixRule {
                marker: marker.to_string(),
                op,
            };

            // Invariant: no rule is a strict prefix of a rule after it.
            // Inserting ahead of the first rule that prefixes the new marker
            // keeps that invariant.
            match rules
                .iter()
                .position(|existing| marker.starts_with(existing.marker.as_str()))
            {
                Some(index) => rules.insert(index, rule),
                None => rules.push(rule),
            }
        }

        Ok(Self { rules })
    }

    /// Find the first rule whose marker prefixes `value`.
    #[must_use]
    pub fn resolve<'a>(&self, value: &'a str) -> Option<Resolved<'a>> {
        self.rules.iter().find_map(|rule| {
            rule.strip(value).map(|residual| Resolved {
                op: rule.op,
                residual,
            })
        })
    }
}
