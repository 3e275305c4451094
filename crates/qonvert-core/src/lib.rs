//! Core runtime for Qonvert: filter trees, marker rules, the rewrite pass,
//! row evaluation, and rewrite telemetry.
//!
//! ## Module layout
//! - `value`: dynamically typed leaf operands and their comparison rules.
//! - `expr`: the closed filter tree (`And`, `Or`, `Eq`, `In`, `Compare`).
//! - `rule`: marker configuration and the ordered prefix rule table.
//! - `rewrite`: the tree rewriter that resolves markers into comparisons.
//! - `gate`: per-query activation signal and plugin activation mode.
//! - `eval`: SQL-like evaluation of a filter against in-memory rows.
//! - `obs`: metrics events, sinks, and reports.
#![warn(unreachable_pub)]

pub mod eval;
pub mod expr;
pub mod gate;
pub mod obs;
pub mod rewrite;
pub mod rule;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No sinks, reports, or evaluation helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        expr::{CompareClause, CompareOp, FilterExpr},
        gate::{Activation, GateSignal},
        rewrite::{rewrite, rewrite_in_place},
        rule::{MarkerConfig, PrefixRuleTable},
        value::Value,
    };
}
