use qonvert_core::{expr::FilterExpr, value::Value};
use std::collections::BTreeMap;

///
/// Statement
///
/// One query under construction: the target table, the accumulated WHERE
/// filter, and free-form per-query settings that hooks may read.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Statement {
    table: String,
    filter: Option<FilterExpr>,
    settings: BTreeMap<String, Value>,
}

impl Statement {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    // --- Filter ---

    /// AND another expression onto the filter.
    #[must_use]
    pub fn and_where(mut self, expr: FilterExpr) -> Self {
        self.push_filter(expr);
        self
    }

    /// AND an equality test onto the filter.
    #[must_use]
    pub fn where_eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and_where(FilterExpr::eq(field, value))
    }

    /// AND a membership test onto the filter.
    #[must_use]
    pub fn where_in<I>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.and_where(FilterExpr::in_iter(field, values))
    }

    pub fn push_filter(&mut self, expr: FilterExpr) {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
    }

    #[must_use]
    pub const fn filter(&self) -> Option<&FilterExpr> {
        self.filter.as_ref()
    }

    pub const fn filter_mut(&mut self) -> Option<&mut FilterExpr> {
        self.filter.as_mut()
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    // --- Settings ---

    /// Attach a per-query setting.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_setting(key, value);
        self
    }

    pub fn insert_setting(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.settings.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }
}

///
/// TESTS
///
