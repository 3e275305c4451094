use crate::statement::Statement;
use derive_more::Display;
use qonvert_core::{expr::FilterExpr, value::Value};
use serde::{Deserialize, Serialize};

///
/// CompiledQuery
///
/// Final SQL text with `?` placeholders and the bound arguments, in
/// placeholder order.
///

#[derive(Clone, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[display("{sql}")]
pub struct CompiledQuery {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Compile a statement into a `SELECT`.
#[must_use]
pub fn compile_statement(statement: &Statement) -> CompiledQuery {
    let mut sql = format!("SELECT * FROM {}", statement.table());
    let mut args = Vec::new();

    if let Some(filter) = statement.filter() {
        sql.push_str(" WHERE ");
        write_expr(&mut sql, &mut args, filter);
    }

    CompiledQuery { sql, args }
}

/// Compile a filter on its own, as the body of a WHERE clause.
#[must_use]
pub fn compile_filter(filter: &FilterExpr) -> CompiledQuery {
    let mut sql = String::new();
    let mut args = Vec::new();
    write_expr(&mut sql, &mut args, filter);

    CompiledQuery { sql, args }
}

fn write_expr(out: &mut String, args: &mut Vec<Value>, expr: &FilterExpr) {
    match expr {
        FilterExpr::And(children) => write_compound(out, args, children, " AND ", "1 = 1"),
        FilterExpr::Or(children) => write_compound(out, args, children, " OR ", "1 = 0"),
        FilterExpr::Eq { field, value } => {
            out.push_str(field);
            out.push_str(" = ?");
            args.push(value.clone());
        }
        FilterExpr::In { field, values } => {
            out.push_str(field);
            if values.is_empty() {
                out.push_str(" IN (NULL)");
                return;
            }

            out.push_str(" IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('?');
                args.push(value.clone());
            }
            out.push(')');
        }
        FilterExpr::Compare(clause) => {
            out.push_str(&clause.field);
            out.push(' ');
            out.push_str(&clause.op.to_string());
            out.push_str(" ?");
            args.push(clause.value.clone());
        }
    }
}

// Join children with `sep`; nested compounds with several children are
// parenthesised so precedence never depends on the SQL engine.
fn write_compound(
    out: &mut String,
    args: &mut Vec<Value>,
    children: &[FilterExpr],
    sep: &str,
    empty: &str,
) {
    if children.is_empty() {
        out.push_str(empty);
        return;
    }

    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }

        let grouped = matches!(child, FilterExpr::And(c) | FilterExpr::Or(c) if c.len() > 1);
        if grouped {
            out.push('(');
        }
        write_expr(out, args, child);
        if grouped {
            out.push(')');
        }
    }
}

///
/// TESTS
///
