use crate::query::ast::expr::{Expr, Ident};
use model::core::value::Value;

pub mod ast;
pub mod builder;
pub mod column_type;
pub mod dialect;
pub mod error;
pub mod macros;
pub mod pagination;
pub mod renderer;

/// A column reference; `"t.id"` is split into qualifier and name.
pub fn ident(name: &str) -> Expr {
    match name.rsplit_once('.') {
        Some((qualifier, column)) => Expr::Column(Ident {
            qualifier: Some(qualifier.to_string()),
            name: column.to_string(),
        }),
        None => Expr::Column(Ident {
            qualifier: None,
            name: name.to_string(),
        }),
    }
}

pub fn value(val: impl Into<Value>) -> Expr {
    Expr::Value(val.into())
}

pub fn raw(sql: &str) -> Expr {
    Expr::Raw(sql.to_string())
}
