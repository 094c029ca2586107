//! Defines the AST for SQL expressions.

use crate::query::ast::select::Query;
use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column identifier, e.g. `id` or `users.id`. Always quoted.
    Column(Ident),

    /// A literal value; always bound through a generated placeholder.
    Value(Value),

    /// A reference to a named parameter supplied with the query, e.g. `:id`.
    Param(String),

    /// SQL text emitted verbatim.
    Raw(String),

    /// A function call, e.g. `COUNT(*)` or `MAX(price)`.
    Function(FunctionCall),

    /// An aliased expression, e.g. `COUNT(*) AS total`.
    Alias { expr: Box<Expr>, alias: String },

    /// A parenthesized sub-query.
    Subquery(Box<Query>),

    /// `*` or `t.*`.
    Wildcard(Option<String>),
}

impl Expr {
    pub fn alias(self, alias: &str) -> Expr {
        Expr::Alias {
            expr: Box::new(self),
            alias: alias.to_string(),
        }
    }

    pub fn function(name: &str, args: Vec<Expr>) -> Expr {
        Expr::Function(FunctionCall {
            name: name.to_string(),
            args,
            wildcard: false,
        })
    }

    /// `COUNT(*)`
    pub fn count_all() -> Expr {
        Expr::Function(FunctionCall {
            name: "COUNT".to_string(),
            args: Vec::new(),
            wildcard: true,
        })
    }
}

impl From<Query> for Expr {
    fn from(query: Query) -> Self {
        Expr::Subquery(Box::new(query))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub qualifier: Option<String>, // e.g., the 'users' in 'users.id'
    pub name: String,              // e.g., the 'id' in 'users.id'
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub wildcard: bool, // represents the '*' in 'COUNT(*)'
}
