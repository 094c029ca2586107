//! Defines the Abstract Syntax Tree (AST) for a SELECT query.

use crate::query::ast::{
    common::{JoinKind, OrderDir, TableRef},
    condition::Condition,
    expr::Expr,
};
use model::core::params::Params;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Query {
    /// The list of columns or expressions to be returned. Empty means `*`.
    pub columns: Vec<Expr>,

    pub distinct: bool,

    /// Extra keyword placed after SELECT, e.g. `SQL_CALC_FOUND_ROWS`.
    pub select_option: Option<String>,

    /// Comma-separated FROM items.
    pub from: Vec<FromItem>,

    pub joins: Vec<JoinClause>,

    pub where_clause: Option<Condition>,

    pub group_by: Vec<Expr>,

    pub having: Option<Condition>,

    pub order_by: Vec<OrderByExpr>,

    /// Negative means no limit.
    pub limit: Option<i64>,

    /// Only values greater than zero are emitted.
    pub offset: Option<i64>,

    pub unions: Vec<Union>,

    /// Parameters that belong to the query itself; they override caller
    /// parameters of the same name.
    pub params: Params,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableFactor {
    Table(TableRef),
    /// Raw table expression such as a table function.
    Raw(String),
    Subquery(Box<Query>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromItem {
    pub source: TableFactor,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub source: TableFactor,
    pub alias: Option<String>,
    /// The join condition, e.g., `ON users.id = posts.user_id`.
    pub on: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub direction: Option<OrderDir>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub query: Box<Query>,
    pub all: bool,
}

impl Query {
    /// Derived tables need an alias on every supported engine.
    pub fn has_unaliased_subquery(&self) -> bool {
        let from_sources = self.from.iter().map(|f| (&f.source, &f.alias));
        let join_sources = self.joins.iter().map(|j| (&j.source, &j.alias));

        from_sources.chain(join_sources).any(|(source, alias)| match source {
            TableFactor::Subquery(query) => alias.is_none() || query.has_unaliased_subquery(),
            _ => false,
        }) || self.unions.iter().any(|u| u.query.has_unaliased_subquery())
    }
}
