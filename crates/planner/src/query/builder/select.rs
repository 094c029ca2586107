//! Provides a type-safe, fluent builder for constructing `Query` ASTs.

// --- Typestate Marker Structs ---
// These zero-sized structs represent the state of the builder.
// They ensure that methods are called in the correct SQL order at compile time.

use crate::query::ast::{
    common::{JoinKind, OrderDir, TableRef},
    condition::Condition,
    expr::Expr,
    select::{FromItem, JoinClause, OrderByExpr, Query, TableFactor, Union},
};
use model::core::{params::param_name, value::Value};

/// The initial state of the builder before any clauses have been added.
#[derive(Debug, Default, Clone)]
pub struct InitialState;

/// The state after the `SELECT` clause has been added.
#[derive(Debug, Default, Clone)]
pub struct SelectState;

/// The state after the `FROM` clause has been added.
#[derive(Debug, Default, Clone)]
pub struct FromState;

/// States in which the projection is known and the query can be finished.
pub trait Projected {}
impl Projected for SelectState {}
impl Projected for FromState {}

// --- The Main Builder ---

#[derive(Debug, Clone)]
pub struct SelectBuilder<State> {
    ast: Query,
    state: State,
}

impl Default for SelectBuilder<InitialState> {
    fn default() -> Self {
        Self::new()
    }
}

/// Implementation for the initial state of the builder.
impl SelectBuilder<InitialState> {
    pub fn new() -> Self {
        Self {
            ast: Query::default(),
            state: InitialState,
        }
    }

    /// Adds a `SELECT` clause with a list of columns; an empty list selects `*`.
    pub fn select(mut self, columns: Vec<Expr>) -> SelectBuilder<SelectState> {
        self.ast.columns = columns;
        self.transition(SelectState)
    }

    pub fn select_distinct(mut self, columns: Vec<Expr>) -> SelectBuilder<SelectState> {
        self.ast.distinct = true;
        self.select(columns)
    }
}

impl<State> SelectBuilder<State> {
    fn transition<Next>(self, state: Next) -> SelectBuilder<Next> {
        let _ = self.state;
        SelectBuilder {
            ast: self.ast,
            state,
        }
    }
}

/// Implementation for the state after `SELECT` has been called.
impl SelectBuilder<SelectState> {
    /// Adds a `FROM` clause specifying the primary table.
    pub fn from(mut self, table: TableRef, alias: Option<&str>) -> SelectBuilder<FromState> {
        self.ast.from.push(FromItem {
            source: TableFactor::Table(table),
            alias: alias.map(String::from),
        });
        self.transition(FromState)
    }

    /// Selects from a derived table.
    pub fn from_subquery(mut self, query: Query, alias: &str) -> SelectBuilder<FromState> {
        self.ast.from.push(FromItem {
            source: TableFactor::Subquery(Box::new(query)),
            alias: Some(alias.to_string()),
        });
        self.transition(FromState)
    }
}

/// Implementation for the state after `FROM` has been called.
/// From here, we can add optional clauses like `JOIN`, `WHERE`, etc.
impl SelectBuilder<FromState> {
    /// Adds another comma-separated FROM item.
    pub fn also_from(mut self, table: TableRef, alias: Option<&str>) -> Self {
        self.ast.from.push(FromItem {
            source: TableFactor::Table(table),
            alias: alias.map(String::from),
        });
        self
    }

    /// Adds a `JOIN` clause to the query.
    pub fn join(
        mut self,
        kind: JoinKind,
        table: TableRef,
        alias: Option<&str>,
        on: Option<Condition>,
    ) -> Self {
        self.ast.joins.push(JoinClause {
            kind,
            source: TableFactor::Table(table),
            alias: alias.map(String::from),
            on,
        });
        self
    }

    pub fn join_subquery(mut self, kind: JoinKind, query: Query, alias: &str, on: Option<Condition>) -> Self {
        self.ast.joins.push(JoinClause {
            kind,
            source: TableFactor::Subquery(Box::new(query)),
            alias: Some(alias.to_string()),
            on,
        });
        self
    }

    /// Replaces the `WHERE` condition.
    pub fn where_clause(mut self, condition: Condition) -> Self {
        self.ast.where_clause = Some(condition);
        self
    }

    pub fn and_where(mut self, condition: Condition) -> Self {
        self.ast.where_clause = Some(match self.ast.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn or_where(mut self, condition: Condition) -> Self {
        self.ast.where_clause = Some(match self.ast.where_clause.take() {
            Some(existing) => existing.or(condition),
            None => condition,
        });
        self
    }

    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.ast.group_by.extend(exprs);
        self
    }

    pub fn having(mut self, condition: Condition) -> Self {
        self.ast.having = Some(condition);
        self
    }
}

impl<State: Projected> SelectBuilder<State> {
    /// Keyword placed right after SELECT, e.g. `SQL_NO_CACHE`.
    pub fn select_option(mut self, option: &str) -> Self {
        self.ast.select_option = Some(option.to_string());
        self
    }

    /// Adds an `ORDER BY` clause to the query.
    pub fn order_by(mut self, expr: Expr, direction: Option<OrderDir>) -> Self {
        self.ast.order_by.push(OrderByExpr { expr, direction });
        self
    }

    /// A negative limit removes it.
    pub fn limit(mut self, limit: i64) -> Self {
        self.ast.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.ast.offset = Some(offset);
        self
    }

    pub fn union(mut self, query: Query, all: bool) -> Self {
        self.ast.unions.push(Union {
            query: Box::new(query),
            all,
        });
        self
    }

    /// Binds a named parameter referenced through `Expr::Param`.
    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.ast.params.insert(param_name(name), value.into());
        self
    }

    /// Finalizes and returns the constructed `Query` AST.
    pub fn build(self) -> Query {
        self.ast
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        query::{ident, value},
        table_ref,
    };

    #[test]
    fn test_build_simple_select() {
        let ast = SelectBuilder::new()
            .select(vec![ident("id"), ident("name")])
            .from(table_ref!("users"), None)
            .build();

        assert_eq!(ast.columns, vec![ident("id"), ident("name")]);
        assert_eq!(ast.from.len(), 1);
        assert!(ast.where_clause.is_none());
    }

    #[test]
    fn test_and_where_accumulates() {
        let ast = SelectBuilder::new()
            .select(vec![])
            .from(table_ref!("users"), Some("u"))
            .and_where(Condition::eq("u.status", "active"))
            .and_where(Condition::eq("u.age", 30))
            .build();

        match ast.where_clause {
            Some(Condition::And(parts)) => assert_eq!(parts.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_select_without_from() {
        let ast = SelectBuilder::new().select(vec![value(1)]).limit(1).build();
        assert!(ast.from.is_empty());
        assert_eq!(ast.limit, Some(1));
    }

    #[test]
    fn test_params_gain_colons() {
        let ast = SelectBuilder::new()
            .select(vec![])
            .from(table_ref!("t"), None)
            .where_clause(Condition::Compare {
                left: ident("id"),
                op: crate::query::ast::condition::CompareOp::Eq,
                right: Expr::Param("id".into()),
            })
            .param("id", 3)
            .build();
        assert_eq!(ast.params[":id"], Value::Int(3));
    }
}
