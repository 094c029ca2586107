//! Predicate trees used by WHERE, HAVING and JOIN ... ON.

use crate::query::ast::{expr::Expr, select::Query};
use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),

    /// `left op right`
    Compare {
        left: Expr,
        op: CompareOp,
        right: Expr,
    },

    /// Column/value pairs joined by AND. `Null` renders `IS NULL`, lists
    /// render `IN`.
    Hash(Vec<(String, HashValue)>),

    Between {
        expr: Expr,
        low: Expr,
        high: Expr,
        negated: bool,
    },

    In {
        expr: Expr,
        values: InValues,
        negated: bool,
    },

    /// Patterns are escaped and wrapped in `%` unless `raw` is set.
    Like {
        expr: Expr,
        patterns: Vec<String>,
        negated: bool,
        /// Join several patterns with OR instead of AND.
        any: bool,
        raw: bool,
    },

    Exists {
        query: Box<Query>,
        negated: bool,
    },

    Raw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "<>",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HashValue {
    One(Value),
    Many(Vec<Value>),
    Query(Box<Query>),
}

impl From<Value> for HashValue {
    fn from(value: Value) -> Self {
        HashValue::One(value)
    }
}

impl From<Vec<Value>> for HashValue {
    fn from(values: Vec<Value>) -> Self {
        HashValue::Many(values)
    }
}

impl From<Query> for HashValue {
    fn from(query: Query) -> Self {
        HashValue::Query(Box::new(query))
    }
}

impl From<i64> for HashValue {
    fn from(value: i64) -> Self {
        HashValue::One(Value::Int(value))
    }
}

impl From<i32> for HashValue {
    fn from(value: i32) -> Self {
        HashValue::One(Value::from(value))
    }
}

impl From<bool> for HashValue {
    fn from(value: bool) -> Self {
        HashValue::One(Value::Boolean(value))
    }
}

impl From<&str> for HashValue {
    fn from(value: &str) -> Self {
        HashValue::One(Value::from(value))
    }
}

impl From<String> for HashValue {
    fn from(value: String) -> Self {
        HashValue::One(Value::String(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InValues {
    List(Vec<Value>),
    Query(Box<Query>),
}

impl Condition {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn compare(column: &str, op: CompareOp, value: impl Into<Value>) -> Self {
        Condition::Compare {
            left: crate::query::ident(column),
            op,
            right: Expr::Value(value.into()),
        }
    }

    pub fn in_list(column: &str, values: Vec<Value>) -> Self {
        Condition::In {
            expr: crate::query::ident(column),
            values: InValues::List(values),
            negated: false,
        }
    }

    pub fn not_in_list(column: &str, values: Vec<Value>) -> Self {
        Condition::In {
            expr: crate::query::ident(column),
            values: InValues::List(values),
            negated: true,
        }
    }

    pub fn between(column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Condition::Between {
            expr: crate::query::ident(column),
            low: Expr::Value(low.into()),
            high: Expr::Value(high.into()),
            negated: false,
        }
    }

    pub fn like(column: &str, pattern: &str) -> Self {
        Condition::Like {
            expr: crate::query::ident(column),
            patterns: vec![pattern.to_string()],
            negated: false,
            any: false,
            raw: false,
        }
    }

    pub fn exists(query: Query) -> Self {
        Condition::Exists {
            query: Box::new(query),
            negated: false,
        }
    }

    pub fn raw(sql: &str) -> Self {
        Condition::Raw(sql.to_string())
    }

    /// Combines with `other` under AND, flattening nested ANDs.
    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::And(mut parts) => {
                parts.push(other);
                Condition::And(parts)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    /// Combines with `other` under OR, flattening nested ORs.
    pub fn or(self, other: Condition) -> Self {
        match self {
            Condition::Or(mut parts) => {
                parts.push(other);
                Condition::Or(parts)
            }
            first => Condition::Or(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        Condition::Not(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_flattens() {
        let cond = Condition::eq("a", 1).and(Condition::eq("b", 2)).and(Condition::eq("c", 3));
        match cond {
            Condition::And(parts) => assert_eq!(parts.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn or_does_not_absorb_and() {
        let cond = Condition::eq("a", 1).and(Condition::eq("b", 2)).or(Condition::eq("c", 3));
        match cond {
            Condition::Or(parts) => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(parts[0], Condition::And(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
