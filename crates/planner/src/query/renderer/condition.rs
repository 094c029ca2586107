//! Predicate rendering. Parts that render empty are dropped, so an empty tree
//! produces no SQL at all.

use crate::query::{
    ast::{
        condition::{Condition, HashValue, InValues},
        expr::Expr,
        select::Query,
    },
    ident,
    renderer::{Render, Renderer},
};
use model::core::value::Value;

impl Render for Condition {
    fn render(&self, r: &mut Renderer) {
        match self {
            Condition::And(parts) => render_junction("AND", parts, r),
            Condition::Or(parts) => render_junction("OR", parts, r),
            Condition::Not(inner) => {
                let sql = r.capture(|r| inner.render(r));
                if !sql.is_empty() {
                    r.sql.push_str(&format!("NOT ({sql})"));
                }
            }
            Condition::Compare { left, op, right } => {
                left.render(r);
                r.sql.push(' ');
                r.sql.push_str(op.as_sql());
                r.sql.push(' ');
                right.render(r);
            }
            Condition::Hash(pairs) => {
                let parts: Vec<String> = pairs
                    .iter()
                    .map(|(column, value)| r.capture(|r| render_hash_pair(column, value, r)))
                    .collect();
                push_joined("AND", parts, r);
            }
            Condition::Between {
                expr,
                low,
                high,
                negated,
            } => {
                expr.render(r);
                r.sql.push_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                low.render(r);
                r.sql.push_str(" AND ");
                high.render(r);
            }
            Condition::In {
                expr,
                values,
                negated,
            } => match values {
                InValues::List(values) => render_in_list(expr, values, *negated, r),
                InValues::Query(query) => render_in_query(expr, query, *negated, r),
            },
            Condition::Like {
                expr,
                patterns,
                negated,
                any,
                raw,
            } => render_like(expr, patterns, *negated, *any, *raw, r),
            Condition::Exists { query, negated } => {
                if *negated {
                    r.sql.push_str("NOT ");
                }
                r.sql.push_str("EXISTS (");
                query.render(r);
                r.sql.push(')');
            }
            Condition::Raw(sql) => r.sql.push_str(sql),
        }
    }
}

fn render_junction(op: &str, parts: &[Condition], r: &mut Renderer) {
    let rendered: Vec<String> = parts.iter().map(|p| r.capture(|r| p.render(r))).collect();
    push_joined(op, rendered, r);
}

/// One part renders bare, several as `(a) OP (b)`.
fn push_joined(op: &str, parts: Vec<String>, r: &mut Renderer) {
    let parts: Vec<String> = parts.into_iter().filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [] => {}
        [only] => r.sql.push_str(only),
        many => {
            let joined = many
                .iter()
                .map(|p| format!("({p})"))
                .collect::<Vec<_>>()
                .join(&format!(" {op} "));
            r.sql.push_str(&joined);
        }
    }
}

fn render_hash_pair(column: &str, value: &HashValue, r: &mut Renderer) {
    let column_expr = ident(column);
    match value {
        HashValue::One(Value::Null) => {
            column_expr.render(r);
            r.sql.push_str(" IS NULL");
        }
        HashValue::One(value) => {
            column_expr.render(r);
            r.sql.push('=');
            r.add_param(value.clone());
        }
        HashValue::Many(values) => render_in_list(&column_expr, values, false, r),
        HashValue::Query(query) => render_in_query(&column_expr, query, false, r),
    }
}

fn render_in_query(expr: &Expr, query: &Query, negated: bool, r: &mut Renderer) {
    expr.render(r);
    r.sql.push_str(if negated { " NOT IN (" } else { " IN (" });
    query.render(r);
    r.sql.push(')');
}

fn render_in_list(expr: &Expr, values: &[Value], negated: bool, r: &mut Renderer) {
    let has_null = values.iter().any(Value::is_null);
    let values: Vec<&Value> = values.iter().filter(|v| !v.is_null()).collect();

    if values.is_empty() && !has_null {
        if !negated {
            r.sql.push_str("0=1");
        }
        return;
    }

    let column = r.capture(|r| expr.render(r));
    let in_sql = match values.as_slice() {
        [] => None,
        [single] => {
            let placeholder = r.capture(|r| r.add_param((*single).clone()));
            let op = if negated { "<>" } else { "=" };
            Some(format!("{column}{op}{placeholder}"))
        }
        many => {
            let placeholders: Vec<String> = many
                .iter()
                .map(|v| r.capture(|r| r.add_param((*v).clone())))
                .collect();
            let op = if negated { "NOT IN" } else { "IN" };
            Some(format!("{column} {op} ({})", placeholders.join(", ")))
        }
    };
    let null_sql = has_null.then(|| {
        if negated {
            format!("{column} IS NOT NULL")
        } else {
            format!("{column} IS NULL")
        }
    });

    let sql = match (in_sql, null_sql) {
        (Some(in_sql), Some(null_sql)) if negated => format!("{in_sql} AND {null_sql}"),
        (Some(in_sql), Some(null_sql)) => format!("({in_sql} OR {null_sql})"),
        (Some(sql), None) | (None, Some(sql)) => sql,
        (None, None) => String::new(),
    };
    r.sql.push_str(&sql);
}

fn render_like(
    expr: &Expr,
    patterns: &[String],
    negated: bool,
    any: bool,
    raw: bool,
    r: &mut Renderer,
) {
    if patterns.is_empty() {
        if !negated {
            r.sql.push_str("0=1");
        }
        return;
    }

    let (escape_char, escape_clause) = r.dialect.like_escape();
    let op = if negated { "NOT LIKE" } else { "LIKE" };
    let column = r.capture(|r| expr.render(r));

    let parts: Vec<String> = patterns
        .iter()
        .map(|pattern| {
            let bound = if raw {
                pattern.clone()
            } else {
                format!("%{}%", escape_like(pattern, escape_char))
            };
            let placeholder = r.capture(|r| r.add_param(Value::String(bound)));
            format!("{column} {op} {placeholder}{}", escape_clause.unwrap_or(""))
        })
        .collect();

    r.sql.push_str(&parts.join(if any { " OR " } else { " AND " }));
}

fn escape_like(pattern: &str, escape_char: char) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        if ch == '%' || ch == '_' || ch == escape_char {
            escaped.push(escape_char);
        }
        escaped.push(ch);
    }
    escaped
}
