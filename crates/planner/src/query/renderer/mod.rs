//! Defines the core rendering trait and context for converting AST to SQL.

use crate::query::dialect::Dialect;
use model::core::{
    params::{Params, param_name},
    value::Value,
};

pub mod condition;
pub mod expr;
pub mod select;

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// A context that holds the state during the rendering process.
///
/// It accumulates the SQL string and the parameter bag, and provides
/// access to the dialect for syntax-specific details. Sub-queries render
/// into the same bag, so placeholder names stay unique across a statement.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Params,
    pub dialect: &'a dyn Dialect,
    pub separator: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self::with_params(dialect, Params::new(), "\n")
    }

    pub fn with_params(dialect: &'a dyn Dialect, params: Params, separator: &'a str) -> Self {
        Self {
            sql: String::new(),
            params,
            dialect,
            separator,
        }
    }

    /// Consumes the renderer and returns the final SQL string and parameters.
    pub fn finish(self) -> (String, Params) {
        (self.sql, self.params)
    }

    /// Binds `value` under the next free `:qpN` name and emits the
    /// placeholder. Expressions are emitted verbatim instead.
    pub fn add_param(&mut self, value: Value) {
        if let Value::Expression(sql) = value {
            self.sql.push_str(&sql);
            return;
        }

        let mut index = self.params.len();
        let mut placeholder = self.dialect.placeholder(index);
        while self.params.contains_key(&placeholder) {
            index += 1;
            placeholder = self.dialect.placeholder(index);
        }
        self.sql.push_str(&placeholder);
        self.params.insert(placeholder, value);
    }

    /// Adds named parameters; existing names are overwritten.
    pub fn merge_params(&mut self, params: &Params) {
        for (name, value) in params {
            self.params.insert(param_name(name), value.clone());
        }
    }

    /// Renders into a fresh buffer and returns it, keeping the shared bag.
    pub fn capture(&mut self, f: impl FnOnce(&mut Self)) -> String {
        let outer = std::mem::take(&mut self.sql);
        f(self);
        std::mem::replace(&mut self.sql, outer)
    }

    pub fn push_table_name(&mut self, name: &str) {
        let quoted = self.dialect.quote_table_name(name);
        self.sql.push_str(&quoted);
    }

    pub fn push_column_name(&mut self, name: &str) {
        let quoted = self.dialect.quote_column_name(name);
        self.sql.push_str(&quoted);
    }

    /// Renders `items` separated by `", "`.
    pub fn push_list<T: Render>(&mut self, items: &[T]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            item.render(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::dialect::MySql;

    #[test]
    fn placeholders_follow_bag_size() {
        let mut r = Renderer::new(&MySql);
        r.add_param(Value::Int(1));
        r.sql.push(' ');
        r.add_param(Value::from("a"));
        let (sql, params) = r.finish();
        assert_eq!(sql, ":qp0 :qp1");
        assert_eq!(params[":qp1"], Value::from("a"));
    }

    #[test]
    fn placeholders_skip_caller_names() {
        let mut caller = Params::new();
        caller.insert(":qp1".into(), Value::Int(7));
        let mut r = Renderer::with_params(&MySql, caller, "\n");
        r.add_param(Value::Int(1));
        let (sql, params) = r.finish();
        assert_eq!(sql, ":qp2");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn expressions_are_inlined() {
        let mut r = Renderer::new(&MySql);
        r.add_param(Value::Expression("NOW()".into()));
        let (sql, params) = r.finish();
        assert_eq!(sql, "NOW()");
        assert!(params.is_empty());
    }

    #[test]
    fn capture_keeps_outer_buffer() {
        let mut r = Renderer::new(&MySql);
        r.sql.push_str("outer");
        let inner = r.capture(|r| r.add_param(Value::Int(3)));
        assert_eq!(inner, ":qp0");
        assert_eq!(r.sql, "outer");
        assert_eq!(r.params.len(), 1);
    }
}
