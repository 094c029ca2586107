use crate::query::{
    ast::expr::{Expr, FunctionCall, Ident},
    renderer::{Render, Renderer},
};
use model::core::params::param_name;

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Column(ident) => ident.render(r),
            Expr::Value(val) => r.add_param(val.clone()),
            Expr::Param(name) => r.sql.push_str(&param_name(name)),
            Expr::Raw(sql) => r.sql.push_str(sql),
            Expr::Function(func) => func.render(r),
            Expr::Alias { expr, alias } => {
                expr.render(r);
                r.sql.push_str(" AS ");
                r.push_column_name(alias);
            }
            Expr::Subquery(query) => {
                r.sql.push('(');
                query.render(r);
                r.sql.push(')');
            }
            Expr::Wildcard(Some(table)) => {
                r.push_table_name(table);
                r.sql.push_str(".*");
            }
            Expr::Wildcard(None) => r.sql.push('*'),
        }
    }
}

impl Render for Ident {
    fn render(&self, r: &mut Renderer) {
        if let Some(qualifier) = &self.qualifier {
            r.push_table_name(qualifier);
            r.sql.push('.');
        }
        let name = r.dialect.quote_simple_column_name(&self.name);
        r.sql.push_str(&name);
    }
}

impl Render for FunctionCall {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str(&self.name);
        r.sql.push('(');
        if self.wildcard {
            r.sql.push('*');
        } else {
            r.push_list(&self.args);
        }
        r.sql.push(')');
    }
}
