use crate::query::{
    ast::{
        common::OrderDir,
        condition::Condition,
        select::{FromItem, JoinClause, OrderByExpr, Query, TableFactor},
    },
    renderer::{Render, Renderer},
};

impl Render for Query {
    fn render(&self, r: &mut Renderer) {
        r.merge_params(&self.params);

        // 1. SELECT, FROM, JOIN, WHERE, GROUP BY, HAVING; empty clauses are dropped
        let clauses = [
            r.capture(|r| render_select(self, r)),
            r.capture(|r| render_from(&self.from, r)),
            r.capture(|r| render_joins(&self.joins, r)),
            r.capture(|r| render_condition("WHERE", self.where_clause.as_ref(), r)),
            r.capture(|r| render_group_by(self, r)),
            r.capture(|r| render_condition("HAVING", self.having.as_ref(), r)),
        ];
        let separator = r.separator;
        let sql = clauses
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(separator);

        // 2. ORDER BY and pagination are dialect specific
        let order_by = r.capture(|r| render_order_by(&self.order_by, r));
        let mut sql = r
            .dialect
            .build_order_by_and_limit(sql, &order_by, self.limit, self.offset, separator);

        // 3. UNION
        if !self.unions.is_empty() {
            let unions = self
                .unions
                .iter()
                .map(|union| {
                    let sub = r.capture(|r| union.query.render(r));
                    let all = if union.all { "ALL " } else { "" };
                    format!("UNION {all}( {sub} )")
                })
                .collect::<Vec<_>>()
                .join(" ");
            sql = format!("({sql}){separator}{unions}");
        }

        r.sql.push_str(&sql);
    }
}

fn render_select(query: &Query, r: &mut Renderer) {
    r.sql.push_str(if query.distinct { "SELECT DISTINCT" } else { "SELECT" });
    if let Some(option) = &query.select_option {
        r.sql.push(' ');
        r.sql.push_str(option);
    }
    r.sql.push(' ');
    if query.columns.is_empty() {
        r.sql.push('*');
    } else {
        r.push_list(&query.columns);
    }
}

fn render_from(from: &[FromItem], r: &mut Renderer) {
    if from.is_empty() {
        return;
    }
    r.sql.push_str("FROM ");
    r.push_list(from);
}

fn render_joins(joins: &[JoinClause], r: &mut Renderer) {
    for (i, join) in joins.iter().enumerate() {
        if i > 0 {
            r.sql.push_str(r.separator);
        }
        join.render(r);
    }
}

fn render_condition(keyword: &str, condition: Option<&Condition>, r: &mut Renderer) {
    let Some(condition) = condition else {
        return;
    };
    let sql = r.capture(|r| condition.render(r));
    if !sql.is_empty() {
        r.sql.push_str(keyword);
        r.sql.push(' ');
        r.sql.push_str(&sql);
    }
}

fn render_group_by(query: &Query, r: &mut Renderer) {
    if query.group_by.is_empty() {
        return;
    }
    r.sql.push_str("GROUP BY ");
    r.push_list(&query.group_by);
}

fn render_order_by(order_by: &[OrderByExpr], r: &mut Renderer) {
    if order_by.is_empty() {
        return;
    }
    r.sql.push_str("ORDER BY ");
    r.push_list(order_by);
}

impl Render for TableFactor {
    fn render(&self, r: &mut Renderer) {
        match self {
            TableFactor::Table(table) => r.push_table_name(&table.qualified_name()),
            TableFactor::Raw(sql) => r.sql.push_str(sql),
            TableFactor::Subquery(query) => {
                r.sql.push('(');
                query.render(r);
                r.sql.push(')');
            }
        }
    }
}

/// Table aliases are written without `AS`, which Oracle rejects.
fn render_alias(alias: Option<&String>, r: &mut Renderer) {
    if let Some(alias) = alias {
        r.sql.push(' ');
        r.push_table_name(alias);
    }
}

impl Render for FromItem {
    fn render(&self, r: &mut Renderer) {
        self.source.render(r);
        render_alias(self.alias.as_ref(), r);
    }
}

impl Render for JoinClause {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str(self.kind.as_sql());
        r.sql.push(' ');
        self.source.render(r);
        render_alias(self.alias.as_ref(), r);
        if let Some(on) = &self.on {
            let condition = r.capture(|r| on.render(r));
            if !condition.is_empty() {
                r.sql.push_str(" ON ");
                r.sql.push_str(&condition);
            }
        }
    }
}

impl Render for OrderByExpr {
    fn render(&self, r: &mut Renderer) {
        self.expr.render(r);
        match self.direction {
            Some(OrderDir::Asc) => r.sql.push_str(" ASC"),
            Some(OrderDir::Desc) => r.sql.push_str(" DESC"),
            None => {}
        }
    }
}
