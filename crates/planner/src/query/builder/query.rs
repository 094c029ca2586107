//! Turns query descriptions and schema changes into dialect-specific SQL.

use crate::query::{
    ast::{condition::Condition, select::Query},
    column_type::get_column_type,
    dialect::{Dialect, SqlDialect},
    error::QueryError,
    renderer::{Render, Renderer},
};
use model::{
    core::{params::Params, value::Value},
    schema::table::TableSchema,
};
use tracing::debug;

/// Foreign key definition for [`QueryBuilder::add_foreign_key`].
#[derive(Debug, Clone, Default)]
pub struct ForeignKeyDef<'a> {
    pub name: &'a str,
    pub table: &'a str,
    pub columns: &'a [&'a str],
    pub ref_table: &'a str,
    pub ref_columns: &'a [&'a str],
    pub on_delete: Option<&'a str>,
    pub on_update: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    dialect: &'a dyn Dialect,
    separator: String,
}

impl QueryBuilder<'static> {
    pub fn for_dialect(kind: SqlDialect) -> Self {
        Self::new(kind.dialect())
    }
}

impl<'a> QueryBuilder<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            dialect,
            separator: "\n".to_string(),
        }
    }

    /// Text placed between clauses of a SELECT.
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    fn renderer(&self, params: &Params) -> Renderer<'_> {
        Renderer::with_params(self.dialect, params.clone(), &self.separator)
    }

    /// Builds a SELECT statement. Caller `params` are merged with the
    /// query's own parameters (the query wins) and the generated
    /// placeholders are added to the returned bag.
    pub fn build(&self, query: &Query, params: &Params) -> Result<(String, Params), QueryError> {
        if query.has_unaliased_subquery() {
            return Err(QueryError::InvalidQuery(
                "every derived table must have an alias".to_string(),
            ));
        }

        let mut r = self.renderer(params);
        query.render(&mut r);
        let (sql, params) = r.finish();
        debug!(dialect = self.dialect.name(), params = params.len(), "Built query: {sql}");
        Ok((sql, params))
    }

    /// Renders a stand-alone condition, e.g. for a DELETE issued elsewhere.
    pub fn build_condition(&self, condition: &Condition, params: &Params) -> (String, Params) {
        let mut r = self.renderer(params);
        condition.render(&mut r);
        r.finish()
    }

    pub fn get_column_type(&self, column_type: &str) -> Result<String, QueryError> {
        get_column_type(self.dialect, column_type)
    }

    fn table(&self, name: &str) -> String {
        self.dialect.quote_table_name(name)
    }

    fn column(&self, name: &str) -> String {
        self.dialect.quote_column_name(name)
    }

    fn columns(&self, names: &[&str]) -> String {
        names
            .iter()
            .map(|c| self.column(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn where_sql(&self, condition: Option<&Condition>, r: &mut Renderer) -> String {
        let sql = condition
            .map(|c| r.capture(|r| c.render(r)))
            .unwrap_or_default();
        if sql.is_empty() {
            sql
        } else {
            format!(" WHERE {sql}")
        }
    }

    pub fn insert(&self, table: &str, columns: &[(&str, Value)], params: &Params) -> (String, Params) {
        let mut r = self.renderer(params);
        let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        let values: Vec<String> = columns
            .iter()
            .map(|(_, value)| r.capture(|r| r.add_param(value.clone())))
            .collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table(table),
            self.columns(&names),
            values.join(", ")
        );
        (sql, r.params)
    }

    /// Inserts several rows in one statement; no rows yields an empty string.
    pub fn batch_insert(
        &self,
        table: &str,
        columns: &[&str],
        rows: &[Vec<Value>],
        params: &Params,
    ) -> (String, Params) {
        if rows.is_empty() {
            return (String::new(), params.clone());
        }

        let mut r = self.renderer(params);
        let groups: Vec<String> = rows
            .iter()
            .map(|row| {
                let values: Vec<String> = row
                    .iter()
                    .map(|v| r.capture(|r| r.add_param(v.clone())))
                    .collect();
                format!("({})", values.join(", "))
            })
            .collect();

        let sql = self
            .dialect
            .batch_insert_sql(&self.table(table), &self.columns(columns), &groups);
        (sql, r.params)
    }

    pub fn update(
        &self,
        table: &str,
        columns: &[(&str, Value)],
        condition: Option<&Condition>,
        params: &Params,
    ) -> (String, Params) {
        let mut r = self.renderer(params);
        let assignments: Vec<String> = columns
            .iter()
            .map(|(name, value)| {
                let placeholder = r.capture(|r| r.add_param(value.clone()));
                format!("{}={placeholder}", self.column(name))
            })
            .collect();
        let where_sql = self.where_sql(condition, &mut r);

        let sql = format!(
            "UPDATE {} SET {}{where_sql}",
            self.table(table),
            assignments.join(", ")
        );
        (sql, r.params)
    }

    pub fn delete(&self, table: &str, condition: Option<&Condition>, params: &Params) -> (String, Params) {
        let mut r = self.renderer(params);
        let where_sql = self.where_sql(condition, &mut r);
        (format!("DELETE FROM {}{where_sql}", self.table(table)), r.params)
    }

    /// `columns` pairs a name with an abstract type; an empty name marks a
    /// raw definition line such as a table constraint.
    pub fn create_table(
        &self,
        table: &str,
        columns: &[(&str, &str)],
        options: Option<&str>,
    ) -> Result<String, QueryError> {
        let mut defs = Vec::with_capacity(columns.len());
        for (name, column_type) in columns {
            if name.is_empty() {
                defs.push(format!("\t{column_type}"));
            } else {
                defs.push(format!(
                    "\t{} {}",
                    self.column(name),
                    self.get_column_type(column_type)?
                ));
            }
        }

        let sql = format!("CREATE TABLE {} (\n{}\n)", self.table(table), defs.join(",\n"));
        Ok(match options {
            Some(options) => format!("{sql} {options}"),
            None => sql,
        })
    }

    pub fn drop_table(&self, table: &str) -> String {
        format!("DROP TABLE {}", self.table(table))
    }

    pub fn truncate_table(&self, table: &str) -> String {
        format!("TRUNCATE TABLE {}", self.table(table))
    }

    pub fn rename_table(&self, old_name: &str, new_name: &str) -> String {
        self.dialect
            .rename_table_sql(&self.table(old_name), &self.table(new_name))
    }

    pub fn add_column(&self, table: &str, column: &str, column_type: &str) -> Result<String, QueryError> {
        Ok(format!(
            "ALTER TABLE {} ADD {} {}",
            self.table(table),
            self.column(column),
            self.get_column_type(column_type)?
        ))
    }

    pub fn drop_column(&self, table: &str, column: &str) -> String {
        format!("ALTER TABLE {} DROP COLUMN {}", self.table(table), self.column(column))
    }

    pub fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            self.table(table),
            self.column(old_name),
            self.column(new_name)
        )
    }

    /// Changes the type of a column; `column_type` is an abstract type string.
    pub fn alter_column(&self, table: &str, column: &str, column_type: &str) -> Result<String, QueryError> {
        let column_type = self.get_column_type(column_type)?;
        Ok(self
            .dialect
            .alter_column_sql(&self.table(table), &self.column(column), &column_type))
    }

    pub fn add_primary_key(&self, name: &str, table: &str, columns: &[&str]) -> String {
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY ({})",
            self.table(table),
            self.column(name),
            self.columns(columns)
        )
    }

    pub fn drop_primary_key(&self, name: &str, table: &str) -> String {
        self.dialect
            .drop_primary_key_sql(&self.column(name), &self.table(table))
    }

    pub fn add_foreign_key(&self, fk: &ForeignKeyDef<'_>) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.table(fk.table),
            self.column(fk.name),
            self.columns(fk.columns),
            self.table(fk.ref_table),
            self.columns(fk.ref_columns)
        );
        if let Some(on_delete) = fk.on_delete {
            sql.push_str(&format!(" ON DELETE {on_delete}"));
        }
        if let Some(on_update) = fk.on_update
            && self.dialect.supports_on_update()
        {
            sql.push_str(&format!(" ON UPDATE {on_update}"));
        }
        sql
    }

    pub fn drop_foreign_key(&self, name: &str, table: &str) -> String {
        self.dialect
            .drop_foreign_key_sql(&self.column(name), &self.table(table))
    }

    pub fn create_index(&self, name: &str, table: &str, columns: &[&str], unique: bool) -> String {
        format!(
            "{} {} ON {} ({})",
            if unique { "CREATE UNIQUE INDEX" } else { "CREATE INDEX" },
            self.table(name),
            self.table(table),
            self.columns(columns)
        )
    }

    pub fn drop_index(&self, name: &str, table: &str) -> String {
        self.dialect.drop_index_sql(&self.table(name), &self.table(table))
    }

    /// Restarts the table's sequence at `value`.
    pub fn reset_sequence(&self, table: &TableSchema, value: i64) -> Result<String, QueryError> {
        let sequence = table
            .sequence_name()
            .ok_or_else(|| QueryError::NoSequence(table.name().to_string()))?;
        Ok(self
            .dialect
            .reset_sequence_sql(&self.table(table.full_name()), sequence, value))
    }

    /// `SELECT MAX(pk) FROM table`, used to compute the next sequence value.
    pub fn max_primary_key(&self, table: &TableSchema) -> Result<String, QueryError> {
        let pk = table
            .primary_key()
            .first()
            .ok_or_else(|| QueryError::NoPrimaryKey(table.name().to_string()))?;
        Ok(format!(
            "SELECT MAX({}) FROM {}",
            self.column(pk),
            self.table(table.full_name())
        ))
    }
}
