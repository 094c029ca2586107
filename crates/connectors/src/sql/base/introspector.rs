//! Dialect-neutral contract for reading table metadata from a live database.

use crate::sql::base::{error::SchemaError, executor::Executor};
use async_trait::async_trait;
use model::{core::params::Params, schema::table::TableSchema};
use planner::query::{builder::query::QueryBuilder, dialect::Dialect};
use tracing::{debug, info, warn};

/// A table name split into schema and table part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub schema_name: Option<String>,
    pub name: String,
    /// `schema.name` when the schema is not the default one, else `name`.
    pub full_name: String,
}

#[async_trait]
pub trait SchemaIntrospector: Send + Sync {
    fn dialect(&self) -> &'static dyn Dialect;

    fn default_schema(&self) -> Option<&str>;

    /// Text placed between the clauses of generated statements.
    fn separator(&self) -> &str {
        "\n"
    }

    fn query_builder(&self) -> QueryBuilder<'static> {
        QueryBuilder::new(self.dialect()).with_separator(self.separator())
    }

    fn quote_simple_table_name(&self, name: &str) -> String {
        self.dialect().quote_simple_table_name(name)
    }

    fn quote_table_name(&self, name: &str) -> String {
        self.dialect().quote_table_name(name)
    }

    fn quote_simple_column_name(&self, name: &str) -> String {
        self.dialect().quote_simple_column_name(name)
    }

    fn quote_column_name(&self, name: &str) -> String {
        self.dialect().quote_column_name(name)
    }

    fn resolve_table_name(&self, name: &str) -> ResolvedName {
        let dialect = self.dialect();
        let parts: Vec<String> = name.split('.').map(|p| dialect.unquote(p)).collect();
        let (schema, table) = match parts.as_slice() {
            [.., schema, table] => (Some(schema.clone()), table.clone()),
            _ => (None, dialect.unquote(name)),
        };

        let default_schema = self.default_schema();
        let schema_name = schema.or_else(|| default_schema.map(str::to_string));
        let full_name = match &schema_name {
            Some(schema) if Some(schema.as_str()) != default_schema => format!("{schema}.{table}"),
            _ => table.clone(),
        };

        ResolvedName {
            schema_name,
            name: table,
            full_name,
        }
    }

    /// Reads the metadata of one table or view.
    async fn inspect_table(&self, name: &str) -> Result<TableSchema, SchemaError>;

    /// Like [`SchemaIntrospector::inspect_table`], but every failure,
    /// including a missing table, yields `None`.
    async fn load_table_schema(&self, name: &str) -> Option<TableSchema> {
        match self.inspect_table(name).await {
            Ok(table) => {
                info!(
                    "Loaded schema of table '{}' ({} columns)",
                    table.full_name(),
                    table.columns().len()
                );
                Some(table)
            }
            Err(err) if err.is_not_found() => {
                debug!("Table '{name}' not found");
                None
            }
            Err(err) => {
                warn!("Failed to load schema of table '{name}': {err}");
                None
            }
        }
    }

    /// Table and view names of `schema`; `""` means the default schema.
    async fn find_table_names(&self, schema: &str) -> Result<Vec<String>, SchemaError>;

    /// SQL restarting the table's key sequence at `value`, or just past the
    /// largest key when `value` is omitted.
    async fn reset_sequence(&self, table: &str, value: Option<i64>) -> Result<String, SchemaError>;
}

/// Resolves `name` for a sequence reset; a missing table is a configuration
/// problem there.
pub(crate) async fn table_for_reset<I>(introspector: &I, name: &str) -> Result<TableSchema, SchemaError>
where
    I: SchemaIntrospector + ?Sized,
{
    match introspector.inspect_table(name).await {
        Ok(table) => Ok(table),
        Err(err) if err.is_not_found() => {
            Err(SchemaError::Configuration(format!("Table not found: {name}")))
        }
        Err(err) => Err(err),
    }
}

/// `MAX(pk) + 1`, or 1 for an empty table. A key already at `i64::MAX`
/// has no successor.
pub(crate) async fn next_key_value(
    executor: &dyn Executor,
    builder: &QueryBuilder<'_>,
    table: &TableSchema,
) -> Result<i64, SchemaError> {
    let sql = builder.max_primary_key(table)?;
    debug!("Computing next key value: {sql}");
    let max = executor.query_scalar(&sql, &Params::new()).await?;
    match max.and_then(|v| v.as_i64()) {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or_else(|| {
            SchemaError::Configuration(format!(
                "Primary key of table '{}' is exhausted at {max}",
                table.full_name()
            ))
        }),
    }
}
