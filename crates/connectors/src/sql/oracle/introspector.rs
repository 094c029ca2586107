//! Oracle catalog introspection over the `ALL_*` and `USER_*` views.

use crate::sql::{
    base::{
        error::{DbError, SchemaError},
        executor::{Executor, Row, RowExt},
        introspector::{ResolvedName, SchemaIntrospector, next_key_value, table_for_reset},
    },
    oracle::data_type::{compose_native_type, parse_native_type},
};
use async_trait::async_trait;
use model::{
    core::{params::Params, value::Value},
    schema::{
        column::{ColumnSchema, ColumnSchemaBuilder},
        table::{ForeignKeyRef, TableSchema},
    },
};
use planner::query::dialect::{Dialect, SqlDialect};
use std::collections::HashSet;
use tracing::debug;

const COLUMNS_SQL: &str = include_str!("sql/columns.sql");
const FOREIGN_KEYS_SQL: &str = include_str!("sql/foreign_keys.sql");
const SEQUENCE_SQL: &str = include_str!("sql/sequence.sql");
const TABLE_NAMES_DEFAULT_SQL: &str = include_str!("sql/table_names_default.sql");
const TABLE_NAMES_OWNER_SQL: &str = include_str!("sql/table_names_owner.sql");

/// Reads Oracle metadata. Unqualified names resolve against the default
/// schema, which is the upper-cased connection user.
#[derive(Debug)]
pub struct OracleSchema<E> {
    executor: E,
    default_schema: String,
    separator: String,
}

impl<E: Executor> OracleSchema<E> {
    pub fn new(executor: E, user: &str) -> Self {
        Self {
            executor,
            default_schema: user.to_uppercase(),
            separator: "\n".to_string(),
        }
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    fn table_params(resolved: &ResolvedName) -> Params {
        let mut params = Params::new();
        params.insert(
            ":schemaName".into(),
            resolved.schema_name.clone().map_or(Value::Null, Value::String),
        );
        params.insert(":tableName".into(), Value::from(resolved.name.as_str()));
        params
    }

    async fn find_column_rows(&self, resolved: &ResolvedName) -> Result<Vec<Row>, SchemaError> {
        debug!("Reading columns of '{}'", resolved.full_name);
        let rows = self
            .executor
            .query_rows(COLUMNS_SQL, &Self::table_params(resolved))
            .await?;
        if rows.is_empty() {
            return Err(SchemaError::NotFound(resolved.full_name.clone()));
        }

        // A materialized view is listed in ALL_OBJECTS next to its container
        // table, so a catalog row may repeat. The first one wins.
        let mut seen = HashSet::new();
        Ok(rows
            .into_iter()
            .filter(|row| row.text("COLUMN_NAME").is_none_or(|name| seen.insert(name)))
            .collect())
    }

    /// Name of the sequence fed to the table by an insert trigger.
    async fn find_sequence_name(&self, table: &str) -> Result<Option<String>, SchemaError> {
        let mut params = Params::new();
        params.insert(":tableName".into(), Value::from(table));
        let sequence = self.executor.query_scalar(SEQUENCE_SQL, &params).await?;
        Ok(sequence.and_then(|v| v.as_string()))
    }

    async fn find_foreign_keys(
        &self,
        resolved: &ResolvedName,
    ) -> Result<Vec<(String, ForeignKeyRef)>, SchemaError> {
        let rows = self
            .executor
            .query_rows(FOREIGN_KEYS_SQL, &Self::table_params(resolved))
            .await?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let column = row.text("COLUMN_NAME")?;
                let reference = ForeignKeyRef {
                    referenced_table: row.text("TABLE_REF")?,
                    referenced_column: row.text("COLUMN_REF")?,
                    constraint_name: row.text("CONSTRAINT_NAME"),
                };
                Some((column, reference))
            })
            .collect())
    }
}

/// Primary key columns ordered by their position in the constraint.
fn primary_key_of(rows: &[Row]) -> Vec<String> {
    let mut keyed: Vec<(i64, String)> = rows
        .iter()
        .filter_map(|row| Some((row.int("KEY_POSITION")?, row.text("COLUMN_NAME")?)))
        .collect();
    keyed.sort_by_key(|(position, _)| *position);
    keyed.into_iter().map(|(_, name)| name).collect()
}

fn load_column(row: &Row, auto_increment: bool) -> Result<ColumnSchema, SchemaError> {
    let name = row
        .text("COLUMN_NAME")
        .ok_or_else(|| DbError::Conversion("column row without COLUMN_NAME".into()))?;
    let db_type = compose_native_type(
        &row.text("DATA_TYPE").unwrap_or_default(),
        row.int("DATA_PRECISION"),
        row.int("DATA_SCALE"),
        row.int("DATA_LENGTH"),
    );
    let native = parse_native_type(&db_type);
    let is_primary_key = row.int("KEY_POSITION").is_some();

    let builder = ColumnSchema::builder(name, db_type)
        .column_type(native.column_type)
        .size(native.size)
        .precision(native.precision)
        .scale(native.scale)
        .allow_null(row.text("NULLABLE").as_deref() == Some("Y"))
        .primary_key(is_primary_key)
        .auto_increment(is_primary_key && auto_increment)
        .comment(row.text("COLUMN_COMMENT"));

    Ok(with_default(builder, row.text("DATA_DEFAULT")).build()?)
}

fn with_default(builder: ColumnSchemaBuilder, raw: Option<String>) -> ColumnSchemaBuilder {
    let Some(raw) = raw else {
        return builder;
    };

    let lower = raw.to_ascii_lowercase();
    if lower.contains("timestamp") || lower.contains("sysdate") {
        return builder.default_value(Some(Value::Expression(raw.trim().to_string())));
    }

    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("null") {
        return builder;
    }
    let literal = match trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(quoted) => quoted.replace("''", "'"),
        None => trimmed.to_string(),
    };
    builder.raw_default(Some(&Value::String(literal)))
}

#[async_trait]
impl<E: Executor> SchemaIntrospector for OracleSchema<E> {
    fn dialect(&self) -> &'static dyn Dialect {
        SqlDialect::Oracle.dialect()
    }

    fn default_schema(&self) -> Option<&str> {
        Some(&self.default_schema)
    }

    fn separator(&self) -> &str {
        &self.separator
    }

    async fn inspect_table(&self, name: &str) -> Result<TableSchema, SchemaError> {
        let resolved = self.resolve_table_name(name);
        let rows = self.find_column_rows(&resolved).await?;
        let primary_key = primary_key_of(&rows);

        let sequence_name = match primary_key.as_slice() {
            [_] => self.find_sequence_name(&resolved.name).await?,
            _ => None,
        };

        let mut builder = TableSchema::builder(resolved.name.clone())
            .schema_name(resolved.schema_name.clone())
            .full_name(resolved.full_name.clone());
        for row in &rows {
            builder = builder.column(load_column(row, sequence_name.is_some())?)?;
        }
        builder = builder.primary_key(primary_key).sequence_name(sequence_name);

        for (column, reference) in self.find_foreign_keys(&resolved).await? {
            builder = builder.foreign_key(column, reference);
        }

        Ok(builder.build()?)
    }

    async fn find_table_names(&self, schema: &str) -> Result<Vec<String>, SchemaError> {
        let rows = if schema.is_empty() {
            self.executor
                .query_rows(TABLE_NAMES_DEFAULT_SQL, &Params::new())
                .await?
        } else {
            let mut params = Params::new();
            params.insert(":schema".into(), Value::from(schema));
            self.executor.query_rows(TABLE_NAMES_OWNER_SQL, &params).await?
        };
        Ok(rows.iter().filter_map(|row| row.text("TABLE_NAME")).collect())
    }

    /// Returns an empty statement when no sequence feeds the table.
    async fn reset_sequence(&self, table: &str, value: Option<i64>) -> Result<String, SchemaError> {
        let schema = table_for_reset(self, table).await?;
        if schema.sequence_name().is_none() {
            debug!("Table '{table}' has no sequence to reset");
            return Ok(String::new());
        }

        let builder = self.query_builder();
        let value = match value {
            Some(value) => value,
            None => next_key_value(&self.executor, &builder, &schema).await?,
        };
        Ok(builder.reset_sequence(&schema, value)?)
    }
}
