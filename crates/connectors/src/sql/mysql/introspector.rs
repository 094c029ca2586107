//! MySQL and MariaDB catalog introspection.

use crate::sql::{
    base::{
        error::{DbError, SchemaError},
        executor::{Executor, Row, RowExt},
        introspector::{ResolvedName, SchemaIntrospector, next_key_value, table_for_reset},
    },
    mysql::data_type::parse_native_type,
};
use async_trait::async_trait;
use lazy_static::lazy_static;
use model::{
    core::{abstract_type::AbstractType, params::Params, value::Value},
    schema::{
        column::{ColumnSchema, ColumnSchemaBuilder},
        table::{ForeignKeyRef, TableSchema},
    },
};
use planner::query::dialect::{Dialect, SqlDialect};
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref CURRENT_TIMESTAMP: Regex =
        Regex::new(r"(?i)^current_timestamp(?:\(\d*\))?$").expect("valid regex");
    static ref BIT_LITERAL: Regex = Regex::new(r"^b'([01]+)'$").expect("valid regex");
}

const FOREIGN_KEYS_SQL: &str = include_str!("sql/foreign_keys.sql");

/// Reads MySQL metadata through `SHOW FULL COLUMNS` and `information_schema`.
pub struct MySqlSchema<E> {
    executor: E,
    default_schema: Option<String>,
    separator: String,
}

impl<E: Executor> MySqlSchema<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            default_schema: None,
            separator: "\n".to_string(),
        }
    }

    /// Database assumed for unqualified table names. Without one the
    /// connection's current database is used.
    pub fn with_default_schema(mut self, schema: Option<String>) -> Self {
        self.default_schema = schema;
        self
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    async fn find_columns(&self, resolved: &ResolvedName) -> Result<Vec<ColumnSchema>, SchemaError> {
        let target = match &resolved.schema_name {
            Some(schema) => format!("{schema}.{}", resolved.name),
            None => resolved.name.clone(),
        };
        let sql = format!("SHOW FULL COLUMNS FROM {}", self.quote_table_name(&target));
        debug!("Reading columns: {sql}");

        let rows = match self.executor.query_rows(&sql, &Params::new()).await {
            Ok(rows) => rows,
            Err(err) if err.is_missing_table() => {
                return Err(SchemaError::NotFound(resolved.full_name.clone()));
            }
            Err(err) => return Err(SchemaError::Catalog(err)),
        };
        if rows.is_empty() {
            return Err(SchemaError::NotFound(resolved.full_name.clone()));
        }

        rows.iter().map(load_column).collect()
    }

    async fn find_foreign_keys(
        &self,
        resolved: &ResolvedName,
    ) -> Result<Vec<(String, ForeignKeyRef)>, SchemaError> {
        let mut params = Params::new();
        params.insert(
            ":schemaName".into(),
            resolved.schema_name.clone().map_or(Value::Null, Value::String),
        );
        params.insert(":tableName".into(), Value::from(resolved.name.as_str()));

        let rows = self.executor.query_rows(FOREIGN_KEYS_SQL, &params).await?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let column = row.text("column_name")?;
                let reference = ForeignKeyRef {
                    referenced_table: row.text("referenced_table_name")?,
                    referenced_column: row.text("referenced_column_name")?,
                    constraint_name: row.text("constraint_name"),
                };
                Some((column, reference))
            })
            .collect())
    }
}

fn load_column(row: &Row) -> Result<ColumnSchema, SchemaError> {
    let name = row
        .text("Field")
        .ok_or_else(|| DbError::Conversion("column row without 'Field'".into()))?;
    let db_type = row.text("Type").unwrap_or_default();
    let native = parse_native_type(&db_type);
    let extra = row.text("Extra").unwrap_or_default().to_ascii_lowercase();
    let is_primary_key = row.text("Key").is_some_and(|key| key.contains("PRI"));

    let builder = ColumnSchema::builder(name, db_type)
        .column_type(native.column_type)
        .size(native.size)
        .precision(native.precision)
        .scale(native.scale)
        .unsigned(native.unsigned)
        .enum_values(native.enum_values)
        .allow_null(row.text("Null").as_deref() == Some("YES"))
        .primary_key(is_primary_key)
        .auto_increment(extra.contains("auto_increment"))
        .comment(row.text("Comment"));

    let builder = if is_primary_key {
        builder
    } else {
        with_default(builder, row.field("Default"))
    };
    Ok(builder.build()?)
}

fn with_default(builder: ColumnSchemaBuilder, raw: Option<&Value>) -> ColumnSchemaBuilder {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return builder;
    };
    let text = raw.as_string().unwrap_or_default();
    let column_type = builder.peek().column_type();

    if matches!(
        column_type,
        AbstractType::Timestamp | AbstractType::DateTime | AbstractType::Date | AbstractType::Time
    ) && CURRENT_TIMESTAMP.is_match(&text)
    {
        return builder.default_value(Some(Value::Expression(text)));
    }

    if builder.peek().db_type().to_ascii_lowercase().starts_with("bit")
        && let Some(caps) = BIT_LITERAL.captures(&text)
        && let Ok(bits) = i64::from_str_radix(&caps[1], 2)
    {
        return builder.raw_default(Some(&Value::Int(bits)));
    }

    builder.raw_default(Some(raw))
}

#[async_trait]
impl<E: Executor> SchemaIntrospector for MySqlSchema<E> {
    fn dialect(&self) -> &'static dyn Dialect {
        SqlDialect::MySql.dialect()
    }

    fn default_schema(&self) -> Option<&str> {
        self.default_schema.as_deref()
    }

    fn separator(&self) -> &str {
        &self.separator
    }

    async fn inspect_table(&self, name: &str) -> Result<TableSchema, SchemaError> {
        let resolved = self.resolve_table_name(name);
        let columns = self.find_columns(&resolved).await?;

        // MySQL keeps the auto-increment counter on the table itself. Only a
        // single-column key can be reset through it.
        let primary_key: Vec<&ColumnSchema> =
            columns.iter().filter(|c| c.is_primary_key()).collect();
        let sequence_name = match primary_key.as_slice() {
            [only] if only.auto_increment() => Some(resolved.name.clone()),
            _ => None,
        };

        let mut builder = TableSchema::builder(resolved.name.clone())
            .schema_name(resolved.schema_name.clone())
            .full_name(resolved.full_name.clone())
            .sequence_name(sequence_name);
        for column in columns {
            builder = builder.column(column)?;
        }
        for (column, reference) in self.find_foreign_keys(&resolved).await? {
            builder = builder.foreign_key(column, reference);
        }

        Ok(builder.build()?)
    }

    async fn find_table_names(&self, schema: &str) -> Result<Vec<String>, SchemaError> {
        let sql = if schema.is_empty() {
            "SHOW TABLES".to_string()
        } else {
            format!("SHOW TABLES FROM {}", self.quote_simple_table_name(schema))
        };
        debug!("Listing tables: {sql}");

        let rows = self.executor.query_rows(&sql, &Params::new()).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.values().next().and_then(Value::as_string))
            .collect())
    }

    async fn reset_sequence(&self, table: &str, value: Option<i64>) -> Result<String, SchemaError> {
        let schema = table_for_reset(self, table).await?;
        if schema.sequence_name().is_none() {
            return Err(SchemaError::Configuration(format!(
                "There is no sequence associated with table '{table}'"
            )));
        }

        let builder = self.query_builder();
        let value = match value {
            Some(value) => value,
            None => next_key_value(&self.executor, &builder, &schema).await?,
        };
        Ok(builder.reset_sequence(&schema, value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::base::stub::{StubExecutor, row};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tracing_test::traced_test;

    fn column_row(
        field: &str,
        db_type: &str,
        null: &str,
        key: &str,
        default: Value,
        extra: &str,
    ) -> Row {
        row(&[
            ("Field", Value::from(field)),
            ("Type", Value::from(db_type)),
            ("Collation", Value::Null),
            ("Null", Value::from(null)),
            ("Key", Value::from(key)),
            ("Default", default),
            ("Extra", Value::from(extra)),
            ("Privileges", Value::from("select,insert,update")),
            ("Comment", Value::from("")),
        ])
    }

    fn t_columns() -> Vec<Row> {
        vec![
            column_row("id", "int(11)", "NO", "PRI", Value::Null, "auto_increment"),
            column_row("name", "varchar(50)", "NO", "", Value::Null, ""),
            column_row("price", "decimal(8,2)", "YES", "", Value::from("0.00"), ""),
        ]
    }

    fn schema(executor: StubExecutor) -> (Arc<StubExecutor>, MySqlSchema<Arc<StubExecutor>>) {
        let executor = Arc::new(executor);
        (Arc::clone(&executor), MySqlSchema::new(executor))
    }

    #[tokio::test]
    async fn inspects_a_simple_table() {
        let (executor, schema) = schema(StubExecutor::new().on("SHOW FULL COLUMNS", t_columns()));

        let table = schema.load_table_schema("t").await.unwrap();
        assert_eq!(table.name(), "t");
        assert_eq!(table.full_name(), "t");
        assert_eq!(table.column_names(), vec!["id", "name", "price"]);
        assert_eq!(table.primary_key(), ["id"]);
        assert_eq!(table.sequence_name(), Some("t"));

        let id = table.column("id").unwrap();
        assert_eq!(id.column_type(), AbstractType::Integer);
        assert!(id.auto_increment());
        assert!(!id.allow_null());
        assert_eq!(id.default_value(), None);

        let name = table.column("name").unwrap();
        assert_eq!(name.column_type(), AbstractType::String);
        assert_eq!(name.size(), Some(50));
        assert!(!name.allow_null());
        assert_eq!(name.default_value(), None);

        let price = table.column("price").unwrap();
        assert_eq!(price.column_type(), AbstractType::Decimal);
        assert_eq!((price.precision(), price.scale()), (Some(8), Some(2)));
        assert!(price.allow_null());
        assert_eq!(price.default_value(), Some(&Value::from("0.00")));

        assert_eq!(executor.calls()[0].0, "SHOW FULL COLUMNS FROM `t`");
    }

    #[tokio::test]
    async fn qualified_names_keep_their_schema() {
        let (executor, schema) = schema(StubExecutor::new().on("SHOW FULL COLUMNS", t_columns()));

        let table = schema.inspect_table("shop.t").await.unwrap();
        assert_eq!(table.schema_name(), Some("shop"));
        assert_eq!(table.full_name(), "shop.t");

        let calls = executor.calls();
        assert_eq!(calls[0].0, "SHOW FULL COLUMNS FROM `shop`.`t`");
        let (_, fk_params) = calls
            .iter()
            .find(|(sql, _)| sql.contains("REFERENTIAL_CONSTRAINTS"))
            .unwrap();
        assert_eq!(fk_params[":schemaName"], Value::from("shop"));
        assert_eq!(fk_params[":tableName"], Value::from("t"));
    }

    #[tokio::test]
    #[traced_test]
    async fn missing_table_loads_as_none() {
        let (_, schema) = schema(StubExecutor::new());

        assert!(schema.load_table_schema("nope").await.is_none());
        assert!(schema.inspect_table("nope").await.unwrap_err().is_not_found());
        assert!(logs_contain("Table 'nope' not found"));
    }

    #[tokio::test]
    #[traced_test]
    async fn catalog_failure_is_distinguishable() {
        let (_, schema) = schema(StubExecutor::new().fail_on("SHOW FULL COLUMNS", "lost connection"));

        assert!(schema.load_table_schema("t").await.is_none());
        assert!(logs_contain("Failed to load schema of table 't'"));

        let err = schema.inspect_table("t").await.unwrap_err();
        assert!(matches!(err, SchemaError::Catalog(DbError::Unknown(_))));
    }

    #[tokio::test]
    async fn foreign_key_failure_is_a_catalog_error() {
        let (_, schema) = schema(
            StubExecutor::new()
                .on("SHOW FULL COLUMNS", t_columns())
                .fail_on("REFERENTIAL_CONSTRAINTS", "denied"),
        );
        let err = schema.inspect_table("t").await.unwrap_err();
        assert!(matches!(err, SchemaError::Catalog(_)));
    }

    #[tokio::test]
    async fn composite_primary_key_follows_column_order() {
        let (_, schema) = schema(StubExecutor::new().on(
            "SHOW FULL COLUMNS",
            vec![
                column_row("order_id", "int(11)", "NO", "PRI", Value::Null, ""),
                column_row("item_id", "int(11)", "NO", "PRI", Value::Null, ""),
                column_row("qty", "smallint(6)", "NO", "", Value::from("1"), ""),
            ],
        ));

        let table = schema.inspect_table("order_item").await.unwrap();
        assert_eq!(table.primary_key(), ["order_id", "item_id"]);
        assert_eq!(table.sequence_name(), None);
        assert_eq!(table.column("qty").unwrap().default_value(), Some(&Value::Int(1)));
    }

    #[tokio::test]
    async fn composite_key_with_auto_increment_has_no_sequence() {
        let (_, schema) = schema(StubExecutor::new().on(
            "SHOW FULL COLUMNS",
            vec![
                column_row("tenant_id", "int(11)", "NO", "PRI", Value::Null, ""),
                column_row("id", "int(11)", "NO", "PRI", Value::Null, "auto_increment"),
            ],
        ));

        let table = schema.inspect_table("ledger").await.unwrap();
        assert_eq!(table.primary_key(), ["tenant_id", "id"]);
        assert!(table.column("id").unwrap().auto_increment());
        assert_eq!(table.sequence_name(), None);

        let err = schema.reset_sequence("ledger", Some(1)).await.unwrap_err();
        assert!(matches!(err, SchemaError::Configuration(_)));
    }

    #[tokio::test]
    async fn default_schema_qualifies_unqualified_names() {
        let executor = Arc::new(StubExecutor::new().on("SHOW FULL COLUMNS", t_columns()));
        let schema = MySqlSchema::new(Arc::clone(&executor))
            .with_default_schema(Some("shop".into()))
            .with_separator(" ");

        let table = schema.inspect_table("t").await.unwrap();
        assert_eq!(table.schema_name(), Some("shop"));
        assert_eq!(table.full_name(), "t");
        assert_eq!(executor.calls()[0].0, "SHOW FULL COLUMNS FROM `shop`.`t`");

        let other = schema.inspect_table("crm.t").await.unwrap();
        assert_eq!(other.full_name(), "crm.t");
        assert_eq!(schema.query_builder().separator(), " ");
    }

    #[tokio::test]
    async fn foreign_keys_are_keyed_by_local_column() {
        let (_, schema) = schema(
            StubExecutor::new()
                .on(
                    "SHOW FULL COLUMNS",
                    vec![
                        column_row("id", "int(11)", "NO", "PRI", Value::Null, "auto_increment"),
                        column_row("author_id", "int(11)", "NO", "MUL", Value::Null, ""),
                    ],
                )
                .on(
                    "REFERENTIAL_CONSTRAINTS",
                    vec![row(&[
                        ("constraint_name", Value::from("fk_post_author")),
                        ("column_name", Value::from("author_id")),
                        ("referenced_table_name", Value::from("user")),
                        ("referenced_column_name", Value::from("id")),
                    ])],
                ),
        );

        let table = schema.inspect_table("post").await.unwrap();
        assert_eq!(
            table.foreign_keys()["author_id"],
            ForeignKeyRef {
                referenced_table: "user".into(),
                referenced_column: "id".into(),
                constraint_name: Some("fk_post_author".into()),
            }
        );
    }

    #[tokio::test]
    async fn special_defaults() {
        let (_, schema) = schema(StubExecutor::new().on(
            "SHOW FULL COLUMNS",
            vec![
                column_row("id", "int(11)", "NO", "PRI", Value::from("0"), ""),
                column_row(
                    "created_at",
                    "timestamp",
                    "NO",
                    "",
                    Value::from("CURRENT_TIMESTAMP"),
                    "DEFAULT_GENERATED",
                ),
                column_row("flags", "bit(8)", "NO", "", Value::from("b'101'"), ""),
                column_row("active", "tinyint(1)", "NO", "", Value::from("1"), ""),
                column_row(
                    "status",
                    "enum('draft','live')",
                    "NO",
                    "",
                    Value::from("draft"),
                    "",
                ),
            ],
        ));

        let table = schema.inspect_table("t").await.unwrap();
        assert_eq!(table.column("id").unwrap().default_value(), None);
        assert_eq!(
            table.column("created_at").unwrap().default_value(),
            Some(&Value::Expression("CURRENT_TIMESTAMP".into()))
        );
        assert_eq!(table.column("flags").unwrap().default_value(), Some(&Value::Int(5)));
        assert_eq!(
            table.column("active").unwrap().default_value(),
            Some(&Value::Boolean(true))
        );
        let status = table.column("status").unwrap();
        assert_eq!(status.enum_values(), ["draft", "live"]);
        assert_eq!(status.default_value(), Some(&Value::from("draft")));
    }

    #[tokio::test]
    async fn lists_tables() {
        let tables = vec![
            row(&[("Tables_in_shop", Value::from("customer"))]),
            row(&[("Tables_in_shop", Value::from("order"))]),
        ];
        let (executor, schema) = schema(StubExecutor::new().on("SHOW TABLES", tables));

        assert_eq!(schema.find_table_names("").await.unwrap(), vec!["customer", "order"]);
        schema.find_table_names("shop").await.unwrap();
        assert_eq!(executor.calls()[1].0, "SHOW TABLES FROM `shop`");
    }

    #[tokio::test]
    async fn reset_sequence_with_explicit_value() {
        let (executor, schema) = schema(StubExecutor::new().on("SHOW FULL COLUMNS", t_columns()));

        let sql = schema.reset_sequence("t", Some(5)).await.unwrap();
        assert_eq!(sql, "ALTER TABLE `t` AUTO_INCREMENT=5");
        assert_eq!(executor.count("SELECT MAX"), 0);
    }

    #[tokio::test]
    async fn reset_sequence_continues_after_largest_key() {
        let (_, schema) = schema(
            StubExecutor::new()
                .on("SHOW FULL COLUMNS", t_columns())
                .on("SELECT MAX(`id`) FROM `t`", vec![row(&[("MAX(`id`)", Value::Int(41))])]),
        );
        assert_eq!(
            schema.reset_sequence("t", None).await.unwrap(),
            "ALTER TABLE `t` AUTO_INCREMENT=42"
        );
    }

    #[tokio::test]
    async fn reset_sequence_on_empty_table_starts_at_one() {
        let (_, schema) = schema(
            StubExecutor::new()
                .on("SHOW FULL COLUMNS", t_columns())
                .on("SELECT MAX", vec![row(&[("MAX(`id`)", Value::Null)])]),
        );
        assert_eq!(
            schema.reset_sequence("t", None).await.unwrap(),
            "ALTER TABLE `t` AUTO_INCREMENT=1"
        );
    }

    #[tokio::test]
    async fn reset_sequence_refuses_an_exhausted_key() {
        let (_, schema) = schema(
            StubExecutor::new()
                .on("SHOW FULL COLUMNS", t_columns())
                .on("SELECT MAX", vec![row(&[("MAX(`id`)", Value::Int(i64::MAX))])]),
        );
        let err = schema.reset_sequence("t", None).await.unwrap_err();
        assert!(matches!(err, SchemaError::Configuration(_)));
        assert!(err.to_string().contains("exhausted"));
    }

    #[tokio::test]
    async fn reset_sequence_configuration_errors() {
        let (_, schema) = schema(StubExecutor::new());
        let err = schema.reset_sequence("nope", Some(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration: Table not found: nope");

        let (_, schema) = schema_without_sequence();
        let err = schema.reset_sequence("t", Some(1)).await.unwrap_err();
        assert!(matches!(err, SchemaError::Configuration(_)));
    }

    fn schema_without_sequence() -> (Arc<StubExecutor>, MySqlSchema<Arc<StubExecutor>>) {
        schema(StubExecutor::new().on(
            "SHOW FULL COLUMNS",
            vec![column_row("id", "int(11)", "NO", "PRI", Value::Null, "")],
        ))
    }
}
