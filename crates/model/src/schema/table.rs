//! Table-level metadata aggregated from column and constraint catalogs.

use crate::schema::{column::ColumnSchema, error::SchemaInvariantError};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyRef {
    pub referenced_table: String,
    pub referenced_column: String,
    pub constraint_name: Option<String>,
}

/// Metadata of one table or view.
///
/// Built once per introspection through [`TableSchemaBuilder`]; a refreshed
/// schema is a new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    name: String,
    schema_name: Option<String>,
    full_name: String,
    columns: IndexMap<String, ColumnSchema>,
    primary_key: Vec<String>,
    foreign_keys: IndexMap<String, ForeignKeyRef>,
    sequence_name: Option<String>,
}

impl TableSchema {
    pub fn builder(name: impl Into<String>) -> TableSchemaBuilder {
        TableSchemaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    /// The name as it should be referenced from the current connection:
    /// schema-qualified only when the schema is not the connection default.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Columns in database ordinal order.
    pub fn columns(&self) -> &IndexMap<String, ColumnSchema> {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.get(name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// The primary key column when the key is not composite.
    pub fn single_primary_key(&self) -> Option<&str> {
        match self.primary_key.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    pub fn foreign_keys(&self) -> &IndexMap<String, ForeignKeyRef> {
        &self.foreign_keys
    }

    pub fn sequence_name(&self) -> Option<&str> {
        self.sequence_name.as_deref()
    }

    /// Checks that the primary key and foreign keys only name known columns.
    pub fn validate(&self) -> Result<(), SchemaInvariantError> {
        if let Some(column) = self
            .primary_key
            .iter()
            .find(|c| !self.columns.contains_key(c.as_str()))
        {
            return Err(SchemaInvariantError::UnknownPrimaryKeyColumn {
                table: self.name.clone(),
                column: column.clone(),
            });
        }

        if let Some(column) = self
            .foreign_keys
            .keys()
            .find(|c| !self.columns.contains_key(c.as_str()))
        {
            return Err(SchemaInvariantError::UnknownForeignKeyColumn {
                table: self.name.clone(),
                column: column.clone(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TableSchemaBuilder {
    table: TableSchema,
}

impl TableSchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table: TableSchema {
                full_name: name.clone(),
                name,
                schema_name: None,
                columns: IndexMap::new(),
                primary_key: Vec::new(),
                foreign_keys: IndexMap::new(),
                sequence_name: None,
            },
        }
    }

    pub fn schema_name(mut self, schema_name: Option<String>) -> Self {
        self.table.schema_name = schema_name;
        self
    }

    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.table.full_name = full_name.into();
        self
    }

    /// Appends a column; primary-key columns are added to the key in call order.
    pub fn column(mut self, column: ColumnSchema) -> Result<Self, SchemaInvariantError> {
        if self.table.columns.contains_key(column.name()) {
            return Err(SchemaInvariantError::DuplicateColumn {
                table: self.table.name.clone(),
                column: column.name().to_string(),
            });
        }
        if column.is_primary_key() {
            self.table.primary_key.push(column.name().to_string());
        }
        self.table.columns.insert(column.name().to_string(), column);
        Ok(self)
    }

    /// Overrides the primary key order, for catalogs that report it separately.
    pub fn primary_key(mut self, columns: Vec<String>) -> Self {
        self.table.primary_key = columns;
        self
    }

    pub fn foreign_key(mut self, column: impl Into<String>, reference: ForeignKeyRef) -> Self {
        self.table.foreign_keys.insert(column.into(), reference);
        self
    }

    pub fn sequence_name(mut self, sequence_name: Option<String>) -> Self {
        self.table.sequence_name = sequence_name;
        self
    }

    pub fn peek(&self) -> &TableSchema {
        &self.table
    }

    pub fn build(self) -> Result<TableSchema, SchemaInvariantError> {
        self.table.validate()?;
        Ok(self.table)
    }
}
