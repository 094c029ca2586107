use thiserror::Error;

/// Violations of the structural rules a table description must satisfy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaInvariantError {
    #[error("Column '{0}' is auto-increment but not part of the primary key")]
    AutoIncrementWithoutPrimaryKey(String),

    #[error("Primary key column '{column}' is not a column of table '{table}'")]
    UnknownPrimaryKeyColumn { table: String, column: String },

    #[error("Foreign key column '{column}' is not a column of table '{table}'")]
    UnknownForeignKeyColumn { table: String, column: String },

    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },
}
