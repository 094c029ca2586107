use connectors::{
    config::ConfigError,
    sql::base::error::{ConnectorError, DbError, SchemaError},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to load the connection configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to connect: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Table not found: {0}")]
    TableNotFound(String),
}
