use planner::query::error::QueryError;
use model::schema::error::SchemaInvariantError;
use thiserror::Error;

/// MySQL server code for "table doesn't exist".
const ER_NO_SUCH_TABLE: u16 = 1146;

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Any MySQL driver error.
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// A driver value could not be mapped to a host value.
    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl DbError {
    pub fn is_missing_table(&self) -> bool {
        matches!(
            self,
            DbError::MySql(mysql_async::Error::Server(err)) if err.code == ER_NO_SUCH_TABLE
        )
    }
}

/// Errors happening during executor or connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid connection URL: {0}")]
    Url(#[from] mysql_async::UrlError),

    #[error("MySQL connector creation failed: {0}")]
    MySql(#[from] mysql_async::Error),

    #[error("No executor available for dialect: {0}")]
    UnsupportedDialect(String),
}

/// Errors raised by schema introspection.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Table '{0}' does not exist")]
    NotFound(String),

    #[error("Catalog query failed: {0}")]
    Catalog(#[from] DbError),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Inconsistent catalog data: {0}")]
    Invariant(#[from] SchemaInvariantError),
}

impl SchemaError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SchemaError::NotFound(_))
    }
}
