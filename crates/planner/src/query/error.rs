use thiserror::Error;

/// Errors raised while turning a query description or a type string into SQL.
/// All of them are configuration problems; none is worth retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown column type: {0}")]
    UnknownColumnType(String),

    #[error("There is no sequence associated with table '{0}'")]
    NoSequence(String),

    #[error("Table '{0}' has no primary key")]
    NoPrimaryKey(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}
