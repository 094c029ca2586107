//! The seam between introspection and a database driver.

use crate::sql::base::error::DbError;
use async_trait::async_trait;
use indexmap::IndexMap;
use model::core::{params::Params, value::Value};

/// One result row, keyed by column name exactly as the server reports it.
pub type Row = IndexMap<String, Value>;

#[async_trait]
pub trait Executor: Send + Sync {
    /// Runs `sql` with named parameters and returns all rows.
    async fn query_rows(&self, sql: &str, params: &Params) -> Result<Vec<Row>, DbError>;

    /// First column of the first row; `None` when there are no rows.
    async fn query_scalar(&self, sql: &str, params: &Params) -> Result<Option<Value>, DbError> {
        let rows = self.query_rows(sql, params).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next().map(|(_, value)| value)))
    }
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for std::sync::Arc<E> {
    async fn query_rows(&self, sql: &str, params: &Params) -> Result<Vec<Row>, DbError> {
        (**self).query_rows(sql, params).await
    }

    async fn query_scalar(&self, sql: &str, params: &Params) -> Result<Option<Value>, DbError> {
        (**self).query_scalar(sql, params).await
    }
}

/// Row accessors tolerant to the case the server uses for column names.
pub trait RowExt {
    fn field(&self, name: &str) -> Option<&Value>;

    fn text(&self, name: &str) -> Option<String> {
        self.field(name).filter(|v| !v.is_null()).and_then(Value::as_string)
    }

    fn int(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(Value::as_i64)
    }
}

impl RowExt for Row {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name).or_else(|| {
            self.iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
    }
}
