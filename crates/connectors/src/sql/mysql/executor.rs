use crate::sql::{
    base::{
        error::{ConnectorError, DbError},
        executor::{Executor, Row},
    },
    mysql::params::{from_mysql_row, to_mysql_params},
};
use async_trait::async_trait;
use model::core::params::Params;
use mysql_async::{Opts, Pool, Row as MySqlRow, prelude::*};
use tracing::{debug, info};

/// Executes catalog queries over a `mysql_async` connection pool.
#[derive(Clone)]
pub struct MySqlExecutor {
    pool: Pool,
}

impl MySqlExecutor {
    pub fn connect(url: &str) -> Result<Self, ConnectorError> {
        let opts = Opts::from_url(url)?;
        info!("Opening MySQL pool for '{}'", opts.ip_or_hostname());
        Ok(Self {
            pool: Pool::new(opts),
        })
    }

    pub async fn ping(&self) -> Result<(), DbError> {
        let mut conn = self.pool.get_conn().await?;
        let value: Option<i32> = conn.query_first("SELECT 1").await?;
        match value {
            Some(1) => Ok(()),
            other => Err(DbError::Unknown(format!(
                "MySQL ping returned unexpected result: {other:?}"
            ))),
        }
    }

    /// Runs a statement that returns no rows; yields the affected row count.
    pub async fn execute(&self, sql: &str, params: &Params) -> Result<u64, DbError> {
        let mut conn = self.pool.get_conn().await?;
        debug!("Executing: {sql}");
        if params.is_empty() {
            conn.query_drop(sql).await?;
        } else {
            conn.exec_drop(sql, to_mysql_params(params)).await?;
        }
        Ok(conn.affected_rows())
    }

    pub async fn disconnect(self) -> Result<(), DbError> {
        self.pool.disconnect().await?;
        Ok(())
    }
}

#[async_trait]
impl Executor for MySqlExecutor {
    async fn query_rows(&self, sql: &str, params: &Params) -> Result<Vec<Row>, DbError> {
        let mut conn = self.pool.get_conn().await?;
        debug!(params = params.len(), "Querying: {sql}");

        // Prepared statements are only needed when something is bound.
        let rows: Vec<MySqlRow> = if params.is_empty() {
            conn.query(sql).await?
        } else {
            conn.exec(sql, to_mysql_params(params)).await?
        };
        Ok(rows.iter().map(from_mysql_row).collect())
    }
}
