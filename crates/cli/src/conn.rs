use crate::error::CliError;
use connectors::{
    config::ConnectionConfig,
    sql::{
        base::error::ConnectorError,
        mysql::{executor::MySqlExecutor, introspector::MySqlSchema},
    },
};
use planner::query::dialect::SqlDialect;
use tracing::{error, info, warn};

/// Opens an introspector for the configured database. Only MySQL ships with
/// an executor.
pub fn open_schema(config: &ConnectionConfig) -> Result<MySqlSchema<MySqlExecutor>, CliError> {
    match config.dialect {
        SqlDialect::MySql => {
            let executor = MySqlExecutor::connect(&config.url)?;
            Ok(config.mysql_schema(executor))
        }
        SqlDialect::Oracle => {
            error!("No executor is available for dialect '{}'", config.dialect);
            Err(ConnectorError::UnsupportedDialect(config.dialect.to_string()).into())
        }
    }
}

pub async fn ping(config: &ConnectionConfig) -> Result<(), CliError> {
    info!("Pinging {} database", config.dialect);
    let schema = open_schema(config)?;
    let executor = schema.executor().clone();

    if let Err(err) = executor.ping().await {
        error!("Ping failed: {err}");
        return Err(err.into());
    }

    info!("Ping succeeded");
    if let Err(err) = executor.disconnect().await {
        warn!("Failed to close connection pool: {err}");
    }
    Ok(())
}
