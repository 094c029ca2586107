use crate::{
    commands::{Commands, DescribeFormat},
    error::CliError,
};
use clap::Parser;
use connectors::{config::ConnectionConfig, sql::base::introspector::SchemaIntrospector};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod error;
mod output;

#[derive(Parser)]
#[command(name = "sqlscope", version = "0.1.0", about = "Schema introspection and SQL generation")]
struct Cli {
    #[arg(long, global = true, help = "Connection config file (JSON)")]
    config: Option<String>,

    #[arg(long, global = true, env = "SQLSCOPE_URL", help = "Connection URL")]
    url: Option<String>,

    #[arg(long, global = true, env = "SQLSCOPE_DIALECT", help = "SQL dialect: mysql or oracle")]
    dialect: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn connection_config(&self) -> Result<ConnectionConfig, CliError> {
        let base = self
            .config
            .as_deref()
            .map(ConnectionConfig::from_file)
            .transpose()?;
        Ok(ConnectionConfig::merge(
            base,
            self.dialect.as_deref(),
            self.url.clone(),
        )?)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.connection_config()?;

    match cli.command {
        Commands::Ping => conn::ping(&config).await?,
        Commands::Tables { schema } => {
            let introspector = conn::open_schema(&config)?;
            for name in introspector.find_table_names(&schema).await? {
                println!("{name}");
            }
        }
        Commands::Describe { table, format } => {
            let introspector = conn::open_schema(&config)?;
            let schema = introspector
                .load_table_schema(&table)
                .await
                .ok_or(CliError::TableNotFound(table))?;
            match format {
                DescribeFormat::Json => output::print_json(&schema)?,
                DescribeFormat::Text => output::print_table(&schema),
            }
        }
        Commands::ResetSequence { table, value } => {
            let introspector = conn::open_schema(&config)?;
            let sql = introspector.reset_sequence(&table, value).await?;
            info!("Generated sequence reset for '{table}'");
            println!("{sql}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner::query::dialect::SqlDialect;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_build_the_connection_config() {
        let cli = Cli::try_parse_from([
            "sqlscope",
            "--url",
            "mysql://root@localhost/shop",
            "--dialect",
            "mariadb",
            "describe",
            "t",
            "--format",
            "text",
        ])
        .unwrap();

        let config = cli.connection_config().unwrap();
        assert_eq!(config.dialect, SqlDialect::MySql);
        assert_eq!(config.url, "mysql://root@localhost/shop");
        assert!(matches!(
            cli.command,
            Commands::Describe { ref table, format: DescribeFormat::Text } if table == "t"
        ));
    }

    #[test]
    fn reset_sequence_takes_an_optional_value() {
        let cli = Cli::try_parse_from([
            "sqlscope",
            "--url",
            "mysql://root@localhost/shop",
            "reset-sequence",
            "orders",
            "--value",
            "100",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::ResetSequence { ref table, value: Some(100) } if table == "orders"
        ));
    }

    #[test]
    fn unknown_dialect_is_rejected() {
        let cli = Cli::try_parse_from(["sqlscope", "--url", "x://u@h/d", "--dialect", "pg", "ping"])
            .unwrap();
        assert!(matches!(cli.connection_config(), Err(CliError::Config(_))));
    }
}
