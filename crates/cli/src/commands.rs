use clap::{Subcommand, ValueEnum};

#[derive(Subcommand)]
pub enum Commands {
    /// List the tables and views of a schema
    Tables {
        #[arg(long, default_value = "", help = "Schema to list; empty means the default schema")]
        schema: String,
    },
    /// Print the introspected metadata of one table
    Describe {
        table: String,

        #[arg(long, value_enum, default_value_t = DescribeFormat::Json)]
        format: DescribeFormat,
    },
    /// Print the statement that restarts a table's key sequence
    ResetSequence {
        table: String,

        #[arg(long, help = "Next key value; defaults to the largest key plus one")]
        value: Option<i64>,
    },
    /// Check that the database answers
    Ping,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DescribeFormat {
    Json,
    Text,
}
