use crate::error::CliError;
use model::schema::table::TableSchema;

pub fn print_json(table: &TableSchema) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(table)?;
    println!("{json}");
    Ok(())
}

pub fn print_table(table: &TableSchema) {
    println!("Table '{}':", table.full_name());
    println!("{:-<72}", "");
    println!("{:<24} {:<20} {:<10} {:<5} Default", "Column", "DB type", "Type", "Null");
    for column in table.columns().values() {
        let default = column
            .default_value()
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        println!(
            "{:<24} {:<20} {:<10} {:<5} {}",
            column.name(),
            column.db_type(),
            column.column_type().as_str(),
            if column.allow_null() { "YES" } else { "NO" },
            default
        );
    }
    println!("{:-<72}", "");
    println!("{:<16} {}", "Primary key", table.primary_key().join(", "));
    println!("{:<16} {}", "Sequence", table.sequence_name().unwrap_or("n/a"));
    for (column, reference) in table.foreign_keys() {
        println!(
            "{:<16} {column} -> {}.{}",
            "Foreign key", reference.referenced_table, reference.referenced_column
        );
    }
}
