use crate::query::{
    dialect::{Dialect, SqlDialect},
    pagination::{has_limit, has_offset},
};
use lazy_static::lazy_static;
use model::core::abstract_type::AbstractType;
use std::collections::HashMap;

/// Largest unsigned BIGINT; MySQL has no OFFSET without LIMIT.
const MAX_ROWS: &str = "18446744073709551615";

lazy_static! {
    static ref MYSQL_TYPE_MAP: HashMap<AbstractType, &'static str> = {
        use AbstractType::*;
        HashMap::from([
            (Pk, "int(11) NOT NULL AUTO_INCREMENT PRIMARY KEY"),
            (BigPk, "bigint(20) NOT NULL AUTO_INCREMENT PRIMARY KEY"),
            (String, "varchar(255)"),
            (Text, "text"),
            (SmallInt, "smallint(6)"),
            (Integer, "int(11)"),
            (BigInt, "bigint(20)"),
            (Float, "float"),
            (Double, "double"),
            (Decimal, "decimal(10,0)"),
            (DateTime, "datetime"),
            (Timestamp, "timestamp"),
            (Time, "time"),
            (Date, "date"),
            (Binary, "blob"),
            (Boolean, "tinyint(1)"),
            (Money, "decimal(19,4)"),
            (Json, "json"),
        ])
    };
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn kind(&self) -> SqlDialect {
        SqlDialect::MySql
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn type_map(&self) -> &'static HashMap<AbstractType, &'static str> {
        &MYSQL_TYPE_MAP
    }

    fn build_limit(&self, limit: Option<i64>, offset: Option<i64>) -> String {
        match (limit.filter(|_| has_limit(limit)), offset.filter(|_| has_offset(offset))) {
            (Some(limit), Some(offset)) => format!("LIMIT {limit} OFFSET {offset}"),
            (Some(limit), None) => format!("LIMIT {limit}"),
            (None, Some(offset)) => format!("LIMIT {offset}, {MAX_ROWS}"),
            (None, None) => String::new(),
        }
    }

    fn rename_table_sql(&self, old_name: &str, new_name: &str) -> String {
        format!("RENAME TABLE {old_name} TO {new_name}")
    }

    fn alter_column_sql(&self, table: &str, column: &str, column_type: &str) -> String {
        format!("ALTER TABLE {table} CHANGE {column} {column} {column_type}")
    }

    fn drop_index_sql(&self, name: &str, table: &str) -> String {
        format!("DROP INDEX {name} ON {table}")
    }

    /// MySQL keeps the counter on the table itself.
    fn reset_sequence_sql(&self, table: &str, _sequence: &str, value: i64) -> String {
        format!("ALTER TABLE {table} AUTO_INCREMENT={value}")
    }

    fn drop_primary_key_sql(&self, _name: &str, table: &str) -> String {
        format!("ALTER TABLE {table} DROP PRIMARY KEY")
    }

    fn drop_foreign_key_sql(&self, name: &str, table: &str) -> String {
        format!("ALTER TABLE {table} DROP FOREIGN KEY {name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_and_offset() {
        let d = MySql;
        assert_eq!(d.build_limit(Some(10), Some(20)), "LIMIT 10 OFFSET 20");
        assert_eq!(d.build_limit(Some(10), None), "LIMIT 10");
        assert_eq!(d.build_limit(Some(0), None), "LIMIT 0");
    }

    #[test]
    fn offset_without_limit_uses_max_rows() {
        assert_eq!(
            MySql.build_limit(None, Some(5)),
            "LIMIT 5, 18446744073709551615"
        );
        assert_eq!(
            MySql.build_limit(Some(-1), Some(5)),
            "LIMIT 5, 18446744073709551615"
        );
    }

    #[test]
    fn negative_limit_and_zero_offset_are_dropped() {
        assert_eq!(MySql.build_limit(Some(-1), Some(0)), "");
        assert_eq!(MySql.build_limit(None, None), "");
    }

    #[test]
    fn quotes_with_backticks() {
        assert_eq!(MySql.quote_table_name("shop.orders"), "`shop`.`orders`");
        assert_eq!(MySql.quote_column_name("id"), "`id`");
        assert_eq!(MySql.quote_simple_table_name("`t`"), "`t`");
    }
}
