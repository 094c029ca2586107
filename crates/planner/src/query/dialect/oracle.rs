use crate::query::{
    dialect::{Dialect, SqlDialect},
    pagination::{apply_row_filter, row_filter, wrap_as_named_subquery},
};
use lazy_static::lazy_static;
use model::core::abstract_type::AbstractType;
use std::collections::HashMap;

lazy_static! {
    static ref ORACLE_TYPE_MAP: HashMap<AbstractType, &'static str> = {
        use AbstractType::*;
        HashMap::from([
            (Pk, "NUMBER(10) NOT NULL PRIMARY KEY"),
            (BigPk, "NUMBER(20) NOT NULL PRIMARY KEY"),
            (String, "VARCHAR2(255)"),
            (Text, "CLOB"),
            (SmallInt, "NUMBER(5)"),
            (Integer, "NUMBER(10)"),
            (BigInt, "NUMBER(20)"),
            (Float, "NUMBER"),
            (Double, "NUMBER"),
            (Decimal, "NUMBER"),
            (DateTime, "TIMESTAMP"),
            (Timestamp, "TIMESTAMP"),
            (Time, "TIMESTAMP"),
            (Date, "DATE"),
            (Binary, "BLOB"),
            (Boolean, "NUMBER(1)"),
            (Money, "NUMBER(19,4)"),
            (Json, "CLOB"),
        ])
    };
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Oracle;

impl Dialect for Oracle {
    fn name(&self) -> &'static str {
        "Oracle"
    }

    fn kind(&self) -> SqlDialect {
        SqlDialect::Oracle
    }

    fn quote_char(&self) -> char {
        '"'
    }

    fn type_map(&self) -> &'static HashMap<AbstractType, &'static str> {
        &ORACLE_TYPE_MAP
    }

    fn like_escape(&self) -> (char, Option<&'static str>) {
        ('!', Some(" ESCAPE '!'"))
    }

    /// No LIMIT keyword: the ordered statement is wrapped and filtered on
    /// `rownum`.
    fn build_order_by_and_limit(
        &self,
        sql: String,
        order_by: &str,
        limit: Option<i64>,
        offset: Option<i64>,
        separator: &str,
    ) -> String {
        let mut sql = sql;
        if !order_by.is_empty() {
            sql.push_str(separator);
            sql.push_str(order_by);
        }

        match row_filter(limit, offset) {
            Some(filter) => apply_row_filter(&wrap_as_named_subquery(&sql), &filter),
            None => sql,
        }
    }

    fn rename_table_sql(&self, old_name: &str, new_name: &str) -> String {
        format!("ALTER TABLE {old_name} RENAME TO {new_name}")
    }

    fn alter_column_sql(&self, table: &str, column: &str, column_type: &str) -> String {
        format!("ALTER TABLE {table} MODIFY {column} {column_type}")
    }

    fn drop_index_sql(&self, name: &str, _table: &str) -> String {
        format!("DROP INDEX {name}")
    }

    fn reset_sequence_sql(&self, _table: &str, sequence: &str, value: i64) -> String {
        let sequence = self.quote_simple_table_name(sequence);
        format!(
            "DROP SEQUENCE {sequence};CREATE SEQUENCE {sequence} START WITH {value} INCREMENT BY 1 NOMAXVALUE NOCACHE"
        )
    }

    fn drop_primary_key_sql(&self, name: &str, table: &str) -> String {
        format!("ALTER TABLE {table} DROP CONSTRAINT {name}")
    }

    fn drop_foreign_key_sql(&self, name: &str, table: &str) -> String {
        format!("ALTER TABLE {table} DROP CONSTRAINT {name}")
    }

    fn supports_on_update(&self) -> bool {
        false
    }

    fn batch_insert_sql(&self, table: &str, columns: &str, rows: &[String]) -> String {
        let mut sql = String::from("INSERT ALL");
        for row in rows {
            sql.push_str(&format!(" INTO {table} ({columns}) VALUES {row}"));
        }
        sql.push_str(" SELECT 1 FROM SYS.DUAL");
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpaginated_sql_is_left_alone() {
        let sql = Oracle.build_order_by_and_limit(
            "SELECT *\nFROM \"t\"".into(),
            "ORDER BY \"id\"",
            Some(-1),
            None,
            "\n",
        );
        assert_eq!(sql, "SELECT *\nFROM \"t\"\nORDER BY \"id\"");
    }

    #[test]
    fn reset_sequence_recreates_the_sequence() {
        assert_eq!(
            Oracle.reset_sequence_sql("\"T\"", "T_SEQ", 42),
            "DROP SEQUENCE \"T_SEQ\";CREATE SEQUENCE \"T_SEQ\" START WITH 42 INCREMENT BY 1 NOMAXVALUE NOCACHE"
        );
    }

    #[test]
    fn quotes_with_double_quotes() {
        assert_eq!(Oracle.quote_table_name("HR.EMP"), "\"HR\".\"EMP\"");
        assert_eq!(Oracle.quote_simple_column_name("\"X\""), "\"X\"");
    }
}
