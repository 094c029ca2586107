//! Defines the `Dialect` trait for database-specific SQL syntax.

use crate::query::pagination::{has_limit, has_offset};
use model::core::abstract_type::AbstractType;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

pub mod mysql;
pub mod oracle;

pub use mysql::MySql;
pub use oracle::Oracle;

pub trait Dialect: Send + Sync + fmt::Debug {
    /// Returns the name of the dialect (e.g., "MySQL", "Oracle").
    fn name(&self) -> &'static str;

    fn kind(&self) -> SqlDialect;

    /// The character used to quote identifiers.
    ///
    /// - MySQL uses backticks: `` `my_column` ``
    /// - Oracle uses double quotes: `"MY_COLUMN"`
    fn quote_char(&self) -> char;

    /// Physical type for every abstract type.
    fn type_map(&self) -> &'static HashMap<AbstractType, &'static str>;

    /// Returns the placeholder for the parameter at `index` of the bag.
    fn placeholder(&self, index: usize) -> String {
        format!(":qp{index}")
    }

    /// Quotes a table name without schema part. Names already carrying the
    /// quote character are returned untouched.
    fn quote_simple_table_name(&self, name: &str) -> String {
        let q = self.quote_char();
        if name.contains(q) {
            name.to_string()
        } else {
            format!("{q}{name}{q}")
        }
    }

    /// Like [`Dialect::quote_simple_table_name`], but `*` is never quoted.
    fn quote_simple_column_name(&self, name: &str) -> String {
        if name == "*" {
            return name.to_string();
        }
        self.quote_simple_table_name(name)
    }

    /// Quotes every `.`-separated part; expressions containing `(` pass
    /// through.
    fn quote_table_name(&self, name: &str) -> String {
        if name.contains('(') || name.contains(self.quote_char()) {
            return name.to_string();
        }
        name.split('.')
            .map(|part| self.quote_simple_table_name(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn quote_column_name(&self, name: &str) -> String {
        if name.contains('(') || name.contains(self.quote_char()) {
            return name.to_string();
        }
        match name.rsplit_once('.') {
            Some((prefix, column)) => format!(
                "{}.{}",
                self.quote_table_name(prefix),
                self.quote_simple_column_name(column)
            ),
            None => self.quote_simple_column_name(name),
        }
    }

    /// Removes the quote character from an identifier.
    fn unquote(&self, name: &str) -> String {
        name.replace(self.quote_char(), "")
    }

    /// Escape character for LIKE patterns and the clause announcing it.
    fn like_escape(&self) -> (char, Option<&'static str>) {
        ('\\', None)
    }

    /// `LIMIT n OFFSET m` with the shared edge policy: limit only when
    /// non-negative, offset only when positive.
    fn build_limit(&self, limit: Option<i64>, offset: Option<i64>) -> String {
        let mut sql = String::new();
        if let Some(limit) = limit.filter(|_| has_limit(limit)) {
            sql.push_str(&format!("LIMIT {limit}"));
        }
        if let Some(offset) = offset.filter(|_| has_offset(offset)) {
            if !sql.is_empty() {
                sql.push(' ');
            }
            sql.push_str(&format!("OFFSET {offset}"));
        }
        sql
    }

    /// Appends an already rendered ORDER BY clause and the pagination.
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
        let limit = self.build_limit(limit, offset);
        if !limit.is_empty() {
            sql.push_str(separator);
            sql.push_str(&limit);
        }
        sql
    }

    fn rename_table_sql(&self, old_name: &str, new_name: &str) -> String;

    fn alter_column_sql(&self, table: &str, column: &str, column_type: &str) -> String;

    fn drop_index_sql(&self, name: &str, table: &str) -> String;

    /// Restarts the sequence so the next generated key is `value`.
    fn reset_sequence_sql(&self, table: &str, sequence: &str, value: i64) -> String;

    fn drop_primary_key_sql(&self, name: &str, table: &str) -> String;

    fn drop_foreign_key_sql(&self, name: &str, table: &str) -> String;

    fn supports_on_update(&self) -> bool {
        true
    }

    /// Multi-row insert; `rows` are rendered `(v1, v2)` groups.
    fn batch_insert_sql(&self, table: &str, columns: &str, rows: &[String]) -> String {
        format!("INSERT INTO {table} ({columns}) VALUES {}", rows.join(", "))
    }
}

/// The dialects the builder and the introspectors know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[serde(alias = "mariadb")]
    MySql,
    #[serde(alias = "oci")]
    Oracle,
}

static MYSQL: MySql = MySql;
static ORACLE: Oracle = Oracle;

impl SqlDialect {
    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            SqlDialect::MySql => &MYSQL,
            SqlDialect::Oracle => &ORACLE,
        }
    }
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(SqlDialect::MySql),
            "oracle" | "oci" => Ok(SqlDialect::Oracle),
            other => Err(format!("Unsupported dialect: {other}")),
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlDialect::MySql => write!(f, "mysql"),
            SqlDialect::Oracle => write!(f, "oracle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_names_parse_with_aliases() {
        assert_eq!("MySQL".parse::<SqlDialect>(), Ok(SqlDialect::MySql));
        assert_eq!("mariadb".parse::<SqlDialect>(), Ok(SqlDialect::MySql));
        assert_eq!("oci".parse::<SqlDialect>(), Ok(SqlDialect::Oracle));
        assert!("sqlite".parse::<SqlDialect>().is_err());
    }

    #[test]
    fn type_maps_are_total() {
        for kind in [SqlDialect::MySql, SqlDialect::Oracle] {
            let map = kind.dialect().type_map();
            for ty in AbstractType::ALL {
                assert!(map.contains_key(&ty), "{kind} misses {ty}");
            }
        }
    }

    #[test]
    fn quoting_is_idempotent() {
        for kind in [SqlDialect::MySql, SqlDialect::Oracle] {
            let d = kind.dialect();
            let once = d.quote_table_name("shop.orders");
            assert_eq!(d.quote_table_name(&once), once);
            let col = d.quote_column_name("o.total");
            assert_eq!(d.quote_column_name(&col), col);
        }
    }

    #[test]
    fn wildcard_and_expressions_are_not_quoted() {
        let d = SqlDialect::MySql.dialect();
        assert_eq!(d.quote_column_name("t.*"), "`t`.*");
        assert_eq!(d.quote_column_name("*"), "*");
        assert_eq!(d.quote_column_name("COUNT(id)"), "COUNT(id)");
        assert_eq!(d.quote_table_name("(SELECT 1)"), "(SELECT 1)");
    }
}
