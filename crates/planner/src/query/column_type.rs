//! Resolves portable column type strings such as `string(64) NOT NULL` to the
//! physical type of a dialect.

use crate::query::{dialect::Dialect, error::QueryError};
use lazy_static::lazy_static;
use model::core::abstract_type::AbstractType;
use regex::Regex;
use std::{fmt, str::FromStr};

lazy_static! {
    static ref COLUMN_TYPE: Regex = Regex::new(r"^(\w+)(?:\(([^)]+)\))?(.*)$").expect("valid regex");
    static ref FACET: Regex = Regex::new(r"\(.+?\)").expect("valid regex");
}

/// An abstract column type with an optional `(facet)` and trailing
/// modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub base: AbstractType,
    pub facet: Option<String>,
    pub suffix: String,
}

impl ColumnType {
    pub fn parse(s: &str) -> Result<Self, QueryError> {
        s.parse()
    }

    /// The physical type in `dialect`.
    pub fn resolve(&self, dialect: &dyn Dialect) -> Result<String, QueryError> {
        let physical = dialect
            .type_map()
            .get(&self.base)
            .ok_or_else(|| QueryError::UnknownColumnType(self.base.to_string()))?;

        let mut sql = match &self.facet {
            Some(facet) if FACET.is_match(physical) => {
                FACET.replace(physical, format!("({facet})").as_str()).into_owned()
            }
            Some(facet) => format!("{physical}({facet})"),
            None => physical.to_string(),
        };
        sql.push_str(&self.suffix);
        Ok(sql)
    }
}

impl From<AbstractType> for ColumnType {
    fn from(base: AbstractType) -> Self {
        Self {
            base,
            facet: None,
            suffix: String::new(),
        }
    }
}

impl FromStr for ColumnType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = COLUMN_TYPE
            .captures(trimmed)
            .ok_or_else(|| QueryError::UnknownColumnType(s.to_string()))?;

        let base = caps[1]
            .parse::<AbstractType>()
            .map_err(|_| QueryError::UnknownColumnType(s.to_string()))?;

        Ok(Self {
            base,
            facet: caps.get(2).map(|m| m.as_str().trim().to_string()),
            suffix: caps.get(3).map_or_else(String::new, |m| m.as_str().to_string()),
        })
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if let Some(facet) = &self.facet {
            write!(f, "({facet})")?;
        }
        write!(f, "{}", self.suffix)
    }
}

/// Maps an abstract type string to the physical type of `dialect`.
pub fn get_column_type(dialect: &dyn Dialect, column_type: &str) -> Result<String, QueryError> {
    ColumnType::parse(column_type)?.resolve(dialect)
}
