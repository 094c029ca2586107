//! The portable column-type vocabulary shared by every dialect.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Abstract column types. Every dialect maps its native type names onto this
/// closed set (anything unmapped becomes `String`) and maps each variant back
/// to one physical type for DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbstractType {
    Pk,
    BigPk,
    String,
    Text,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal,
    DateTime,
    Timestamp,
    Time,
    Date,
    Binary,
    Boolean,
    Money,
    Json,
}

/// The host-side representation a column's values are cast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostType {
    Integer,
    Boolean,
    Double,
    Decimal,
    String,
    Bytes,
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown abstract column type: {0}")]
pub struct UnknownAbstractType(pub String);

impl AbstractType {
    pub const ALL: [AbstractType; 18] = [
        AbstractType::Pk,
        AbstractType::BigPk,
        AbstractType::String,
        AbstractType::Text,
        AbstractType::SmallInt,
        AbstractType::Integer,
        AbstractType::BigInt,
        AbstractType::Float,
        AbstractType::Double,
        AbstractType::Decimal,
        AbstractType::DateTime,
        AbstractType::Timestamp,
        AbstractType::Time,
        AbstractType::Date,
        AbstractType::Binary,
        AbstractType::Boolean,
        AbstractType::Money,
        AbstractType::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AbstractType::Pk => "pk",
            AbstractType::BigPk => "bigpk",
            AbstractType::String => "string",
            AbstractType::Text => "text",
            AbstractType::SmallInt => "smallint",
            AbstractType::Integer => "integer",
            AbstractType::BigInt => "bigint",
            AbstractType::Float => "float",
            AbstractType::Double => "double",
            AbstractType::Decimal => "decimal",
            AbstractType::DateTime => "datetime",
            AbstractType::Timestamp => "timestamp",
            AbstractType::Time => "time",
            AbstractType::Date => "date",
            AbstractType::Binary => "binary",
            AbstractType::Boolean => "boolean",
            AbstractType::Money => "money",
            AbstractType::Json => "json",
        }
    }

    pub fn host_type(&self) -> HostType {
        match self {
            AbstractType::Pk
            | AbstractType::BigPk
            | AbstractType::SmallInt
            | AbstractType::Integer
            | AbstractType::BigInt => HostType::Integer,
            AbstractType::Boolean => HostType::Boolean,
            AbstractType::Float | AbstractType::Double => HostType::Double,
            AbstractType::Decimal | AbstractType::Money => HostType::Decimal,
            AbstractType::Binary => HostType::Bytes,
            AbstractType::Json => HostType::Json,
            AbstractType::String
            | AbstractType::Text
            | AbstractType::DateTime
            | AbstractType::Timestamp
            | AbstractType::Time
            | AbstractType::Date => HostType::String,
        }
    }

    /// Types whose empty string is a legitimate value rather than "no value".
    pub fn keeps_empty_string(&self) -> bool {
        matches!(
            self,
            AbstractType::String | AbstractType::Text | AbstractType::Binary
        )
    }
}

impl FromStr for AbstractType {
    type Err = UnknownAbstractType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        AbstractType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnknownAbstractType(s.to_string()))
    }
}

impl fmt::Display for AbstractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_name_back() {
        for t in AbstractType::ALL {
            assert_eq!(t.as_str().parse::<AbstractType>(), Ok(t));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("BigPk".parse::<AbstractType>(), Ok(AbstractType::BigPk));
        assert_eq!(" DateTime ".parse::<AbstractType>(), Ok(AbstractType::DateTime));
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            "varchar".parse::<AbstractType>(),
            Err(UnknownAbstractType("varchar".to_string()))
        );
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&AbstractType::SmallInt).unwrap();
        assert_eq!(json, r#""smallint""#);
    }
}
