//! Maps Oracle catalog types to abstract types.

use crate::sql::base::native_type::{NativeType, split_native_type};
use model::core::abstract_type::AbstractType;

/// Rebuilds a native type string such as `NUMBER(10,0)` from the separate
/// `ALL_TAB_COLUMNS` facets. Types that already carry arguments, like
/// `TIMESTAMP(6)`, are returned as they are.
pub fn compose_native_type(
    data_type: &str,
    precision: Option<i64>,
    scale: Option<i64>,
    length: Option<i64>,
) -> String {
    if data_type.contains('(') {
        return data_type.to_string();
    }

    match data_type.to_ascii_uppercase().as_str() {
        "NUMBER" | "FLOAT" => match (precision, scale) {
            (Some(p), Some(s)) => format!("{data_type}({p},{s})"),
            (Some(p), None) => format!("{data_type}({p})"),
            (None, Some(s)) => format!("{data_type}(*,{s})"),
            (None, None) => data_type.to_string(),
        },
        "CHAR" | "NCHAR" | "VARCHAR" | "VARCHAR2" | "NVARCHAR2" | "RAW" => match length {
            Some(length) => format!("{data_type}({length})"),
            None => data_type.to_string(),
        },
        _ => data_type.to_string(),
    }
}

pub fn parse_native_type(native: &str) -> NativeType {
    let upper = native.trim().to_ascii_uppercase();
    let (name, args) = split_native_type(&upper).unwrap_or_default();

    let mut parsed = NativeType::new(AbstractType::String);
    if let Some(args) = args {
        parsed = parsed.with_dimensions(&args);
    }

    parsed.column_type = if upper.contains("FLOAT") || upper.contains("DOUBLE") {
        AbstractType::Double
    } else if name == "NUMBER" {
        // NUMBER(p,0) holds whole numbers only.
        if parsed.scale.is_none_or(|scale| scale > 0) {
            AbstractType::Decimal
        } else {
            AbstractType::Integer
        }
    } else if name == "INTEGER" {
        AbstractType::Integer
    } else if upper.contains("BLOB") {
        AbstractType::Binary
    } else if upper.contains("CLOB") {
        AbstractType::Text
    } else if upper.starts_with("TIMESTAMP") {
        AbstractType::Timestamp
    } else if name == "DATE" {
        AbstractType::Date
    } else {
        AbstractType::String
    };
    parsed
}
