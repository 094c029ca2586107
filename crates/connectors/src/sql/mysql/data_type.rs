//! Maps MySQL column types as printed by `SHOW FULL COLUMNS` to abstract types.

use crate::sql::base::native_type::{NativeType, split_native_type};
use lazy_static::lazy_static;
use model::core::abstract_type::AbstractType;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    static ref MYSQL_NATIVE_TYPES: HashMap<&'static str, AbstractType> = {
        use AbstractType::*;
        HashMap::from([
            ("tinyint", SmallInt),
            ("bit", Integer),
            ("smallint", SmallInt),
            ("mediumint", Integer),
            ("int", Integer),
            ("integer", Integer),
            ("bigint", BigInt),
            ("float", Float),
            ("double", Double),
            ("real", Float),
            ("decimal", Decimal),
            ("numeric", Decimal),
            ("tinytext", Text),
            ("mediumtext", Text),
            ("longtext", Text),
            ("text", Text),
            ("varchar", String),
            ("string", String),
            ("char", String),
            ("enum", String),
            ("set", String),
            ("tinyblob", Binary),
            ("mediumblob", Binary),
            ("longblob", Binary),
            ("blob", Binary),
            ("binary", Binary),
            ("varbinary", Binary),
            ("datetime", DateTime),
            ("year", Date),
            ("date", Date),
            ("time", Time),
            ("timestamp", Timestamp),
            ("json", Json),
        ])
    };
    static ref ENUM_VALUE: Regex = Regex::new(r"'((?:[^']|'')*)'").expect("valid regex");
}

/// Parses a MySQL column type such as `decimal(10,2) unsigned`.
/// Unknown types map to `string`.
pub fn parse_native_type(native: &str) -> NativeType {
    let mut parsed = NativeType::new(AbstractType::String);
    parsed.unsigned = native.to_ascii_lowercase().contains("unsigned");

    let Some((name, args)) = split_native_type(native) else {
        return parsed;
    };
    let name = name.to_ascii_lowercase();
    if let Some(column_type) = MYSQL_NATIVE_TYPES.get(name.as_str()) {
        parsed.column_type = *column_type;
    }

    let Some(args) = args else {
        return parsed;
    };

    if name == "enum" || name == "set" {
        parsed.enum_values = ENUM_VALUE
            .captures_iter(&args)
            .map(|caps| caps[1].replace("''", "'"))
            .collect();
        return parsed;
    }

    let mut parsed = parsed.with_dimensions(&args);
    match (name.as_str(), parsed.size) {
        ("bit", Some(1)) | ("tinyint", Some(1)) => parsed.column_type = AbstractType::Boolean,
        ("bit", Some(size)) if size > 32 => parsed.column_type = AbstractType::BigInt,
        ("bit", Some(32)) => parsed.column_type = AbstractType::Integer,
        _ => {}
    }
    parsed
}
