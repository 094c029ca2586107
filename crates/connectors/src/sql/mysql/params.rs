//! Conversions between host values and `mysql_async` values.

use crate::sql::base::executor::Row;
use model::core::{params::Params, value::Value};
use mysql_async::{Params as MySqlParams, Row as MySqlRow, Value as MySqlValue};
use std::collections::HashMap;

pub struct MySqlParam(MySqlValue);

impl MySqlParam {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => MySqlParam(MySqlValue::NULL),
            Value::Int(i) => MySqlParam(MySqlValue::Int(*i)),
            Value::Float(f) => MySqlParam(MySqlValue::Double(*f)),
            Value::Decimal(d) => MySqlParam(MySqlValue::Bytes(d.to_string().into_bytes())),
            Value::String(s) | Value::Expression(s) => MySqlParam(MySqlValue::Bytes(s.clone().into_bytes())),
            Value::Boolean(b) => MySqlParam(MySqlValue::Int(i64::from(*b))),
            Value::Bytes(b) => MySqlParam(MySqlValue::Bytes(b.clone())),
            Value::Json(j) => MySqlParam(MySqlValue::Bytes(j.to_string().into_bytes())),
        }
    }

    pub fn into_inner(self) -> MySqlValue {
        self.0
    }
}

/// Named parameters as the driver expects them: keys without the colon.
pub fn to_mysql_params(params: &Params) -> MySqlParams {
    if params.is_empty() {
        return MySqlParams::Empty;
    }
    let named: HashMap<Vec<u8>, MySqlValue> = params
        .iter()
        .map(|(name, value)| {
            (
                name.trim_start_matches(':').as_bytes().to_vec(),
                MySqlParam::from_value(value).into_inner(),
            )
        })
        .collect();
    MySqlParams::Named(named)
}

/// Maps a driver value to a host value. Text is kept as text; the column
/// metadata decides the final type later.
pub fn from_mysql_value(value: MySqlValue) -> Value {
    match value {
        MySqlValue::NULL => Value::Null,
        MySqlValue::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(s) => Value::String(s),
            Err(err) => Value::Bytes(err.into_bytes()),
        },
        MySqlValue::Int(i) => Value::Int(i),
        MySqlValue::UInt(u) => i64::try_from(u).map_or_else(|_| Value::String(u.to_string()), Value::Int),
        MySqlValue::Float(f) => Value::Float(f64::from(f)),
        MySqlValue::Double(d) => Value::Float(d),
        MySqlValue::Date(y, mo, d, h, mi, s, us) => Value::String(if us > 0 {
            format!("{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02}.{us:06}")
        } else {
            format!("{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02}")
        }),
        MySqlValue::Time(negative, days, h, mi, s, _us) => {
            let hours = u32::from(h) + days * 24;
            let sign = if negative { "-" } else { "" };
            Value::String(format!("{sign}{hours:02}:{mi:02}:{s:02}"))
        }
    }
}

pub fn from_mysql_row(row: &MySqlRow) -> Row {
    row.columns_ref()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let value = row.get::<MySqlValue, _>(idx).unwrap_or(MySqlValue::NULL);
            (col.name_str().into_owned(), from_mysql_value(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_lose_their_colon() {
        let mut params = Params::new();
        params.insert(":tableName".into(), Value::from("t"));
        match to_mysql_params(&params) {
            MySqlParams::Named(named) => {
                assert_eq!(named.get(b"tableName".as_slice()), Some(&MySqlValue::Bytes(b"t".to_vec())));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(to_mysql_params(&Params::new()), MySqlParams::Empty));
    }

    #[test]
    fn driver_values_map_to_host_values() {
        assert_eq!(from_mysql_value(MySqlValue::Bytes(b"abc".to_vec())), Value::from("abc"));
        assert_eq!(from_mysql_value(MySqlValue::UInt(u64::MAX)), Value::from("18446744073709551615"));
        assert_eq!(
            from_mysql_value(MySqlValue::Date(2024, 2, 29, 13, 5, 0, 0)),
            Value::from("2024-02-29 13:05:00")
        );
        assert_eq!(from_mysql_value(MySqlValue::NULL), Value::Null);
    }
}
