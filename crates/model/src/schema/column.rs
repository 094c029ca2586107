//! Normalized metadata for a single table column.

use crate::{
    core::{
        abstract_type::{AbstractType, HostType},
        value::Value,
    },
    schema::error::SchemaInvariantError,
};
use bigdecimal::ToPrimitive;
use serde::Serialize;

/// One column as discovered by introspection.
///
/// Instances are assembled by an introspector through [`ColumnSchemaBuilder`]
/// and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSchema {
    name: String,
    #[serde(rename = "type")]
    column_type: AbstractType,
    db_type: String,
    size: Option<u32>,
    precision: Option<u32>,
    scale: Option<u32>,
    allow_null: bool,
    is_primary_key: bool,
    auto_increment: bool,
    unsigned: bool,
    default_value: Option<Value>,
    enum_values: Vec<String>,
    comment: Option<String>,
}

impl ColumnSchema {
    pub fn builder(name: impl Into<String>, db_type: impl Into<String>) -> ColumnSchemaBuilder {
        ColumnSchemaBuilder::new(name, db_type)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> AbstractType {
        self.column_type
    }

    pub fn db_type(&self) -> &str {
        &self.db_type
    }

    pub fn size(&self) -> Option<u32> {
        self.size
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    pub fn scale(&self) -> Option<u32> {
        self.scale
    }

    pub fn allow_null(&self) -> bool {
        self.allow_null
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }

    pub fn auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn unsigned(&self) -> bool {
        self.unsigned
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn enum_values(&self) -> &[String] {
        &self.enum_values
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn host_type(&self) -> HostType {
        // JSON stored in a text column is still JSON to the host.
        if self.column_type == AbstractType::String && self.db_type.eq_ignore_ascii_case("json") {
            return HostType::Json;
        }
        self.column_type.host_type()
    }

    /// Converts a value as read from the database into its host representation.
    pub fn typecast(&self, value: &Value) -> Value {
        if let Value::String(s) = value
            && s.is_empty()
            && !self.column_type.keeps_empty_string()
        {
            return Value::Null;
        }

        match value {
            Value::Null | Value::Expression(_) => return value.clone(),
            _ => {}
        }

        match self.host_type() {
            HostType::Integer => cast_integer(value),
            HostType::Boolean => value.as_bool().map_or_else(|| value.clone(), Value::Boolean),
            HostType::Double => value.as_f64().map_or_else(|| value.clone(), Value::Float),
            HostType::Decimal => cast_decimal(value),
            HostType::String => match value {
                Value::String(_) => value.clone(),
                other => other.as_string().map_or_else(|| other.clone(), Value::String),
            },
            HostType::Bytes => match value {
                Value::String(s) => Value::Bytes(s.clone().into_bytes()),
                other => other.clone(),
            },
            HostType::Json => match value {
                Value::String(s) => serde_json::from_str(s).map_or_else(|_| value.clone(), Value::Json),
                Value::Bytes(b) => serde_json::from_slice(b).map_or_else(|_| value.clone(), Value::Json),
                other => other.clone(),
            },
        }
    }

    /// Converts a host value into the representation handed to the driver.
    pub fn db_typecast(&self, value: &Value) -> Value {
        match (self.host_type(), value) {
            (HostType::Json, Value::Json(json)) => Value::String(json.to_string()),
            (HostType::Boolean, Value::Boolean(_)) => value.clone(),
            _ => self.typecast(value),
        }
    }
}

fn cast_integer(value: &Value) -> Value {
    match value {
        Value::Int(_) => value.clone(),
        // Out-of-range unsigned values stay textual instead of wrapping.
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_or_else(|_| value.clone(), Value::Int),
        Value::Decimal(d) => d
            .to_i64()
            .map_or_else(|| Value::String(d.to_string()), Value::Int),
        other => other.as_i64().map_or_else(|| other.clone(), Value::Int),
    }
}

/// Decimals stay textual so the catalog's scale (`0.00`) survives.
fn cast_decimal(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        Value::Decimal(_) => value.clone(),
        Value::Boolean(b) => Value::String(i64::from(*b).to_string()),
        other => other.as_string().map_or_else(|| other.clone(), Value::String),
    }
}

#[derive(Debug, Clone)]
pub struct ColumnSchemaBuilder {
    column: ColumnSchema,
}

impl ColumnSchemaBuilder {
    pub fn new(name: impl Into<String>, db_type: impl Into<String>) -> Self {
        Self {
            column: ColumnSchema {
                name: name.into(),
                column_type: AbstractType::String,
                db_type: db_type.into(),
                size: None,
                precision: None,
                scale: None,
                allow_null: true,
                is_primary_key: false,
                auto_increment: false,
                unsigned: false,
                default_value: None,
                enum_values: Vec::new(),
                comment: None,
            },
        }
    }

    pub fn column_type(mut self, column_type: AbstractType) -> Self {
        self.column.column_type = column_type;
        self
    }

    pub fn size(mut self, size: Option<u32>) -> Self {
        self.column.size = size;
        self
    }

    pub fn precision(mut self, precision: Option<u32>) -> Self {
        self.column.precision = precision;
        self
    }

    pub fn scale(mut self, scale: Option<u32>) -> Self {
        self.column.scale = scale;
        self
    }

    pub fn allow_null(mut self, allow_null: bool) -> Self {
        self.column.allow_null = allow_null;
        self
    }

    pub fn primary_key(mut self, is_primary_key: bool) -> Self {
        self.column.is_primary_key = is_primary_key;
        self
    }

    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.column.auto_increment = auto_increment;
        self
    }

    pub fn unsigned(mut self, unsigned: bool) -> Self {
        self.column.unsigned = unsigned;
        self
    }

    pub fn enum_values(mut self, values: Vec<String>) -> Self {
        self.column.enum_values = values;
        self
    }

    pub fn comment(mut self, comment: Option<String>) -> Self {
        self.column.comment = comment.filter(|c| !c.is_empty());
        self
    }

    /// Stores an already cast default value.
    pub fn default_value(mut self, value: Option<Value>) -> Self {
        self.column.default_value = value.filter(|v| !v.is_null());
        self
    }

    /// Casts a raw catalog default with the column's current type and stores it.
    /// Must be called after the type has been set.
    pub fn raw_default(self, raw: Option<&Value>) -> Self {
        let cast = raw.map(|v| self.column.typecast(v));
        self.default_value(cast)
    }

    /// Read access while the column is being assembled.
    pub fn peek(&self) -> &ColumnSchema {
        &self.column
    }

    pub fn build(self) -> Result<ColumnSchema, SchemaInvariantError> {
        if self.column.auto_increment && !self.column.is_primary_key {
            return Err(SchemaInvariantError::AutoIncrementWithoutPrimaryKey(
                self.column.name,
            ));
        }
        Ok(self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(column_type: AbstractType, db_type: &str) -> ColumnSchema {
        ColumnSchema::builder("c", db_type)
            .column_type(column_type)
            .build()
            .unwrap()
    }

    #[test]
    fn integer_cast_parses_strings() {
        let col = column(AbstractType::Integer, "int(11)");
        assert_eq!(col.typecast(&Value::from("17")), Value::Int(17));
        assert_eq!(col.typecast(&Value::from("")), Value::Null);
        assert_eq!(
            col.typecast(&Value::from("18446744073709551615")),
            Value::from("18446744073709551615")
        );
    }

    #[test]
    fn empty_string_survives_for_textual_columns() {
        let col = column(AbstractType::String, "varchar(20)");
        assert_eq!(col.typecast(&Value::from("")), Value::from(""));
    }

    #[test]
    fn decimal_cast_keeps_scale() {
        let col = column(AbstractType::Decimal, "decimal(8,2)");
        assert_eq!(col.typecast(&Value::from("0.00")), Value::from("0.00"));
        assert_eq!(col.typecast(&Value::from(" 12.50 ")), Value::from("12.50"));
        assert_eq!(col.typecast(&Value::Int(3)), Value::from("3"));
        assert_eq!(
            serde_json::to_string(&col.typecast(&Value::from("0.00"))).unwrap(),
            r#"{"String":"0.00"}"#
        );
    }

    #[test]
    fn boolean_cast_handles_bit_and_text() {
        let col = column(AbstractType::Boolean, "tinyint(1)");
        assert_eq!(col.typecast(&Value::from("1")), Value::Boolean(true));
        assert_eq!(col.typecast(&Value::Int(0)), Value::Boolean(false));
        assert_eq!(col.typecast(&Value::Bytes(vec![1])), Value::Boolean(true));
    }

    #[test]
    fn json_round_trip_through_db_typecast() {
        let col = column(AbstractType::Json, "json");
        let host = col.typecast(&Value::from(r#"{"a":1}"#));
        assert_eq!(host, Value::Json(serde_json::json!({"a": 1})));
        assert_eq!(col.db_typecast(&host), Value::from(r#"{"a":1}"#));
    }

    #[test]
    fn expressions_pass_through() {
        let col = column(AbstractType::Timestamp, "timestamp");
        let expr = Value::Expression("CURRENT_TIMESTAMP".into());
        assert_eq!(col.typecast(&expr), expr);
    }

    #[test]
    fn auto_increment_requires_primary_key() {
        let err = ColumnSchema::builder("id", "int")
            .auto_increment(true)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaInvariantError::AutoIncrementWithoutPrimaryKey("id".into())
        );
    }

    #[test]
    fn raw_default_is_cast_with_column_type() {
        let col = ColumnSchema::builder("qty", "smallint(6)")
            .column_type(AbstractType::SmallInt)
            .raw_default(Some(&Value::from("5")))
            .build()
            .unwrap();
        assert_eq!(col.default_value(), Some(&Value::Int(5)));
    }
}
