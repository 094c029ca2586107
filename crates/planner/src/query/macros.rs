#[macro_export]
macro_rules! value {
    ($val:expr) => {
        $crate::query::ast::expr::Expr::Value(::model::core::value::Value::from($val))
    };
}

#[macro_export]
macro_rules! table_ref {
    ($name:expr) => {
        $crate::query::ast::common::TableRef {
            schema: None,
            name: $name.to_string(),
        }
    };
    ($schema:expr, $name:expr) => {
        $crate::query::ast::common::TableRef {
            schema: Some($schema.to_string()),
            name: $name.to_string(),
        }
    };
}

/// Builds a `Condition::Hash` from `column => value` pairs.
#[macro_export]
macro_rules! hash_cond {
    ($($col:expr => $val:expr),* $(,)?) => {
        $crate::query::ast::condition::Condition::Hash(vec![
            $(($col.to_string(), $crate::query::ast::condition::HashValue::from($val))),*
        ])
    };
}
