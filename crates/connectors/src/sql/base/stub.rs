//! In-memory executor answering catalog queries from canned rows.

use crate::sql::base::{
    error::DbError,
    executor::{Executor, Row},
};
use async_trait::async_trait;
use model::core::{params::Params, value::Value};
use std::sync::Mutex;

#[derive(Debug)]
enum Reply {
    Rows(Vec<Row>),
    Fail(String),
}

/// Replies with the first rule whose pattern occurs in the SQL; anything
/// else yields no rows.
#[derive(Debug, Default)]
pub struct StubExecutor {
    rules: Vec<(String, Reply)>,
    calls: Mutex<Vec<(String, Params)>>,
}

pub fn row(fields: &[(&str, Value)]) -> Row {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

impl StubExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, pattern: &str, rows: Vec<Row>) -> Self {
        self.rules.push((pattern.to_string(), Reply::Rows(rows)));
        self
    }

    pub fn fail_on(mut self, pattern: &str, message: &str) -> Self {
        self.rules.push((pattern.to_string(), Reply::Fail(message.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<(String, Params)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|(sql, _)| sql.contains(pattern)).count()
    }
}

#[async_trait]
impl Executor for StubExecutor {
    async fn query_rows(&self, sql: &str, params: &Params) -> Result<Vec<Row>, DbError> {
        self.calls.lock().unwrap().push((sql.to_string(), params.clone()));

        match self.rules.iter().find(|(pattern, _)| sql.contains(pattern.as_str())) {
            Some((_, Reply::Rows(rows))) => Ok(rows.clone()),
            Some((_, Reply::Fail(message))) => Err(DbError::Unknown(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}
