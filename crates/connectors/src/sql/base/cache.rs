//! Optional memoization of table metadata in front of an introspector.

use crate::sql::base::introspector::SchemaIntrospector;
use model::schema::table::TableSchema;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::debug;

/// Caches loaded tables by full name. Missing tables are not cached, and
/// concurrent misses for the same table may each hit the catalog.
pub struct CachedSchema<S> {
    inner: S,
    tables: RwLock<HashMap<String, Arc<TableSchema>>>,
}

impl<S: SchemaIntrospector> CachedSchema<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub async fn table_schema(&self, name: &str) -> Option<Arc<TableSchema>> {
        let key = self.inner.resolve_table_name(name).full_name;
        if let Some(table) = self.tables.read().await.get(&key) {
            return Some(Arc::clone(table));
        }

        let table = Arc::new(self.inner.load_table_schema(name).await?);
        debug!("Caching schema of table '{key}'");
        self.tables.write().await.insert(key, Arc::clone(&table));
        Some(table)
    }

    /// Drops the cached entry of one table.
    pub async fn refresh_table(&self, name: &str) {
        let key = self.inner.resolve_table_name(name).full_name;
        self.tables.write().await.remove(&key);
    }

    /// Drops every cached entry.
    pub async fn refresh(&self) {
        self.tables.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tables.read().await.is_empty()
    }
}
