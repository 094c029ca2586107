#[cfg(test)]
mod tests {
    use crate::{execute, mysql_schema};
    use connectors::sql::base::{cache::CachedSchema, introspector::SchemaIntrospector};
    use model::core::{abstract_type::AbstractType, value::Value};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tracing_test::traced_test;

    const PRODUCT_DDL: &str = r#"
        CREATE TABLE it_product (
            id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(64) NULL,
            price DECIMAL(8,2) NOT NULL DEFAULT 0.00,
            active TINYINT(1) NOT NULL DEFAULT 1,
            status ENUM('draft','live') NOT NULL DEFAULT 'draft',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#;

    const REVIEW_DDL: &str = r#"
        CREATE TABLE it_review (
            product_id INT NOT NULL,
            author VARCHAR(32) NOT NULL,
            body TEXT,
            PRIMARY KEY (product_id, author),
            CONSTRAINT fk_it_review_product FOREIGN KEY (product_id) REFERENCES it_product (id)
        )
    "#;

    #[ignore = "needs a MySQL server"]
    #[tokio::test]
    async fn describes_live_tables() {
        let schema = mysql_schema();
        let executor = schema.executor();
        execute(executor, "DROP TABLE IF EXISTS it_review").await;
        execute(executor, "DROP TABLE IF EXISTS it_product").await;
        execute(executor, PRODUCT_DDL).await;
        execute(executor, REVIEW_DDL).await;

        let product = schema.inspect_table("it_product").await.unwrap();
        assert_eq!(
            product.column_names(),
            vec!["id", "name", "price", "active", "status", "created_at"]
        );
        assert_eq!(product.primary_key(), ["id"]);
        assert_eq!(product.sequence_name(), Some("it_product"));
        assert!(product.column("id").unwrap().auto_increment());
        assert!(product.column("name").unwrap().allow_null());
        assert_eq!(product.column("price").unwrap().column_type(), AbstractType::Decimal);
        assert_eq!(product.column("active").unwrap().column_type(), AbstractType::Boolean);
        assert_eq!(product.column("status").unwrap().enum_values(), ["draft", "live"]);
        assert!(matches!(
            product.column("created_at").unwrap().default_value(),
            Some(Value::Expression(_))
        ));

        let review = schema.inspect_table("it_review").await.unwrap();
        assert_eq!(review.primary_key(), ["product_id", "author"]);
        assert_eq!(review.foreign_keys()["product_id"].referenced_table, "it_product");

        let names = schema.find_table_names("").await.unwrap();
        assert!(names.iter().any(|n| n == "it_product"));

        execute(executor, "DROP TABLE it_review").await;
        execute(executor, "DROP TABLE it_product").await;
    }

    #[ignore = "needs a MySQL server"]
    #[tokio::test]
    #[traced_test]
    async fn missing_table_is_none() {
        let schema = mysql_schema();
        assert!(schema.load_table_schema("it_does_not_exist").await.is_none());
        assert!(
            schema
                .inspect_table("it_does_not_exist")
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[ignore = "needs a MySQL server"]
    #[tokio::test]
    async fn cache_serves_repeated_lookups() {
        let schema = mysql_schema();
        execute(schema.executor(), "DROP TABLE IF EXISTS it_cached").await;
        execute(schema.executor(), "CREATE TABLE it_cached (id INT PRIMARY KEY)").await;

        let cache = CachedSchema::new(schema);
        let first = cache.table_schema("it_cached").await.unwrap();
        let second = cache.table_schema("it_cached").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        execute(cache.inner().executor(), "DROP TABLE it_cached").await;
        cache.refresh_table("it_cached").await;
        assert!(cache.table_schema("it_cached").await.is_none());
    }
}
