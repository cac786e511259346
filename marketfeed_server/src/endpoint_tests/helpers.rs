use marketfeed_engine::{db_types::{Connector, NewConnector, Product}, traits::ConnectorManagement, SqliteDatabase, SyncApi};
use serde_json::json;
use shopify_tools::ShopifyProduct;

use crate::config::ServerConfig;

// Each sqlite::memory: connection is a separate database, so the pool is
// pinned to a single connection.
pub async fn test_db() -> SqliteDatabase {
    SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("Could not create in-memory database")
}

pub fn test_config() -> ServerConfig {
    ServerConfig { public_url: "https://feeds.example.com".to_string(), ..ServerConfig::default() }
}

pub async fn seed_connector(db: &SqliteDatabase) -> Connector {
    db.upsert_connector(NewConnector::shopify("demo.myshopify.com", "token-123"))
        .await
        .expect("Could not seed connector")
}

pub fn sample_payload(id: u64, title: &str) -> ShopifyProduct {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "body_html": "<p>A sturdy denim jacket with brass buttons.</p>",
        "vendor": "Acme",
        "product_type": "Outerwear",
        "images": [{"src": "https://cdn.example.com/jacket_1024x.jpg"}],
        "variants": [{
            "id": id * 10,
            "title": "Default",
            "price": "59.99",
            "sku": "JKT-1",
            "inventory_quantity": 7,
            "inventory_management": "shopify",
            "inventory_item_id": id * 100
        }]
    }))
    .expect("Sample payload is valid")
}

pub async fn seed_product(api: &SyncApi<SqliteDatabase>, connector: &Connector, id: u64, title: &str) -> Product {
    api.product_created(connector, sample_payload(id, title)).await.expect("Could not seed product")
}
