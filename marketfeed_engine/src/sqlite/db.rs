use std::fmt::Debug;

use log::trace;
use sqlx::SqlitePool;

use super::{connectors, db_url, inventory, new_pool, products, schema, SqliteDatabaseError};
use crate::{
    db_types::{Connector, InventoryLevel, ListingStatus, NewConnector, NewProduct, Product, UpsertInventoryLevel},
    traits::{ConnectorManagement, InventoryManagement, ProductField, ProductManagement, ProductUpdate},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using `DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    /// Creates the pool and runs the idempotent schema setup.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        schema::create_tables(&pool).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl ConnectorManagement for SqliteDatabase {
    type Error = SqliteDatabaseError;

    async fn upsert_connector(&self, connector: NewConnector) -> Result<Connector, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        connectors::upsert_connector(connector, &mut conn).await
    }

    async fn fetch_connector(&self, id: i64) -> Result<Option<Connector>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        connectors::fetch_connector(id, &mut conn).await
    }

    async fn fetch_connector_by_shop(&self, shop_domain: &str) -> Result<Option<Connector>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        connectors::fetch_connector_by_shop(shop_domain, &mut conn).await
    }

    async fn set_connector_status(&self, id: i64, status: ListingStatus) -> Result<(), Self::Error> {
        let mut conn = self.pool.acquire().await?;
        connectors::set_connector_status(id, status, &mut conn).await
    }

    async fn mark_connector_synced(&self, id: i64) -> Result<(), Self::Error> {
        let mut conn = self.pool.acquire().await?;
        connectors::mark_connector_synced(id, &mut conn).await
    }
}

impl ProductManagement for SqliteDatabase {
    type Error = SqliteDatabaseError;

    async fn upsert_product(&self, product: NewProduct) -> Result<Product, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        products::upsert_product(product, &mut conn).await
    }

    async fn fetch_product(&self, id: &str) -> Result<Option<Product>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_product(id, &mut conn).await
    }

    async fn fetch_product_by_external_id(
        &self,
        connector_id: i64,
        external_id: &str,
    ) -> Result<Option<Product>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_product_by_external_id(connector_id, external_id, &mut conn).await
    }

    async fn update_product(&self, id: &str, update: ProductUpdate) -> Result<Option<Product>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        products::update_product(id, update, &mut conn).await
    }

    async fn set_product_field(&self, id: &str, field: ProductField, value: &str) -> Result<bool, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        products::set_product_field(id, field, value, &mut conn).await
    }

    async fn set_product_status(&self, id: &str, status: ListingStatus) -> Result<bool, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        products::set_product_status(id, status, &mut conn).await
    }

    async fn fetch_products_for_connector(&self, connector_id: i64) -> Result<Vec<Product>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_products_for_connector(connector_id, &mut conn).await
    }

    async fn fetch_all_products(&self) -> Result<Vec<Product>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_all_products(&mut conn).await
    }

    async fn deactivate_products_for_connector(&self, connector_id: i64) -> Result<u64, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        products::deactivate_products_for_connector(connector_id, &mut conn).await
    }
}

impl InventoryManagement for SqliteDatabase {
    type Error = SqliteDatabaseError;

    async fn upsert_inventory_level(&self, level: UpsertInventoryLevel) -> Result<InventoryLevel, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        inventory::upsert_inventory_level(level, &mut conn).await
    }

    async fn fetch_inventory_levels_for_product(
        &self,
        product_id: &str,
    ) -> Result<Vec<InventoryLevel>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        inventory::fetch_inventory_levels_for_product(product_id, &mut conn).await
    }
}

#[cfg(test)]
mod test {
    use shopify_tools::ShopifyVariant;

    use super::*;
    use crate::db_types::Enhancement;

    async fn test_db() -> SqliteDatabase {
        // A single connection keeps the in-memory database alive and shared.
        SqliteDatabase::new_with_url("sqlite::memory:", 1).await.unwrap()
    }

    fn sample_product(connector_id: i64, external_id: &str) -> NewProduct {
        NewProduct {
            connector_id,
            external_id: external_id.to_string(),
            title: "Blue Hat".to_string(),
            description: "<p>A very blue hat</p>".to_string(),
            price: Some(1999.into()),
            compare_at_price: None,
            currency: "USD".to_string(),
            sku: Some("BH-1".to_string()),
            gtin: None,
            brand: "Acme".to_string(),
            category: "Hats".to_string(),
            images: vec!["https://x/1.jpg".to_string()],
            variants: vec![ShopifyVariant {
                id: 9,
                price: "19.99".to_string(),
                sku: "BH-1".to_string(),
                inventory_quantity: Some(7),
                inventory_management: Some("shopify".to_string()),
                ..Default::default()
            }],
            metadata: Enhancement::default(),
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let db = test_db().await;
        let first = db.upsert_product(sample_product(1, "111")).await.unwrap();
        let second = db.upsert_product(sample_product(1, "111")).await.unwrap();
        let third = db.upsert_product(sample_product(1, "111")).await.unwrap();
        // Replays keep the original identity and leave the row byte-identical
        // modulo updated_at.
        assert_eq!(first.id, second.id);
        assert_eq!(second.id, third.id);
        assert_eq!(first.created_at, third.created_at);
        assert_eq!(third.title, "Blue Hat");
        assert_eq!(third.price, Some(1999.into()));
        assert_eq!(third.variants.0, first.variants.0);
        let all = db.fetch_all_products().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn soft_delete_keeps_the_row_and_upsert_reactivates() {
        let db = test_db().await;
        let product = db.upsert_product(sample_product(1, "111")).await.unwrap();
        assert!(db.set_product_status(&product.id, ListingStatus::Inactive).await.unwrap());
        let stored = db.fetch_product(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ListingStatus::Inactive);
        // A later create/update for the same key flips it back to ACTIVE.
        let revived = db.upsert_product(sample_product(1, "111")).await.unwrap();
        assert_eq!(revived.id, product.id);
        assert_eq!(revived.status, ListingStatus::Active);
    }

    #[tokio::test]
    async fn unknown_product_is_not_found_for_status_change() {
        let db = test_db().await;
        assert!(!db.set_product_status("no-such-id", ListingStatus::Inactive).await.unwrap());
    }

    #[tokio::test]
    async fn inventory_levels_upsert_on_their_unique_key() {
        let db = test_db().await;
        let level = UpsertInventoryLevel {
            product_id: "p-1".to_string(),
            connector_id: 1,
            inventory_item_id: 42,
            location_id: 7,
            available: 5,
            committed: 0,
            on_hand: 5,
            incoming: 0,
        };
        let first = db.upsert_inventory_level(level.clone()).await.unwrap();
        let second = db.upsert_inventory_level(UpsertInventoryLevel { available: 3, ..level }).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.available, 3);
        let levels = db.fetch_inventory_levels_for_product("p-1").await.unwrap();
        assert_eq!(levels.len(), 1);
    }

    #[tokio::test]
    async fn connector_upsert_reactivates_and_keeps_identity() {
        let db = test_db().await;
        let first = db.upsert_connector(NewConnector::shopify("demo.myshopify.com", "tok-1")).await.unwrap();
        db.set_connector_status(first.id, ListingStatus::Inactive).await.unwrap();
        let second = db.upsert_connector(NewConnector::shopify("demo.myshopify.com", "tok-2")).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.status, ListingStatus::Active);
        assert_eq!(second.access_token, "tok-2");
    }
}
