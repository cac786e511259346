use std::collections::HashMap;

use log::{debug, info, warn};
use shopify_tools::{InventoryLevelPayload, ShopifyProduct, ShopifyVariant};

use crate::{
    db_types::{
        Connector,
        InventoryLevel,
        ListingStatus,
        NewProduct,
        Product,
        UpsertInventoryLevel,
        UNKNOWN_PRODUCT_ID,
    },
    reconcile::merge_variants,
    seo::rule_based_enhancement,
    traits::{ConnectorManagement, InventoryManagement, ProductManagement, ProductUpdate, SyncSummary},
    ListingApiError,
};

/// Folds upstream product and inventory events into the canonical store.
///
/// Every processor here is invoked either from the webhook receiver or from a
/// catalog pull. Automatic paths attach the rule-based SEO enhancement with
/// `seo_enhanced = false`; the LLM is never called from here.
#[derive(Debug, Clone)]
pub struct SyncApi<B> {
    db: B,
}

impl<B> SyncApi<B>
where B: ConnectorManagement + ProductManagement + InventoryManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    /// `products/create`: upsert on `(connector, external_id)`. When an update
    /// raced ahead of the create, the stored variants are merged exactly as in
    /// [`SyncApi::product_updated`], so either arrival order converges to the
    /// same state. A previously soft-deleted product is reactivated.
    pub async fn product_created(
        &self,
        connector: &Connector,
        payload: ShopifyProduct,
    ) -> Result<Product, ListingApiError> {
        let existing = self
            .db
            .fetch_product_by_external_id(connector.id, &payload.id.to_string())
            .await
            .map_err(ListingApiError::database)?;
        let stored_variants = existing.as_ref().map(|p| p.variants.0.clone()).unwrap_or_default();
        let merged = merge_variants(&stored_variants, payload.variants.clone());
        let new_product = storable_product(connector.id, &payload, merged);
        let product = self.db.upsert_product(new_product).await.map_err(ListingApiError::database)?;
        debug!("🔄️ Product {} ({}) upserted for {}", product.external_id, product.title, connector.shop_domain);
        Ok(product)
    }

    /// `products/update`: requires the product to exist already, then applies
    /// the variant-inventory merge and refreshes the sync-owned columns.
    pub async fn product_updated(
        &self,
        connector: &Connector,
        payload: ShopifyProduct,
    ) -> Result<Product, ListingApiError> {
        let external_id = payload.id.to_string();
        let existing = self
            .db
            .fetch_product_by_external_id(connector.id, &external_id)
            .await
            .map_err(ListingApiError::database)?
            .ok_or_else(|| {
                ListingApiError::NotFound(format!("Product {external_id} for shop {}", connector.shop_domain))
            })?;
        let merged = merge_variants(&existing.variants.0, payload.variants.clone());
        let new_product = storable_product(connector.id, &payload, merged);
        let update = ProductUpdate {
            title: new_product.title,
            description: new_product.description,
            price: new_product.price,
            compare_at_price: new_product.compare_at_price,
            currency: new_product.currency,
            sku: new_product.sku,
            gtin: new_product.gtin,
            brand: new_product.brand,
            category: new_product.category,
            images: new_product.images,
            variants: new_product.variants,
            metadata: new_product.metadata,
        };
        let product = self
            .db
            .update_product(&existing.id, update)
            .await
            .map_err(ListingApiError::database)?
            .ok_or_else(|| ListingApiError::NotFound(format!("Product {external_id} disappeared during update")))?;
        debug!("🔄️ Product {} ({}) updated for {}", product.external_id, product.title, connector.shop_domain);
        Ok(product)
    }

    /// `products/delete`: soft-delete. The row stays behind with
    /// `status = INACTIVE`; inventory rows are not touched.
    pub async fn product_deleted(&self, connector: &Connector, external_id: &str) -> Result<(), ListingApiError> {
        let existing = self
            .db
            .fetch_product_by_external_id(connector.id, external_id)
            .await
            .map_err(ListingApiError::database)?
            .ok_or_else(|| {
                ListingApiError::NotFound(format!("Product {external_id} for shop {}", connector.shop_domain))
            })?;
        self.db
            .set_product_status(&existing.id, ListingStatus::Inactive)
            .await
            .map_err(ListingApiError::database)?;
        info!("🔄️ Product {} soft-deleted for {}", external_id, connector.shop_domain);
        Ok(())
    }

    /// `inventory_levels/update`: resolves the owning product by scanning the
    /// stored variant JSON. An unmatched item is recorded against the
    /// `unknown` sentinel and reported as matched=false; the caller should
    /// still answer 200 so the upstream does not retry forever.
    pub async fn inventory_level_updated(
        &self,
        connector: &Connector,
        payload: InventoryLevelPayload,
    ) -> Result<(InventoryLevel, bool), ListingApiError> {
        let products =
            self.db.fetch_products_for_connector(connector.id).await.map_err(ListingApiError::database)?;
        let item_id = payload.inventory_item_id;
        let owner = products.iter().find(|p| {
            p.variants.0.iter().any(|v| v.id == item_id || v.inventory_item_id == Some(item_id))
        });
        let (product_id, matched) = match owner {
            Some(p) => (p.id.clone(), true),
            None => {
                warn!(
                    "🔄️ No product on {} owns inventory item {item_id}. Recording the level against the '{}' \
                     sentinel.",
                    connector.shop_domain, UNKNOWN_PRODUCT_ID
                );
                (UNKNOWN_PRODUCT_ID.to_string(), false)
            },
        };
        let level = self
            .db
            .upsert_inventory_level(UpsertInventoryLevel {
                product_id,
                connector_id: connector.id,
                inventory_item_id: item_id as i64,
                location_id: payload.location_id as i64,
                available: payload.available.unwrap_or(0),
                committed: payload.committed.unwrap_or(0),
                on_hand: payload.on_hand.unwrap_or(0),
                incoming: payload.incoming.unwrap_or(0),
            })
            .await
            .map_err(ListingApiError::database)?;
        Ok((level, matched))
    }

    /// `app/uninstalled`: deactivates the connector and cascades a soft-delete
    /// over its products. A failed cascade is a warning only; the connector
    /// stays deactivated either way.
    pub async fn app_uninstalled(&self, shop_domain: &str) -> Result<(), ListingApiError> {
        let connector = self
            .db
            .fetch_connector_by_shop(shop_domain)
            .await
            .map_err(ListingApiError::database)?
            .ok_or_else(|| ListingApiError::NotFound(format!("Connector for shop {shop_domain}")))?;
        self.db
            .set_connector_status(connector.id, ListingStatus::Inactive)
            .await
            .map_err(ListingApiError::database)?;
        match self.db.deactivate_products_for_connector(connector.id).await {
            Ok(count) => info!("🔄️ Uninstall of {shop_domain}: connector deactivated, {count} products soft-deleted"),
            Err(e) => warn!("🔄️ Uninstall of {shop_domain}: connector deactivated, but product cascade failed: {e}"),
        }
        Ok(())
    }

    /// Initial or manual catalog pull. Inventory counts resolved from the
    /// upstream inventory endpoints override the variant counts before the
    /// upsert. Per-product failures are aggregated; the batch never aborts.
    pub async fn full_sync(
        &self,
        connector: &Connector,
        products: Vec<ShopifyProduct>,
        inventory: &HashMap<u64, i64>,
    ) -> Result<SyncSummary, ListingApiError> {
        let mut summary = SyncSummary { connector_id: connector.id, ..SyncSummary::default() };
        for mut payload in products {
            for variant in &mut payload.variants {
                if let Some(&available) = inventory.get(&variant.id) {
                    variant.inventory_quantity = Some(available);
                }
            }
            let external_id = payload.id;
            match self.product_created(connector, payload).await {
                Ok(_) => summary.synced += 1,
                Err(e) => {
                    summary.failed += 1;
                    summary.errors.push(format!("product {external_id}: {e}"));
                },
            }
        }
        self.db.mark_connector_synced(connector.id).await.map_err(ListingApiError::database)?;
        info!("🔄️ Sync for {}: {}", connector.shop_domain, summary.status_line());
        Ok(summary)
    }
}

/// Projects a payload plus merged variants into storable form, attaching the
/// automatic rule-based enhancement. `seo_enhanced` stays false on this path.
fn storable_product(connector_id: i64, payload: &ShopifyProduct, variants: Vec<ShopifyVariant>) -> NewProduct {
    let metadata =
        rule_based_enhancement(&payload.title, &payload.body_html, &payload.product_type, &payload.vendor);
    let mut product = NewProduct::from_shopify(connector_id, payload, metadata);
    // Recompute the price columns from the merged list, not the raw payload.
    let first = variants.first();
    product.price = first.and_then(|v| v.price.parse().ok());
    product.compare_at_price = first.and_then(|v| v.compare_at_price.as_deref()).and_then(|p| p.parse().ok());
    product.variants = variants;
    product
}

#[cfg(all(test, feature = "sqlite"))]
mod test {
    use shopify_tools::ShopifyImage;

    use super::*;
    use crate::{db_types::NewConnector, SqliteDatabase};

    async fn setup() -> (SyncApi<SqliteDatabase>, Connector) {
        let db = SqliteDatabase::new_with_url("sqlite::memory:", 1).await.unwrap();
        let connector = db.upsert_connector(NewConnector::shopify("demo.myshopify.com", "token")).await.unwrap();
        (SyncApi::new(db), connector)
    }

    fn blue_hat() -> ShopifyProduct {
        ShopifyProduct {
            id: 111,
            title: "Blue Hat".to_string(),
            body_html: String::new(),
            vendor: "Acme".to_string(),
            product_type: "Hats".to_string(),
            images: vec![ShopifyImage { src: "https://x/1.jpg".to_string() }],
            variants: vec![ShopifyVariant {
                id: 9,
                price: "19.99".to_string(),
                sku: "BH-1".to_string(),
                inventory_quantity: Some(7),
                inventory_management: Some("shopify".to_string()),
                ..Default::default()
            }],
        }
    }

    #[tokio::test]
    async fn create_stores_the_canonical_projection() {
        let (api, connector) = setup().await;
        let product = api.product_created(&connector, blue_hat()).await.unwrap();
        assert_eq!(product.external_id, "111");
        assert_eq!(product.price, Some(1999.into()));
        assert_eq!(product.currency, "USD");
        assert_eq!(product.images.0, vec!["https://x/1.jpg".to_string()]);
        assert_eq!(product.status, ListingStatus::Active);
        assert!(!product.metadata.0.seo_enhanced);
        assert!(!product.metadata.0.seo_title.is_empty());
    }

    #[tokio::test]
    async fn update_preserves_inventory_when_the_payload_is_silent() {
        let (api, connector) = setup().await;
        api.product_created(&connector, blue_hat()).await.unwrap();
        let mut update = blue_hat();
        update.variants = vec![ShopifyVariant {
            id: 9,
            price: "19.99".to_string(),
            sku: "BH-1".to_string(),
            inventory_management: Some(String::new()),
            inventory_policy: Some(String::new()),
            ..Default::default()
        }];
        let product = api.product_updated(&connector, update).await.unwrap();
        let variant = &product.variants.0[0];
        assert_eq!(variant.inventory_quantity, Some(7));
        assert_eq!(variant.inventory_management.as_deref(), Some("shopify"));
    }

    #[tokio::test]
    async fn update_applies_an_explicit_sold_out_signal() {
        let (api, connector) = setup().await;
        api.product_created(&connector, blue_hat()).await.unwrap();
        let mut update = blue_hat();
        update.variants[0].inventory_quantity = Some(0);
        let product = api.product_updated(&connector, update).await.unwrap();
        assert_eq!(product.variants.0[0].inventory_quantity, Some(0));
    }

    #[tokio::test]
    async fn update_for_an_unknown_product_is_not_found() {
        let (api, connector) = setup().await;
        let err = api.product_updated(&connector, blue_hat()).await.unwrap_err();
        assert!(matches!(err, ListingApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_is_absorbing_until_the_next_upsert() {
        let (api, connector) = setup().await;
        let product = api.product_created(&connector, blue_hat()).await.unwrap();
        api.product_deleted(&connector, "111").await.unwrap();
        let stored = api.db().fetch_product(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ListingStatus::Inactive);
        // Replaying the delete hits the (still existing) row again.
        api.product_deleted(&connector, "111").await.unwrap();
        // A later create reactivates.
        let revived = api.product_created(&connector, blue_hat()).await.unwrap();
        assert_eq!(revived.id, product.id);
        assert_eq!(revived.status, ListingStatus::Active);
    }

    #[tokio::test]
    async fn unmatched_inventory_goes_to_the_unknown_sentinel() {
        let (api, connector) = setup().await;
        let payload = InventoryLevelPayload {
            inventory_item_id: 4242,
            location_id: 1,
            available: Some(3),
            ..Default::default()
        };
        let (level, matched) = api.inventory_level_updated(&connector, payload).await.unwrap();
        assert!(!matched);
        assert_eq!(level.product_id, UNKNOWN_PRODUCT_ID);
        assert_eq!(level.available, 3);
    }

    #[tokio::test]
    async fn matched_inventory_resolves_the_owning_product() {
        let (api, connector) = setup().await;
        let product = api.product_created(&connector, blue_hat()).await.unwrap();
        let payload =
            InventoryLevelPayload { inventory_item_id: 9, location_id: 1, available: Some(5), ..Default::default() };
        let (level, matched) = api.inventory_level_updated(&connector, payload).await.unwrap();
        assert!(matched);
        assert_eq!(level.product_id, product.id);
    }

    #[tokio::test]
    async fn uninstall_deactivates_connector_and_products() {
        let (api, connector) = setup().await;
        let product = api.product_created(&connector, blue_hat()).await.unwrap();
        api.app_uninstalled("demo.myshopify.com").await.unwrap();
        let connector = api.db().fetch_connector(connector.id).await.unwrap().unwrap();
        assert_eq!(connector.status, ListingStatus::Inactive);
        let stored = api.db().fetch_product(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ListingStatus::Inactive);
    }

    #[tokio::test]
    async fn full_sync_applies_resolved_inventory_and_counts_outcomes() {
        let (api, connector) = setup().await;
        let mut second = blue_hat();
        second.id = 222;
        second.title = "Red Scarf".to_string();
        second.variants[0].id = 10;
        let inventory = HashMap::from([(9, 3_i64), (10, 0_i64)]);
        let summary = api.full_sync(&connector, vec![blue_hat(), second], &inventory).await.unwrap();
        assert_eq!(summary.synced, 2);
        assert_eq!(summary.failed, 0);
        let hat = api.db().fetch_product_by_external_id(connector.id, "111").await.unwrap().unwrap();
        assert_eq!(hat.variants.0[0].inventory_quantity, Some(3));
        let connector = api.db().fetch_connector(connector.id).await.unwrap().unwrap();
        assert!(connector.last_sync_at.is_some());
    }
}
