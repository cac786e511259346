use std::collections::HashMap;

use hmac::{Hmac, Mac};
use log::warn;
use marketfeed_engine::{db_types::Connector, traits::ListingDatabase, SyncApi};
use mfs_common::helpers::normalize_shop_domain;
use sha2::Sha256;
use shopify_tools::ShopifyApi;

use crate::{data_objects::SyncResult, errors::ServerError};

type HmacSha256 = Hmac<Sha256>;

/// Base64 HMAC-SHA256 over the raw request body, the way Shopify signs
/// webhook deliveries.
pub fn calculate_hmac(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(body);
    base64::encode(mac.finalize().into_bytes())
}

/// Verifies the base64 signature header against the raw body. The comparison
/// runs in constant time via `Mac::verify_slice`.
pub fn validate_hmac(secret: &str, body: &[u8], provided: &str) -> bool {
    let Ok(expected) = base64::decode(provided) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Canonical storefront host for storage and webhook matching, e.g. `demo` or
/// `https://demo.myshopify.com/` both become `demo.myshopify.com`.
pub fn full_shop_domain(shop: &str) -> String {
    format!("{}.myshopify.com", normalize_shop_domain(shop))
}

/// Pulls the catalog and inventory from the storefront and folds them into
/// the store. An inventory resolution failure degrades to the variant counts
/// already in the catalog payload rather than failing the sync.
pub async fn run_full_sync<B: ListingDatabase>(
    api: &SyncApi<B>,
    shopify: &ShopifyApi,
    connector: &Connector,
) -> Result<SyncResult, ServerError> {
    let products = shopify.fetch_products(&connector.shop_domain, &connector.access_token).await?;
    let variant_ids: Vec<u64> = products.iter().flat_map(|p| p.variants.iter().map(|v| v.id)).collect();
    let inventory = match shopify.fetch_inventory(&connector.shop_domain, &connector.access_token, &variant_ids).await
    {
        Ok(map) => map,
        Err(e) => {
            warn!(
                "🛍️️ Could not resolve inventory for {}. Using the catalog's variant counts. {e}",
                connector.shop_domain
            );
            HashMap::new()
        },
    };
    let summary = api.full_sync(connector, products, &inventory).await?;
    Ok(SyncResult::from(summary))
}
