use log::*;
use mfs_common::Secret;

use crate::SHOPIFY_API_VERSION;

/// App-level Shopify credentials. Per-connector values (shop domain, access
/// token) are passed into each [`crate::ShopifyApi`] call instead, since one
/// service instance serves many storefronts.
#[derive(Debug, Clone, Default)]
pub struct ShopifyConfig {
    pub client_id: String,
    pub client_secret: Secret<String>,
    /// Shared secret for webhook HMAC signatures. Empty means signature checks
    /// are skipped (a deliberate configuration allowance).
    pub webhook_secret: Secret<String>,
    pub api_version: String,
}

impl ShopifyConfig {
    pub fn new_from_env_or_default() -> Self {
        let client_id = std::env::var("SHOPIFY_CLIENT_ID").unwrap_or_else(|_| {
            warn!("🪛️ SHOPIFY_CLIENT_ID not set. OAuth installs will fail until it is configured.");
            String::default()
        });
        let client_secret = Secret::new(std::env::var("SHOPIFY_CLIENT_SECRET").unwrap_or_else(|_| {
            warn!("🪛️ SHOPIFY_CLIENT_SECRET not set. OAuth installs will fail until it is configured.");
            String::default()
        }));
        let webhook_secret = Secret::new(std::env::var("SHOPIFY_WEBHOOK_SECRET").unwrap_or_else(|_| {
            warn!("🪛️ SHOPIFY_WEBHOOK_SECRET not set. Webhook HMAC validation is DISABLED.");
            String::default()
        }));
        let api_version = std::env::var("SHOPIFY_API_VERSION").unwrap_or_else(|_| {
            info!("🪛️ SHOPIFY_API_VERSION not set, using {SHOPIFY_API_VERSION} as default");
            SHOPIFY_API_VERSION.to_string()
        });
        Self { client_id, client_secret, webhook_secret, api_version }
    }
}
