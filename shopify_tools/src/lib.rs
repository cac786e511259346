//! Shopify Admin REST client for the Marketfeed listing service.
//!
//! This crate is the single egress point to a merchant storefront. It covers
//! the four upstream interactions the sync engine needs:
//!
//! 1. OAuth token exchange ([`ShopifyApi::authorize`])
//! 2. Catalog pull ([`ShopifyApi::fetch_products`])
//! 3. Inventory lookup ([`ShopifyApi::fetch_inventory`])
//! 4. Webhook registration ([`ShopifyApi::register_webhooks`])
//!
//! Incoming webhook *verification* lives in the server crate; this crate only
//! defines the payload data objects shared by both directions.

mod api;
mod config;
pub mod data_objects;
mod error;

pub use api::ShopifyApi;
pub use config::ShopifyConfig;
pub use data_objects::{
    AccessToken,
    InventoryLevelPayload,
    ShopifyImage,
    ShopifyProduct,
    ShopifyVariant,
    WebhookRegistration,
    WebhookRegistrationStatus,
    WebhookTopic,
};
pub use error::ShopifyApiError;

/// The Admin REST API version this service is pinned to.
pub const SHOPIFY_API_VERSION: &str = "2023-10";

/// OAuth scopes requested during the install handshake.
pub const OAUTH_SCOPES: &str = "read_products,write_products,read_inventory,write_inventory,read_shop";
