use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use mfs_common::{Money, DEFAULT_CURRENCY_CODE};
use serde::{Deserialize, Serialize};
use shopify_tools::{ShopifyProduct, ShopifyVariant};
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

/// Sentinel product id recorded against inventory levels whose product could
/// not be located. The column is TEXT, so the sentinel coexists with UUIDs.
pub const UNKNOWN_PRODUCT_ID: &str = "unknown";

//--------------------------------------   ListingStatus   ------------------------------------------------------------

/// Lifecycle status shared by connectors and products. Rows are never hard
/// deleted; they are flipped to `Inactive` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ListingStatus {
    Active,
    Inactive,
}

impl Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingStatus::Active => write!(f, "ACTIVE"),
            ListingStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid listing status: {0}")]
pub struct StatusConversionError(String);

impl FromStr for ListingStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------     Connector     ------------------------------------------------------------

/// A persistent authorized link between this service and one merchant
/// storefront. Created by the OAuth callback; inactivated on uninstall.
#[derive(Debug, Clone, FromRow)]
pub struct Connector {
    pub id: i64,
    pub name: String,
    /// Upstream kind. Only `shopify` is implemented.
    pub kind: String,
    pub status: ListingStatus,
    /// Fully-qualified storefront host, e.g. `demo.myshopify.com`.
    pub shop_domain: String,
    pub access_token: String,
    pub created_at: DateTime<Utc>,
    pub last_sync_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewConnector {
    pub name: String,
    pub kind: String,
    pub shop_domain: String,
    pub access_token: String,
}

impl NewConnector {
    pub fn shopify(shop_domain: &str, access_token: &str) -> Self {
        Self {
            name: shop_domain.to_string(),
            kind: "shopify".to_string(),
            shop_domain: shop_domain.to_string(),
            access_token: access_token.to_string(),
        }
    }
}

//--------------------------------------    Enhancement    ------------------------------------------------------------

/// SEO metadata embedded in `Product.metadata`.
///
/// `seo_enhanced` is true only when an explicit optimize action produced the
/// record. Automatic syncs always write rule-based enhancements with
/// `seo_enhanced = false`, so downstream consumers can tell AI-enhanced
/// records from baseline ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enhancement {
    #[serde(default)]
    pub seo_title: String,
    #[serde(default)]
    pub seo_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Comma-joined mirror of `keywords`.
    #[serde(default)]
    pub meta_keywords: String,
    #[serde(default)]
    pub alt_text: String,
    /// JSON-LD `Product` object, serialized to a single string.
    #[serde(default)]
    pub schema_markup: String,
    #[serde(default)]
    pub seo_enhanced: bool,
    /// RFC 3339 timestamp, or empty when never explicitly enhanced.
    #[serde(default)]
    pub seo_enhanced_at: String,
}

//--------------------------------------      Product      ------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    /// UUID, assigned locally on first insert.
    pub id: String,
    pub connector_id: i64,
    /// Upstream numeric product id, stored as a decimal string.
    pub external_id: String,
    pub title: String,
    /// HTML permitted.
    pub description: String,
    pub price: Option<Money>,
    pub compare_at_price: Option<Money>,
    pub currency: String,
    pub sku: Option<String>,
    pub gtin: Option<String>,
    pub brand: String,
    pub category: String,
    /// Ordered image URLs.
    pub images: Json<Vec<String>>,
    /// Variants exactly as the upstream sent them; the reconciliation engine
    /// merges partial webhook payloads against this copy.
    pub variants: Json<Vec<ShopifyVariant>>,
    pub metadata: Json<Enhancement>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn first_image(&self) -> Option<&str> {
        self.images.0.first().map(String::as_str)
    }

    /// `in stock` when any variant is untracked or has stock left.
    pub fn is_in_stock(&self) -> bool {
        self.variants.0.is_empty()
            || self.variants.0.iter().any(|v| !v.tracks_inventory() || v.inventory_quantity.unwrap_or(0) > 0)
    }
}

/// Field values for a product upsert or full-row update. Everything the sync
/// path writes, minus the identity and timestamps which the storage layer
/// owns.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub connector_id: i64,
    pub external_id: String,
    pub title: String,
    pub description: String,
    pub price: Option<Money>,
    pub compare_at_price: Option<Money>,
    pub currency: String,
    pub sku: Option<String>,
    pub gtin: Option<String>,
    pub brand: String,
    pub category: String,
    pub images: Vec<String>,
    pub variants: Vec<ShopifyVariant>,
    pub metadata: Enhancement,
}

impl NewProduct {
    /// Projects a Shopify product payload into storable form. The price is the
    /// first variant's parsed price; unparseable or absent prices stay NULL.
    pub fn from_shopify(connector_id: i64, payload: &ShopifyProduct, metadata: Enhancement) -> Self {
        let first = payload.variants.first();
        let price = first.and_then(|v| v.price.parse::<Money>().ok());
        let compare_at_price =
            first.and_then(|v| v.compare_at_price.as_deref()).and_then(|p| p.parse::<Money>().ok());
        let sku = first.map(|v| v.sku.clone()).filter(|s| !s.is_empty());
        let gtin = first.and_then(|v| v.barcode.clone()).filter(|s| !s.is_empty());
        Self {
            connector_id,
            external_id: payload.id.to_string(),
            title: payload.title.clone(),
            description: payload.body_html.clone(),
            price,
            compare_at_price,
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            sku,
            gtin,
            brand: payload.vendor.clone(),
            category: payload.product_type.clone(),
            images: payload.images.iter().map(|i| i.src.clone()).collect(),
            variants: payload.variants.clone(),
            metadata,
        }
    }
}

//--------------------------------------   InventoryLevel   -----------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct InventoryLevel {
    pub id: i64,
    /// Product UUID, or [`UNKNOWN_PRODUCT_ID`] when the owning product could
    /// not be resolved.
    pub product_id: String,
    pub connector_id: i64,
    pub inventory_item_id: i64,
    pub location_id: i64,
    pub available: i64,
    pub committed: i64,
    pub on_hand: i64,
    pub incoming: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UpsertInventoryLevel {
    pub product_id: String,
    pub connector_id: i64,
    pub inventory_item_id: i64,
    pub location_id: i64,
    pub available: i64,
    pub committed: i64,
    pub on_hand: i64,
    pub incoming: i64,
}
