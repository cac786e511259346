use serde::{Deserialize, Serialize};

/// Response of the OAuth `access_token` exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessToken {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ShopifyImage {
    #[serde(default)]
    pub src: String,
}

/// A product variant, exactly as Shopify transmits it. The same shape is
/// persisted verbatim in the product's `variants` JSON column, so that a
/// partial webhook payload can be merged against the stored copy
/// field-by-field.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ShopifyVariant {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub compare_at_price: Option<String>,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub barcode: Option<String>,
    /// Absent when the webhook payload omits inventory fields entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub inventory_management: Option<String>,
    #[serde(default)]
    pub inventory_policy: Option<String>,
    #[serde(default)]
    pub inventory_item_id: Option<u64>,
    #[serde(default)]
    pub available: Option<bool>,
}

impl ShopifyVariant {
    /// Empty or `not_managed` means the store does not track inventory for
    /// this variant.
    pub fn tracks_inventory(&self) -> bool {
        match self.inventory_management.as_deref() {
            None | Some("") | Some("not_managed") => false,
            Some(_) => true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ShopifyProduct {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body_html: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub images: Vec<ShopifyImage>,
    #[serde(default)]
    pub variants: Vec<ShopifyVariant>,
}

/// `inventory_levels/update` webhook payload. Only `available` is guaranteed;
/// the extended quantities are present on some shop plans only.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InventoryLevelPayload {
    pub inventory_item_id: u64,
    pub location_id: u64,
    #[serde(default)]
    pub available: Option<i64>,
    #[serde(default)]
    pub committed: Option<i64>,
    #[serde(default)]
    pub on_hand: Option<i64>,
    #[serde(default)]
    pub incoming: Option<i64>,
}

//-------------------------------------  Webhook registration  ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookTopic {
    ProductsCreate,
    ProductsUpdate,
    ProductsDelete,
    InventoryLevelsUpdate,
    AppUninstalled,
}

impl WebhookTopic {
    pub const ALL: [WebhookTopic; 5] = [
        WebhookTopic::ProductsCreate,
        WebhookTopic::ProductsUpdate,
        WebhookTopic::ProductsDelete,
        WebhookTopic::InventoryLevelsUpdate,
        WebhookTopic::AppUninstalled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookTopic::ProductsCreate => "products/create",
            WebhookTopic::ProductsUpdate => "products/update",
            WebhookTopic::ProductsDelete => "products/delete",
            WebhookTopic::InventoryLevelsUpdate => "inventory_levels/update",
            WebhookTopic::AppUninstalled => "app/uninstalled",
        }
    }

    pub fn from_header(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == value)
    }
}

impl std::fmt::Display for WebhookTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewWebhook {
    pub topic: String,
    pub address: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Webhook {
    pub id: i64,
    pub topic: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookRegistrationStatus {
    Registered,
    /// Shopify answers 422 when the (topic, address) pair already exists.
    AlreadyRegistered,
    Failed { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct WebhookRegistration {
    pub topic: WebhookTopic,
    pub status: WebhookRegistrationStatus,
}

impl WebhookRegistration {
    pub fn succeeded(&self) -> bool {
        !matches!(self.status, WebhookRegistrationStatus::Failed { .. })
    }
}

//-------------------------------------  Inventory fetch plumbing  -----------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VariantIdsResponse {
    pub variants: Vec<VariantInventoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VariantInventoryItem {
    pub id: u64,
    pub inventory_item_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InventoryLevelsResponse {
    pub inventory_levels: Vec<InventoryLevelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InventoryLevelEntry {
    pub inventory_item_id: u64,
    #[serde(default)]
    pub available: Option<i64>,
}
