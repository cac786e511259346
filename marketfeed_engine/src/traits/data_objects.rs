use mfs_common::Money;
use serde::Serialize;
use shopify_tools::ShopifyVariant;

use crate::db_types::Enhancement;

/// The sync-owned subset of product columns written by `products/update`.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
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

impl ProductUpdate {
    /// A no-op update carrying the product's current column values. Useful
    /// when only the metadata is being replaced.
    pub fn from_product(product: &crate::db_types::Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            compare_at_price: product.compare_at_price,
            currency: product.currency.clone(),
            sku: product.sku.clone(),
            gtin: product.gtin.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            images: product.images.0.clone(),
            variants: product.variants.0.clone(),
            metadata: product.metadata.0.clone(),
        }
    }

    pub fn with_metadata(mut self, metadata: Enhancement) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Columns an interactive optimization may be applied to. Anything else is an
/// invalid argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Title,
    Description,
    Category,
}

impl ProductField {
    pub fn from_optimization_type(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            "category" => Some(Self::Category),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
        }
    }
}

/// Outcome of a batch sync. Per-product failures are aggregated rather than
/// aborting the batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncSummary {
    pub connector_id: i64,
    pub synced: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl SyncSummary {
    pub fn status_line(&self) -> String {
        if self.failed == 0 {
            format!("completed: {} products synced", self.synced)
        } else {
            format!("completed with {} errors: {} products synced", self.failed, self.synced)
        }
    }
}
