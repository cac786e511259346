use std::fmt::Display;

use marketfeed_engine::{
    optimizer::{DescriptionOptions, TitleOptions},
    traits::SyncSummary,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// Query parameters Shopify appends to the OAuth redirect.
#[derive(Debug, Clone, Deserialize)]
pub struct OauthCallbackParams {
    #[serde(default)]
    pub shop: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub excel: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeTitleRequest {
    pub product_id: String,
    #[serde(flatten)]
    pub options: TitleOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeDescriptionRequest {
    pub product_id: String,
    #[serde(flatten)]
    pub options: DescriptionOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRequest {
    pub product_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyOptimizationRequest {
    /// Client-side correlation id, echoed in logs only.
    #[serde(default)]
    pub optimization_id: String,
    pub product_id: String,
    pub optimization_type: String,
    pub optimized_value: String,
}

/// Body of the sync endpoints: the engine's summary plus a human-readable
/// status line.
#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub connector_id: i64,
    pub synced: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub message: String,
}

impl From<SyncSummary> for SyncResult {
    fn from(summary: SyncSummary) -> Self {
        let message = summary.status_line();
        Self {
            connector_id: summary.connector_id,
            synced: summary.synced,
            failed: summary.failed,
            errors: summary.errors,
            message,
        }
    }
}
