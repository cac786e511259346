use std::{collections::HashMap, sync::Arc, time::Duration};

use log::*;
use mfs_common::helpers::normalize_shop_domain;
use reqwest::{header::HeaderValue, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::ShopifyConfig,
    data_objects::{
        AccessToken,
        InventoryLevelsResponse,
        NewWebhook,
        ShopifyProduct,
        VariantIdsResponse,
        Webhook,
        WebhookRegistration,
        WebhookRegistrationStatus,
        WebhookTopic,
    },
    ShopifyApiError,
};

/// Every upstream call carries this wall-clock deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Admin REST client for a Shopify storefront.
///
/// The client is multi-tenant: the shop domain and per-connector access token
/// are arguments on each call rather than baked into the client, since one
/// Marketfeed instance serves many connected stores.
#[derive(Clone)]
pub struct ShopifyApi {
    config: ShopifyConfig,
    client: Arc<Client>,
}

impl ShopifyApi {
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &ShopifyConfig {
        &self.config
    }

    fn admin_url(&self, shop: &str, path: &str) -> String {
        let shop = normalize_shop_domain(shop);
        format!("https://{shop}.myshopify.com/admin/api/{}{path}", self.config.api_version)
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: &str,
        token: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, ShopifyApiError> {
        trace!("🛍️️ Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if !token.is_empty() {
            let val = HeaderValue::from_str(token).map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
            req = req.header("X-Shopify-Access-Token", val);
        }
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("🛍️️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
            Err(ShopifyApiError::QueryError { status, message })
        }
    }

    /// Exchanges an OAuth authorization `code` for a permanent access token.
    ///
    /// Fails with [`ShopifyApiError::AuthFailed`] when the exchange returns a
    /// non-2xx status or an empty token, so that callers never persist a
    /// partial connector.
    pub async fn authorize(&self, shop: &str, code: &str) -> Result<AccessToken, ShopifyApiError> {
        let shop = normalize_shop_domain(shop);
        let url = format!("https://{shop}.myshopify.com/admin/oauth/access_token");
        debug!("🛍️️ Exchanging OAuth code for access token on {shop}");
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.reveal().as_str()),
            ("code", code),
        ];
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ShopifyApiError::AuthFailed(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ShopifyApiError::AuthFailed(format!("Token exchange returned {status}: {message}")));
        }
        let token = response.json::<AccessToken>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))?;
        if token.access_token.is_empty() {
            return Err(ShopifyApiError::AuthFailed("Token exchange returned an empty access token".to_string()));
        }
        info!("🛍️️ OAuth exchange for {shop} succeeded. Granted scopes: {}", token.scope);
        Ok(token)
    }

    /// Fetches the product catalog. Default fields are requested deliberately,
    /// so variants arrive with inventory quantities when the store manages
    /// them.
    pub async fn fetch_products(&self, shop: &str, token: &str) -> Result<Vec<ShopifyProduct>, ShopifyApiError> {
        #[derive(Deserialize)]
        struct ProductsResponse {
            products: Vec<ShopifyProduct>,
        }
        let url = self.admin_url(shop, "/products.json");
        debug!("🛍️️ Fetching product catalog from {shop}");
        let result =
            self.rest_query::<ProductsResponse, ()>(Method::GET, &url, token, &[("limit", "250")], None).await?;
        info!("🛍️️ Fetched {} products from {shop}", result.products.len());
        Ok(result.products)
    }

    /// Resolves available inventory per variant, in two steps:
    /// variant ids → inventory item ids, then inventory item ids → levels.
    /// An empty input yields an empty map without calling upstream.
    pub async fn fetch_inventory(
        &self,
        shop: &str,
        token: &str,
        variant_ids: &[u64],
    ) -> Result<HashMap<u64, i64>, ShopifyApiError> {
        if variant_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids = variant_ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",");
        let url = self.admin_url(shop, "/variants.json");
        let variants = self
            .rest_query::<VariantIdsResponse, ()>(
                Method::GET,
                &url,
                token,
                &[("ids", ids.as_str()), ("fields", "id,inventory_item_id")],
                None,
            )
            .await?;
        if variants.variants.is_empty() {
            return Ok(HashMap::new());
        }
        let item_to_variant: HashMap<u64, u64> =
            variants.variants.iter().map(|v| (v.inventory_item_id, v.id)).collect();
        let item_ids = variants.variants.iter().map(|v| v.inventory_item_id.to_string()).collect::<Vec<_>>().join(",");
        let url = self.admin_url(shop, "/inventory_levels.json");
        let levels = self
            .rest_query::<InventoryLevelsResponse, ()>(
                Method::GET,
                &url,
                token,
                &[("inventory_item_ids", item_ids.as_str())],
                None,
            )
            .await?;
        let mut result = HashMap::with_capacity(levels.inventory_levels.len());
        for level in levels.inventory_levels {
            if let Some(&variant_id) = item_to_variant.get(&level.inventory_item_id) {
                // A variant stocked at several locations reports one level per
                // location. Sum them into a single available count.
                *result.entry(variant_id).or_insert(0) += level.available.unwrap_or(0);
            }
        }
        debug!("🛍️️ Resolved inventory for {} of {} variants on {shop}", result.len(), variant_ids.len());
        Ok(result)
    }

    /// Registers the full webhook topic set against the locally hosted
    /// receiver. 422 means the subscription already exists and counts as
    /// success; any other failure is reported per topic without aborting the
    /// batch.
    pub async fn register_webhooks(
        &self,
        shop: &str,
        token: &str,
        receiver_url: &str,
    ) -> Result<Vec<WebhookRegistration>, ShopifyApiError> {
        let mut results = Vec::with_capacity(WebhookTopic::ALL.len());
        for topic in WebhookTopic::ALL {
            let status = self.register_webhook(shop, token, receiver_url, topic).await;
            match &status {
                WebhookRegistrationStatus::Registered => info!("🛍️️ Registered webhook {topic} for {shop}"),
                WebhookRegistrationStatus::AlreadyRegistered => {
                    debug!("🛍️️ Webhook {topic} already registered for {shop}")
                },
                WebhookRegistrationStatus::Failed { status, message } => {
                    warn!("🛍️️ Could not register webhook {topic} for {shop}. Status {status}: {message}")
                },
            }
            results.push(WebhookRegistration { topic, status });
        }
        Ok(results)
    }

    async fn register_webhook(
        &self,
        shop: &str,
        token: &str,
        receiver_url: &str,
        topic: WebhookTopic,
    ) -> WebhookRegistrationStatus {
        #[derive(Serialize)]
        struct WebhookInput {
            webhook: NewWebhook,
        }
        #[derive(Deserialize)]
        struct WebhookResponse {
            webhook: Webhook,
        }
        let input = WebhookInput {
            webhook: NewWebhook {
                topic: topic.as_str().to_string(),
                address: receiver_url.trim_end_matches('/').to_string(),
                format: "json".to_string(),
            },
        };
        let url = self.admin_url(shop, "/webhooks.json");
        match self.rest_query::<WebhookResponse, WebhookInput>(Method::POST, &url, token, &[], Some(input)).await {
            Ok(response) => {
                trace!("🛍️️ Webhook {topic} registered with id {}", response.webhook.id);
                WebhookRegistrationStatus::Registered
            },
            Err(ShopifyApiError::QueryError { status, .. }) if status == StatusCode::UNPROCESSABLE_ENTITY.as_u16() => {
                WebhookRegistrationStatus::AlreadyRegistered
            },
            Err(ShopifyApiError::QueryError { status, message }) => {
                WebhookRegistrationStatus::Failed { status, message }
            },
            Err(e) => WebhookRegistrationStatus::Failed { status: 0, message: e.to_string() },
        }
    }
}
