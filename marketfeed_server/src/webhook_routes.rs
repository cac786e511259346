//! Shopify webhook receiver.
//!
//! A single dispatcher handles every subscribed topic. The HMAC middleware
//! wrapping this scope has already verified the delivery signature, so the
//! body arriving here is authentic.
//!
//! Response policy: signature failures are 401s (from the middleware),
//! malformed requests are 400s, and a delivery referencing a record this
//! service does not hold (unknown shop, update or delete for a product never
//! synced) is a 404. The one carve-out is an inventory update whose item
//! matches no stored variant: that is recorded against the `unknown` sentinel
//! and acknowledged with 200.

use actix_web::{web, HttpRequest, HttpResponse};
use log::*;
use marketfeed_engine::{traits::ListingDatabase, SyncApi};
use shopify_tools::{
    data_objects::{InventoryLevelPayload, ShopifyProduct},
    WebhookTopic,
};

use crate::{data_objects::JsonResponse, errors::ServerError, route};

route!(shopify_webhook => Post "/shopify" impl ListingDatabase);
pub async fn shopify_webhook<B: ListingDatabase>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<SyncApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let topic_header = header_value(&req, "X-Shopify-Topic")
        .ok_or_else(|| ServerError::InvalidRequestBody("Missing X-Shopify-Topic header".to_string()))?;
    let topic = WebhookTopic::from_header(&topic_header)
        .ok_or_else(|| ServerError::InvalidRequestBody(format!("Unsupported webhook topic '{topic_header}'")))?;
    let shop_domain = header_value(&req, "X-Shopify-Shop-Domain")
        .ok_or_else(|| ServerError::InvalidRequestBody("Missing X-Shopify-Shop-Domain header".to_string()))?;
    debug!("🛍️️ {topic} webhook received from {shop_domain}");

    if topic == WebhookTopic::AppUninstalled {
        api.app_uninstalled(&shop_domain).await?;
        return Ok(HttpResponse::Ok().json(JsonResponse::success("Connector deactivated.")));
    }

    let connector = api
        .db()
        .fetch_connector_by_shop(&shop_domain)
        .await
        .map_err(ServerError::backend)?
        .ok_or_else(|| {
            warn!("🛍️️ Webhook from unknown shop {shop_domain}.");
            ServerError::NoRecordFound(format!("Connector for {shop_domain}"))
        })?;

    let message = match topic {
        WebhookTopic::ProductsCreate => {
            let payload = parse_payload::<ShopifyProduct>(&body)?;
            let product = api.product_created(&connector, payload).await?;
            format!("Product {} stored.", product.external_id)
        },
        WebhookTopic::ProductsUpdate => {
            let payload = parse_payload::<ShopifyProduct>(&body)?;
            let product = api.product_updated(&connector, payload).await?;
            format!("Product {} updated.", product.external_id)
        },
        WebhookTopic::ProductsDelete => {
            let payload = parse_payload::<ShopifyProduct>(&body)?;
            let external_id = payload.id.to_string();
            api.product_deleted(&connector, &external_id).await?;
            format!("Product {external_id} deactivated.")
        },
        WebhookTopic::InventoryLevelsUpdate => {
            let payload = parse_payload::<InventoryLevelPayload>(&body)?;
            let (level, matched) = api.inventory_level_updated(&connector, payload).await?;
            if matched {
                format!("Inventory for item {} set to {}.", level.inventory_item_id, level.available)
            } else {
                format!("Inventory for item {} recorded without a product match.", level.inventory_item_id)
            }
        },
        WebhookTopic::AppUninstalled => unreachable!("handled above"),
    };
    debug!("🛍️️ {topic} webhook from {shop_domain} processed. {message}");
    Ok(HttpResponse::Ok().json(JsonResponse::success(message)))
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers().get(name).and_then(|v| v.to_str().ok()).map(|s| s.to_string())
}

fn parse_payload<T: serde::de::DeserializeOwned>(body: &web::Bytes) -> Result<T, ServerError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("🛍️️ Could not parse webhook payload. {e}");
        ServerError::InvalidRequestBody(format!("Malformed webhook payload. {e}"))
    })
}
