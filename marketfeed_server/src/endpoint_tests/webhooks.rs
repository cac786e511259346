use actix_web::{http::StatusCode, test, test::TestRequest, web, web::Data, App};
use marketfeed_engine::{traits::ProductManagement, SqliteDatabase, SyncApi};
use mfs_common::Secret;

use crate::{
    endpoint_tests::helpers::{sample_payload, seed_connector, test_db},
    helpers::calculate_hmac,
    middleware::HmacMiddlewareFactory,
    webhook_routes::ShopifyWebhookRoute,
};

const SECRET: &str = "webhook-test-secret";

async fn call_webhook(
    db: &SqliteDatabase,
    secret: &str,
    body: &[u8],
    headers: &[(&str, &str)],
) -> (StatusCode, String) {
    let app = App::new().app_data(Data::new(SyncApi::new(db.clone()))).service(
        web::scope("/webhooks")
            .wrap(HmacMiddlewareFactory::new("X-Shopify-Hmac-Sha256", Secret::new(secret.to_string())))
            .service(ShopifyWebhookRoute::<SqliteDatabase>::new()),
    );
    let service = test::init_service(app).await;
    let mut req = TestRequest::post().uri("/webhooks/shopify").set_payload(body.to_vec());
    for (name, value) in headers {
        req = req.insert_header((*name, *value));
    }
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
            (status, body)
        },
        Err(err) => {
            let res = err.error_response();
            let status = res.status();
            let bytes = actix_web::body::to_bytes(res.into_body()).await.unwrap();
            (status, String::from_utf8_lossy(&bytes).into_owned())
        },
    }
}

fn sign(body: &[u8]) -> String {
    calculate_hmac(SECRET, body)
}

#[actix_web::test]
async fn missing_signature_is_unauthorized() {
    let db = test_db().await;
    let connector = seed_connector(&db).await;
    let body = serde_json::to_vec(&sample_payload(1001, "Denim Jacket")).unwrap();
    let (status, _) = call_webhook(
        &db,
        SECRET,
        &body,
        &[("X-Shopify-Topic", "products/create"), ("X-Shopify-Shop-Domain", "demo.myshopify.com")],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let stored = db.fetch_product_by_external_id(connector.id, "1001").await.unwrap();
    assert!(stored.is_none(), "A rejected delivery must not write to the store");
}

#[actix_web::test]
async fn tampered_signature_is_unauthorized() {
    let db = test_db().await;
    seed_connector(&db).await;
    let body = serde_json::to_vec(&sample_payload(1001, "Denim Jacket")).unwrap();
    let signature = calculate_hmac("some-other-secret", &body);
    let (status, _) = call_webhook(&db, SECRET, &body, &[
        ("X-Shopify-Topic", "products/create"),
        ("X-Shopify-Shop-Domain", "demo.myshopify.com"),
        ("X-Shopify-Hmac-Sha256", signature.as_str()),
    ])
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn valid_delivery_stores_the_product() {
    let db = test_db().await;
    let connector = seed_connector(&db).await;
    let body = serde_json::to_vec(&sample_payload(1001, "Denim Jacket")).unwrap();
    let signature = sign(&body);
    let (status, response) = call_webhook(&db, SECRET, &body, &[
        ("X-Shopify-Topic", "products/create"),
        ("X-Shopify-Shop-Domain", "demo.myshopify.com"),
        ("X-Shopify-Hmac-Sha256", signature.as_str()),
    ])
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(response.contains("\"success\":true"), "{response}");
    let stored = db.fetch_product_by_external_id(connector.id, "1001").await.unwrap().unwrap();
    assert_eq!(stored.title, "Denim Jacket");
}

#[actix_web::test]
async fn missing_topic_header_is_bad_request() {
    let db = test_db().await;
    seed_connector(&db).await;
    let body = br#"{"id": 1}"#;
    let signature = sign(body);
    let (status, _) = call_webhook(&db, SECRET, body, &[
        ("X-Shopify-Shop-Domain", "demo.myshopify.com"),
        ("X-Shopify-Hmac-Sha256", signature.as_str()),
    ])
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unsupported_topic_is_bad_request() {
    let db = test_db().await;
    let body = br#"{"id": 1}"#;
    let signature = sign(body);
    let (status, _) = call_webhook(&db, SECRET, body, &[
        ("X-Shopify-Topic", "orders/create"),
        ("X-Shopify-Shop-Domain", "demo.myshopify.com"),
        ("X-Shopify-Hmac-Sha256", signature.as_str()),
    ])
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn empty_secret_disables_signature_checks() {
    let db = test_db().await;
    let connector = seed_connector(&db).await;
    let body = serde_json::to_vec(&sample_payload(1002, "Wool Coat")).unwrap();
    let (status, _) = call_webhook(&db, "", &body, &[
        ("X-Shopify-Topic", "products/create"),
        ("X-Shopify-Shop-Domain", "demo.myshopify.com"),
    ])
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(db.fetch_product_by_external_id(connector.id, "1002").await.unwrap().is_some());
}

#[actix_web::test]
async fn unknown_shop_is_not_found() {
    let db = test_db().await;
    let body = serde_json::to_vec(&sample_payload(1003, "Silk Scarf")).unwrap();
    let signature = sign(&body);
    let (status, response) = call_webhook(&db, SECRET, &body, &[
        ("X-Shopify-Topic", "products/create"),
        ("X-Shopify-Shop-Domain", "stranger.myshopify.com"),
        ("X-Shopify-Hmac-Sha256", signature.as_str()),
    ])
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(response.contains("error"), "{response}");
}

#[actix_web::test]
async fn update_for_a_missing_product_is_not_found() {
    let db = test_db().await;
    seed_connector(&db).await;
    let body = serde_json::to_vec(&sample_payload(4242, "Never Synced")).unwrap();
    let signature = sign(&body);
    let (status, _) = call_webhook(&db, SECRET, &body, &[
        ("X-Shopify-Topic", "products/update"),
        ("X-Shopify-Shop-Domain", "demo.myshopify.com"),
        ("X-Shopify-Hmac-Sha256", signature.as_str()),
    ])
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_for_a_missing_product_is_not_found() {
    let db = test_db().await;
    seed_connector(&db).await;
    let body = br#"{"id": 4243}"#;
    let signature = sign(body);
    let (status, _) = call_webhook(&db, SECRET, body, &[
        ("X-Shopify-Topic", "products/delete"),
        ("X-Shopify-Shop-Domain", "demo.myshopify.com"),
        ("X-Shopify-Hmac-Sha256", signature.as_str()),
    ])
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn inventory_update_reports_an_unmatched_item() {
    let db = test_db().await;
    seed_connector(&db).await;
    let body = br#"{"inventory_item_id": 999999, "location_id": 5, "available": 3}"#;
    let signature = sign(body);
    let (status, response) = call_webhook(&db, SECRET, body, &[
        ("X-Shopify-Topic", "inventory_levels/update"),
        ("X-Shopify-Shop-Domain", "demo.myshopify.com"),
        ("X-Shopify-Hmac-Sha256", signature.as_str()),
    ])
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(response.contains("without a product match"), "{response}");
}
