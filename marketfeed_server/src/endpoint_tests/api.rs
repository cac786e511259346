use actix_web::{http::StatusCode, test, test::TestRequest, web, web::Data, App};
use marketfeed_engine::{
    seo::LlmConfig,
    traits::ProductManagement,
    LlmClient,
    OptimizerApi,
    SeoEnhancer,
    SqliteDatabase,
    SyncApi,
};
use serde_json::json;

use crate::{
    endpoint_tests::helpers::{seed_connector, seed_product, test_db},
    routes::{
        health,
        ApplyOptimizationRoute,
        CreateProductRoute,
        EnhanceProductRoute,
        OptimizeImagesRoute,
        OptimizeTitleRoute,
    },
};

// None of these tests configure an LLM key, so every LLM-backed path either
// degrades to the rules (enhancement) or fails upstream (optimizer).
async fn post(db: &SqliteDatabase, path: &str, body: serde_json::Value) -> (StatusCode, String) {
    let llm = || LlmClient::new(LlmConfig::default());
    let app = App::new()
        .app_data(Data::new(SyncApi::new(db.clone())))
        .app_data(Data::new(OptimizerApi::new(db.clone(), llm())))
        .app_data(Data::new(SeoEnhancer::new(llm())))
        .service(health)
        .service(
            web::scope("/api")
                .service(EnhanceProductRoute::<SqliteDatabase>::new())
                .service(OptimizeTitleRoute::<SqliteDatabase>::new())
                .service(OptimizeImagesRoute::<SqliteDatabase>::new())
                .service(ApplyOptimizationRoute::<SqliteDatabase>::new())
                .service(CreateProductRoute::new()),
        );
    let service = test::init_service(app).await;
    let req = TestRequest::post().uri(path).set_json(body).to_request();
    let res = test::call_service(&service, req).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    (status, body)
}

#[actix_web::test]
async fn health_check_responds() {
    let app = App::new().service(health);
    let service = test::init_service(app).await;
    let res = test::call_service(&service, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await, "👍️\n".as_bytes());
}

#[actix_web::test]
async fn product_creation_is_not_implemented() {
    let db = test_db().await;
    let (status, body) = post(&db, "/api/products", json!({"title": "Handmade Hat"})).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert!(body.contains("\"success\":false"), "{body}");
}

#[actix_web::test]
async fn enhancement_without_an_llm_uses_the_fallback_and_marks_the_product() {
    let db = test_db().await;
    let connector = seed_connector(&db).await;
    let product = seed_product(&SyncApi::new(db.clone()), &connector, 3001, "Denim Jacket").await;
    let (status, body) = post(&db, &format!("/api/products/{}/enhance", product.id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["product_id"], product.id.as_str());
    // 15 title + 10 short description + 20 keywords + 10 alt text + 15 schema + 5 meta keywords
    assert_eq!(value["seo_score"], 75, "{body}");
    assert_eq!(value["metadata"]["seo_enhanced"], true);
    let stored = db.fetch_product(&product.id).await.unwrap().unwrap();
    assert!(stored.metadata.0.seo_enhanced);
    assert!(!stored.metadata.0.seo_enhanced_at.is_empty());
}

#[actix_web::test]
async fn enhancing_a_missing_product_is_not_found() {
    let db = test_db().await;
    let (status, _) = post(&db, "/api/products/no-such-id/enhance", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn title_optimization_without_an_llm_fails_upstream() {
    let db = test_db().await;
    let connector = seed_connector(&db).await;
    let product = seed_product(&SyncApi::new(db.clone()), &connector, 3002, "Wool Coat").await;
    let (status, body) = post(&db, "/api/optimize/title", json!({"product_id": product.id})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("error"), "{body}");
}

#[actix_web::test]
async fn image_report_needs_no_llm() {
    let db = test_db().await;
    let connector = seed_connector(&db).await;
    let product = seed_product(&SyncApi::new(db.clone()), &connector, 3003, "Silk Scarf").await;
    let (status, body) = post(&db, "/api/optimize/images", json!({"product_id": product.id})).await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["image_count"], 1);
    // One image with a resolution marker: 20 base + 5 bonus.
    assert_eq!(value["quality_score"], 25);
}

#[actix_web::test]
async fn applying_an_optimization_writes_a_single_field() {
    let db = test_db().await;
    let connector = seed_connector(&db).await;
    let product = seed_product(&SyncApi::new(db.clone()), &connector, 3004, "Linen Shirt").await;
    let (status, _) = post(
        &db,
        "/api/optimize/apply",
        json!({
            "product_id": product.id,
            "optimization_type": "title",
            "optimized_value": "Premium Linen Shirt"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stored = db.fetch_product(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Premium Linen Shirt");
    assert_eq!(stored.brand, product.brand, "Other fields stay untouched");
}

#[actix_web::test]
async fn applying_an_unsupported_field_is_bad_request() {
    let db = test_db().await;
    let connector = seed_connector(&db).await;
    let product = seed_product(&SyncApi::new(db.clone()), &connector, 3005, "Felt Hat").await;
    let (status, _) = post(
        &db,
        "/api/optimize/apply",
        json!({"product_id": product.id, "optimization_type": "price", "optimized_value": "0.01"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn applying_to_a_missing_product_is_not_found() {
    let db = test_db().await;
    seed_connector(&db).await;
    let (status, _) = post(
        &db,
        "/api/optimize/apply",
        json!({"product_id": "no-such-id", "optimization_type": "title", "optimized_value": "X"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
