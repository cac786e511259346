use actix_web::{http::StatusCode, test, test::TestRequest, web, web::Data, App};
use marketfeed_engine::{SqliteDatabase, SyncApi};

use crate::{
    endpoint_tests::helpers::{seed_connector, seed_product, test_config, test_db},
    routes::{ExportProductsRoute, FacebookCsvFeedRoute, GoogleFeedRoute},
};

async fn get(db: &SqliteDatabase, path: &str) -> (StatusCode, String) {
    let app = App::new()
        .app_data(Data::new(SyncApi::new(db.clone())))
        .app_data(Data::new(test_config()))
        .service(
            web::scope("/feeds")
                .service(GoogleFeedRoute::<SqliteDatabase>::new())
                .service(FacebookCsvFeedRoute::<SqliteDatabase>::new()),
        )
        .service(web::scope("/api").service(ExportProductsRoute::<SqliteDatabase>::new()));
    let service = test::init_service(app).await;
    let res = test::call_service(&service, TestRequest::get().uri(path).to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    (status, body)
}

#[actix_web::test]
async fn google_feed_is_rss_with_namespaced_fields() {
    let db = test_db().await;
    let connector = seed_connector(&db).await;
    seed_product(&SyncApi::new(db.clone()), &connector, 2001, "Denim Jacket").await;
    let (status, body) = get(&db, "/feeds/google.xml").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<?xml"), "{body}");
    assert!(body.contains("xmlns:g=\"http://base.google.com/ns/1.0\""));
    assert!(body.contains("<g:id>2001</g:id>"));
    assert!(body.contains("<g:price>59.99 USD</g:price>"));
    assert!(body.contains("<g:availability>in stock</g:availability>"));
}

#[actix_web::test]
async fn facebook_feed_starts_with_the_contractual_header() {
    let db = test_db().await;
    let connector = seed_connector(&db).await;
    seed_product(&SyncApi::new(db.clone()), &connector, 2002, "Wool Coat").await;
    let (status, body) = get(&db, "/feeds/facebook.csv").await;
    assert_eq!(status, StatusCode::OK);
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("id,name,description,price,sku,brand,category,image_url,availability,condition,url"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("2002,Wool Coat,"), "{row}");
    assert!(row.contains("https://feeds.example.com/products/"), "{row}");
}

#[actix_web::test]
async fn excel_export_differs_from_plain_csv_only_by_the_bom() {
    let db = test_db().await;
    let connector = seed_connector(&db).await;
    seed_product(&SyncApi::new(db.clone()), &connector, 2003, "Silk Scarf").await;
    let (status, plain) = get(&db, "/api/export/csv").await;
    assert_eq!(status, StatusCode::OK);
    let (status, excel) = get(&db, "/api/export/csv?excel=true").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!plain.starts_with('\u{feff}'));
    assert!(excel.starts_with('\u{feff}'));
    assert_eq!(excel.trim_start_matches('\u{feff}'), plain);
}

#[actix_web::test]
async fn json_export_wraps_products_in_export_info() {
    let db = test_db().await;
    let connector = seed_connector(&db).await;
    seed_product(&SyncApi::new(db.clone()), &connector, 2004, "Linen Shirt").await;
    let (status, body) = get(&db, "/api/export/json").await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["export_info"]["version"], "1.0");
    assert_eq!(value["export_info"]["total_products"], 1);
    assert_eq!(value["products"][0]["title"], "Linen Shirt");
}

#[actix_web::test]
async fn unknown_export_format_is_bad_request() {
    let db = test_db().await;
    let (status, body) = get(&db, "/api/export/yaml").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Unknown export format"), "{body}");
}
