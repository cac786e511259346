use actix_web::{http::KeepAlive, middleware::Logger, web, web::Data, App, HttpServer};
use log::*;
use marketfeed_engine::{LlmClient, OptimizerApi, SeoEnhancer, SqliteDatabase, SyncApi};
use shopify_tools::ShopifyApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    middleware::HmacMiddlewareFactory,
    routes::{
        health,
        ApplyOptimizationRoute,
        AuthCallbackRoute,
        ConnectorSyncRoute,
        CreateProductRoute,
        EnhanceProductRoute,
        ExportProductsRoute,
        FacebookCsvFeedRoute,
        GoogleFeedRoute,
        OptimizeCategoryRoute,
        OptimizeDescriptionRoute,
        OptimizeImagesRoute,
        OptimizeTitleRoute,
    },
    webhook_routes::ShopifyWebhookRoute,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(format!("Server execution error. {e}")))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
) -> Result<actix_web::dev::Server, ServerError> {
    let shopify = ShopifyApi::new(config.shopify.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let sync_api = SyncApi::new(db.clone());
        let optimizer = OptimizerApi::new(db.clone(), LlmClient::new(config.llm.clone()));
        let enhancer = SeoEnhancer::new(LlmClient::new(config.llm.clone()));
        let webhook_guard =
            HmacMiddlewareFactory::new("X-Shopify-Hmac-Sha256", config.shopify.webhook_secret.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("access_log"))
            .app_data(Data::new(sync_api))
            .app_data(Data::new(optimizer))
            .app_data(Data::new(enhancer))
            .app_data(Data::new(shopify.clone()))
            .app_data(Data::new(config.clone()))
            .service(health)
            .service(AuthCallbackRoute::<SqliteDatabase>::new())
            .service(
                web::scope("/webhooks")
                    .wrap(webhook_guard)
                    .service(ShopifyWebhookRoute::<SqliteDatabase>::new()),
            )
            .service(
                web::scope("/feeds")
                    .service(GoogleFeedRoute::<SqliteDatabase>::new())
                    .service(FacebookCsvFeedRoute::<SqliteDatabase>::new()),
            )
            .service(
                web::scope("/api")
                    .service(ConnectorSyncRoute::<SqliteDatabase>::new())
                    .service(ExportProductsRoute::<SqliteDatabase>::new())
                    .service(EnhanceProductRoute::<SqliteDatabase>::new())
                    .service(OptimizeTitleRoute::<SqliteDatabase>::new())
                    .service(OptimizeDescriptionRoute::<SqliteDatabase>::new())
                    .service(OptimizeCategoryRoute::<SqliteDatabase>::new())
                    .service(OptimizeImagesRoute::<SqliteDatabase>::new())
                    .service(ApplyOptimizationRoute::<SqliteDatabase>::new())
                    .service(CreateProductRoute::new()),
            )
    })
    .keep_alive(KeepAlive::Timeout(std::time::Duration::from_secs(600)))
    .bind((host.as_str(), port))
    .map_err(|e| ServerError::InitializeError(format!("Could not bind to {host}:{port}. {e}")))?
    .run();
    info!("🚀️ Marketfeed server is running.");
    Ok(srv)
}
