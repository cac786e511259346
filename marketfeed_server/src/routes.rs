//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers are async and never block the worker thread; all I/O (database,
//! storefront, LLM) is awaited.

use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use log::*;
use marketfeed_engine::{
    db_types::NewConnector,
    feeds::{csv_export, facebook_feed, google_shopping_feed, json_export, xml_export, CsvVariant},
    seo::{mark_enhanced, seo_score, EnhancementOptions, SeoEnhancer},
    traits::{ListingDatabase, ProductManagement, ProductUpdate},
    OptimizerApi,
    SyncApi,
};
use serde_json::json;
use shopify_tools::ShopifyApi;

use crate::{
    config::ServerConfig,
    data_objects::{
        ApplyOptimizationRequest,
        ExportParams,
        JsonResponse,
        OauthCallbackParams,
        OptimizeDescriptionRequest,
        OptimizeTitleRequest,
        ProductRequest,
    },
    errors::ServerError,
    helpers::{full_shop_domain, run_full_sync},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name);
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

//----------------------------------------------   Health  ------------------------------------------------------------

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   OAuth  -------------------------------------------------------------

route!(auth_callback => Get "/auth/callback" impl ListingDatabase);
/// Completes a storefront install: exchanges the OAuth code for a permanent
/// token, persists the connector (only on success), registers the webhook
/// topic set and runs the initial catalog sync.
pub async fn auth_callback<B: ListingDatabase>(
    query: web::Query<OauthCallbackParams>,
    api: web::Data<SyncApi<B>>,
    shopify: web::Data<ShopifyApi>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    let params = query.into_inner();
    if params.shop.trim().is_empty() || params.code.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody(
            "Both 'shop' and 'code' query parameters are required".to_string(),
        ));
    }
    let token = shopify.authorize(&params.shop, &params.code).await?;
    let shop_domain = full_shop_domain(&params.shop);
    let connector = api
        .db()
        .upsert_connector(NewConnector::shopify(&shop_domain, &token.access_token))
        .await
        .map_err(ServerError::backend)?;
    info!("🛍️️ Connector {} installed for {shop_domain}", connector.id);
    let receiver_url = format!("{}/webhooks/shopify", config.public_url.trim_end_matches('/'));
    let registrations = shopify.register_webhooks(&shop_domain, &token.access_token, &receiver_url).await?;
    let webhooks_registered = registrations.iter().filter(|r| r.succeeded()).count();
    let sync = run_full_sync(api.get_ref(), shopify.get_ref(), &connector).await?;
    Ok(HttpResponse::Ok().json(json!({
        "connector_id": connector.id,
        "shop_domain": connector.shop_domain,
        "webhooks_registered": webhooks_registered,
        "sync": sync,
    })))
}

//----------------------------------------------   Sync  --------------------------------------------------------------

route!(connector_sync => Post "/connectors/{id}/sync" impl ListingDatabase);
/// Manual full catalog pull for an installed connector. Per-product failures
/// are aggregated in the response rather than failing the request.
pub async fn connector_sync<B: ListingDatabase>(
    path: web::Path<i64>,
    api: web::Data<SyncApi<B>>,
    shopify: web::Data<ShopifyApi>,
) -> Result<HttpResponse, ServerError> {
    let connector_id = path.into_inner();
    let connector = api
        .db()
        .fetch_connector(connector_id)
        .await
        .map_err(ServerError::backend)?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Connector {connector_id}")))?;
    let sync = run_full_sync(api.get_ref(), shopify.get_ref(), &connector).await?;
    Ok(HttpResponse::Ok().json(sync))
}

//----------------------------------------------   Feeds  -------------------------------------------------------------

route!(google_feed => Get "/google.xml" impl ListingDatabase);
pub async fn google_feed<B: ListingDatabase>(
    api: web::Data<SyncApi<B>>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    let products = api.db().fetch_all_products().await.map_err(ServerError::backend)?;
    debug!("📦️ Projecting {} products into the Google Shopping feed", products.len());
    let feed = google_shopping_feed(
        &products,
        "Marketfeed product feed",
        &config.public_url,
        "Product catalog syndicated by Marketfeed",
    );
    Ok(HttpResponse::Ok().content_type("application/xml; charset=utf-8").body(feed))
}

route!(facebook_csv_feed => Get "/facebook.csv" impl ListingDatabase);
pub async fn facebook_csv_feed<B: ListingDatabase>(
    api: web::Data<SyncApi<B>>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    let products = api.db().fetch_all_products().await.map_err(ServerError::backend)?;
    debug!("📦️ Projecting {} products into the Facebook catalog feed", products.len());
    let url_base = format!("{}/products", config.public_url.trim_end_matches('/'));
    let feed = facebook_feed(&products, &url_base);
    Ok(HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(feed))
}

route!(export_products => Get "/export/{format}" impl ListingDatabase);
pub async fn export_products<B: ListingDatabase>(
    path: web::Path<String>,
    params: web::Query<ExportParams>,
    api: web::Data<SyncApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let format = path.into_inner();
    let products = api.db().fetch_all_products().await.map_err(ServerError::backend)?;
    debug!("📦️ Exporting {} products as {format}", products.len());
    let response = match format.as_str() {
        "csv" => {
            let variant = if params.excel { CsvVariant::Excel } else { CsvVariant::Plain };
            HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .body(csv_export(&products, variant))
        },
        "xml" => HttpResponse::Ok()
            .content_type("application/xml; charset=utf-8")
            .body(xml_export(&products, Utc::now())),
        "json" => HttpResponse::Ok().json(json_export(&products, Utc::now())),
        other => {
            return Err(ServerError::InvalidRequestBody(format!(
                "Unknown export format '{other}'. Use csv, xml or json."
            )))
        },
    };
    Ok(response)
}

//----------------------------------------------   SEO  ---------------------------------------------------------------

route!(enhance_product => Post "/products/{id}/enhance" impl ListingDatabase);
/// Explicit SEO enhancement. Unlike the automatic sync path, the resulting
/// record is stamped `seo_enhanced = true`, whether the LLM or the rule-based
/// fallback produced it.
pub async fn enhance_product<B: ListingDatabase>(
    path: web::Path<String>,
    body: web::Json<EnhancementOptions>,
    api: web::Data<SyncApi<B>>,
    enhancer: web::Data<SeoEnhancer>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    let product = api
        .db()
        .fetch_product(&product_id)
        .await
        .map_err(ServerError::backend)?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Product {product_id}")))?;
    let enhancement = mark_enhanced(enhancer.enhance_product(&product, &body).await);
    let score = seo_score(&enhancement);
    let update = ProductUpdate::from_product(&product).with_metadata(enhancement.clone());
    api.db()
        .update_product(&product_id, update)
        .await
        .map_err(ServerError::backend)?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Product {product_id}")))?;
    info!("✨️ Product {product_id} enhanced. SEO score: {score}");
    Ok(HttpResponse::Ok().json(json!({
        "product_id": product_id,
        "seo_score": score,
        "metadata": enhancement,
    })))
}

//----------------------------------------------   Optimizer  ---------------------------------------------------------

route!(optimize_title => Post "/optimize/title" impl ProductManagement);
pub async fn optimize_title<B: ProductManagement>(
    body: web::Json<OptimizeTitleRequest>,
    api: web::Data<OptimizerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    let outcome = api.optimize_title(&request.product_id, &request.options).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

route!(optimize_description => Post "/optimize/description" impl ProductManagement);
pub async fn optimize_description<B: ProductManagement>(
    body: web::Json<OptimizeDescriptionRequest>,
    api: web::Data<OptimizerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    let outcome = api.enhance_description(&request.product_id, &request.options).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

route!(optimize_category => Post "/optimize/category" impl ProductManagement);
pub async fn optimize_category<B: ProductManagement>(
    body: web::Json<ProductRequest>,
    api: web::Data<OptimizerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let suggestions = api.suggest_category(&body.product_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "product_id": body.product_id, "suggestions": suggestions })))
}

route!(optimize_images => Post "/optimize/images" impl ProductManagement);
pub async fn optimize_images<B: ProductManagement>(
    body: web::Json<ProductRequest>,
    api: web::Data<OptimizerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let report = api.optimize_images(&body.product_id).await?;
    Ok(HttpResponse::Ok().json(report))
}

route!(apply_optimization => Post "/optimize/apply" impl ProductManagement);
pub async fn apply_optimization<B: ProductManagement>(
    body: web::Json<ApplyOptimizationRequest>,
    api: web::Data<OptimizerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!(
        "🎯️ Applying optimization {} ({}) to product {}",
        request.optimization_id, request.optimization_type, request.product_id
    );
    api.apply_optimization(&request.product_id, &request.optimization_type, &request.optimized_value).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Optimization applied.")))
}

//----------------------------------------------   Disabled  ----------------------------------------------------------

route!(create_product => Post "/products");
/// Products enter the store through connector syncs and webhooks only.
pub async fn create_product() -> HttpResponse {
    warn!("🛍️️ Product creation endpoint called, but it is disabled.");
    HttpResponse::NotImplemented().json(JsonResponse::failure("Product creation is disabled on this service."))
}
