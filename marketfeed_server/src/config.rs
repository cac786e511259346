use std::env;

use log::*;
use marketfeed_engine::seo::LlmConfig;
use shopify_tools::ShopifyConfig;

const DEFAULT_MFS_HOST: &str = "127.0.0.1";
const DEFAULT_MFS_PORT: u16 = 8410;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Externally reachable base URL. Webhook subscriptions are registered
    /// against `{public_url}/webhooks/shopify`, so behind a proxy this must be
    /// the proxy's address, not the bind address.
    pub public_url: String,
    pub database_url: String,
    pub shopify: ShopifyConfig,
    pub llm: LlmConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MFS_HOST.to_string(),
            port: DEFAULT_MFS_PORT,
            public_url: format!("http://{DEFAULT_MFS_HOST}:{DEFAULT_MFS_PORT}"),
            database_url: String::default(),
            shopify: ShopifyConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("MFS_HOST").ok().unwrap_or_else(|| DEFAULT_MFS_HOST.into());
        let port = env::var("MFS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for MFS_PORT. {e} Using the default, {DEFAULT_MFS_PORT}, \
                         instead."
                    );
                    DEFAULT_MFS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_MFS_PORT);
        let public_url = env::var("MFS_PUBLIC_URL").unwrap_or_else(|_| {
            let url = format!("http://{host}:{port}");
            warn!("🪛️ MFS_PUBLIC_URL is not set. Webhooks will be registered against {url}, which Shopify cannot \
                   reach unless it is public.");
            url
        });
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            warn!("🪛️ DATABASE_URL is not set. Using a local SQLite database.");
            "sqlite://data/marketfeed.db".to_string()
        });
        let shopify = ShopifyConfig::new_from_env_or_default();
        let llm = LlmConfig::new_from_env_or_default();
        Self { host, port, public_url, database_url, shopify, llm }
    }
}
