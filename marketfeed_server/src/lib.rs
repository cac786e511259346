//! # Marketfeed server
//!
//! The HTTP surface of the listing service. It is responsible for:
//! * the Shopify OAuth callback that installs a storefront as a connector,
//! * receiving and verifying Shopify webhooks and handing them to the
//!   reconciliation engine,
//! * serving the syndicated feeds and catalog exports,
//! * the interactive SEO enhancement and optimization endpoints.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config] for more
//! information.

pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod webhook_routes;

#[cfg(test)]
mod endpoint_tests;
