//! Marketfeed Engine
//!
//! Core of the Shopify-to-marketplace listing service. The engine owns:
//!
//! 1. The canonical product store ([`mod@db_types`], [`mod@traits`] and the
//!    SQLite backend). Backends implement the storage traits; the rest of the
//!    engine only ever talks to those traits.
//! 2. The reconciliation engine ([`mod@reconcile`]) that folds webhook
//!    payloads and catalog pulls into the store, including the
//!    variant-inventory merge rule.
//! 3. The SEO enhancement pipeline ([`mod@seo`]): LLM-backed enhancement with
//!    tolerant output parsing, a deterministic rule-based fallback, and the
//!    scoring function.
//! 4. The feed projection layer ([`mod@feeds`]): deterministic Google
//!    Shopping XML, Facebook CSV and generic CSV/XML/JSON exports.
//! 5. The interactive optimizer ([`mod@optimizer`]) for per-product title,
//!    description, category and image optimization.

pub mod db_types;
mod errors;
pub mod feeds;
pub mod optimizer;
pub mod reconcile;
pub mod seo;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use errors::ListingApiError;
pub use optimizer::OptimizerApi;
pub use reconcile::SyncApi;
pub use seo::{LlmClient, LlmConfig, LlmError, SeoEnhancer};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteDatabase, SqliteDatabaseError};
