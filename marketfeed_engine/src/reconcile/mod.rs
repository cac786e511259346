//! Reconciliation of upstream payloads against the canonical store.
//!
//! Webhook delivery order is not guaranteed upstream, so every processor here
//! is order-tolerant: creates are upserts, deletes are soft and absorbing,
//! and partial variant payloads are merged against stored state instead of
//! replacing it blindly.

mod sync_api;
mod variants;

pub use sync_api::SyncApi;
pub use variants::merge_variants;
