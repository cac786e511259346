//! Storage traits. A backend (SQLite in this repo, Postgres behind the same
//! feature slot) implements these three traits to act as the canonical
//! product store. The rest of the engine only ever talks to the traits.

mod connector_management;
mod data_objects;
mod inventory_management;
mod product_management;

pub use connector_management::ConnectorManagement;
pub use data_objects::{ProductField, ProductUpdate, SyncSummary};
pub use inventory_management::InventoryManagement;
pub use product_management::ProductManagement;

/// Convenience bound for code that needs the full store, such as the webhook
/// dispatcher. Implemented automatically for any complete backend.
pub trait ListingDatabase: ConnectorManagement + ProductManagement + InventoryManagement {}

impl<T> ListingDatabase for T where T: ConnectorManagement + ProductManagement + InventoryManagement {}
