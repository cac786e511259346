use crate::{
    db_types::{ListingStatus, NewProduct, Product},
    traits::{ProductField, ProductUpdate},
};

#[allow(async_fn_in_trait)]
pub trait ProductManagement: Clone {
    type Error: std::error::Error;

    /// Inserts or replaces the product keyed on `(connector_id, external_id)`.
    ///
    /// The implementation must tolerate a missing unique constraint on that
    /// key: if the database rejects the upsert for that reason, it falls back
    /// to check-then-write and leaves the same state behind.
    async fn upsert_product(&self, product: NewProduct) -> Result<Product, Self::Error>;

    async fn fetch_product(&self, id: &str) -> Result<Option<Product>, Self::Error>;

    async fn fetch_product_by_external_id(
        &self,
        connector_id: i64,
        external_id: &str,
    ) -> Result<Option<Product>, Self::Error>;

    /// Full-row update of the sync-owned fields. Returns the updated product,
    /// or `None` when the row does not exist.
    async fn update_product(&self, id: &str, update: ProductUpdate) -> Result<Option<Product>, Self::Error>;

    /// Single-column write used by `apply_optimization`. Returns false when no
    /// row was affected.
    async fn set_product_field(&self, id: &str, field: ProductField, value: &str) -> Result<bool, Self::Error>;

    /// Soft-delete / reactivation. Returns false when no row was affected.
    async fn set_product_status(&self, id: &str, status: ListingStatus) -> Result<bool, Self::Error>;

    async fn fetch_products_for_connector(&self, connector_id: i64) -> Result<Vec<Product>, Self::Error>;

    /// All products across connectors, in insertion order. Feeds are projected
    /// from this list.
    async fn fetch_all_products(&self) -> Result<Vec<Product>, Self::Error>;

    /// Flips every product owned by the connector to INACTIVE. Returns the
    /// number of rows touched.
    async fn deactivate_products_for_connector(&self, connector_id: i64) -> Result<u64, Self::Error>;
}
